//! # Floor access policy.
//!
//! [`AccessPolicy`] decides whether a rider of a given [`ClearanceLevel`] may
//! occupy a floor. The dispatch loop evaluates it for every boarded rider each
//! time the cabin stops.
//!
//! ## Rules
//! - Pure: same inputs, same answer; no side effects, no error path.
//! - Evaluated synchronously inside the dispatch loop; keep it cheap.
//!
//! ## Reference policy ([`TieredAccess`])
//! ```text
//!               base (0)   first restricted (1)   above (2..)
//! Confidential     ✓                ✗                  ✗
//! Secret           ✓                ✓                  ✗
//! TopSecret        ✓                ✓                  ✓
//! ```

use crate::rides::{ClearanceLevel, Floor};

/// Decides which floors a clearance tier may occupy.
///
/// ## Example
/// ```rust
/// use liftvisor::{AccessPolicy, ClearanceLevel, Floor};
///
/// /// Everyone may go everywhere.
/// struct OpenHouse;
///
/// impl AccessPolicy for OpenHouse {
///     fn is_allowed(&self, _clearance: ClearanceLevel, _floor: &Floor) -> bool {
///         true
///     }
///     fn name(&self) -> &'static str { "open-house" }
/// }
/// ```
pub trait AccessPolicy: Send + Sync + 'static {
    /// True if `clearance` may occupy `floor`.
    fn is_allowed(&self, clearance: ClearanceLevel, floor: &Floor) -> bool;

    /// Policy name for logs.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Reference tiered policy, keyed on the floor's position in its plan.
#[derive(Clone, Copy, Debug, Default)]
pub struct TieredAccess;

impl AccessPolicy for TieredAccess {
    fn is_allowed(&self, clearance: ClearanceLevel, floor: &Floor) -> bool {
        match clearance {
            ClearanceLevel::Confidential => floor.index() == 0,
            ClearanceLevel::Secret => floor.index() <= 1,
            ClearanceLevel::TopSecret => true,
        }
    }

    fn name(&self) -> &'static str {
        "tiered"
    }
}
