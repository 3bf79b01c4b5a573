//! Access policies.
//!
//! This module groups the knobs that decide **who may be where**.
//!
//! ## Contents
//! - [`AccessPolicy`] trait: (clearance, floor) → allowed?
//! - [`TieredAccess`] the reference three-tier policy (default)
//!
//! ## Quick wiring
//! ```text
//! ElevatorBuilder::with_access_policy(policy)
//!      └─► core::dispatch::DispatchLoop evaluates it for every boarded rider
//!          at every stop; the first denied rider is returned to its boarding floor.
//! ```

mod access;

pub use access::{AccessPolicy, TieredAccess};
