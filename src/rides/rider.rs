//! # Riders and clearance tiers.
//!
//! A [`Rider`] is owned by the caller. The engine copies only its identity and
//! [`ClearanceLevel`] when a call is placed; tracking the rider's current floor
//! after a ride is the caller's job (see [`Rider::set_floor`]).

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use crate::rides::floor::Floor;

/// Source of process-unique rider ids.
static RIDER_SEQ: AtomicU64 = AtomicU64::new(1);

/// Ordered access tier, fixed per rider for its lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClearanceLevel {
    /// Lowest tier.
    Confidential,
    /// Middle tier.
    Secret,
    /// Highest tier.
    TopSecret,
}

impl ClearanceLevel {
    /// Every tier, lowest first.
    pub const ALL: [ClearanceLevel; 3] = [
        ClearanceLevel::Confidential,
        ClearanceLevel::Secret,
        ClearanceLevel::TopSecret,
    ];
}

impl fmt::Display for ClearanceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ClearanceLevel::Confidential => "Confidential",
            ClearanceLevel::Secret => "Secret",
            ClearanceLevel::TopSecret => "TopSecret",
        })
    }
}

/// Process-unique rider identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RiderId(u64);

impl RiderId {
    fn next() -> Self {
        Self(RIDER_SEQ.fetch_add(1, AtomicOrdering::Relaxed))
    }

    /// Raw numeric id.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RiderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An independent actor that calls the cabin.
#[derive(Clone, Debug)]
pub struct Rider {
    tag: RiderTag,
    floor: Floor,
}

impl Rider {
    /// Creates a rider standing on `floor`, with a fresh id.
    pub fn new(name: impl Into<Arc<str>>, clearance: ClearanceLevel, floor: Floor) -> Self {
        Self {
            tag: RiderTag {
                id: RiderId::next(),
                name: name.into(),
                clearance,
            },
            floor,
        }
    }

    pub fn id(&self) -> RiderId {
        self.tag.id
    }

    pub fn name(&self) -> &str {
        &self.tag.name
    }

    pub fn clearance(&self) -> ClearanceLevel {
        self.tag.clearance
    }

    /// The floor this rider last legitimately occupied.
    pub fn floor(&self) -> &Floor {
        &self.floor
    }

    /// Records where the rider ended up after a resolved call.
    pub fn set_floor(&mut self, floor: Floor) {
        self.floor = floor;
    }

    pub(crate) fn tag(&self) -> RiderTag {
        self.tag.clone()
    }
}

impl fmt::Display for Rider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.tag.fmt(f)
    }
}

/// The part of a rider the engine keeps while serving a call.
#[derive(Clone, Debug)]
pub(crate) struct RiderTag {
    pub(crate) id: RiderId,
    pub(crate) name: Arc<str>,
    pub(crate) clearance: ClearanceLevel,
}

impl RiderTag {
    pub(crate) fn label(&self) -> Arc<str> {
        Arc::from(self.to_string())
    }
}

impl fmt::Display for RiderTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.clearance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rides::floor::FloorPlan;

    #[test]
    fn test_clearance_is_ordered() {
        assert!(ClearanceLevel::Confidential < ClearanceLevel::Secret);
        assert!(ClearanceLevel::Secret < ClearanceLevel::TopSecret);
        let mut sorted = ClearanceLevel::ALL;
        sorted.sort();
        assert_eq!(sorted, ClearanceLevel::ALL);
    }

    #[test]
    fn test_ids_are_unique() {
        let plan = FloorPlan::restricted_base();
        let a = Rider::new("a", ClearanceLevel::Secret, plan.base().clone());
        let b = Rider::new("a", ClearanceLevel::Secret, plan.base().clone());
        assert_ne!(a.id(), b.id());
        assert_eq!(a.clone().id(), a.id());
    }

    #[test]
    fn test_set_floor_and_display() {
        let plan = FloorPlan::restricted_base();
        let mut rider = Rider::new("Mulder", ClearanceLevel::TopSecret, plan.base().clone());
        rider.set_floor(plan.floor("T2").unwrap().clone());
        assert_eq!(rider.floor().name(), "T2");
        assert_eq!(rider.to_string(), "Mulder (TopSecret)");
    }
}
