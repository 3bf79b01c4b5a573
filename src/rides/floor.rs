//! # Floors and the fixed floor plan.
//!
//! A [`Floor`] is an opaque, totally ordered stop identifier. Floors are only
//! ever minted by a [`FloorPlan`], which fixes the ordered list of stops at
//! construction time and never changes afterwards.
//!
//! ## Rules
//! - A plan has **at least two** floors with **unique** names.
//! - Ordering follows the plan's sequence (index), not the name.
//! - Distance between two floors is the absolute difference of their indices.
//! - Passing a floor that does not belong to the plan is a programming error
//!   and panics (see [`FloorPlan::distance`]).
//!
//! ## Example
//! ```rust
//! use liftvisor::FloorPlan;
//!
//! let plan = FloorPlan::new(["G", "S", "T1", "T2"]).unwrap();
//! let g = plan.floor("G").unwrap();
//! let t2 = plan.floor("T2").unwrap();
//!
//! assert_eq!(plan.distance(g, t2), 3);
//! assert!(g < t2);
//! assert_eq!(plan.base(), g);
//! ```

use std::fmt;
use std::sync::Arc;

use rand::Rng;

use crate::error::RuntimeError;

/// Name of the unrestricted base floor in [`FloorPlan::restricted_base`].
pub const GROUND_FLOOR: &str = "G";
/// Name of the first restricted floor in [`FloorPlan::restricted_base`].
pub const SECRET_NUCLEAR_FLOOR: &str = "S";
/// Name of the experimental floor in [`FloorPlan::restricted_base`].
pub const SECRET_EXPERIMENTAL_FLOOR: &str = "T1";
/// Name of the top floor in [`FloorPlan::restricted_base`].
pub const SECRET_ALIEN_FLOOR: &str = "T2";

/// A stop served by the cabin.
///
/// Cheap to clone (the name is shared). Compares by plan position first.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Floor {
    index: usize,
    name: Arc<str>,
}

impl Floor {
    /// Position of this floor in its plan (0 = base).
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Human-readable floor name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub(crate) fn name_arc(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }
}

impl fmt::Display for Floor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Ordered, immutable list of floors served by one cabin.
///
/// Cloning a plan is cheap (shared slice).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FloorPlan {
    floors: Arc<[Floor]>,
}

impl FloorPlan {
    /// Builds a plan from floor names, bottom to top.
    ///
    /// Returns [`RuntimeError::FloorPlanTooSmall`] for fewer than two floors and
    /// [`RuntimeError::DuplicateFloor`] if a name repeats.
    pub fn new<I, S>(names: I) -> Result<Self, RuntimeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        let mut floors: Vec<Floor> = Vec::new();
        for (index, name) in names.into_iter().enumerate() {
            let name: Arc<str> = name.into();
            if floors.iter().any(|f| f.name == name) {
                return Err(RuntimeError::DuplicateFloor {
                    name: name.to_string(),
                });
            }
            floors.push(Floor { index, name });
        }
        if floors.len() < 2 {
            return Err(RuntimeError::FloorPlanTooSmall { len: floors.len() });
        }
        Ok(Self {
            floors: floors.into(),
        })
    }

    /// The four-floor reference base: `G`, `S`, `T1`, `T2`.
    ///
    /// Pairs with [`TieredAccess`](crate::TieredAccess): `G` is open to every
    /// tier, `S` to `Secret` and above, `T1`/`T2` to `TopSecret` only.
    pub fn restricted_base() -> Self {
        let floors: Vec<Floor> = [
            GROUND_FLOOR,
            SECRET_NUCLEAR_FLOOR,
            SECRET_EXPERIMENTAL_FLOOR,
            SECRET_ALIEN_FLOOR,
        ]
        .into_iter()
        .enumerate()
        .map(|(index, name)| Floor {
            index,
            name: name.into(),
        })
        .collect();
        Self {
            floors: floors.into(),
        }
    }

    /// Looks a floor up by name.
    pub fn floor(&self, name: &str) -> Option<&Floor> {
        self.floors.iter().find(|f| f.name() == name)
    }

    /// All floors, bottom to top.
    pub fn floors(&self) -> &[Floor] {
        &self.floors
    }

    /// The bottom floor, where the cabin starts.
    pub fn base(&self) -> &Floor {
        &self.floors[0]
    }

    /// Number of floors (always `>= 2`).
    pub fn len(&self) -> usize {
        self.floors.len()
    }

    /// Always `false`; a plan cannot be empty.
    pub fn is_empty(&self) -> bool {
        self.floors.is_empty()
    }

    /// True if `floor` was minted by this plan.
    pub fn contains(&self, floor: &Floor) -> bool {
        self.floors.get(floor.index) == Some(floor)
    }

    /// Number of floor-to-floor legs between `a` and `b`.
    ///
    /// # Panics
    /// If either floor does not belong to this plan.
    pub fn distance(&self, a: &Floor, b: &Floor) -> usize {
        self.resolve(a).index.abs_diff(self.resolve(b).index)
    }

    /// Picks a uniformly random floor other than `current`.
    ///
    /// This is the conventional destination chooser for riders: never ask the
    /// cabin to take you where you already are.
    pub fn pick_other<R: Rng + ?Sized>(&self, rng: &mut R, current: &Floor) -> Floor {
        let skip = self.resolve(current).index;
        let mut index = rng.random_range(0..self.floors.len() - 1);
        if index >= skip {
            index += 1;
        }
        self.floors[index].clone()
    }

    /// Returns the plan's own copy of `floor`.
    ///
    /// # Panics
    /// If the floor does not belong to this plan. Floors come from a closed
    /// set; an unknown one means the caller mixed plans up.
    pub(crate) fn resolve<'a>(&'a self, floor: &Floor) -> &'a Floor {
        match self.floors.get(floor.index) {
            Some(own) if own == floor => own,
            _ => panic!("floor {floor} is not part of this floor plan"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_rejects_single_floor() {
        let err = FloorPlan::new(["G"]).unwrap_err();
        assert!(matches!(err, RuntimeError::FloorPlanTooSmall { len: 1 }));
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let err = FloorPlan::new(["G", "S", "G"]).unwrap_err();
        assert!(matches!(err, RuntimeError::DuplicateFloor { ref name } if name == "G"));
    }

    #[test]
    fn test_restricted_base_layout() {
        let plan = FloorPlan::restricted_base();
        let names: Vec<&str> = plan.floors().iter().map(Floor::name).collect();
        assert_eq!(names, ["G", "S", "T1", "T2"]);
        assert_eq!(plan.base().name(), GROUND_FLOOR);
        assert_eq!(plan, FloorPlan::new(["G", "S", "T1", "T2"]).unwrap());
    }

    #[test]
    fn test_distance_is_symmetric() {
        let plan = FloorPlan::restricted_base();
        let s = plan.floor("S").unwrap();
        let t2 = plan.floor("T2").unwrap();
        assert_eq!(plan.distance(s, t2), 2);
        assert_eq!(plan.distance(t2, s), 2);
        assert_eq!(plan.distance(s, s), 0);
    }

    #[test]
    fn test_foreign_floor_is_not_contained() {
        let plan = FloorPlan::restricted_base();
        let other = FloorPlan::new(["G", "Roof"]).unwrap();
        assert!(plan.contains(other.floor("G").unwrap()));
        assert!(!plan.contains(other.floor("Roof").unwrap()));
    }

    #[test]
    #[should_panic(expected = "not part of this floor plan")]
    fn test_distance_panics_on_foreign_floor() {
        let plan = FloorPlan::restricted_base();
        let other = FloorPlan::new(["G", "Roof"]).unwrap();
        plan.distance(plan.base(), other.floor("Roof").unwrap());
    }

    #[test]
    fn test_pick_other_never_returns_current() {
        let plan = FloorPlan::restricted_base();
        let mut rng = StdRng::seed_from_u64(7);
        for current in plan.floors() {
            for _ in 0..200 {
                let picked = plan.pick_other(&mut rng, current);
                assert_ne!(&picked, current);
                assert!(plan.contains(&picked));
            }
        }
    }

    #[test]
    fn test_pick_other_reaches_every_other_floor() {
        let plan = FloorPlan::restricted_base();
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = [false; 4];
        for _ in 0..500 {
            seen[plan.pick_other(&mut rng, plan.base()).index()] = true;
        }
        assert_eq!(seen, [false, true, true, true]);
    }
}
