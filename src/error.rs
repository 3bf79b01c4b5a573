//! Error types used by the liftvisor runtime and its riders.
//!
//! This module defines two main error enums:
//!
//! - [`RideError`]: why a single ride did not end at the rider's chosen floor.
//!   Delivered through the ride's result channel, never thrown into the
//!   dispatch loop.
//! - [`RuntimeError`]: errors raised while building or driving the engine itself.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging/metrics.
//!
//! Programming-error faults (a floor that does not belong to the plan) are not
//! represented here: they panic.

use thiserror::Error;

use crate::rides::{Floor, ReturnSignal};

/// # Rider-facing ride failures.
///
/// `InsufficientClearance` is expected business logic, not a fault: the rider
/// was carried to a floor it may not access and is being returned.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RideError {
    /// The cabin stopped at a floor this rider is not cleared for.
    ///
    /// The rider is taken straight back to the floor it boarded at;
    /// `returned` resolves with that floor once it has stepped out.
    #[error("insufficient clearance for floor {floor}")]
    InsufficientClearance {
        /// Floor the rider was denied at.
        floor: Floor,
        /// Resolves once the rider is back on its boarding floor.
        returned: ReturnSignal,
    },

    /// The elevator shut down before the ride completed.
    #[error("elevator closed")]
    Closed,
}

impl RideError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use liftvisor::RideError;
    ///
    /// assert_eq!(RideError::Closed.as_label(), "ride_closed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RideError::InsufficientClearance { .. } => "ride_insufficient_clearance",
            RideError::Closed => "ride_closed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RideError::InsufficientClearance { floor, .. } => {
                format!("denied at floor {floor}; returning to boarding floor")
            }
            RideError::Closed => "elevator closed".to_string(),
        }
    }

    /// True for [`RideError::Closed`].
    pub fn is_closed(&self) -> bool {
        matches!(self, RideError::Closed)
    }
}

/// # Errors produced by the liftvisor runtime.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// A floor plan needs at least two floors.
    #[error("floor plan needs at least 2 floors, got {len}")]
    FloorPlanTooSmall {
        /// Number of floors supplied.
        len: usize,
    },

    /// Floor names must be unique.
    #[error("duplicate floor name {name:?}")]
    DuplicateFloor {
        /// The repeated name.
        name: String,
    },

    /// `start()` was called on an elevator whose dispatch loop already runs.
    #[error("dispatch loop already started")]
    AlreadyStarted,

    /// `start()` was called after `stop()`.
    #[error("elevator already stopped")]
    Stopped,
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use liftvisor::RuntimeError;
    ///
    /// let err = RuntimeError::FloorPlanTooSmall { len: 1 };
    /// assert_eq!(err.as_label(), "runtime_floor_plan_too_small");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::FloorPlanTooSmall { .. } => "runtime_floor_plan_too_small",
            RuntimeError::DuplicateFloor { .. } => "runtime_duplicate_floor",
            RuntimeError::AlreadyStarted => "runtime_already_started",
            RuntimeError::Stopped => "runtime_stopped",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RuntimeError::FloorPlanTooSmall { len } => format!("floor plan too small: {len}"),
            RuntimeError::DuplicateFloor { name } => format!("duplicate floor: {name}"),
            RuntimeError::AlreadyStarted => "dispatch loop already started".to_string(),
            RuntimeError::Stopped => "elevator already stopped".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rides::FloorPlan;

    #[test]
    fn test_ride_error_labels() {
        let plan = FloorPlan::restricted_base();
        let (_tx, returned) = ReturnSignal::channel();
        let denied = RideError::InsufficientClearance {
            floor: plan.floor("T1").unwrap().clone(),
            returned,
        };
        assert_eq!(denied.as_label(), "ride_insufficient_clearance");
        assert_eq!(denied.to_string(), "insufficient clearance for floor T1");
        assert!(!denied.is_closed());
        assert!(RideError::Closed.is_closed());
    }

    #[test]
    fn test_runtime_error_messages() {
        let err = RuntimeError::DuplicateFloor { name: "G".into() };
        assert_eq!(err.as_label(), "runtime_duplicate_floor");
        assert_eq!(err.to_string(), "duplicate floor name \"G\"");
        assert_eq!(RuntimeError::AlreadyStarted.as_message(), "dispatch loop already started");
    }
}
