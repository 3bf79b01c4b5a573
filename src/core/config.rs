//! # Global runtime configuration.
//!
//! Provides [`Config`] centralized settings for one elevator.
//!
//! Config is used in two ways:
//! 1. **Elevator creation**: `Elevator::builder(plan).with_config(cfg)`
//! 2. **Dispatch timing**: `DispatchLoop` derives travel and idle waits from it
//!
//! ## Sentinel values
//! - `idle_tick = 0s` → clamped to 1ms (the loop must yield between polls)
//! - `bus_capacity = 0` → clamped to 1

use std::time::Duration;

/// Global configuration for the elevator runtime.
///
/// ## Field semantics
/// - `per_floor`: travel time for one floor-to-floor leg
/// - `idle_tick`: wait between queue polls when there is nothing to do
/// - `bus_capacity`: event bus ring buffer size (min 1)
/// - `preview_len`: upcoming stops reported by `Elevator::snapshot`
/// - `journal_capacity`: lines a dashboard journal should retain
///
/// ## Notes
/// All fields are public for flexibility. Prefer the helper accessors to avoid
/// sprinkling sentinel checks across the codebase.
#[derive(Clone, Debug)]
pub struct Config {
    /// Time to travel one floor. A trip of `n` floors takes `n × per_floor`.
    pub per_floor: Duration,

    /// How long the dispatch loop waits before polling an empty queue again.
    ///
    /// This tick is what lets concurrent `call()`s be noticed promptly.
    pub idle_tick: Duration,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Slow receivers that lag behind more than `bus_capacity` messages will
    /// receive `Lagged` and skip older items.
    pub bus_capacity: usize,

    /// Number of queued target floors returned by `Elevator::snapshot`.
    pub preview_len: usize,

    /// Suggested capacity for a [`Journal`](crate::Journal) attached to this elevator.
    pub journal_capacity: usize,
}

impl Config {
    /// Travel time for a trip spanning `floors` legs.
    #[inline]
    pub fn travel_time(&self, floors: usize) -> Duration {
        let legs = u32::try_from(floors).unwrap_or(u32::MAX);
        self.per_floor.saturating_mul(legs)
    }

    /// Returns the idle tick clamped to a minimum of 1ms.
    #[inline]
    pub fn idle_tick_clamped(&self) -> Duration {
        self.idle_tick.max(Duration::from_millis(1))
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `per_floor = 1s`
    /// - `idle_tick = 1ms`
    /// - `bus_capacity = 1024`
    /// - `preview_len = 5`
    /// - `journal_capacity = 1024`
    fn default() -> Self {
        Self {
            per_floor: Duration::from_secs(1),
            idle_tick: Duration::from_millis(1),
            bus_capacity: 1024,
            preview_len: 5,
            journal_capacity: 1024,
        }
    }
}
