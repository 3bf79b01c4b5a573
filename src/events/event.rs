//! # Runtime events emitted by the elevator.
//!
//! The [`EventKind`] enum classifies event types across four categories:
//! - **Engine lifecycle**: dispatch loop started / shutdown requested / stopped
//! - **Movement**: travel started, interrupted, arrived
//! - **Riders**: queued, refused, boarded, arrived, denied, returned, evicted
//! - **Subscribers**: overflow and panic reports from the fan-out workers
//!
//! The [`Event`] struct carries additional metadata such as timestamps, rider,
//! floors, reasons, and travel time. `Display` renders a one-line narrative
//! suitable for dashboards.
//!
//! ## Ordering
//! `seq` is process-wide and strictly increasing. Subscribers may see events
//! from different workers interleaved; sort by `seq` to recover publish order.
//!
//! ## Example
//! ```rust
//! use liftvisor::{Event, EventKind, FloorPlan};
//!
//! let plan = FloorPlan::restricted_base();
//! let ev = Event::new(EventKind::Arrived).with_floor(plan.base());
//!
//! assert_eq!(ev.kind, EventKind::Arrived);
//! assert_eq!(ev.floor.as_deref(), Some("G"));
//! assert_eq!(ev.to_string(), "The elevator arrived at floor G");
//! ```

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

use crate::rides::Floor;

/// Next `Event::seq`.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `reason`: `subscriber=<name> info=<panic message>`
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `reason`: `subscriber=<name> reason=<full|closed>`
    SubscriberOverflow,

    // === Engine lifecycle ===
    /// Dispatch loop began serving calls.
    ///
    /// Sets:
    /// - `floor`: floor the cabin starts at
    DispatchStarted,

    /// `Elevator::stop()` was called.
    ShutdownRequested,

    /// Dispatch loop finished its terminal cleanup and exited.
    ///
    /// Sets:
    /// - `floor`: floor the cabin ended at
    DispatchStopped,

    // === Calls ===
    /// A rider call was appended to the queue.
    ///
    /// Sets:
    /// - `rider`, `floor`: who is waiting where
    CallQueued,

    /// A rider call arrived after shutdown and was failed immediately.
    ///
    /// Sets:
    /// - `rider`, `floor`
    CallRefused,

    // === Movement ===
    /// Cabin left for a floor.
    ///
    /// Sets:
    /// - `floor`: departure floor
    /// - `target`: destination floor
    /// - `travel_ms`: scheduled travel time
    TravelStarted,

    /// Travel was cut short by shutdown; the cabin keeps its last floor.
    ///
    /// Sets:
    /// - `floor`: floor the cabin is still at
    /// - `target`: floor it was heading to
    TravelInterrupted,

    /// Cabin reached a floor.
    ///
    /// Sets:
    /// - `floor`
    Arrived,

    // === Riders ===
    /// Rider stepped in and pressed a button.
    ///
    /// Sets:
    /// - `rider`, `floor`: boarding floor
    /// - `target`: chosen destination
    RiderBoarded,

    /// A floor button was queued at the front of the call queue.
    ///
    /// Sets:
    /// - `target`
    ButtonPressed,

    /// Rider reached its destination and stepped out.
    ///
    /// Sets:
    /// - `rider`, `floor`
    RiderArrived,

    /// A boarded rider is not cleared for the current floor.
    ///
    /// Sets:
    /// - `rider`, `floor`: denied floor
    /// - `target`: boarding floor the rider is returned to
    ClearanceDenied,

    /// A denied rider was returned and stepped out.
    ///
    /// Sets:
    /// - `rider`, `floor`
    RiderReturned,

    /// The stop interrupted by a return trip was queued again at the front.
    ///
    /// Sets:
    /// - `target`
    StopRetried,

    /// A boarded or waiting rider was failed during shutdown.
    ///
    /// Sets:
    /// - `rider`, `floor`
    /// - `reason`: `aboard` or `waiting`
    RiderEvicted,
}

impl EventKind {
    /// Short stable label (kebab-case) for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            EventKind::SubscriberPanicked => "subscriber-panicked",
            EventKind::SubscriberOverflow => "subscriber-overflow",
            EventKind::DispatchStarted => "dispatch-started",
            EventKind::ShutdownRequested => "shutdown-requested",
            EventKind::DispatchStopped => "dispatch-stopped",
            EventKind::CallQueued => "call-queued",
            EventKind::CallRefused => "call-refused",
            EventKind::TravelStarted => "travel-started",
            EventKind::TravelInterrupted => "travel-interrupted",
            EventKind::Arrived => "arrived",
            EventKind::RiderBoarded => "rider-boarded",
            EventKind::ButtonPressed => "button-pressed",
            EventKind::RiderArrived => "rider-arrived",
            EventKind::ClearanceDenied => "clearance-denied",
            EventKind::RiderReturned => "rider-returned",
            EventKind::StopRetried => "stop-retried",
            EventKind::RiderEvicted => "rider-evicted",
        }
    }
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Rider label (`name (clearance)`), if applicable.
    pub rider: Option<Arc<str>>,
    /// Floor where the event happened.
    pub floor: Option<Arc<str>>,
    /// Floor the event points at (destination, return floor).
    pub target: Option<Arc<str>>,
    /// Human-readable reason (overflow details, eviction cause).
    pub reason: Option<Arc<str>>,
    /// Scheduled travel time in milliseconds (compact).
    pub travel_ms: Option<u32>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            rider: None,
            floor: None,
            target: None,
            reason: None,
            travel_ms: None,
        }
    }

    /// Attaches a rider label.
    #[inline]
    pub fn with_rider(mut self, rider: impl Into<Arc<str>>) -> Self {
        self.rider = Some(rider.into());
        self
    }

    /// Attaches the floor where the event happened.
    #[inline]
    pub fn with_floor(mut self, floor: &Floor) -> Self {
        self.floor = Some(floor.name_arc());
        self
    }

    /// Attaches the floor the event points at.
    #[inline]
    pub fn with_target(mut self, floor: &Floor) -> Self {
        self.target = Some(floor.name_arc());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a travel duration (stored as milliseconds).
    #[inline]
    pub fn with_travel(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.travel_ms = Some(ms);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_reason(format!("subscriber={subscriber} info={info}"))
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rider = self.rider.as_deref().unwrap_or("unknown rider");
        let floor = self.floor.as_deref().unwrap_or("?");
        let target = self.target.as_deref().unwrap_or("?");
        match self.kind {
            EventKind::SubscriberPanicked | EventKind::SubscriberOverflow => write!(
                f,
                "[{}] {}",
                self.kind.as_label(),
                self.reason.as_deref().unwrap_or("")
            ),
            EventKind::DispatchStarted => write!(f, "The elevator opened at floor {floor}"),
            EventKind::ShutdownRequested => f.write_str("Elevator shutdown requested"),
            EventKind::DispatchStopped => write!(f, "The elevator closed at floor {floor}"),
            EventKind::CallQueued => write!(f, "{rider} calls the elevator at floor {floor}"),
            EventKind::CallRefused => {
                write!(f, "{rider} calls the elevator at floor {floor}, but it is closed")
            }
            EventKind::TravelStarted => {
                write!(f, "The elevator is travelling to floor {target}...")
            }
            EventKind::TravelInterrupted => write!(
                f,
                "The elevator stopped travelling to floor {target}; still at floor {floor}"
            ),
            EventKind::Arrived => write!(f, "The elevator arrived at floor {floor}"),
            EventKind::RiderBoarded => write!(
                f,
                "{rider} gets in the elevator at floor {floor} and presses the button for floor {target}"
            ),
            EventKind::ButtonPressed => write!(f, "Button for floor {target} lights up"),
            EventKind::RiderArrived => write!(f, "{rider} gets off at floor {floor}"),
            EventKind::ClearanceDenied => write!(
                f,
                "{rider} was not allowed to leave the elevator at floor {floor}; returning to floor {target}"
            ),
            EventKind::RiderReturned => {
                write!(f, "{rider} was escorted out at floor {floor}")
            }
            EventKind::StopRetried => write!(f, "Stop at floor {target} will be retried"),
            EventKind::RiderEvicted => write!(
                f,
                "{rider} was turned away at floor {floor} ({})",
                self.reason.as_deref().unwrap_or("closed")
            ),
        }
    }
}
