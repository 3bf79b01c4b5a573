//! # Hooking into dispatch events.
//!
//! A [`Subscribe`] implementation sees every [`Event`] the elevator publishes:
//! calls, travel, boarding, clearance denials, evictions. Typical uses are a
//! security desk that records denials, a lobby display, or an audit trail of
//! who was left behind when the elevator closed.
//!
//! `on_event` runs on a worker task of its own, fed by a bounded queue. The
//! cabin never waits for it: while a subscriber is busy the cabin keeps moving,
//! and if the queue fills up the event is dropped for that subscriber alone and
//! reported as `EventKind::SubscriberOverflow`. A panic in `on_event` is caught
//! and reported as `EventKind::SubscriberPanicked`; the worker carries on.
//!
//! ## Reading events
//! - `ClearanceDenied`: `rider` was found at `floor` without clearance and is
//!   being taken back to `target`. The matching `RiderReturned` follows once the
//!   cabin gets there, unless the elevator closes first.
//! - `RiderEvicted`: the elevator closed on `rider` at `floor`. `reason` is
//!   `aboard` for someone inside the cabin and `waiting` for an unserved call.
//! - `DispatchStopped` is the last event an elevator publishes. After it the
//!   subscriber is released.
//! - Events reach one subscriber in publish order. To merge with other sources,
//!   order by `seq`.
//!
//! State that outlives one event (counters, the last known floor) lives in the
//! subscriber behind a lock, the way [`Journal`](crate::Journal) keeps its lines.
//!
//! ## Example
//! ```rust
//! use std::sync::Mutex;
//!
//! use async_trait::async_trait;
//! use liftvisor::{Event, EventKind, Subscribe};
//!
//! /// Names of everyone caught on the wrong floor or left behind at closing.
//! #[derive(Default)]
//! struct SecurityDesk {
//!     incidents: Mutex<Vec<String>>,
//! }
//!
//! #[async_trait]
//! impl Subscribe for SecurityDesk {
//!     async fn on_event(&self, ev: &Event) {
//!         let rider = ev.rider.as_deref().unwrap_or("unknown");
//!         let floor = ev.floor.as_deref().unwrap_or("?");
//!         let incident = match ev.kind {
//!             EventKind::ClearanceDenied => format!("{rider} denied at {floor}"),
//!             EventKind::RiderEvicted => {
//!                 let reason = ev.reason.as_deref().unwrap_or("");
//!                 format!("{rider} evicted at {floor} ({reason})")
//!             }
//!             _ => return,
//!         };
//!         if let Ok(mut incidents) = self.incidents.lock() {
//!             incidents.push(incident);
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "security-desk"
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Receives the elevator's events on a worker task of its own.
///
/// `on_event` shares the runtime with the dispatch loop. Await slow I/O
/// instead of blocking a runtime thread, and keep failures inside the
/// subscriber.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles one event. Only one call per subscriber is in flight at a time.
    async fn on_event(&self, event: &Event);

    /// Name shown in `SubscriberOverflow` and `SubscriberPanicked` reasons.
    ///
    /// Defaults to the full type path.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// How many events may wait for this subscriber before new ones are
    /// dropped. A busy cabin publishes a handful of events per stop. Values
    /// below 1 are raised to 1.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
