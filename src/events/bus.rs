//! # Event bus.
//!
//! [`Bus`] carries [`Event`]s from whoever produces them (the dispatch loop,
//! the elevator handle, subscriber workers reporting trouble) to whoever
//! listens. It wraps a [`tokio::sync::broadcast`] channel.
//!
//! ```text
//! DispatchLoop ──┐                    ┌──► subscriber_listener ──► SubscriberSet
//! Elevator     ──┼─────► Bus ─────────┤     (spawned by ElevatorBuilder)
//! SubscriberSet ─┘                    └──► Elevator::events() receivers
//! ```
//!
//! There is no global logger: observability is whatever subscribes here.
//! Publishing never waits. With nobody listening an event simply vanishes; a
//! receiver more than `capacity` events behind gets `RecvError::Lagged(n)` and
//! resumes from the oldest event still buffered.

use tokio::sync::broadcast;

use super::event::Event;

/// Cloneable publishing handle plus receiver factory.
///
/// All clones share one ring buffer of `capacity` events.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a bus buffering up to `capacity` events (at least 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Sends `ev` to every current receiver. Never blocks, never fails.
    pub fn publish(&self, ev: Event) {
        // No receivers is not an error here.
        let _ = self.tx.send(ev);
    }

    /// New independent receiver; it sees only events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}
