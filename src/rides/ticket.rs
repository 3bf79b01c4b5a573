//! # Single-resolution result handles.
//!
//! [`RideTicket`] is what [`Elevator::call`](crate::Elevator::call) returns;
//! [`ReturnSignal`] travels inside
//! [`RideError::InsufficientClearance`](crate::RideError::InsufficientClearance)
//! and resolves once the rider has been carried back to its boarding floor.
//!
//! Both are thin futures over a `tokio::sync::oneshot` receiver. The engine
//! resolves each sender exactly once; if the sender is dropped without a value
//! (the dispatch loop went away) the handle resolves with
//! [`RideError::Closed`](crate::RideError::Closed), so an awaiting rider can
//! never hang on a dead engine.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use crate::error::RideError;
use crate::rides::floor::Floor;

/// Outcome of one call: the floor the rider got off at, or why not.
pub type RideResult = Result<Floor, RideError>;

/// Sending half of a ticket or return signal.
pub(crate) type Reply = oneshot::Sender<RideResult>;

/// Pending outcome of [`Elevator::call`](crate::Elevator::call).
///
/// Await it to learn where the ride ended.
#[derive(Debug)]
#[must_use = "a ride ticket resolves only when awaited"]
pub struct RideTicket {
    rx: oneshot::Receiver<RideResult>,
}

impl RideTicket {
    pub(crate) fn channel() -> (Reply, Self) {
        let (tx, rx) = oneshot::channel();
        (tx, Self { rx })
    }
}

impl Future for RideTicket {
    type Output = RideResult;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|res| res.unwrap_or(Err(RideError::Closed)))
    }
}

/// Resolves with the floor a denied rider was returned to.
///
/// Resolves with [`RideError::Closed`] instead if the elevator shut down while
/// the rider was still aboard.
#[derive(Debug)]
#[must_use = "a return signal resolves only when awaited"]
pub struct ReturnSignal {
    rx: oneshot::Receiver<RideResult>,
}

impl ReturnSignal {
    pub(crate) fn channel() -> (Reply, Self) {
        let (tx, rx) = oneshot::channel();
        (tx, Self { rx })
    }
}

impl Future for ReturnSignal {
    type Output = RideResult;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|res| res.unwrap_or(Err(RideError::Closed)))
    }
}
