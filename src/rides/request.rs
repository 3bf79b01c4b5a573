//! # Queue entries: rider calls and revisits.
//!
//! The call queue holds [`StopCall`]s:
//! - [`RideRequest`]: a rider waiting at its origin floor, with a result channel.
//! - [`Revisit`]: an internal stop with no rider attached ("press this floor again").
//!
//! ## Destination lifecycle
//! ```text
//! RideRequest::new ──► destination = None, chooser = Some(f)
//!        │
//!   board (dispatch loop)
//!        ▼
//! choose_destination() ──► chooser taken and called once ──► destination = Some(floor)
//!        │
//!   any later call ──► cached floor returned, chooser never called again
//! ```

use std::fmt;

use crate::error::RideError;
use crate::rides::floor::Floor;
use crate::rides::rider::RiderTag;
use crate::rides::ticket::{Reply, RideResult, RideTicket};

/// Destination callback, invoked once when the rider boards.
pub(crate) type Chooser = Box<dyn FnOnce() -> Floor + Send + 'static>;

/// One rider's call, from queueing until its result is sent.
pub(crate) struct RideRequest {
    origin: Floor,
    rider: RiderTag,
    chooser: Option<Chooser>,
    destination: Option<Floor>,
    reply: Reply,
}

impl RideRequest {
    /// Creates a request together with the ticket the caller awaits.
    pub(crate) fn new(origin: Floor, rider: RiderTag, chooser: Chooser) -> (Self, RideTicket) {
        let (reply, ticket) = RideTicket::channel();
        let request = Self {
            origin,
            rider,
            chooser: Some(chooser),
            destination: None,
            reply,
        };
        (request, ticket)
    }

    pub(crate) fn origin(&self) -> &Floor {
        &self.origin
    }

    pub(crate) fn rider(&self) -> &RiderTag {
        &self.rider
    }

    /// Destination, once the rider has boarded.
    pub(crate) fn destination(&self) -> Option<&Floor> {
        self.destination.as_ref()
    }

    /// Resolves the destination, calling the chooser on first use only.
    pub(crate) fn choose_destination(&mut self) -> &Floor {
        match self.chooser.take() {
            Some(choose) => &*self.destination.insert(choose()),
            None => self
                .destination
                .as_ref()
                .unwrap_or_else(|| unreachable!("chooser consumed without a destination")),
        }
    }

    /// Swaps in a new result channel and fails the old one with `err`.
    ///
    /// Used when a rider is denied mid-ride: the original ticket learns about
    /// it now, the new channel is resolved once the rider is back out.
    pub(crate) fn redirect(&mut self, reply: Reply, err: RideError) {
        let denied = std::mem::replace(&mut self.reply, reply);
        let _ = denied.send(Err(err));
    }

    /// Sends the final outcome; consumes the request.
    ///
    /// A caller that dropped its ticket simply never sees the result.
    pub(crate) fn resolve(self, result: RideResult) {
        let _ = self.reply.send(result);
    }
}

impl fmt::Debug for RideRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RideRequest")
            .field("origin", &self.origin)
            .field("rider", &self.rider)
            .field("destination", &self.destination)
            .finish_non_exhaustive()
    }
}

/// Internally generated stop with no rider attached.
#[derive(Clone, Debug)]
pub(crate) struct Revisit {
    target: Floor,
}

impl Revisit {
    pub(crate) fn new(target: Floor) -> Self {
        Self { target }
    }
}

/// Entry of the call queue.
#[derive(Debug)]
pub(crate) enum StopCall {
    Ride(RideRequest),
    Revisit(Revisit),
}

impl StopCall {
    /// Floor the cabin must travel to for this entry.
    pub(crate) fn target(&self) -> &Floor {
        match self {
            StopCall::Ride(request) => request.origin(),
            StopCall::Revisit(revisit) => &revisit.target,
        }
    }

    /// True for a rider call waiting at `floor`.
    pub(crate) fn is_ride_from(&self, floor: &Floor) -> bool {
        matches!(self, StopCall::Ride(request) if request.origin() == floor)
    }

    /// Fails a rider call with [`RideError::Closed`]; drops a revisit.
    ///
    /// Returns the rider that was turned away, if any.
    pub(crate) fn close(self) -> Option<RiderTag> {
        match self {
            StopCall::Ride(request) => {
                let rider = request.rider().clone();
                request.resolve(Err(RideError::Closed));
                Some(rider)
            }
            StopCall::Revisit(_) => None,
        }
    }
}
