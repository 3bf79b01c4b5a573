//! # Cabin: position, operational state and the riders aboard.
//!
//! Owned exclusively by the dispatch loop (`&mut` access only), so the boarded
//! set can never change behind its back. Every mutation republishes a
//! [`CabinStatus`] on a `watch` channel, which is how `Elevator::snapshot`
//! reads the cabin without ever touching it.

use std::fmt;

use tokio::sync::watch;

use crate::policies::AccessPolicy;
use crate::rides::{Floor, RideRequest};

/// Operational state of the cabin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CabinState {
    /// Parked at a floor, queue empty or between stops.
    Idle,
    /// Moving towards `target`.
    InTransit {
        /// Floor being travelled to.
        target: Floor,
    },
    /// Terminal: no further stops are served.
    Closed,
}

impl fmt::Display for CabinState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CabinState::Idle => f.write_str("Idle"),
            CabinState::InTransit { target } => write!(f, "InTransit({target})"),
            CabinState::Closed => f.write_str("Closed"),
        }
    }
}

/// Read-only view of the cabin published after each change.
#[derive(Clone, Debug)]
pub(crate) struct CabinStatus {
    pub(crate) floor: Floor,
    pub(crate) state: CabinState,
    pub(crate) boarded: usize,
}

pub(crate) struct Cabin {
    floor: Floor,
    state: CabinState,
    boarded: Vec<RideRequest>,
    status: watch::Sender<CabinStatus>,
}

impl Cabin {
    /// Creates an idle, empty cabin at `floor` and its status receiver.
    pub(crate) fn new(floor: Floor) -> (Self, watch::Receiver<CabinStatus>) {
        let (status, rx) = watch::channel(CabinStatus {
            floor: floor.clone(),
            state: CabinState::Idle,
            boarded: 0,
        });
        let cabin = Self {
            floor,
            state: CabinState::Idle,
            boarded: Vec::new(),
            status,
        };
        (cabin, rx)
    }

    pub(crate) fn floor(&self) -> &Floor {
        &self.floor
    }

    pub(crate) fn state(&self) -> &CabinState {
        &self.state
    }

    #[cfg(test)]
    pub(crate) fn boarded(&self) -> &[RideRequest] {
        &self.boarded
    }

    pub(crate) fn depart(&mut self, target: Floor) {
        self.state = CabinState::InTransit { target };
        self.publish();
    }

    /// Completes a trip: the cabin is now at `target`.
    pub(crate) fn arrive(&mut self, target: Floor) {
        self.floor = target;
        self.state = CabinState::Idle;
        self.publish();
    }

    pub(crate) fn close(&mut self) {
        self.state = CabinState::Closed;
        self.publish();
    }

    pub(crate) fn board(&mut self, rider: RideRequest) {
        self.boarded.push(rider);
        self.publish();
    }

    /// Index of the first boarded rider `policy` denies at the current floor.
    pub(crate) fn first_denied(&self, policy: &dyn AccessPolicy) -> Option<usize> {
        self.boarded
            .iter()
            .position(|rider| !policy.is_allowed(rider.rider().clearance, &self.floor))
    }

    pub(crate) fn rider_mut(&mut self, index: usize) -> &mut RideRequest {
        &mut self.boarded[index]
    }

    /// Takes one rider out of the cabin.
    pub(crate) fn remove(&mut self, index: usize) -> RideRequest {
        let rider = self.boarded.remove(index);
        self.publish();
        rider
    }

    /// Takes out every rider whose destination is the current floor.
    pub(crate) fn discharge(&mut self) -> Vec<RideRequest> {
        let (out, stay): (Vec<_>, Vec<_>) = std::mem::take(&mut self.boarded)
            .into_iter()
            .partition(|rider| rider.destination() == Some(&self.floor));
        self.boarded = stay;
        if !out.is_empty() {
            self.publish();
        }
        out
    }

    /// Takes out every rider.
    pub(crate) fn evacuate(&mut self) -> Vec<RideRequest> {
        let all = std::mem::take(&mut self.boarded);
        self.publish();
        all
    }

    fn publish(&self) {
        self.status.send_replace(CabinStatus {
            floor: self.floor.clone(),
            state: self.state.clone(),
            boarded: self.boarded.len(),
        });
    }
}
