//! # Ride data model.
//!
//! - [`Floor`], [`FloorPlan`] - the fixed, ordered set of stops
//! - [`Rider`], [`RiderId`], [`ClearanceLevel`] - who is calling and what they may access
//! - [`RideTicket`], [`ReturnSignal`], [`RideResult`] - single-resolution outcomes
//! - `RideRequest`, `Revisit`, `StopCall` - call queue entries (crate-internal)

mod floor;
mod request;
mod rider;
mod ticket;

pub use floor::{
    Floor, FloorPlan, GROUND_FLOOR, SECRET_ALIEN_FLOOR, SECRET_EXPERIMENTAL_FLOOR,
    SECRET_NUCLEAR_FLOOR,
};
pub(crate) use request::{RideRequest, Revisit, StopCall};
pub use rider::{ClearanceLevel, Rider, RiderId};
pub use ticket::{ReturnSignal, RideResult, RideTicket};
