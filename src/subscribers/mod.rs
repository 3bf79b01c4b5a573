//! # Event subscribers for the liftvisor runtime.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out
//! and built-in implementations for handling events broadcast through the
//! [`Bus`](crate::events::Bus).
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   DispatchLoop ── publish(Event) ──► Bus ──► subscriber_listener ──► SubscriberSet
//!                                                                          │
//!                                                        ┌─────────────────┼──────────┐
//!                                                        ▼                 ▼          ▼
//!                                                     Journal          LogWriter    Custom
//! ```
//!
//! ## Subscriber types
//! - **Passive subscribers** - observe and react to events (`LogWriter`, metrics, alerts)
//! - **Stateful subscribers** - keep state built from events (`Journal`)

#[cfg(feature = "logging")]
mod log;
mod journal;
mod set;
mod subscribe;

pub use journal::Journal;
#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
