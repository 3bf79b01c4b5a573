//! Runtime core: the cabin, its scheduler and the public handle.
//!
//! The public API from this module is [`Elevator`] (with [`ElevatorBuilder`],
//! [`Config`], [`Snapshot`] and [`CabinState`]) plus the
//! [`wait_for_shutdown_signal`] helper.
//!
//! Internal modules:
//! - [`queue`]: pending stops, shared by callers and the loop;
//! - [`cabin`]: position, state and riders aboard, owned by the loop;
//! - [`dispatch`]: the loop itself (travel, clearance re-check, boarding);
//! - [`elevator`]: start/stop/call/snapshot over one loop;
//! - [`shutdown`]: cross-platform termination signal handling.

mod builder;
mod cabin;
mod config;
mod dispatch;
mod elevator;
mod queue;
mod shutdown;

pub use builder::ElevatorBuilder;
pub use cabin::CabinState;
pub use config::Config;
pub use elevator::{Elevator, Snapshot};
pub use shutdown::wait_for_shutdown_signal;
