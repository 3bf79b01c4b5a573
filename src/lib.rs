//! # liftvisor
//!
//! **Liftvisor** is a single-cabin elevator dispatch engine for Tokio.
//!
//! Many riders call one shared cabin concurrently. The engine serializes their
//! calls into a sequence of stops, boards everyone waiting at a stop together,
//! and re-checks each rider's clearance at every floor the cabin reaches. A
//! rider found somewhere it may not be is told so immediately and escorted
//! back to where it boarded before service resumes.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   ┌──────────┐   ┌──────────┐   ┌──────────┐
//!   │ Rider #1 │   │ Rider #2 │   │ Rider #3 │      (any number of tasks)
//!   └────┬─────┘   └────┬─────┘   └────┬─────┘
//!        │ call()       │ call()       │ call()        ▲ RideTicket resolves
//!        ▼              ▼              ▼               │ Ok(floor) / RideError
//! ┌───────────────────────────────────────────────────┴───────────────┐
//! │  Elevator (public handle)                                         │
//! │  - CallQueue (mutex, shared with the loop)                        │
//! │  - watch::Receiver<CabinStatus> (snapshot)                        │
//! │  - CancellationToken (stop)                                       │
//! └──────┬────────────────────────────────────────────────────────────┘
//!        ▼ start()
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  DispatchLoop (one task, sole owner of the Cabin)                 │
//! │  pop stop ─► travel ─► clearance re-check ─► discharge ─► board   │
//! └──────┬────────────────────────────────────────────────────────────┘
//!        │ publishes Events
//!        ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                        Bus (broadcast channel)                    │
//! │                   (capacity: Config::bus_capacity)                │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//!                       ┌────────────────────────┐
//!                       │  subscriber_listener   │
//!                       │  (spawned by builder)  │
//!                       └───────────┬────────────┘
//!                                   ▼
//!                            SubscriberSet
//!                          (per-sub queues)
//!                        ┌──────────┼──────────┐
//!                        ▼          ▼          ▼
//!                     Journal   LogWriter   Custom
//! ```
//!
//! ### Clearance re-check
//! ```text
//! cabin reaches F
//!   └─► first boarded rider the AccessPolicy denies at F?
//!         ├─ none ─► discharge riders bound for F, board riders waiting at F
//!         └─ rider R:
//!              R's ticket ─► Err(InsufficientClearance { floor: F, returned })
//!              travel back to R's boarding floor, R steps out
//!              returned ─► Ok(boarding floor)
//!              stop at F is queued again at the front
//! ```
//!
//! ## Features
//! | Area               | Description                                                  | Key types / traits                      |
//! |--------------------|--------------------------------------------------------------|-----------------------------------------|
//! | **Dispatch**       | Start, stop, call and observe one cabin.                     | [`Elevator`], [`Snapshot`]              |
//! | **Floors**         | Fixed, ordered set of stops.                                 | [`FloorPlan`], [`Floor`]                |
//! | **Riders**         | Callers with a fixed clearance tier.                         | [`Rider`], [`ClearanceLevel`]           |
//! | **Policies**       | Which clearance may occupy which floor.                      | [`AccessPolicy`], [`TieredAccess`]      |
//! | **Subscriber API** | Hook into dispatch events (journals, logging, metrics).      | [`Subscribe`], [`Journal`]              |
//! | **Errors**         | Typed errors for riders and for the runtime.                 | [`RideError`], [`RuntimeError`]         |
//! | **Configuration**  | Travel timing, bus capacity, snapshot length.                | [`Config`]                              |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use liftvisor::{ClearanceLevel, Elevator, FloorPlan, Journal, RideError, Rider, Subscribe};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let plan = FloorPlan::restricted_base();
//!     let journal = Arc::new(Journal::default());
//!     let subs: Vec<Arc<dyn Subscribe>> = vec![journal.clone()];
//!
//!     let elevator = Elevator::builder(plan.clone())
//!         .with_subscribers(subs)
//!         .build();
//!     elevator.start()?;
//!
//!     let rider = Rider::new("Scully", ClearanceLevel::Confidential, plan.base().clone());
//!     let s = plan.floor("S").cloned().ok_or("no floor S")?;
//!     match elevator.call(rider.floor(), &rider, move || s).await {
//!         Ok(floor) => println!("arrived at {floor}"),
//!         Err(RideError::InsufficientClearance { floor, returned }) => {
//!             println!("not allowed at {floor}");
//!             println!("back at {}", returned.await?);
//!         }
//!         Err(err) => return Err(err.into()),
//!     }
//!
//!     elevator.stop();
//!     elevator.closed().await;
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod policies;
mod rides;
mod subscribers;

// ---- Public re-exports ----

pub use core::{
    CabinState, Config, Elevator, ElevatorBuilder, Snapshot, wait_for_shutdown_signal,
};
pub use error::{RideError, RuntimeError};
pub use events::{Event, EventKind};
pub use policies::{AccessPolicy, TieredAccess};
pub use rides::{
    ClearanceLevel, Floor, FloorPlan, GROUND_FLOOR, ReturnSignal, RideResult, RideTicket, Rider,
    RiderId, SECRET_ALIEN_FLOOR, SECRET_EXPERIMENTAL_FLOOR, SECRET_NUCLEAR_FLOOR,
};
pub use subscribers::{Journal, Subscribe, SubscriberSet};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
