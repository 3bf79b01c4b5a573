//! # LogWriter: simple event printer
//!
//! A minimal subscriber that prints incoming [`Event`]s to stdout.
//! Use it for tests or demos.
//!
//! ## Example output
//! ```text
//! [dispatch-started] floor=G
//! [call-queued] rider="Scully (Secret)" floor=G
//! [travel-started] from=G to=S travel=1000ms
//! [arrived] floor=S
//! [clearance-denied] rider="Doggett (Confidential)" floor=S return_to=G
//! [rider-evicted] rider="Mulder (TopSecret)" floor=T2 reason=aboard
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let label = e.kind.as_label();
        let rider = e.rider.as_deref().unwrap_or("unknown");
        let floor = e.floor.as_deref().unwrap_or("?");
        let target = e.target.as_deref().unwrap_or("?");
        match e.kind {
            EventKind::ShutdownRequested => println!("[{label}]"),
            EventKind::DispatchStarted | EventKind::DispatchStopped | EventKind::Arrived => {
                println!("[{label}] floor={floor}");
            }
            EventKind::CallQueued
            | EventKind::CallRefused
            | EventKind::RiderArrived
            | EventKind::RiderReturned => {
                println!("[{label}] rider={rider:?} floor={floor}");
            }
            EventKind::TravelStarted => println!(
                "[{label}] from={floor} to={target} travel={}ms",
                e.travel_ms.unwrap_or(0)
            ),
            EventKind::TravelInterrupted => println!("[{label}] at={floor} to={target}"),
            EventKind::ButtonPressed | EventKind::StopRetried => {
                println!("[{label}] floor={target}");
            }
            EventKind::RiderBoarded => {
                println!("[{label}] rider={rider:?} floor={floor} destination={target}");
            }
            EventKind::ClearanceDenied => {
                println!("[{label}] rider={rider:?} floor={floor} return_to={target}");
            }
            EventKind::RiderEvicted => println!(
                "[{label}] rider={rider:?} floor={floor} reason={}",
                e.reason.as_deref().unwrap_or("closed")
            ),
            EventKind::SubscriberOverflow | EventKind::SubscriberPanicked => {
                println!("[{label}] {}", e.reason.as_deref().unwrap_or("unknown"));
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
