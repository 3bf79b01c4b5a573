//! # Elevator: the public handle over one dispatch loop.
//!
//! [`Elevator`] is what riders and dashboards talk to. It never touches the
//! cabin directly: calls go through the shared [`CallQueue`], status comes back
//! through a `watch` channel published by the dispatch loop.
//!
//! ## Lifecycle
//! ```text
//!             start()                    stop()
//! [Ready] ─────────────► [Running] ─────────────► loop shuts itself down
//!    │                                                 (evicts with Closed)
//!    │ stop()
//!    └──────────────────► [Stopped] (queue drained right away)
//!
//! start() on Running  → RuntimeError::AlreadyStarted
//! start() on Stopped  → RuntimeError::Stopped
//! call()  after stop  → ticket already resolved with RideError::Closed
//! ```
//!
//! ## Example
//! ```rust
//! use liftvisor::{ClearanceLevel, Elevator, FloorPlan, Rider};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let plan = FloorPlan::new(["lobby", "roof"])?;
//!     let elevator = Elevator::builder(plan.clone()).build();
//!     elevator.start()?;
//!
//!     let rider = Rider::new("Ada", ClearanceLevel::TopSecret, plan.base().clone());
//!     let roof = plan.floor("roof").cloned().ok_or("no roof")?;
//!     let arrived = elevator.call(rider.floor(), &rider, move || roof).await?;
//!     assert_eq!(arrived.name(), "roof");
//!
//!     elevator.stop();
//!     elevator.closed().await;
//!     Ok(())
//! }
//! ```

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{broadcast, watch};
use tokio_util::sync::CancellationToken;

use crate::core::{
    builder::ElevatorBuilder,
    cabin::{Cabin, CabinState, CabinStatus},
    config::Config,
    dispatch::DispatchLoop,
    queue::CallQueue,
};
use crate::error::RuntimeError;
use crate::events::{Bus, Event, EventKind};
use crate::policies::AccessPolicy;
use crate::rides::{Floor, FloorPlan, RideRequest, RideTicket, Rider, StopCall};

/// Who currently owns the dispatch loop.
enum DispatchSlot {
    /// Built, not yet spawned.
    Ready(DispatchLoop),
    /// Spawned onto the runtime.
    Running,
    /// Stopped before it was ever started.
    Stopped,
}

/// Point-in-time view of the elevator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    /// Floor the cabin is at (or departed from, while in transit).
    pub floor: Floor,
    /// Operational state.
    pub state: CabinState,
    /// Number of riders inside.
    pub boarded: usize,
    /// Target floors of the next queued stops, soonest first.
    pub next_stops: Vec<Floor>,
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Current floor: {}", self.floor)?;
        writeln!(f, "State: {}", self.state)?;
        writeln!(f, "Riders inside: {}", self.boarded)?;
        if self.next_stops.is_empty() {
            write!(f, "Next stops: None")
        } else {
            let stops: Vec<&str> = self.next_stops.iter().map(Floor::name).collect();
            write!(f, "Next stops: {}", stops.join(", "))
        }
    }
}

/// Handle to a single-cabin elevator.
///
/// All methods take `&self`; share it behind an [`Arc`] (which is what
/// [`ElevatorBuilder::build`] returns).
pub struct Elevator {
    plan: FloorPlan,
    cfg: Config,
    queue: Arc<CallQueue>,
    status: watch::Receiver<CabinStatus>,
    bus: Bus,
    token: CancellationToken,
    slot: Mutex<DispatchSlot>,
}

impl Elevator {
    /// Returns a builder for an elevator serving `plan`.
    pub fn builder(plan: FloorPlan) -> ElevatorBuilder {
        ElevatorBuilder::new(plan)
    }

    /// Builds an elevator with default config, no subscribers and [`TieredAccess`](crate::TieredAccess).
    pub fn new(plan: FloorPlan) -> Arc<Self> {
        Self::builder(plan).build()
    }

    pub(crate) fn new_internal(
        plan: FloorPlan,
        cfg: Config,
        access: Arc<dyn AccessPolicy>,
        bus: Bus,
    ) -> Self {
        let queue = Arc::new(CallQueue::new());
        let (cabin, status) = Cabin::new(plan.base().clone());
        let dispatch = DispatchLoop::new(
            plan.clone(),
            cfg.clone(),
            Arc::clone(&queue),
            cabin,
            access,
            bus.clone(),
        );
        Self {
            plan,
            cfg,
            queue,
            status,
            bus,
            token: CancellationToken::new(),
            slot: Mutex::new(DispatchSlot::Ready(dispatch)),
        }
    }

    /// Places a call from `origin` on behalf of `rider`.
    ///
    /// Never blocks: the call is queued and the returned ticket resolves with
    /// the arrival floor, or with a [`RideError`](crate::RideError). `choose`
    /// runs exactly once, when the rider boards.
    ///
    /// # Panics
    /// If `origin` is not a floor of this elevator's plan.
    pub fn call<F>(&self, origin: &Floor, rider: &Rider, choose: F) -> RideTicket
    where
        F: FnOnce() -> Floor + Send + 'static,
    {
        let origin = self.plan.resolve(origin).clone();
        let tag = rider.tag();
        let label = tag.label();
        let (request, ticket) = RideRequest::new(origin.clone(), tag, Box::new(choose));

        let announce = || {
            self.bus.publish(
                Event::new(EventKind::CallQueued)
                    .with_rider(Arc::clone(&label))
                    .with_floor(&origin),
            )
        };
        match self.queue.push_back_and(StopCall::Ride(request), announce) {
            Ok(()) => {}
            Err(refused) => {
                refused.close();
                self.bus.publish(
                    Event::new(EventKind::CallRefused)
                        .with_rider(label)
                        .with_floor(&origin),
                );
            }
        }
        ticket
    }

    /// Spawns the dispatch loop onto the current Tokio runtime.
    ///
    /// # Errors
    /// - [`RuntimeError::AlreadyStarted`] if the loop is already running.
    /// - [`RuntimeError::Stopped`] if [`stop`](Self::stop) came first.
    ///
    /// # Panics
    /// If called outside a Tokio runtime.
    pub fn start(&self) -> Result<(), RuntimeError> {
        let mut slot = self.slot();
        match std::mem::replace(&mut *slot, DispatchSlot::Running) {
            DispatchSlot::Ready(dispatch) => {
                tokio::spawn(dispatch.run(self.token.clone()));
                Ok(())
            }
            DispatchSlot::Running => Err(RuntimeError::AlreadyStarted),
            DispatchSlot::Stopped => {
                *slot = DispatchSlot::Stopped;
                Err(RuntimeError::Stopped)
            }
        }
    }

    /// Requests shutdown.
    ///
    /// A running loop aborts its current wait, evicts everyone aboard and
    /// everyone queued with [`RideError::Closed`](crate::RideError::Closed),
    /// then exits; await [`closed`](Self::closed) to observe that. A loop that
    /// was never started is shut down right here. Repeated calls are no-ops.
    pub fn stop(&self) {
        // The slot lock makes the first caller the only one to get past here.
        let mut slot = self.slot();
        if self.token.is_cancelled() {
            return;
        }
        self.bus.publish(Event::new(EventKind::ShutdownRequested));
        self.token.cancel();

        match std::mem::replace(&mut *slot, DispatchSlot::Stopped) {
            DispatchSlot::Ready(dispatch) => dispatch.shutdown(),
            DispatchSlot::Running => *slot = DispatchSlot::Running,
            DispatchSlot::Stopped => {}
        }
    }

    /// Current floor, state, riders inside and upcoming stops.
    ///
    /// Reports [`CabinState::Closed`] as soon as shutdown was requested.
    pub fn snapshot(&self) -> Snapshot {
        let status = self.status.borrow().clone();
        let state = if self.token.is_cancelled() {
            CabinState::Closed
        } else {
            status.state
        };
        Snapshot {
            floor: status.floor,
            state,
            boarded: status.boarded,
            next_stops: self.preview(self.cfg.preview_len),
        }
    }

    /// Target floors of the next `n` queued stops.
    pub fn preview(&self, n: usize) -> Vec<Floor> {
        self.queue.preview(n)
    }

    /// Completes once the dispatch loop has finished its terminal cleanup.
    pub async fn closed(&self) {
        let mut status = self.status.clone();
        // A dropped sender means the loop is gone as well.
        let _ = status
            .wait_for(|status| status.state == CabinState::Closed)
            .await;
    }

    /// The floor plan served by this elevator.
    pub fn floors(&self) -> &FloorPlan {
        &self.plan
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Token cancelled by [`stop`](Self::stop).
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Subscribes an ad-hoc receiver to runtime events.
    pub fn events(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// Fresh receiver of the cabin status published by the dispatch loop.
    pub(crate) fn status(&self) -> watch::Receiver<CabinStatus> {
        self.status.clone()
    }

    fn slot(&self) -> MutexGuard<'_, DispatchSlot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use tokio::time::{self, Instant};

    use super::*;
    use crate::error::RideError;
    use crate::rides::ClearanceLevel;

    fn floor(plan: &FloorPlan, name: &str) -> Floor {
        plan.floor(name).unwrap().clone()
    }

    fn rider(plan: &FloorPlan, name: &str, level: ClearanceLevel, at: &str) -> Rider {
        Rider::new(name, level, floor(plan, at))
    }

    fn to(plan: &FloorPlan, name: &str) -> impl FnOnce() -> Floor + Send + 'static {
        let dest = floor(plan, name);
        move || dest
    }

    /// Collects every `Arrived` floor until the bus goes quiet or closes.
    fn arrivals(rx: &mut broadcast::Receiver<Event>) -> Vec<String> {
        let mut out = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            if ev.kind == EventKind::Arrived {
                out.push(ev.floor.as_deref().unwrap_or("?").to_string());
            }
        }
        out
    }

    #[tokio::test(start_paused = true)]
    async fn test_round_trip_takes_distance_times_per_floor() {
        let plan = FloorPlan::restricted_base();
        let elevator = Elevator::new(plan.clone());
        elevator.start().unwrap();

        let mulder = rider(&plan, "Mulder", ClearanceLevel::TopSecret, "G");
        let started = Instant::now();
        let arrived = elevator
            .call(mulder.floor(), &mulder, to(&plan, "T2"))
            .await
            .unwrap();

        assert_eq!(arrived.name(), "T2");
        assert!(started.elapsed() >= Duration::from_secs(3));
        assert!(started.elapsed() < Duration::from_secs(4));

        let snap = elevator.snapshot();
        assert_eq!(snap.floor.name(), "T2");
        assert_eq!(snap.boarded, 0);
        elevator.stop();
        elevator.closed().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_low_clearance_is_returned_while_peer_continues() {
        let plan = FloorPlan::restricted_base();
        let elevator = Elevator::new(plan.clone());
        elevator.start().unwrap();

        let scully = rider(&plan, "Scully", ClearanceLevel::Confidential, "G");
        let mulder = rider(&plan, "Mulder", ClearanceLevel::TopSecret, "G");
        let denied = elevator.call(scully.floor(), &scully, to(&plan, "T1"));
        let allowed = elevator.call(mulder.floor(), &mulder, to(&plan, "T1"));

        match denied.await {
            Err(RideError::InsufficientClearance { floor, returned }) => {
                assert_eq!(floor.name(), "T1");
                assert_eq!(returned.await.unwrap().name(), "G");
            }
            other => panic!("expected clearance denial, got {other:?}"),
        }
        assert_eq!(allowed.await.unwrap().name(), "T1");

        elevator.stop();
        elevator.closed().await;
        assert_eq!(elevator.snapshot().boarded, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_floor_calls_board_together() {
        let plan = FloorPlan::restricted_base();
        let elevator = Elevator::new(plan.clone());
        let mut rx = elevator.events();

        let a = rider(&plan, "A", ClearanceLevel::TopSecret, "S");
        let x = rider(&plan, "X", ClearanceLevel::TopSecret, "T1");
        let b = rider(&plan, "B", ClearanceLevel::TopSecret, "S");
        let ta = elevator.call(a.floor(), &a, to(&plan, "T2"));
        let tx = elevator.call(x.floor(), &x, to(&plan, "G"));
        let tb = elevator.call(b.floor(), &b, to(&plan, "G"));
        assert_eq!(elevator.snapshot().next_stops.len(), 3);

        elevator.start().unwrap();
        assert_eq!(ta.await.unwrap().name(), "T2");
        assert_eq!(tb.await.unwrap().name(), "G");
        assert_eq!(tx.await.unwrap().name(), "G");

        elevator.stop();
        elevator.closed().await;
        // S boards A and B; their buttons (T2 then G) go ahead of X's call at T1.
        let seen = arrivals(&mut rx);
        assert_eq!(seen[..4], ["S", "T2", "G", "T1"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_mid_travel_fails_everyone() {
        let plan = FloorPlan::restricted_base();
        let elevator = Elevator::new(plan.clone());
        elevator.start().unwrap();

        let aboard = rider(&plan, "aboard", ClearanceLevel::TopSecret, "G");
        let waiting = rider(&plan, "waiting", ClearanceLevel::TopSecret, "T1");
        let t_aboard = elevator.call(aboard.floor(), &aboard, to(&plan, "T2"));
        let t_waiting = elevator.call(waiting.floor(), &waiting, to(&plan, "G"));

        // Boarding at G is instant; stop half way through the trip to T2.
        time::sleep(Duration::from_millis(1500)).await;
        assert!(matches!(
            elevator.snapshot().state,
            CabinState::InTransit { .. }
        ));
        elevator.stop();
        assert_eq!(elevator.snapshot().state, CabinState::Closed);

        assert!(matches!(t_aboard.await, Err(RideError::Closed)));
        assert!(matches!(t_waiting.await, Err(RideError::Closed)));
        elevator.closed().await;

        let snap = elevator.snapshot();
        assert_eq!(snap.floor.name(), "G");
        assert_eq!(snap.boarded, 0);
        assert!(snap.next_stops.is_empty());

        let late = rider(&plan, "late", ClearanceLevel::TopSecret, "G");
        let ticket = elevator.call(late.floor(), &late, to(&plan, "S"));
        assert!(matches!(ticket.await, Err(RideError::Closed)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_during_return_trip_fails_the_return() {
        let plan = FloorPlan::restricted_base();
        let elevator = Elevator::new(plan.clone());
        elevator.start().unwrap();

        let scully = rider(&plan, "Scully", ClearanceLevel::Confidential, "G");
        let ticket = elevator.call(scully.floor(), &scully, to(&plan, "T2"));

        // G to T2 takes 3s; the denial resolves the ticket on arrival.
        let returned = match ticket.await {
            Err(RideError::InsufficientClearance { floor, returned }) => {
                assert_eq!(floor.name(), "T2");
                returned
            }
            other => panic!("expected clearance denial, got {other:?}"),
        };

        time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(
            elevator.snapshot().state,
            CabinState::InTransit {
                target: floor(&plan, "G")
            }
        );
        elevator.stop();

        assert!(matches!(returned.await, Err(RideError::Closed)));
        elevator.closed().await;

        let snap = elevator.snapshot();
        assert_eq!(snap.state, CabinState::Closed);
        assert_eq!(snap.floor.name(), "T2");
        assert_eq!(snap.boarded, 0);
        assert!(snap.next_stops.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_stops_request_shutdown_once() {
        let plan = FloorPlan::restricted_base();
        let elevator = Elevator::new(plan);
        let mut rx = elevator.events();
        elevator.start().unwrap();

        let gate = Arc::new(tokio::sync::Barrier::new(16));
        let mut stoppers = Vec::new();
        for _ in 0..16 {
            let elevator = Arc::clone(&elevator);
            let gate = Arc::clone(&gate);
            stoppers.push(tokio::spawn(async move {
                gate.wait().await;
                elevator.stop();
            }));
        }
        for stopper in stoppers {
            stopper.await.unwrap();
        }
        elevator.closed().await;

        let requested = std::iter::from_fn(|| rx.try_recv().ok())
            .filter(|ev| ev.kind == EventKind::ShutdownRequested)
            .count();
        assert_eq!(requested, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_call_is_announced_before_boarding() {
        let plan = FloorPlan::restricted_base();
        let cfg = Config {
            per_floor: Duration::from_millis(1),
            ..Config::default()
        };
        let elevator = Elevator::builder(plan.clone()).with_config(cfg).build();
        let mut rx = elevator.events();
        elevator.start().unwrap();

        let mut callers = Vec::new();
        for i in 0..20 {
            let elevator = Arc::clone(&elevator);
            let r = rider(&plan, &format!("r{i}"), ClearanceLevel::TopSecret, "G");
            let dest = to(&plan, "S");
            callers.push(tokio::spawn(async move {
                elevator.call(r.floor(), &r, dest).await
            }));
        }
        for caller in callers {
            assert_eq!(caller.await.unwrap().unwrap().name(), "S");
        }
        elevator.stop();
        elevator.closed().await;

        let events: Vec<Event> = std::iter::from_fn(|| rx.try_recv().ok()).collect();
        for (boarded_at, ev) in events.iter().enumerate() {
            if ev.kind != EventKind::RiderBoarded {
                continue;
            }
            let queued_at = events
                .iter()
                .position(|q| q.kind == EventKind::CallQueued && q.rider == ev.rider)
                .unwrap();
            assert!(queued_at < boarded_at, "{:?} boarded before queued", ev.rider);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_lifecycle_errors() {
        let plan = FloorPlan::restricted_base();

        let running = Elevator::new(plan.clone());
        running.start().unwrap();
        assert_eq!(running.start(), Err(RuntimeError::AlreadyStarted));
        running.stop();
        running.stop();
        running.closed().await;

        let never_started = Elevator::new(plan.clone());
        let r = rider(&plan, "r", ClearanceLevel::Secret, "S");
        let ticket = never_started.call(r.floor(), &r, to(&plan, "G"));
        never_started.stop();
        assert!(matches!(ticket.await, Err(RideError::Closed)));
        never_started.closed().await;
        assert_eq!(never_started.start(), Err(RuntimeError::Stopped));
    }

    #[tokio::test(start_paused = true)]
    async fn test_snapshot_before_start() {
        let plan = FloorPlan::restricted_base();
        let elevator = Elevator::new(plan.clone());
        let r = rider(&plan, "r", ClearanceLevel::TopSecret, "G");
        let mut tickets = Vec::new();
        for origin in ["S", "T1", "T2", "G", "S", "T1"] {
            tickets.push(elevator.call(&floor(&plan, origin), &r, to(&plan, "G")));
        }

        let snap = elevator.snapshot();
        assert_eq!(snap.state, CabinState::Idle);
        assert_eq!(snap.floor.name(), "G");
        let names: Vec<&str> = snap.next_stops.iter().map(Floor::name).collect();
        assert_eq!(names, ["S", "T1", "T2", "G", "S"]);
        assert_eq!(
            snap.to_string(),
            "Current floor: G\nState: Idle\nRiders inside: 0\nNext stops: S, T1, T2, G, S"
        );

        elevator.stop();
        assert!(elevator.snapshot().next_stops.is_empty());
        assert!(elevator.snapshot().to_string().ends_with("Next stops: None"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_destination_equal_to_origin() {
        let plan = FloorPlan::restricted_base();
        let elevator = Elevator::new(plan.clone());
        elevator.start().unwrap();

        let r = rider(&plan, "r", ClearanceLevel::Secret, "S");
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let s = floor(&plan, "S");
        let arrived = elevator
            .call(r.floor(), &r, move || {
                counter.fetch_add(1, Ordering::SeqCst);
                s
            })
            .await
            .unwrap();

        assert_eq!(arrived.name(), "S");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        elevator.stop();
        elevator.closed().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_many_riders_all_resolve_after_stop() {
        let plan = FloorPlan::restricted_base();
        let elevator = Elevator::new(plan.clone());
        elevator.start().unwrap();

        let mut handles = Vec::new();
        for i in 0..12 {
            let level = ClearanceLevel::ALL[i % 3];
            let origin = plan.floors()[i % plan.len()].clone();
            let dest = plan.floors()[(i + 1) % plan.len()].clone();
            let r = Rider::new(format!("r{i}"), level, origin);
            let elevator = Arc::clone(&elevator);
            handles.push(tokio::spawn(async move {
                elevator.call(r.floor(), &r, move || dest).await
            }));
        }

        time::sleep(Duration::from_secs(5)).await;
        elevator.stop();
        elevator.closed().await;

        for handle in handles {
            let result = handle.await.unwrap();
            assert!(matches!(
                result,
                Ok(_) | Err(RideError::Closed) | Err(RideError::InsufficientClearance { .. })
            ));
        }
        let snap = elevator.snapshot();
        assert_eq!(snap.state, CabinState::Closed);
        assert_eq!(snap.boarded, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_call_publishes_queued_and_refused() {
        let plan = FloorPlan::restricted_base();
        let elevator = Elevator::new(plan.clone());
        let mut rx = elevator.events();
        let r = rider(&plan, "r", ClearanceLevel::TopSecret, "G");

        let _queued = elevator.call(r.floor(), &r, to(&plan, "S"));
        elevator.stop();
        let _refused = elevator.call(r.floor(), &r, to(&plan, "S"));

        let kinds: Vec<EventKind> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|ev| ev.kind)
            .collect();
        assert_eq!(kinds[0], EventKind::CallQueued);
        assert!(kinds.contains(&EventKind::ShutdownRequested));
        assert!(kinds.contains(&EventKind::RiderEvicted));
        assert_eq!(kinds.last(), Some(&EventKind::CallRefused));
    }
}
