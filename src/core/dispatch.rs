//! # DispatchLoop: the single-cabin scheduler.
//!
//! Serializes concurrent ride calls into one conveyance. Exactly one task ever
//! runs [`DispatchLoop::run`]; it is the sole writer of the [`Cabin`] and the
//! only one that pops from or front-pushes to the [`CallQueue`].
//!
//! ## Architecture
//! ```text
//! Elevator::call ──► CallQueue ──► DispatchLoop::run()
//!
//! loop {
//!   ├─► cancelled? ─► break
//!   ├─► pop_front() ── none ──► sleep(idle_tick) (cancellable), continue
//!   ├─► travel(target)                      (cancellable; on cancel: re-queue, break)
//!   ├─► first boarded rider denied here?
//!   │     ├─ yes ─► fail its ticket with InsufficientClearance{returned}
//!   │     │        travel(back to its boarding floor)
//!   │     │        step out, resolve `returned`
//!   │     │        re-queue the interrupted stop at the FRONT, continue
//!   │     └─ no
//!   ├─► discharge riders whose destination is here (tickets: Ok(floor))
//!   └─► if the stop was a rider call:
//!          board it + every other call waiting here (remove_where)
//!          choose destinations (once each), push pressed buttons to the FRONT
//! }
//! shutdown: evict everyone aboard and everyone queued with Closed
//! ```
//!
//! ## Rules
//! - Stops are served **sequentially**; travel is the only suspension point.
//! - At most **one** denied rider is handled per stop (the first boarded).
//! - Every ride request leaves the loop's hands only through `resolve`:
//!   no entry is dropped without its ticket being answered.
//! - A destination chooser that returns a floor outside the plan panics the
//!   loop; dropped tickets then read as `Closed`.

use std::ops::ControlFlow;
use std::sync::Arc;

use tokio::{select, time};
use tokio_util::sync::CancellationToken;

use crate::core::{
    cabin::{Cabin, CabinState},
    config::Config,
    queue::CallQueue,
};
use crate::error::RideError;
use crate::events::{Bus, Event, EventKind};
use crate::policies::AccessPolicy;
use crate::rides::{Floor, FloorPlan, Revisit, ReturnSignal, RideRequest, StopCall};

/// The scheduler task. Built once by the elevator, consumed by [`run`](Self::run).
pub(crate) struct DispatchLoop {
    plan: FloorPlan,
    cfg: Config,
    queue: Arc<CallQueue>,
    cabin: Cabin,
    access: Arc<dyn AccessPolicy>,
    bus: Bus,
}

impl DispatchLoop {
    pub(crate) fn new(
        plan: FloorPlan,
        cfg: Config,
        queue: Arc<CallQueue>,
        cabin: Cabin,
        access: Arc<dyn AccessPolicy>,
        bus: Bus,
    ) -> Self {
        Self {
            plan,
            cfg,
            queue,
            cabin,
            access,
            bus,
        }
    }

    /// Serves the queue until `token` is cancelled, then shuts down.
    ///
    /// ### Cancellation semantics
    /// - Checked at the top of every iteration.
    /// - Aborts an idle wait or a trip immediately; an aborted trip leaves the
    ///   cabin at the floor it departed from.
    /// - Terminal cleanup ([`shutdown`](Self::shutdown)) runs exactly once, after the loop.
    pub(crate) async fn run(mut self, token: CancellationToken) {
        self.bus.publish(
            Event::new(EventKind::DispatchStarted)
                .with_floor(self.cabin.floor())
                .with_reason(format!("access={}", self.access.name())),
        );

        loop {
            if token.is_cancelled() {
                break;
            }
            let flow = match self.queue.pop_front() {
                Some(call) => self.serve(call, &token).await,
                None => self.idle(&token).await,
            };
            if flow.is_break() {
                break;
            }
        }

        self.shutdown();
    }

    /// Handles one queue entry.
    async fn serve(&mut self, call: StopCall, token: &CancellationToken) -> ControlFlow<()> {
        let target = call.target().clone();
        if self.travel(&target, token).await.is_break() {
            self.queue.push_front(call);
            return ControlFlow::Break(());
        }

        if let Some(index) = self.cabin.first_denied(self.access.as_ref()) {
            return self.return_denied(index, call, token).await;
        }

        self.discharge();
        if let StopCall::Ride(request) = call {
            self.board_waiting(request);
        }
        ControlFlow::Continue(())
    }

    /// Takes a denied rider back to where it boarded, then retries the stop.
    async fn return_denied(
        &mut self,
        index: usize,
        interrupted: StopCall,
        token: &CancellationToken,
    ) -> ControlFlow<()> {
        let denied_at = self.cabin.floor().clone();
        let (reply, returned) = ReturnSignal::channel();
        let rider = self.cabin.rider_mut(index);
        let home = rider.origin().clone();
        let label = rider.rider().label();
        rider.redirect(
            reply,
            RideError::InsufficientClearance {
                floor: denied_at.clone(),
                returned,
            },
        );
        self.bus.publish(
            Event::new(EventKind::ClearanceDenied)
                .with_rider(Arc::clone(&label))
                .with_floor(&denied_at)
                .with_target(&home),
        );

        let flow = self.travel(&home, token).await;

        // A rider call keeps its ticket; anything else becomes a plain revisit.
        let retry = match interrupted {
            StopCall::Ride(request) => StopCall::Ride(request),
            StopCall::Revisit(_) => StopCall::Revisit(Revisit::new(denied_at.clone())),
        };
        self.queue.push_front(retry);
        if flow.is_break() {
            return flow;
        }

        let rider = self.cabin.remove(index);
        rider.resolve(Ok(self.cabin.floor().clone()));
        self.bus.publish(
            Event::new(EventKind::RiderReturned)
                .with_rider(label)
                .with_floor(self.cabin.floor()),
        );
        self.bus
            .publish(Event::new(EventKind::StopRetried).with_target(&denied_at));
        ControlFlow::Continue(())
    }

    /// Lets out every rider whose destination is the current floor.
    fn discharge(&mut self) {
        let floor = self.cabin.floor().clone();
        for rider in self.cabin.discharge() {
            self.bus.publish(
                Event::new(EventKind::RiderArrived)
                    .with_rider(rider.rider().label())
                    .with_floor(&floor),
            );
            rider.resolve(Ok(floor.clone()));
        }
    }

    /// Boards `first` and every other rider waiting at this floor, then
    /// queues their buttons ahead of older calls.
    fn board_waiting(&mut self, first: RideRequest) {
        let floor = self.cabin.floor().clone();
        let mut pressed: Vec<Floor> = Vec::new();

        self.board(first, &mut pressed);
        for call in self.queue.remove_where(|call| call.is_ride_from(&floor)) {
            if let StopCall::Ride(request) = call {
                self.board(request, &mut pressed);
            }
        }

        // First button pressed ends up at the very front.
        for target in pressed.into_iter().rev() {
            self.bus
                .publish(Event::new(EventKind::ButtonPressed).with_target(&target));
            self.queue.push_front(StopCall::Revisit(Revisit::new(target)));
        }
    }

    /// # Panics
    /// If the rider's chooser returns a floor outside the plan.
    fn board(&mut self, mut request: RideRequest, pressed: &mut Vec<Floor>) {
        let destination = request.choose_destination().clone();
        if !self.plan.contains(&destination) {
            panic!(
                "destination chooser for {} returned floor {destination} outside the floor plan",
                request.rider()
            );
        }

        self.bus.publish(
            Event::new(EventKind::RiderBoarded)
                .with_rider(request.rider().label())
                .with_floor(self.cabin.floor())
                .with_target(&destination),
        );
        if !pressed.contains(&destination) {
            pressed.push(destination);
        }
        self.cabin.board(request);
    }

    /// Moves the cabin to `target`, taking `distance × per_floor`.
    async fn travel(&mut self, target: &Floor, token: &CancellationToken) -> ControlFlow<()> {
        let from = self.cabin.floor().clone();
        let duration = self.cfg.travel_time(self.plan.distance(&from, target));

        self.bus.publish(
            Event::new(EventKind::TravelStarted)
                .with_floor(&from)
                .with_target(target)
                .with_travel(duration),
        );
        self.cabin.depart(target.clone());

        let sleep = time::sleep(duration);
        tokio::pin!(sleep);
        select! {
            _ = &mut sleep => {}
            _ = token.cancelled() => {
                self.bus.publish(
                    Event::new(EventKind::TravelInterrupted)
                        .with_floor(&from)
                        .with_target(target),
                );
                return ControlFlow::Break(());
            }
        }

        self.cabin.arrive(target.clone());
        self.bus
            .publish(Event::new(EventKind::Arrived).with_floor(target));
        ControlFlow::Continue(())
    }

    /// Waits one idle tick so concurrent calls can land in the queue.
    async fn idle(&mut self, token: &CancellationToken) -> ControlFlow<()> {
        select! {
            _ = time::sleep(self.cfg.idle_tick_clamped()) => ControlFlow::Continue(()),
            _ = token.cancelled() => ControlFlow::Break(()),
        }
    }

    /// Terminal cleanup: fails everyone aboard and everyone still queued
    /// with [`RideError::Closed`], then marks the cabin closed.
    ///
    /// Also used directly when the elevator is stopped before it ever started.
    pub(crate) fn shutdown(mut self) {
        let floor = self.cabin.floor().clone();
        for rider in self.cabin.evacuate() {
            self.bus.publish(
                Event::new(EventKind::RiderEvicted)
                    .with_rider(rider.rider().label())
                    .with_floor(&floor)
                    .with_reason("aboard"),
            );
            rider.resolve(Err(RideError::Closed));
        }

        for call in self.queue.close() {
            let origin = call.target().clone();
            if let Some(rider) = call.close() {
                self.bus.publish(
                    Event::new(EventKind::RiderEvicted)
                        .with_rider(rider.label())
                        .with_floor(&origin)
                        .with_reason("waiting"),
                );
            }
        }

        if self.cabin.state() != &CabinState::Closed {
            self.cabin.close();
        }
        self.bus
            .publish(Event::new(EventKind::DispatchStopped).with_floor(&floor));
    }
}
