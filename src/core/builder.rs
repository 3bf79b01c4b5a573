use std::sync::Arc;

use tokio::sync::{
    broadcast::{self, error::RecvError},
    watch,
};

use crate::{
    core::{Config, Elevator, cabin::CabinStatus},
    events::{Bus, Event, EventKind},
    policies::{AccessPolicy, TieredAccess},
    rides::FloorPlan,
    subscribers::{Subscribe, SubscriberSet},
};

/// Builder for constructing an [`Elevator`] with optional features.
pub struct ElevatorBuilder {
    plan: FloorPlan,
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
    access: Arc<dyn AccessPolicy>,
}

impl ElevatorBuilder {
    /// Creates a new builder for `plan` with default configuration and [`TieredAccess`].
    pub fn new(plan: FloorPlan) -> Self {
        Self {
            plan,
            cfg: Config::default(),
            subscribers: Vec::new(),
            access: Arc::new(TieredAccess),
        }
    }

    /// Replaces the runtime configuration.
    pub fn with_config(mut self, cfg: Config) -> Self {
        self.cfg = cfg;
        self
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive runtime events (calls, trips, boarding, evictions)
    /// through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Replaces the rule deciding which clearance may occupy which floor.
    pub fn with_access_policy(mut self, access: impl AccessPolicy) -> Self {
        self.access = Arc::new(access);
        self
    }

    /// Builds and returns the Elevator instance.
    ///
    /// This consumes the builder and initializes all runtime components:
    /// - Event bus for broadcasting
    /// - Subscriber workers and the listener feeding them (only if any were given)
    /// - The dispatch loop, parked until [`Elevator::start`]
    ///
    /// # Panics
    /// If subscribers were given and this is called outside a Tokio runtime.
    pub fn build(self) -> Arc<Elevator> {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let elevator = Elevator::new_internal(self.plan, self.cfg, self.access, bus.clone());

        if !self.subscribers.is_empty() {
            let subs = SubscriberSet::new(self.subscribers, bus.clone());
            subscriber_listener(bus.subscribe(), elevator.status(), subs);
        }

        Arc::new(elevator)
    }
}

/// Forwards bus events to the subscriber set until the elevator is done.
///
/// The set and its workers hold bus senders of their own, so the bus never
/// closes while they live. The listener therefore ends on its own:
/// - after forwarding `DispatchStopped`, the last event of an elevator;
/// - when the cabin status sender is gone (the loop died without cleanup),
///   after forwarding whatever is still buffered.
///
/// Lagging only skips events. On exit the set is shut down, which releases
/// every subscriber.
fn subscriber_listener(
    mut rx: broadcast::Receiver<Event>,
    mut status: watch::Receiver<CabinStatus>,
    set: SubscriberSet,
) {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                res = rx.recv() => match res {
                    Ok(ev) => {
                        let last = ev.kind == EventKind::DispatchStopped;
                        set.emit(Arc::new(ev));
                        if last {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(_)) => continue,
                    Err(RecvError::Closed) => break,
                },
                Err(_) = status.changed() => {
                    drain(&mut rx, &set);
                    break;
                }
            }
        }
        set.shutdown().await;
    });
}

/// Forwards events already buffered for `rx` without waiting for more.
fn drain(rx: &mut broadcast::Receiver<Event>, set: &SubscriberSet) {
    loop {
        match rx.try_recv() {
            Ok(ev) => set.emit(Arc::new(ev)),
            Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            Err(_) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::rides::{ClearanceLevel, Floor, Rider};
    use crate::subscribers::Journal;

    /// Lets every floor be visited by anyone.
    struct OpenDoors;

    impl AccessPolicy for OpenDoors {
        fn is_allowed(&self, _: ClearanceLevel, _: &Floor) -> bool {
            true
        }

        fn name(&self) -> &'static str {
            "open-doors"
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_builder_wires_config_policy_and_subscribers() {
        let plan = FloorPlan::restricted_base();
        let journal = Arc::new(Journal::new(64));
        let cfg = Config {
            per_floor: Duration::from_millis(10),
            ..Config::default()
        };
        let elevator = Elevator::builder(plan.clone())
            .with_config(cfg)
            .with_access_policy(OpenDoors)
            .with_subscribers(vec![journal.clone() as Arc<dyn Subscribe>])
            .build();
        assert_eq!(elevator.config().per_floor, Duration::from_millis(10));

        elevator.start().unwrap();
        let intern = Rider::new("intern", ClearanceLevel::Confidential, plan.base().clone());
        let t2 = plan.floor("T2").unwrap().clone();
        let arrived = elevator.call(intern.floor(), &intern, move || t2).await;
        assert_eq!(arrived.unwrap().name(), "T2");

        elevator.stop();
        elevator.closed().await;
        tokio::time::sleep(Duration::from_millis(10)).await;

        let lines = journal.lines();
        assert!(lines.iter().any(|l| l.contains("arrived at floor T2")));
        assert!(!lines.iter().any(|l| l.contains("not allowed")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_listener_releases_subscribers_after_close() {
        let plan = FloorPlan::restricted_base();
        let journal = Arc::new(Journal::new(64));
        let elevator = Elevator::builder(plan.clone())
            .with_subscribers(vec![journal.clone() as Arc<dyn Subscribe>])
            .build();
        assert_eq!(Arc::strong_count(&journal), 2);

        elevator.start().unwrap();
        elevator.stop();
        elevator.closed().await;
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(Arc::strong_count(&journal), 1);
        let lines = journal.lines();
        assert_eq!(
            lines.last().map(String::as_str),
            Some("The elevator closed at floor G")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_listener_releases_subscribers_when_never_started() {
        let plan = FloorPlan::restricted_base();
        let journal = Arc::new(Journal::new(64));
        let elevator = Elevator::builder(plan)
            .with_subscribers(vec![journal.clone() as Arc<dyn Subscribe>])
            .build();

        // Dropping an unstarted elevator drops its cabin as well.
        drop(elevator);
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(Arc::strong_count(&journal), 1);
    }
}
