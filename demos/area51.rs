//! # Example: Area 51
//!
//! Three agents roam a secret base, one per clearance tier. Most of the time
//! they walk around their floor; now and then they call the elevator and pick a
//! random other floor once inside. Agents caught on a floor above their
//! clearance are escorted back to where they boarded.
//!
//! A dashboard prints the cabin snapshot and the latest journal lines every
//! second. The demo stops after the given number of seconds (default 30) or on
//! Ctrl-C, whichever comes first.
//!
//! ```text
//! cargo run --example area51 -- 20
//! ```

use std::{sync::Arc, time::Duration};

use rand::Rng;
use tokio_util::sync::CancellationToken;

use liftvisor::{
    ClearanceLevel, Config, Elevator, FloorPlan, Journal, RideError, Rider, Subscribe,
    wait_for_shutdown_signal,
};

/// How long an agent walks around between decisions.
const WALK: Duration = Duration::from_millis(300);

/// One agent's life: walk or ride until the base closes.
async fn roam(elevator: Arc<Elevator>, mut agent: Rider, token: CancellationToken) {
    let plan = elevator.floors().clone();

    while !token.is_cancelled() {
        if rand::rng().random_bool(0.6) {
            tokio::select! {
                _ = tokio::time::sleep(WALK) => continue,
                _ = token.cancelled() => break,
            }
        }

        let from = agent.floor().clone();
        let chooser_plan = plan.clone();
        let chooser_from = from.clone();
        let ticket = elevator.call(&from, &agent, move || {
            chooser_plan.pick_other(&mut rand::rng(), &chooser_from)
        });

        match ticket.await {
            Ok(floor) => agent.set_floor(floor),
            Err(RideError::InsufficientClearance { floor, returned }) => {
                println!("[{agent}] denied at floor {floor}, waiting to be escorted back");
                match returned.await {
                    Ok(back) => agent.set_floor(back),
                    Err(_) => break,
                }
            }
            Err(RideError::Closed) => break,
            Err(err) => {
                eprintln!("[{agent}] {}", err.as_message());
                break;
            }
        }
    }
    println!("[{agent}] leaves the base from floor {}", agent.floor());
}

/// Prints the cabin and the journal tail until the base closes.
async fn dashboard(elevator: Arc<Elevator>, journal: Arc<Journal>, token: CancellationToken) {
    let mut tick = tokio::time::interval(Duration::from_secs(1));
    loop {
        tokio::select! {
            _ = tick.tick() => {}
            _ = token.cancelled() => break,
        }
        println!("========== Area 51 ==========");
        println!("{}", elevator.snapshot());
        println!("----------- journal -----------");
        for line in journal.tail(20) {
            println!("{line}");
        }
        println!();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let secs: u64 = match std::env::args().nth(1) {
        Some(arg) => arg.parse()?,
        None => 30,
    };

    let plan = FloorPlan::restricted_base();
    let cfg = Config::default();
    let journal = Arc::new(Journal::new(cfg.journal_capacity));

    let subs: Vec<Arc<dyn Subscribe>> = vec![journal.clone()];
    let elevator = Elevator::builder(plan.clone())
        .with_config(cfg)
        .with_subscribers(subs)
        .build();
    let token = elevator.cancellation_token();

    let agents = [
        ("Mulder", ClearanceLevel::TopSecret),
        ("Skinner", ClearanceLevel::Secret),
        ("Scully", ClearanceLevel::Confidential),
    ];
    let mut riders = Vec::with_capacity(agents.len());
    for (name, clearance) in agents {
        let agent = Rider::new(name, clearance, plan.base().clone());
        riders.push(tokio::spawn(roam(
            Arc::clone(&elevator),
            agent,
            token.clone(),
        )));
    }
    let board = tokio::spawn(dashboard(
        Arc::clone(&elevator),
        Arc::clone(&journal),
        token.clone(),
    ));

    elevator.start()?;

    tokio::select! {
        res = wait_for_shutdown_signal() => {
            res?;
            println!("[main] shutdown signal received");
        }
        _ = tokio::time::sleep(Duration::from_secs(secs)) => {
            println!("[main] {secs}s elapsed");
        }
    }

    elevator.stop();
    elevator.closed().await;
    for rider in riders {
        rider.await?;
    }
    board.await?;

    println!("[main] journal recorded {} events", journal.total());
    println!("{}", elevator.snapshot());
    Ok(())
}
