//! # Process termination signals.
//!
//! [`wait_for_shutdown_signal`] completes when the process is asked to stop.
//! Pair it with [`Elevator::stop`](crate::Elevator::stop) to shut the cabin down
//! on Ctrl-C:
//!
//! ```rust,no_run
//! # async fn run(elevator: std::sync::Arc<liftvisor::Elevator>) -> std::io::Result<()> {
//! liftvisor::wait_for_shutdown_signal().await?;
//! elevator.stop();
//! elevator.closed().await;
//! # Ok(())
//! # }
//! ```
//!
//! On Unix this listens for `SIGINT`, `SIGTERM` and `SIGQUIT`; elsewhere only
//! for Ctrl-C.

/// Waits for a termination signal.
///
/// Each call installs its own listeners.
///
/// # Errors
/// Fails if a signal handler cannot be registered.
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut interrupt = signal(SignalKind::interrupt())?;
        let mut terminate = signal(SignalKind::terminate())?;
        let mut quit = signal(SignalKind::quit())?;

        tokio::select! {
            _ = interrupt.recv() => {},
            _ = terminate.recv() => {},
            _ = quit.recv() => {},
        }
        Ok(())
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await
    }
}
