//! Termination signal handling.
//!
//! The hub stops on the first SIGINT or SIGTERM (Ctrl+C on Windows) and
//! exits hard on the next one.

use tokio::signal;

/// Waits for the next termination signal and returns its name.
///
/// Only signals delivered after this call are observed, so calling it again
/// after a first signal waits for a fresh one.
pub async fn wait_for_termination() -> std::io::Result<&'static str> {
    #[cfg(unix)]
    {
        use signal::unix::{signal, SignalKind};

        let mut interrupt = signal(SignalKind::interrupt())?;
        let mut terminate = signal(SignalKind::terminate())?;

        let name = tokio::select! {
            _ = interrupt.recv() => "SIGINT",
            _ = terminate.recv() => "SIGTERM",
        };
        Ok(name)
    }

    #[cfg(not(unix))]
    {
        signal::ctrl_c().await?;
        Ok("Ctrl+C")
    }
}
