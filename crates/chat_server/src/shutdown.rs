//! Shared shutdown coordination.
//!
//! A single `stopping` flag carried on a `watch` channel. The accept loop
//! awaits it and any clone can raise it.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

/// Cloneable handle to the server's stop flag.
#[derive(Debug, Clone)]
pub struct ShutdownState {
    stopping: Arc<watch::Sender<bool>>,
}

impl ShutdownState {
    pub fn new() -> Self {
        let (stopping, _) = watch::channel(false);
        Self {
            stopping: Arc::new(stopping),
        }
    }

    pub fn is_shutdown_initiated(&self) -> bool {
        *self.stopping.borrow()
    }

    /// Raises the flag. Later calls are no-ops.
    pub fn initiate_shutdown(&self) {
        if !self.stopping.send_replace(true) {
            info!("🛑 Shutdown initiated - no new connections will be accepted");
        }
    }

    /// Resolves once the flag is raised, immediately if it already is.
    pub async fn wait(&self) {
        let mut stopping = self.stopping.subscribe();
        // The sender lives in `self`, so this cannot observe a closed channel
        let _ = stopping.wait_for(|stopping| *stopping).await;
    }
}

impl Default for ShutdownState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_flag_is_shared_between_clones() {
        let state = ShutdownState::new();
        let clone = state.clone();
        assert!(!clone.is_shutdown_initiated());

        state.initiate_shutdown();
        assert!(clone.is_shutdown_initiated());

        // Raising it twice changes nothing
        clone.initiate_shutdown();
        assert!(state.is_shutdown_initiated());
    }

    #[tokio::test]
    async fn test_wait_wakes_when_raised_from_another_task() {
        let state = ShutdownState::new();
        let waiter = {
            let state = state.clone();
            tokio::spawn(async move { state.wait().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        state.initiate_shutdown();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter did not wake")
            .unwrap();
    }

    #[tokio::test]
    async fn test_wait_after_raise_returns_immediately() {
        let state = ShutdownState::new();
        state.initiate_shutdown();
        tokio::time::timeout(Duration::from_millis(100), state.wait())
            .await
            .expect("already raised");
    }
}
