//! Graceful shutdown coordination
//!
//! Built on `tokio_util::sync::CancellationToken`: tokens clone cheaply,
//! child tokens cancel with their parent, and cancellation can be observed
//! without consuming anything.

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Coordinates graceful shutdown across the node's tasks
#[derive(Clone, Default)]
pub struct ShutdownController {
    token: CancellationToken,
}

impl ShutdownController {
    /// Controller that only shuts down when told to
    pub fn new() -> Self {
        Self::default()
    }

    /// Controller that also cancels on Ctrl+C (SIGINT)
    pub fn with_ctrl_c() -> Self {
        let controller = Self::new();
        let token = controller.token.clone();

        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Received Ctrl+C, shutting down");
                    token.cancel();
                }
                Err(err) => {
                    warn!(%err, "Failed to listen for Ctrl+C");
                }
            }
        });

        controller
    }

    /// Child token, cancelled when this controller shuts down
    pub fn child_token(&self) -> CancellationToken {
        self.token.child_token()
    }

    /// Clone of the main token
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Trigger shutdown
    pub fn shutdown(&self) {
        self.token.cancel();
    }

    /// Whether shutdown has been triggered
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Wait until shutdown is triggered
    pub async fn wait(&self) {
        self.token.cancelled().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_manual_shutdown_cancels_children() {
        let controller = ShutdownController::new();
        let child = controller.child_token();

        assert!(!controller.is_cancelled());
        controller.shutdown();

        assert!(controller.is_cancelled());
        assert!(child.is_cancelled());
    }

    #[tokio::test]
    async fn test_child_cancellation_is_independent() {
        let controller = ShutdownController::new();
        let child = controller.child_token();

        child.cancel();
        assert!(child.is_cancelled());
        assert!(!controller.is_cancelled());
    }
}
