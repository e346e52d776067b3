//! Waiting for the end of a timed or interruptible run

use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Why a [`StopSignal`] fired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The configured running time elapsed
    Elapsed,
    /// Ctrl-C was pressed
    Interrupted,
    /// Someone else cancelled the token
    Cancelled,
}

/// Blocks until a running time elapses, Ctrl-C arrives, or the shared
/// token is cancelled, whichever comes first.
///
/// The token is cancelled on return so every worker holding a clone of it
/// observes the stop.
#[derive(Debug, Clone)]
pub struct StopSignal {
    token: CancellationToken,
    duration: Option<Duration>,
    listen_ctrl_c: bool,
}

impl StopSignal {
    pub fn new(token: CancellationToken) -> Self {
        Self {
            token,
            duration: None,
            listen_ctrl_c: true,
        }
    }

    /// Fire after `duration`
    pub fn after(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn without_ctrl_c(mut self) -> Self {
        self.listen_ctrl_c = false;
        self
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub async fn wait(&self) -> StopReason {
        let elapsed = async {
            match self.duration {
                Some(duration) => tokio::time::sleep(duration).await,
                None => std::future::pending::<()>().await,
            }
        };
        let interrupted = async {
            // A failing signal handler must not stop the run
            if !self.listen_ctrl_c || tokio::signal::ctrl_c().await.is_err() {
                std::future::pending::<()>().await;
            }
        };

        let reason = tokio::select! {
            biased;
            _ = self.token.cancelled() => StopReason::Cancelled,
            _ = interrupted => StopReason::Interrupted,
            _ = elapsed => StopReason::Elapsed,
        };

        info!(reason = ?reason, "Stop signal fired");
        self.token.cancel();
        reason
    }
}
