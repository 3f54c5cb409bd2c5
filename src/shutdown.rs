use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Elapsed,
    Cancelled,
}

/// Interruptible pause between poll attempts.
#[derive(Debug, Clone)]
pub struct ShutdownCoordinator {
    shutdown: watch::Receiver<bool>,
}

impl ShutdownCoordinator {
    #[must_use]
    pub fn new(shutdown: watch::Receiver<bool>) -> Self {
        Self { shutdown }
    }

    /// Pairs a coordinator with the sender that cancels it.
    #[must_use]
    pub fn channel() -> (watch::Sender<bool>, Self) {
        let (tx, rx) = watch::channel(false);
        (tx, Self::new(rx))
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Sleeps for `interval` unless cancellation arrives first. A cancellation
    /// that is already pending returns immediately.
    pub async fn wait(&mut self, interval: Duration) -> WaitOutcome {
        if self.is_cancelled() {
            return WaitOutcome::Cancelled;
        }
        info!("Next check in {}", humantime::format_duration(interval));
        tokio::select! {
            changed = self.shutdown.changed() => {
                // A dropped sender can never cancel; finish the interval instead.
                if changed.is_err() {
                    tokio::time::sleep(interval).await;
                    return WaitOutcome::Elapsed;
                }
                if self.is_cancelled() { WaitOutcome::Cancelled } else { WaitOutcome::Elapsed }
            }
            () = tokio::time::sleep(interval) => WaitOutcome::Elapsed,
        }
    }
}

/// Forwards the first SIGINT/SIGTERM to `shutdown`.
pub fn spawn_signal_listener(shutdown: watch::Sender<bool>) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(err) = wait_for_shutdown().await {
            error!("Shutdown signal handler error: {err}");
            return;
        }
        let _ = shutdown.send(true);
    })
}

async fn wait_for_shutdown() -> anyhow::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate())
            .map_err(|e| anyhow::anyhow!("Failed to install SIGTERM handler: {e}"))?;

        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result.map_err(|e| anyhow::anyhow!("Failed to listen for Ctrl+C: {e}"))?;
            }
            _ = term.recv() => {}
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to listen for Ctrl+C: {e}"))?;
    }

    Ok(())
}
