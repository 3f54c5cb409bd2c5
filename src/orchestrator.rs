use std::time::Duration;

use tracing::{info, warn};

use crate::error::Error;
use crate::material::InitializationMaterial;
use crate::shutdown::{ShutdownCoordinator, WaitOutcome};
use crate::status::{ServerState, StatusPoller};
use crate::unseal;
use crate::vault::{InitRequest, VaultApi};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub check_interval: Duration,
}

/// How the bring-up loop ended.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// This process initialized the server, which is now ready.
    Initialized(InitializationMaterial),
    /// The server was initialized by someone else; nothing to persist.
    AlreadyInitialized,
    /// A shutdown signal arrived while waiting between polls.
    Cancelled,
}

/// Drives a vault server from uninitialized to ready.
#[derive(Debug)]
pub struct Orchestrator<'a, V: ?Sized> {
    vault: &'a V,
    init_request: InitRequest,
    poll: PollConfig,
}

impl<'a, V: VaultApi + ?Sized> Orchestrator<'a, V> {
    pub fn new(vault: &'a V, init_request: InitRequest, poll: PollConfig) -> Self {
        Self {
            vault,
            init_request,
            poll,
        }
    }

    /// Polls until the server is ready or `shutdown` fires during a wait.
    ///
    /// `sys/init` is called at most once per run: once material has been
    /// captured, later "uninitialized" observations only wait.
    ///
    /// # Errors
    /// Returns an error if the initialize or unseal call fails. Those calls
    /// are never retried.
    pub async fn run(&self, shutdown: &mut ShutdownCoordinator) -> Result<Outcome, Error> {
        let poller = StatusPoller::new(self.vault);
        let mut material: Option<InitializationMaterial> = None;

        loop {
            let status = poller.poll().await;
            match status.state() {
                ServerState::Unreachable => {
                    info!("Vault is unreachable, retrying.");
                }
                ServerState::Ready => {
                    return Ok(if let Some(material) = material {
                        info!("Initialized and unsealed.");
                        Outcome::Initialized(material)
                    } else {
                        info!("Vault already initialized. Nothing to do.");
                        Outcome::AlreadyInitialized
                    });
                }
                ServerState::Uninitialized if material.is_none() => {
                    info!("Sealed and uninitialized. Initializing!");
                    let captured = self
                        .vault
                        .initialize(&self.init_request)
                        .await
                        .map_err(Error::Initialize)?;
                    unseal::unseal(self.vault, &captured).await?;
                    material = Some(captured);
                    continue;
                }
                ServerState::Uninitialized => {
                    warn!("Vault still reports uninitialized after init. Waiting.");
                }
                ServerState::Unrecognized => {
                    warn!(
                        initialized = status.initialized,
                        sealed = status.sealed,
                        "Unrecognized vault state. Retrying."
                    );
                }
            }

            if shutdown.wait(self.poll.check_interval).await == WaitOutcome::Cancelled {
                info!("Shutting down.");
                return Ok(Outcome::Cancelled);
            }
        }
    }
}
