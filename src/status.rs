use tracing::{debug, warn};

use crate::vault::{HealthResponse, VaultApi};

/// One health observation. Rebuilt on every poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerStatus {
    pub reachable: bool,
    pub initialized: bool,
    pub sealed: bool,
}

impl ServerStatus {
    #[must_use]
    pub const fn unreachable() -> Self {
        Self {
            reachable: false,
            initialized: false,
            sealed: false,
        }
    }

    #[must_use]
    pub const fn reachable(initialized: bool, sealed: bool) -> Self {
        Self {
            reachable: true,
            initialized,
            sealed,
        }
    }

    #[must_use]
    pub fn state(self) -> ServerState {
        ServerState::classify(self)
    }
}

impl From<&HealthResponse> for ServerStatus {
    fn from(health: &HealthResponse) -> Self {
        Self::reachable(health.initialized, health.sealed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    Unreachable,
    Ready,
    Uninitialized,
    Unrecognized,
}

impl ServerState {
    /// Classifies an observation. Precedence: unreachable, ready,
    /// uninitialized, then everything else.
    #[must_use]
    pub fn classify(status: ServerStatus) -> Self {
        if !status.reachable {
            Self::Unreachable
        } else if status.initialized && !status.sealed {
            Self::Ready
        } else if !status.initialized {
            Self::Uninitialized
        } else {
            Self::Unrecognized
        }
    }
}

/// Issues single health requests. Transport and decode failures are reported
/// as an unreachable server rather than an error.
#[derive(Debug)]
pub struct StatusPoller<'a, V: ?Sized> {
    vault: &'a V,
}

impl<'a, V: VaultApi + ?Sized> StatusPoller<'a, V> {
    pub fn new(vault: &'a V) -> Self {
        Self { vault }
    }

    pub async fn poll(&self) -> ServerStatus {
        match self.vault.health().await {
            Ok(health) => {
                debug!(
                    initialized = health.initialized,
                    sealed = health.sealed,
                    standby = health.standby,
                    version = health.version.as_deref().unwrap_or("unknown"),
                    "Vault health observed"
                );
                ServerStatus::from(&health)
            }
            Err(err) => {
                warn!("Vault is unreachable ({err:#})");
                ServerStatus::unreachable()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_unreachable_wins() {
        let status = ServerStatus {
            reachable: false,
            initialized: true,
            sealed: false,
        };
        assert_eq!(status.state(), ServerState::Unreachable);
    }

    #[test]
    fn test_classify_reachable_combinations() {
        assert_eq!(
            ServerStatus::reachable(true, false).state(),
            ServerState::Ready
        );
        assert_eq!(
            ServerStatus::reachable(false, true).state(),
            ServerState::Uninitialized
        );
        assert_eq!(
            ServerStatus::reachable(false, false).state(),
            ServerState::Uninitialized
        );
        assert_eq!(
            ServerStatus::reachable(true, true).state(),
            ServerState::Unrecognized
        );
    }

    #[test]
    fn test_status_from_health() {
        let health = HealthResponse {
            initialized: true,
            sealed: true,
            standby: false,
            version: None,
        };
        assert_eq!(ServerStatus::from(&health), ServerStatus::reachable(true, true));
    }
}
