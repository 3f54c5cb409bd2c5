pub mod cloud;
pub mod cluster;

use async_trait::async_trait;
use tracing::{error, info};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::Error;
use crate::material::InitializationMaterial;

pub use cloud::{CloudSecretStore, SecretManagerApi};
pub use cluster::{ClusterSecretStore, SecretObjects};

/// Serialized material addressed to a named secret.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecretRecord {
    pub project_id: String,
    pub secret_id: String,
    pub payload: Vec<u8>,
}

impl SecretRecord {
    /// # Errors
    /// Returns an error if the material cannot be serialized.
    pub fn new(
        project_id: &str,
        secret_id: &str,
        material: &InitializationMaterial,
    ) -> Result<Self, Error> {
        Ok(Self {
            project_id: project_id.to_string(),
            secret_id: secret_id.to_string(),
            payload: material.to_payload()?,
        })
    }
}

impl std::fmt::Debug for SecretRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretRecord")
            .field("project_id", &self.project_id)
            .field("secret_id", &self.secret_id)
            .field("payload_len", &self.payload.len())
            .finish()
    }
}

/// A durable store for captured material.
#[async_trait]
pub trait SecretSink: Send + Sync {
    fn name(&self) -> &str;

    /// Stores `record`, creating the backing secret when it does not exist.
    async fn upsert(&self, record: &SecretRecord) -> anyhow::Result<()>;
}

/// Hands `record` to every sink in order. A failing sink does not stop the
/// remaining ones; the first failure is returned once all have run.
///
/// # Errors
/// Returns [`Error::Persist`] naming the first sink that failed.
pub async fn persist_all(sinks: &[Box<dyn SecretSink>], record: &SecretRecord) -> Result<(), Error> {
    let mut first_error = None;
    for sink in sinks {
        match sink.upsert(record).await {
            Ok(()) => info!(sink = sink.name(), "Stored initialization material."),
            Err(err) => {
                error!(sink = sink.name(), "Failed to store initialization material: {err:#}");
                if first_error.is_none() {
                    first_error = Some(Error::Persist {
                        sink: sink.name().to_string(),
                        source: err,
                    });
                }
            }
        }
    }
    first_error.map_or(Ok(()), Err)
}
