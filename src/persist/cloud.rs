use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::info;

use super::{SecretRecord, SecretSink};
use crate::secret_manager::Secret;

/// The Secret Manager calls the cloud sink relies on.
#[async_trait]
pub trait SecretManagerApi: Send + Sync {
    /// Returns `None` when the secret does not exist.
    async fn get_secret(&self, name: &str) -> Result<Option<Secret>>;

    async fn create_secret(&self, parent: &str, secret_id: &str) -> Result<Secret>;

    /// Returns the resource name of the new version.
    async fn add_secret_version(&self, name: &str, payload: &[u8]) -> Result<String>;
}

/// Stores material as a new version of a Secret Manager secret.
#[derive(Debug)]
pub struct CloudSecretStore<C> {
    client: C,
}

impl<C: SecretManagerApi> CloudSecretStore<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Creates `projects/{project_id}/secrets/{secret_id}` if it is missing,
    /// then appends `payload` as a new version. Earlier versions are kept.
    ///
    /// # Errors
    /// Returns an error if describing, creating or versioning the secret fails.
    pub async fn upsert(&self, project_id: &str, secret_id: &str, payload: &[u8]) -> Result<String> {
        let parent = format!("projects/{project_id}");
        let name = format!("{parent}/secrets/{secret_id}");

        let existing = self
            .client
            .get_secret(&name)
            .await
            .with_context(|| format!("Unable to describe secret {name}"))?;
        if existing.is_none() {
            info!(secret = %name, "Secret does not exist, creating.");
            self.client
                .create_secret(&parent, secret_id)
                .await
                .with_context(|| format!("Unable to create secret {name}"))?;
        }

        let version = self
            .client
            .add_secret_version(&name, payload)
            .await
            .with_context(|| format!("Failed to add secret version to {name}"))?;
        info!(version = %version, "Added secret version.");
        Ok(version)
    }
}

#[async_trait]
impl<C: SecretManagerApi> SecretSink for CloudSecretStore<C> {
    fn name(&self) -> &str {
        "secret-manager"
    }

    async fn upsert(&self, record: &SecretRecord) -> Result<()> {
        CloudSecretStore::upsert(self, &record.project_id, &record.secret_id, &record.payload)
            .await
            .map(|_| ())
    }
}
