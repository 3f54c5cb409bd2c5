use anyhow::Context;
use tracing::info;

use crate::config::Settings;
use crate::error::Error;
use crate::orchestrator::{Orchestrator, Outcome, PollConfig};
use crate::persist::{ClusterSecretStore, CloudSecretStore, SecretRecord, SecretSink, persist_all};
use crate::secret_manager::{SecretManagerClient, TokenSource};
use crate::shutdown::ShutdownCoordinator;
use crate::vault::{InitRequest, VaultApi};

/// Everything a bring-up run needs besides its clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub init_request: InitRequest,
    pub poll: PollConfig,
    pub project_id: String,
    pub secret_id: String,
}

impl Plan {
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            init_request: settings.init_request(),
            poll: settings.poll_config(),
            project_id: settings.project_id().to_string(),
            secret_id: settings.secret_id().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Material was captured and handed to every sink.
    Persisted,
    AlreadyInitialized,
    Cancelled,
}

/// Brings the server up, then stores captured material once in every sink.
///
/// # Errors
/// Returns an error if initialize or unseal fails, if the material cannot be
/// encoded, or if any sink fails.
pub async fn run<V: VaultApi + ?Sized>(
    vault: &V,
    sinks: &[Box<dyn SecretSink>],
    plan: &Plan,
    shutdown: &mut ShutdownCoordinator,
) -> Result<Completion, Error> {
    let outcome = Orchestrator::new(vault, plan.init_request, plan.poll)
        .run(shutdown)
        .await?;
    match outcome {
        Outcome::Initialized(material) => {
            let record = SecretRecord::new(&plan.project_id, &plan.secret_id, &material)?;
            drop(material);
            persist_all(sinks, &record).await?;
            info!(sinks = sinks.len(), "Initialization material persisted.");
            Ok(Completion::Persisted)
        }
        Outcome::AlreadyInitialized => Ok(Completion::AlreadyInitialized),
        Outcome::Cancelled => Ok(Completion::Cancelled),
    }
}

/// Selects ring as the process-wide rustls provider. A provider that is
/// already installed is kept.
pub fn install_crypto_provider() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

/// Builds the Secret Manager sink followed by the cluster secret sink.
///
/// # Errors
/// Returns an error if either client cannot be constructed.
pub async fn build_sinks(settings: &Settings) -> anyhow::Result<Vec<Box<dyn SecretSink>>> {
    install_crypto_provider();
    let token = match &settings.google_oauth_access_token {
        Some(token) => TokenSource::Static(token.clone()),
        None => TokenSource::metadata(&settings.gce_metadata_host),
    };
    let secret_manager = SecretManagerClient::new(&settings.secret_manager_endpoint, token)?;
    let kube = kube::Client::try_default()
        .await
        .context("Could not instantiate Kubernetes client")?;

    Ok(vec![
        Box::new(CloudSecretStore::new(secret_manager)),
        Box::new(ClusterSecretStore::new(
            kube,
            &settings.kube_namespace,
            settings.kube_secret_name.clone(),
            &settings.kube_secret_key,
        )),
    ])
}
