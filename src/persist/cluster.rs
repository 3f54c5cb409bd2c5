use std::collections::BTreeMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use k8s_openapi::ByteString;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::api::{Api, PostParams};
use tracing::info;

use super::{SecretRecord, SecretSink};

const MANAGED_BY_LABEL: &str = "app.kubernetes.io/managed-by";

/// Namespaced core/v1 `Secret` operations.
#[async_trait]
pub trait SecretObjects: Send + Sync {
    /// Returns `None` when the secret does not exist.
    async fn get(&self, namespace: &str, name: &str) -> Result<Option<Secret>>;

    async fn create(&self, namespace: &str, secret: &Secret) -> Result<Secret>;

    async fn replace(&self, namespace: &str, secret: &Secret) -> Result<Secret>;
}

#[async_trait]
impl SecretObjects for kube::Client {
    async fn get(&self, namespace: &str, name: &str) -> Result<Option<Secret>> {
        let secrets: Api<Secret> = Api::namespaced(self.clone(), namespace);
        match secrets.get(name).await {
            Ok(secret) => Ok(Some(secret)),
            Err(kube::Error::Api(api_err)) if api_err.code == 404 => Ok(None),
            Err(err) => Err(err).with_context(|| format!("Failed to get secret {namespace}/{name}")),
        }
    }

    async fn create(&self, namespace: &str, secret: &Secret) -> Result<Secret> {
        let secrets: Api<Secret> = Api::namespaced(self.clone(), namespace);
        secrets
            .create(&PostParams::default(), secret)
            .await
            .with_context(|| format!("Failed to create secret in {namespace}"))
    }

    async fn replace(&self, namespace: &str, secret: &Secret) -> Result<Secret> {
        let name = secret
            .metadata
            .name
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("Secret to replace has no name"))?;
        let secrets: Api<Secret> = Api::namespaced(self.clone(), namespace);
        secrets
            .replace(name, &PostParams::default(), secret)
            .await
            .with_context(|| format!("Failed to update secret {namespace}/{name}"))
    }
}

/// Stores material in a Kubernetes `Secret`, overwriting its data on update.
#[derive(Debug)]
pub struct ClusterSecretStore<C> {
    client: C,
    namespace: String,
    name: Option<String>,
    key: String,
}

impl<C: SecretObjects> ClusterSecretStore<C> {
    /// `name` defaults to the record's secret ID when unset.
    pub fn new(client: C, namespace: &str, name: Option<String>, key: &str) -> Self {
        Self {
            client,
            namespace: namespace.to_string(),
            name,
            key: key.to_string(),
        }
    }

    /// Creates `namespace/name` with `fields`, or replaces the data of an
    /// existing secret with exactly `fields`.
    ///
    /// # Errors
    /// Returns an error if reading, creating or updating the secret fails.
    pub async fn upsert(
        &self,
        namespace: &str,
        name: &str,
        fields: BTreeMap<String, Vec<u8>>,
    ) -> Result<()> {
        let data: BTreeMap<String, ByteString> = fields
            .into_iter()
            .map(|(key, value)| (key, ByteString(value)))
            .collect();

        if let Some(mut existing) = self.client.get(namespace, name).await? {
            existing.data = Some(data);
            existing.string_data = None;
            self.client.replace(namespace, &existing).await?;
            info!(namespace, name, "Updated cluster secret.");
        } else {
            let secret = Secret {
                metadata: ObjectMeta {
                    name: Some(name.to_string()),
                    namespace: Some(namespace.to_string()),
                    labels: Some(BTreeMap::from([(
                        MANAGED_BY_LABEL.to_string(),
                        env!("CARGO_PKG_NAME").to_string(),
                    )])),
                    ..ObjectMeta::default()
                },
                data: Some(data),
                ..Secret::default()
            };
            self.client.create(namespace, &secret).await?;
            info!(namespace, name, "Created cluster secret.");
        }
        Ok(())
    }
}

#[async_trait]
impl<C: SecretObjects> SecretSink for ClusterSecretStore<C> {
    fn name(&self) -> &str {
        "cluster-secret"
    }

    async fn upsert(&self, record: &SecretRecord) -> Result<()> {
        let name = self.name.as_deref().unwrap_or(&record.secret_id);
        let fields = BTreeMap::from([(self.key.clone(), record.payload.clone())]);
        ClusterSecretStore::upsert(self, &self.namespace, name, fields).await
    }
}
