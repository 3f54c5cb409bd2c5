use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::material::InitializationMaterial;

pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

// Every lifecycle state answers 200 so the health body can always be decoded.
const HEALTH_QUERY: &str = "uninitcode=200&sealedcode=200&standbycode=200\
    &drsecondarycode=200&performancestandbycode=200";

/// Remote operations the bring-up loop needs from a vault server.
#[async_trait]
pub trait VaultApi: Send + Sync {
    async fn health(&self) -> Result<HealthResponse>;

    async fn initialize(&self, request: &InitRequest) -> Result<InitializationMaterial>;

    async fn unseal(&self, key: &str) -> Result<SealStatus>;
}

#[derive(Debug, Clone)]
pub struct VaultClient {
    base_url: String,
    client: Client,
    health_timeout: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub initialized: bool,
    pub sealed: bool,
    #[serde(default)]
    pub standby: bool,
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InitRequest {
    pub secret_shares: u8,
    pub secret_threshold: u8,
    pub recovery_shares: u8,
    pub recovery_threshold: u8,
}

impl Default for InitRequest {
    fn default() -> Self {
        Self {
            secret_shares: 1,
            secret_threshold: 1,
            recovery_shares: 1,
            recovery_threshold: 1,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SealStatus {
    pub sealed: bool,
    #[serde(default)]
    pub t: Option<u32>,
    #[serde(default)]
    pub progress: Option<u32>,
}

impl VaultClient {
    /// Builds a client for the vault server at `base_url`.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: &str, health_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build vault HTTP client")?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            health_timeout,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/v1/{path}", self.base_url)
    }

    async fn put_json<T: Serialize + Sync, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<R> {
        let response = self
            .client
            .put(self.endpoint(path))
            .json(body)
            .send()
            .await
            .with_context(|| format!("Vault request failed: {path}"))?;
        Self::parse_response(response)
            .await
            .with_context(|| format!("Vault response parse failed: {path}"))
    }

    async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let text = response
            .text()
            .await
            .context("Failed to read vault response body")?;
        if !status.is_success() {
            anyhow::bail!("Vault API error ({status}): {}", summarize_errors(&text));
        }
        serde_json::from_str(&text).context("Failed to parse vault response")
    }
}

#[async_trait]
impl VaultApi for VaultClient {
    async fn health(&self) -> Result<HealthResponse> {
        let url = format!("{}?{HEALTH_QUERY}", self.endpoint("sys/health"));
        let response = self
            .client
            .get(url)
            .timeout(self.health_timeout)
            .send()
            .await
            .context("Vault health check failed")?;
        Self::parse_response(response)
            .await
            .context("Vault health response parse failed")
    }

    async fn initialize(&self, request: &InitRequest) -> Result<InitializationMaterial> {
        self.put_json("sys/init", request).await
    }

    async fn unseal(&self, key: &str) -> Result<SealStatus> {
        #[derive(Serialize)]
        struct UnsealRequest<'a> {
            key: &'a str,
        }
        self.put_json("sys/unseal", &UnsealRequest { key }).await
    }
}

/// Extracts the `errors` list of a vault error body. Everything else in the
/// body is dropped so a failing call cannot echo request material into logs.
fn summarize_errors(text: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        #[serde(default)]
        errors: Vec<String>,
    }
    match serde_json::from_str::<ErrorBody>(text) {
        Ok(body) if !body.errors.is_empty() => body.errors.join("; "),
        _ => "no error details".to_string(),
    }
}
