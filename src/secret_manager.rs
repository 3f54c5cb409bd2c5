//! # Secret Manager REST client
//!
//! Minimal client for the Google Cloud Secret Manager v1 REST API, built on
//! reqwest with rustls. Only the calls used to store initialization material
//! are implemented.
//!
//! API reference: <https://cloud.google.com/secret-manager/docs/reference/rest>

mod auth;
mod types;

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

pub use auth::{DEFAULT_METADATA_HOST, TokenSource};
pub use types::Secret;
use types::{AddVersionRequest, CreateSecretRequest, SecretVersion};

use crate::persist::SecretManagerApi;
use crate::vault::USER_AGENT;

pub const DEFAULT_ENDPOINT: &str = "https://secretmanager.googleapis.com";

#[derive(Debug, Clone)]
pub struct SecretManagerClient {
    endpoint: String,
    client: Client,
    token: TokenSource,
}

impl SecretManagerClient {
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(endpoint: &str, token: TokenSource) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build Secret Manager HTTP client")?;
        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            client,
            token,
        })
    }

    fn url(&self, resource: &str) -> String {
        format!("{}/v1/{resource}", self.endpoint)
    }

    async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let text = response
            .text()
            .await
            .context("Failed to read Secret Manager response body")?;
        if !status.is_success() {
            anyhow::bail!("Secret Manager API error ({status}): {text}");
        }
        serde_json::from_str(&text).context("Failed to parse Secret Manager response")
    }
}

#[async_trait]
impl SecretManagerApi for SecretManagerClient {
    async fn get_secret(&self, name: &str) -> Result<Option<Secret>> {
        let token = self.token.access_token(&self.client).await?;
        let response = self
            .client
            .get(self.url(name))
            .bearer_auth(token)
            .send()
            .await
            .with_context(|| format!("Secret Manager request failed: GET {name}"))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::parse_response(response).await.map(Some)
    }

    async fn create_secret(&self, parent: &str, secret_id: &str) -> Result<Secret> {
        let token = self.token.access_token(&self.client).await?;
        let url = format!("{}?secretId={secret_id}", self.url(&format!("{parent}/secrets")));
        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(&CreateSecretRequest::automatic())
            .send()
            .await
            .with_context(|| format!("Secret Manager request failed: create {parent}/secrets/{secret_id}"))?;
        Self::parse_response(response).await
    }

    async fn add_secret_version(&self, name: &str, payload: &[u8]) -> Result<String> {
        let token = self.token.access_token(&self.client).await?;
        let response = self
            .client
            .post(self.url(&format!("{name}:addVersion")))
            .bearer_auth(token)
            .json(&AddVersionRequest::new(STANDARD.encode(payload)))
            .send()
            .await
            .with_context(|| format!("Secret Manager request failed: addVersion {name}"))?;
        let version: SecretVersion = Self::parse_response(response).await?;
        Ok(version.name)
    }
}
