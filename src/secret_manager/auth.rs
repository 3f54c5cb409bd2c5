use std::fmt;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;

pub const DEFAULT_METADATA_HOST: &str = "metadata.google.internal";
const METADATA_TOKEN_PATH: &str = "computeMetadata/v1/instance/service-accounts/default/token";
const METADATA_FLAVOR_HEADER: &str = "Metadata-Flavor";

/// Where Secret Manager bearer tokens come from.
#[derive(Clone)]
pub enum TokenSource {
    /// A pre-issued OAuth access token.
    Static(String),
    /// The GCE/GKE metadata server of the attached service account.
    Metadata { host: String },
}

#[derive(Deserialize)]
struct MetadataToken {
    access_token: String,
}

impl TokenSource {
    #[must_use]
    pub fn metadata(host: &str) -> Self {
        Self::Metadata {
            host: host.trim_end_matches('/').to_string(),
        }
    }

    pub(super) async fn access_token(&self, client: &Client) -> Result<String> {
        match self {
            Self::Static(token) => Ok(token.clone()),
            Self::Metadata { host } => {
                let base = if host.starts_with("http://") || host.starts_with("https://") {
                    host.clone()
                } else {
                    format!("http://{host}")
                };
                let response = client
                    .get(format!("{base}/{METADATA_TOKEN_PATH}"))
                    .header(METADATA_FLAVOR_HEADER, "Google")
                    .send()
                    .await
                    .context("Failed to reach the metadata server for an access token")?;
                let status = response.status();
                if !status.is_success() {
                    anyhow::bail!("Metadata server token request failed with status: {status}");
                }
                let token: MetadataToken = response
                    .json()
                    .await
                    .context("Failed to parse metadata server token response")?;
                Ok(token.access_token)
            }
        }
    }
}

impl fmt::Debug for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(_) => f.write_str("Static(<redacted>)"),
            Self::Metadata { host } => f.debug_struct("Metadata").field("host", host).finish(),
        }
    }
}
