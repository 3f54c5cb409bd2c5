mod defaults;
mod validation;

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use config::{Config, ConfigError, Environment, File, Map};
use serde::{Deserialize, Deserializer};

use crate::orchestrator::PollConfig;
use crate::vault::InitRequest;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub vault_addr: String,
    #[serde(deserialize_with = "deserialize_duration")]
    pub check_interval: Duration,
    #[serde(deserialize_with = "deserialize_duration")]
    pub request_timeout: Duration,
    #[serde(default)]
    pub secret_id: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    pub secret_shares: u8,
    pub secret_threshold: u8,
    pub recovery_shares: u8,
    pub recovery_threshold: u8,
    pub secret_manager_endpoint: String,
    #[serde(default)]
    pub google_oauth_access_token: Option<String>,
    pub gce_metadata_host: String,
    pub kube_namespace: String,
    #[serde(default)]
    pub kube_secret_name: Option<String>,
    pub kube_secret_key: String,
}

impl Settings {
    /// Loads settings from defaults, an optional TOML file and the process
    /// environment, in increasing precedence.
    ///
    /// # Errors
    /// Returns error if configuration parsing fails (e.g. invalid format or
    /// an unparsable value).
    pub fn new(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::from_sources(config_path, None)
    }

    /// Like [`Settings::new`], but reads environment variables from `env`
    /// instead of the process environment when it is provided.
    ///
    /// # Errors
    /// Returns error if configuration parsing fails.
    pub fn from_sources(
        config_path: Option<&Path>,
        env: Option<Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut s = defaults::apply_defaults(Config::builder())?;

        if let Some(path) = config_path {
            s = s.add_source(File::from(path).required(true));
        }

        // Settings use bare names (VAULT_ADDR, CHECK_INTERVAL, ...).
        s = s.add_source(Environment::default().ignore_empty(true).source(env));

        s.build()?.try_deserialize()
    }

    /// Applies command-line overrides on top of loaded settings.
    pub fn merge_with_args(&mut self, args: &crate::Args) {
        if let Some(vault_addr) = &args.vault_addr {
            vault_addr.clone_into(&mut self.vault_addr);
        }
        if let Some(check_interval) = args.check_interval {
            self.check_interval = check_interval;
        }
    }

    /// Validates configuration values for correctness.
    ///
    /// # Errors
    /// Returns error if a required setting is missing or a value is out of range.
    pub fn validate(&self) -> Result<()> {
        validation::validate_settings(self)
    }

    #[must_use]
    pub fn poll_config(&self) -> PollConfig {
        PollConfig {
            check_interval: self.check_interval,
        }
    }

    #[must_use]
    pub fn init_request(&self) -> InitRequest {
        InitRequest {
            secret_shares: self.secret_shares,
            secret_threshold: self.secret_threshold,
            recovery_shares: self.recovery_shares,
            recovery_threshold: self.recovery_threshold,
        }
    }

    /// Returns the required secret ID. Call after [`Settings::validate`].
    #[must_use]
    pub fn secret_id(&self) -> &str {
        self.secret_id.as_deref().unwrap_or_default()
    }

    /// Returns the required project ID. Call after [`Settings::validate`].
    #[must_use]
    pub fn project_id(&self) -> &str {
        self.project_id.as_deref().unwrap_or_default()
    }
}

/// Parses a duration such as `10s`, `1m30s` or `250ms`. A value made only of
/// digits is read as seconds.
///
/// # Errors
/// Returns an error if the value is neither a number nor a `humantime`
/// duration.
pub fn parse_duration(value: &str) -> Result<Duration, humantime::DurationError> {
    let value = value.trim();
    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        return humantime::parse_duration(&format!("{value}s"));
    }
    humantime::parse_duration(value)
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_duration(&raw)
        .map_err(|err| serde::de::Error::custom(format!("invalid duration {raw:?}: {err}")))
}
