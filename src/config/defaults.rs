use config::{ConfigBuilder, ConfigError, builder::DefaultState};

use crate::secret_manager::{DEFAULT_ENDPOINT, DEFAULT_METADATA_HOST};

const DEFAULT_VAULT_ADDR: &str = "http://127.0.0.1:8200";
const DEFAULT_CHECK_INTERVAL: &str = "10s";
const DEFAULT_REQUEST_TIMEOUT: &str = "5s";
const DEFAULT_SHARES: u64 = 1;
const DEFAULT_THRESHOLD: u64 = 1;
const DEFAULT_KUBE_NAMESPACE: &str = "default";
const DEFAULT_KUBE_SECRET_KEY: &str = "init.json";

pub(crate) fn apply_defaults(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    builder
        .set_default("vault_addr", DEFAULT_VAULT_ADDR)?
        .set_default("check_interval", DEFAULT_CHECK_INTERVAL)?
        .set_default("request_timeout", DEFAULT_REQUEST_TIMEOUT)?
        .set_default("secret_shares", DEFAULT_SHARES)?
        .set_default("secret_threshold", DEFAULT_THRESHOLD)?
        .set_default("recovery_shares", DEFAULT_SHARES)?
        .set_default("recovery_threshold", DEFAULT_THRESHOLD)?
        .set_default("secret_manager_endpoint", DEFAULT_ENDPOINT)?
        .set_default("gce_metadata_host", DEFAULT_METADATA_HOST)?
        .set_default("kube_namespace", DEFAULT_KUBE_NAMESPACE)?
        .set_default("kube_secret_key", DEFAULT_KUBE_SECRET_KEY)
}
