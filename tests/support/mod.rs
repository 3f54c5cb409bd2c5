// Helper functions are shared across multiple test crates; not every helper is
// referenced in each test module.
#![allow(dead_code)]

use std::time::Duration;

use serde_json::{Value, json};
use vault_initialize::secret_manager::{SecretManagerClient, TokenSource};
use vault_initialize::vault::VaultClient;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub(crate) const ROOT_TOKEN: &str = "s.root-token";
pub(crate) const UNSEAL_KEY: &str = "unseal-key-0";
pub(crate) const ACCESS_TOKEN: &str = "ya29.test-token";
pub(crate) const PROJECT_ID: &str = "my-project";
pub(crate) const SECRET_ID: &str = "vault-init";
pub(crate) const SECRET_NAME: &str = "projects/my-project/secrets/vault-init";
pub(crate) const NAMESPACE: &str = "vault";

pub(crate) fn health_body(initialized: bool, sealed: bool) -> Value {
    json!({
        "initialized": initialized,
        "sealed": sealed,
        "standby": false,
        "version": "1.15.0",
    })
}

pub(crate) fn init_body() -> Value {
    json!({
        "keys": [UNSEAL_KEY],
        "keys_base64": ["dW5zZWFsLWtleS0w"],
        "root_token": ROOT_TOKEN,
    })
}

/// Mounts one health answer that is served exactly once.
pub(crate) async fn stub_health_once(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/v1/sys/health"))
        .and(query_param("uninitcode", "200"))
        .respond_with(template)
        .up_to_n_times(1)
        .mount(server)
        .await;
}

pub(crate) async fn stub_health(server: &MockServer, initialized: bool, sealed: bool) {
    Mock::given(method("GET"))
        .and(path("/v1/sys/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(health_body(initialized, sealed)))
        .mount(server)
        .await;
}

pub(crate) fn vault_client(server: &MockServer) -> VaultClient {
    vault_initialize::bootstrap::install_crypto_provider();
    VaultClient::new(&server.uri(), Duration::from_secs(2)).expect("vault client")
}

pub(crate) fn secret_manager_client(server: &MockServer) -> SecretManagerClient {
    vault_initialize::bootstrap::install_crypto_provider();
    SecretManagerClient::new(&server.uri(), TokenSource::Static(ACCESS_TOKEN.to_string()))
        .expect("secret manager client")
}

pub(crate) fn kube_client(server: &MockServer) -> kube::Client {
    vault_initialize::bootstrap::install_crypto_provider();
    let config = kube::Config::new(server.uri().parse().expect("mock server uri"));
    kube::Client::try_from(config).expect("kube client")
}

pub(crate) fn secret_path(namespace: &str, name: &str) -> String {
    format!("/api/v1/namespaces/{namespace}/secrets/{name}")
}

pub(crate) fn secrets_path(namespace: &str) -> String {
    format!("/api/v1/namespaces/{namespace}/secrets")
}

pub(crate) fn secret_json(namespace: &str, name: &str, data: Value) -> Value {
    json!({
        "apiVersion": "v1",
        "kind": "Secret",
        "metadata": {
            "name": name,
            "namespace": namespace,
            "resourceVersion": "1",
        },
        "data": data,
    })
}

pub(crate) fn not_found_status(name: &str) -> ResponseTemplate {
    ResponseTemplate::new(404).set_body_json(json!({
        "apiVersion": "v1",
        "kind": "Status",
        "metadata": {},
        "status": "Failure",
        "message": format!("secrets \"{name}\" not found"),
        "reason": "NotFound",
        "code": 404,
    }))
}

pub(crate) fn gcp_not_found() -> ResponseTemplate {
    ResponseTemplate::new(404).set_body_json(json!({
        "error": {
            "code": 404,
            "message": format!("Secret [{SECRET_NAME}] not found or has no versions."),
            "status": "NOT_FOUND",
        }
    }))
}
