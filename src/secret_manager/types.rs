use serde::{Deserialize, Serialize};

/// Secret resource metadata. Only the name is read back.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Secret {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct SecretVersion {
    pub name: String,
}

/// Body of `POST /v1/projects/{project}/secrets?secretId={id}`.
#[derive(Debug, Serialize)]
pub(super) struct CreateSecretRequest {
    pub replication: Replication,
}

impl CreateSecretRequest {
    pub fn automatic() -> Self {
        Self {
            replication: Replication {
                automatic: AutomaticReplication {},
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct Replication {
    pub automatic: AutomaticReplication,
}

#[derive(Debug, Serialize)]
pub(super) struct AutomaticReplication {}

/// Body of `POST /v1/{name}:addVersion`. `data` is base64-encoded.
#[derive(Debug, Serialize)]
pub(super) struct AddVersionRequest {
    pub payload: SecretPayload,
}

impl AddVersionRequest {
    pub fn new(data: String) -> Self {
        Self {
            payload: SecretPayload { data },
        }
    }
}

#[derive(Serialize)]
pub(super) struct SecretPayload {
    pub data: String,
}

impl std::fmt::Debug for SecretPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretPayload(<redacted>)")
    }
}
