//! In-memory doubles for the remote services, shared by unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;

use crate::material::InitializationMaterial;
use crate::persist::{SecretRecord, SecretSink};
use crate::status::ServerStatus;
use crate::vault::{HealthResponse, InitRequest, SealStatus, VaultApi};

#[derive(Debug, Default)]
struct VaultCalls {
    polls: usize,
    init_requests: Vec<InitRequest>,
    unseal_keys: Vec<String>,
}

/// Replays a scripted sequence of health observations. Once the script runs
/// out the last observation repeats.
#[derive(Debug)]
pub(crate) struct FakeVault {
    script: Mutex<VecDeque<ServerStatus>>,
    last: Mutex<ServerStatus>,
    calls: Mutex<VaultCalls>,
    material: InitializationMaterial,
    fail_init: bool,
    fail_unseal: bool,
}

impl FakeVault {
    pub(crate) fn new(script: Vec<ServerStatus>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(ServerStatus::unreachable()),
            calls: Mutex::new(VaultCalls::default()),
            material: manual_material(),
            fail_init: false,
            fail_unseal: false,
        }
    }

    pub(crate) fn with_material(mut self, material: InitializationMaterial) -> Self {
        self.material = material;
        self
    }

    pub(crate) fn failing_init(mut self) -> Self {
        self.fail_init = true;
        self
    }

    pub(crate) fn failing_unseal(mut self) -> Self {
        self.fail_unseal = true;
        self
    }

    pub(crate) fn polls(&self) -> usize {
        self.calls.lock().unwrap().polls
    }

    pub(crate) fn init_requests(&self) -> Vec<InitRequest> {
        self.calls.lock().unwrap().init_requests.clone()
    }

    pub(crate) fn unseal_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().unseal_keys.clone()
    }
}

#[async_trait]
impl VaultApi for FakeVault {
    async fn health(&self) -> Result<HealthResponse> {
        self.calls.lock().unwrap().polls += 1;
        let status = {
            let mut last = self.last.lock().unwrap();
            if let Some(next) = self.script.lock().unwrap().pop_front() {
                *last = next;
            }
            *last
        };
        if !status.reachable {
            anyhow::bail!("connection refused");
        }
        Ok(HealthResponse {
            initialized: status.initialized,
            sealed: status.sealed,
            standby: false,
            version: None,
        })
    }

    async fn initialize(&self, request: &InitRequest) -> Result<InitializationMaterial> {
        self.calls.lock().unwrap().init_requests.push(*request);
        if self.fail_init {
            anyhow::bail!("Vault API error (400 Bad Request): Vault is already initialized");
        }
        Ok(self.material.clone())
    }

    async fn unseal(&self, key: &str) -> Result<SealStatus> {
        self.calls.lock().unwrap().unseal_keys.push(key.to_string());
        if self.fail_unseal {
            anyhow::bail!("Vault API error (400 Bad Request): invalid key");
        }
        Ok(SealStatus {
            sealed: false,
            t: Some(1),
            progress: Some(0),
        })
    }
}

pub(crate) fn manual_material() -> InitializationMaterial {
    InitializationMaterial {
        root_token: "s.root-token".to_string(),
        unseal_keys: vec!["unseal-key-0".to_string()],
        unseal_keys_b64: vec!["dW5zZWFsLWtleS0w".to_string()],
        recovery_keys: Vec::new(),
        recovery_keys_b64: Vec::new(),
    }
}

pub(crate) fn auto_unseal_material() -> InitializationMaterial {
    InitializationMaterial {
        root_token: "s.root-token".to_string(),
        unseal_keys: Vec::new(),
        unseal_keys_b64: Vec::new(),
        recovery_keys: vec!["recovery-key-0".to_string()],
        recovery_keys_b64: vec!["cmVjb3Zlcnkta2V5LTA=".to_string()],
    }
}

/// Records every upsert and optionally fails them all.
#[derive(Debug, Clone)]
pub(crate) struct RecordingSink {
    name: &'static str,
    records: Arc<Mutex<Vec<SecretRecord>>>,
    fail: bool,
}

impl RecordingSink {
    pub(crate) fn new(name: &'static str) -> Self {
        Self {
            name,
            records: Arc::new(Mutex::new(Vec::new())),
            fail: false,
        }
    }

    pub(crate) fn failing(name: &'static str) -> Self {
        Self {
            fail: true,
            ..Self::new(name)
        }
    }

    pub(crate) fn records(&self) -> Vec<SecretRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl SecretSink for RecordingSink {
    fn name(&self) -> &str {
        self.name
    }

    async fn upsert(&self, record: &SecretRecord) -> Result<()> {
        self.records.lock().unwrap().push(record.clone());
        if self.fail {
            anyhow::bail!("{} is unavailable", self.name);
        }
        Ok(())
    }
}
