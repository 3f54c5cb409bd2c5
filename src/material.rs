use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Root token and key shares returned by a successful `sys/init` call.
///
/// The field names follow the vault init response so the serialized form can
/// be fed back to vault tooling unchanged. `Debug` never prints the values.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct InitializationMaterial {
    pub root_token: String,
    #[serde(rename = "keys", default)]
    pub unseal_keys: Vec<String>,
    #[serde(rename = "keys_base64", default)]
    pub unseal_keys_b64: Vec<String>,
    #[serde(default)]
    pub recovery_keys: Vec<String>,
    #[serde(rename = "recovery_keys_base64", default)]
    pub recovery_keys_b64: Vec<String>,
}

impl InitializationMaterial {
    /// Auto-unseal servers hand out recovery keys instead of unseal keys.
    #[must_use]
    pub fn auto_unseal(&self) -> bool {
        !self.recovery_keys.is_empty()
    }

    #[must_use]
    pub fn first_unseal_key(&self) -> Option<&str> {
        self.unseal_keys.first().map(String::as_str)
    }

    /// Serializes the material into the payload stored by every sink.
    ///
    /// # Errors
    /// Returns an error if JSON serialization fails.
    pub fn to_payload(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

impl fmt::Debug for InitializationMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InitializationMaterial")
            .field("root_token", &"<redacted>")
            .field("unseal_keys", &self.unseal_keys.len())
            .field("recovery_keys", &self.recovery_keys.len())
            .finish()
    }
}
