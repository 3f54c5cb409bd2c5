use tracing::info;

use crate::error::Error;
use crate::material::InitializationMaterial;
use crate::vault::VaultApi;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsealOutcome {
    /// Recovery keys were issued; the server unseals itself.
    AutoUnseal,
    /// The first unseal key was submitted.
    Submitted { sealed: bool },
    /// Neither key kind was issued.
    NothingToSubmit,
}

/// Submits at most one unseal key for freshly captured material.
///
/// Only the first key share is used, which is enough for a threshold of 1.
///
/// # Errors
/// Returns [`Error::Unseal`] if the unseal call fails.
pub async fn unseal<V: VaultApi + ?Sized>(
    vault: &V,
    material: &InitializationMaterial,
) -> Result<UnsealOutcome, Error> {
    if material.auto_unseal() {
        info!("Auto-unseal enabled on the server.");
        return Ok(UnsealOutcome::AutoUnseal);
    }
    let Some(key) = material.first_unseal_key() else {
        info!("Init response returned no unseal keys. Nothing to submit.");
        return Ok(UnsealOutcome::NothingToSubmit);
    };

    info!("Detected unseal keys, unsealing.");
    let status = vault.unseal(key).await.map_err(Error::Unseal)?;
    info!(
        sealed = status.sealed,
        threshold = status.t,
        progress = status.progress,
        "Unseal key submitted."
    );
    Ok(UnsealOutcome::Submitted {
        sealed: status.sealed,
    })
}
