use thiserror::Error;

/// Fatal bring-up failures. None of the messages carry initialization material.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to initialize vault")]
    Initialize(#[source] anyhow::Error),

    #[error("Unable to unseal vault")]
    Unseal(#[source] anyhow::Error),

    #[error("Failed to encode initialization material")]
    Encode(#[from] serde_json::Error),

    #[error("Failed to persist initialization material to {sink}")]
    Persist {
        sink: String,
        #[source]
        source: anyhow::Error,
    },
}
