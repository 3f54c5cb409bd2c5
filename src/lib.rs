pub mod args;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod material;
pub mod orchestrator;
pub mod persist;
pub mod secret_manager;
pub mod shutdown;
pub mod status;
pub mod unseal;
pub mod vault;

#[cfg(test)]
pub(crate) mod testing;

pub use args::Args;
pub use error::Error;
