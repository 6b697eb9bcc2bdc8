//! # Search Provisioner
//!
//! One-shot provisioning of an Azure AI Search service over a Cosmos DB
//! container: registers the data source, creates the index schema and links
//! them with an indexer.
//!
//! ## Architecture
//!
//! The provisioner runs an ordered pipeline:
//!
//! 1. **Config**: Reads and validates CLI flags and environment variables
//! 2. **Plan**: Builds the three request payloads
//! 3. **Pipeline**: Submits them in order, stopping at the first failure
//! 4. **Monitor**: Optionally waits for the indexer's first run
//!
//! ## Modules
//!
//! - [`config`]: CLI parsing, validated configuration and dependency wiring
//! - [`plan`]: Payload construction for each schema profile
//! - [`pipeline`]: Ordered submission of the provisioning steps
//! - [`monitor`]: Indexer run polling
//! - [`errors`]: Error types for the pipeline

pub mod config;
pub mod errors;
pub mod monitor;
pub mod pipeline;
pub mod plan;

pub use config::{Cli, Dependencies, ProvisionerConfig, RunOutcome};
pub use errors::PipelineError;

use search_provisioner_repository::ProvisioningError;
use thiserror::Error;

/// Errors that can occur during provisioner initialization or execution.
#[derive(Error, Debug)]
pub enum ProvisionerError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    PipelineError(#[from] PipelineError),

    /// Failed to render or write output.
    #[error("Output error: {0}")]
    OutputError(String),
}

impl ProvisionerError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create an output error.
    pub fn output(msg: impl Into<String>) -> Self {
        Self::OutputError(msg.into())
    }

    /// Whether this error was raised before any request was sent.
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigError(_))
    }
}

impl From<ProvisioningError> for ProvisionerError {
    fn from(err: ProvisioningError) -> Self {
        match err {
            ProvisioningError::Configuration(msg) => Self::ConfigError(msg),
            other => Self::PipelineError(PipelineError::Setup(other)),
        }
    }
}
