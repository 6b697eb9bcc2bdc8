//! Error types for the provisioning pipeline.

use search_provisioner_repository::ProvisioningError;
use thiserror::Error;

use crate::pipeline::ProvisioningStep;

/// Errors that can occur while running the provisioning pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A provisioning step failed; later steps were not attempted.
    #[error("Step '{step}' failed: {source}")]
    StepFailed {
        step: ProvisioningStep,
        #[source]
        source: ProvisioningError,
    },

    /// The indexer was created but its run failed or did not finish in time.
    #[error("Indexer monitoring failed: {0}")]
    MonitorFailed(#[source] ProvisioningError),

    /// The pipeline could not be assembled.
    #[error("Setup error: {0}")]
    Setup(#[source] ProvisioningError),
}

impl PipelineError {
    /// Create a step failure.
    pub fn step(step: ProvisioningStep, source: ProvisioningError) -> Self {
        Self::StepFailed { step, source }
    }

    /// The step that failed, if the failure happened while creating a resource.
    pub fn failed_step(&self) -> Option<ProvisioningStep> {
        match self {
            Self::StepFailed { step, .. } => Some(*step),
            _ => None,
        }
    }

    /// The underlying provisioning error.
    pub fn provisioning_error(&self) -> &ProvisioningError {
        match self {
            Self::StepFailed { source, .. } => source,
            Self::MonitorFailed(source) | Self::Setup(source) => source,
        }
    }
}
