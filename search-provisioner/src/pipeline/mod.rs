//! Provisioning pipeline.
//!
//! Submits the plan's payloads in order: data source, then index, then
//! indexer. Each step depends on the resources created before it, so the
//! pipeline stops at the first failure.

use std::fmt;

use search_provisioner_repository::{
    ProvisionedResource, ProvisioningError, ProvisioningService, ResourceKind,
};
use search_provisioner_shared::IndexerStatus;
use tracing::{error, info, instrument};

use crate::errors::PipelineError;
use crate::monitor::IndexerMonitor;
use crate::plan::ProvisioningPlan;

/// One step of the provisioning sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisioningStep {
    RegisterDataSource,
    CreateIndex,
    CreateIndexer,
}

impl ProvisioningStep {
    /// Steps in execution order.
    pub const ORDER: [ProvisioningStep; 3] = [
        ProvisioningStep::RegisterDataSource,
        ProvisioningStep::CreateIndex,
        ProvisioningStep::CreateIndexer,
    ];

    pub fn resource_kind(&self) -> ResourceKind {
        match self {
            ProvisioningStep::RegisterDataSource => ResourceKind::DataSource,
            ProvisioningStep::CreateIndex => ResourceKind::Index,
            ProvisioningStep::CreateIndexer => ResourceKind::Indexer,
        }
    }
}

impl fmt::Display for ProvisioningStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProvisioningStep::RegisterDataSource => "register-data-source",
            ProvisioningStep::CreateIndex => "create-index",
            ProvisioningStep::CreateIndexer => "create-indexer",
        };
        f.write_str(label)
    }
}

/// Outcome of a successful pipeline run.
#[derive(Debug, Clone)]
pub struct ProvisioningReport {
    /// Created resources, in creation order.
    pub resources: Vec<ProvisionedResource>,
    /// Final indexer status when monitoring was enabled.
    pub indexer_status: Option<IndexerStatus>,
}

/// Runs the provisioning steps against a `ProvisioningService`.
pub struct Provisioner {
    service: ProvisioningService,
    monitor: Option<IndexerMonitor>,
}

impl Provisioner {
    /// Create a provisioner without indexer monitoring.
    pub fn new(service: ProvisioningService) -> Self {
        Self {
            service,
            monitor: None,
        }
    }

    /// Wait for the indexer's first run after creating it.
    pub fn with_monitor(mut self, monitor: IndexerMonitor) -> Self {
        self.monitor = Some(monitor);
        self
    }

    /// Run all steps in order.
    ///
    /// Stops at the first failed step and reports which step it was. Resources
    /// created by earlier steps are left in place.
    #[instrument(skip_all, fields(data_source = %plan.data_source.name, index = %plan.index.name, indexer = %plan.indexer.name))]
    pub async fn run(&self, plan: &ProvisioningPlan) -> Result<ProvisioningReport, PipelineError> {
        info!("Starting provisioning");

        let mut resources = Vec::with_capacity(ProvisioningStep::ORDER.len());
        for step in ProvisioningStep::ORDER {
            match self.run_step(step, plan).await {
                Ok(resource) => resources.push(resource),
                Err(e) => {
                    error!(step = %step, error = %e, "Provisioning step failed");
                    return Err(PipelineError::step(step, e));
                }
            }
        }

        let indexer_status = match &self.monitor {
            Some(monitor) => {
                info!(indexer = %plan.indexer.name, "Waiting for indexer run");
                let status = monitor
                    .wait_for_completion(&self.service, &plan.indexer.name)
                    .await
                    .map_err(|e| {
                        error!(error = %e, "Indexer run did not complete");
                        PipelineError::MonitorFailed(e)
                    })?;
                Some(status)
            }
            None => None,
        };

        info!(resource_count = resources.len(), "Provisioning completed");

        Ok(ProvisioningReport {
            resources,
            indexer_status,
        })
    }

    async fn run_step(
        &self,
        step: ProvisioningStep,
        plan: &ProvisioningPlan,
    ) -> Result<ProvisionedResource, ProvisioningError> {
        match step {
            ProvisioningStep::RegisterDataSource => {
                self.service.register_data_source(&plan.data_source).await
            }
            ProvisioningStep::CreateIndex => self.service.create_index(&plan.index).await,
            ProvisioningStep::CreateIndexer => self.service.create_indexer(&plan.indexer).await,
        }
    }
}
