//! Dependency initialization and wiring for the search provisioner.

use search_provisioner_repository::{
    AzureSearchProvider, ProvisioningService, SearchServiceConfig, SearchServiceProvider,
};
use tracing::info;

use crate::config::ProvisionerConfig;
use crate::monitor::IndexerMonitor;
use crate::pipeline::{Provisioner, ProvisioningReport};
use crate::plan::ProvisioningPlan;
use crate::ProvisionerError;

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured provisioner ready to run.
    pub provisioner: Provisioner,
    /// Payloads the provisioner will submit.
    pub plan: ProvisioningPlan,
    search: SearchServiceConfig,
    dry_run: bool,
}

/// Result of [`Dependencies::run`].
#[derive(Debug)]
pub enum RunOutcome {
    /// The rendered requests; nothing was sent.
    DryRun(String),
    /// The resources were created.
    Provisioned(ProvisioningReport),
}

impl Dependencies {
    /// Wire the Azure provider, the service and the pipeline from a validated configuration.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(ProvisionerError)` - If the HTTP client cannot be created
    pub fn new(config: &ProvisionerConfig) -> Result<Self, ProvisionerError> {
        info!(
            endpoint = %config.search.endpoint,
            api_version = %config.search.api_version,
            cosmos_account = %config.cosmos.account,
            database = %config.cosmos.database,
            container = %config.container,
            schema = ?config.schema,
            monitor = config.monitor.is_some(),
            "Initializing dependencies"
        );

        let provider = AzureSearchProvider::new(config.search.clone())?;
        Ok(Self::with_provider(config, Box::new(provider)))
    }

    /// Wire the pipeline around an arbitrary provider.
    pub fn with_provider(
        config: &ProvisionerConfig,
        provider: Box<dyn SearchServiceProvider>,
    ) -> Self {
        let service = ProvisioningService::new(provider);

        let mut provisioner = Provisioner::new(service);
        if let Some(monitor) = config.monitor {
            provisioner = provisioner.with_monitor(IndexerMonitor::new(monitor));
        }

        Self {
            provisioner,
            plan: config.plan(),
            search: config.search.clone(),
            dry_run: config.dry_run,
        }
    }

    /// Run the provisioning pipeline, or only validate and render the plan
    /// when the configuration asks for a dry run.
    pub async fn run(&self) -> Result<RunOutcome, ProvisionerError> {
        if self.dry_run {
            info!("Dry run, no request will be sent");
            return Ok(RunOutcome::DryRun(self.plan.render(&self.search)?));
        }

        let report = self.provisioner.run(&self.plan).await?;
        Ok(RunOutcome::Provisioned(report))
    }
}
