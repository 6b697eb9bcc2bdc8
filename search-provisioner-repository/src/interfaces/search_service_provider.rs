//! Search service provider trait definition.
//!
//! This module defines the abstract interface for the remote calls made while
//! provisioning, so the pipeline can run against the Azure REST API or against
//! a mock in tests.

use async_trait::async_trait;
use search_provisioner_shared::{DataSourceSpec, IndexSpec, IndexerSpec, IndexerStatus};

use crate::errors::ProvisioningError;
use crate::types::ProvisionedResource;

/// Abstracts the remote search service.
///
/// Implementations are injected into `ProvisioningService`. Each create call
/// submits exactly one request and reports a non-success answer as
/// `ProvisioningError::RemoteRejection` or `ProvisioningError::Conflict`,
/// including the response body. Implementations never retry.
#[async_trait]
pub trait SearchServiceProvider: Send + Sync {
    /// Register a data source.
    ///
    /// # Returns
    ///
    /// * `Ok(ProvisionedResource)` - If the service accepted the data source
    /// * `Err(ProvisioningError)` - On transport failure or remote rejection
    async fn create_data_source(
        &self,
        spec: &DataSourceSpec,
    ) -> Result<ProvisionedResource, ProvisioningError>;

    /// Create an index from its schema.
    async fn create_index(&self, spec: &IndexSpec) -> Result<ProvisionedResource, ProvisioningError>;

    /// Create an indexer linking an existing data source to an existing index.
    ///
    /// The service starts the first run immediately after creation unless the
    /// indexer is disabled.
    async fn create_indexer(
        &self,
        spec: &IndexerSpec,
    ) -> Result<ProvisionedResource, ProvisioningError>;

    /// Fetch the current status and last execution result of an indexer.
    async fn get_indexer_status(&self, name: &str) -> Result<IndexerStatus, ProvisioningError>;
}
