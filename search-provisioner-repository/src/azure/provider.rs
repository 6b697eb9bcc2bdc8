//! Azure AI Search provider implementation.
//!
//! This module provides the concrete implementation of `SearchServiceProvider`
//! using `reqwest` against the search service REST API.

use async_trait::async_trait;
use reqwest::{Client, Response};
use search_provisioner_shared::{DataSourceSpec, IndexSpec, IndexerSpec, IndexerStatus};
use serde::Serialize;
use tracing::{debug, error, info};

use crate::config::SearchServiceConfig;
use crate::errors::ProvisioningError;
use crate::interfaces::SearchServiceProvider;
use crate::types::{ProvisionedResource, ResourceKind};

/// Header carrying the admin key on every request.
const API_KEY_HEADER: &str = "api-key";

/// Azure AI Search provider.
///
/// Holds one HTTP client configured with the request timeout, and the service
/// configuration with the admin key.
///
/// # Example
///
/// ```ignore
/// use search_provisioner_repository::{AzureSearchProvider, SearchServiceConfig};
///
/// let config = SearchServiceConfig::for_service("my-service", admin_key)?;
/// let provider = AzureSearchProvider::new(config)?;
/// provider.create_index(&index_spec).await?;
/// ```
pub struct AzureSearchProvider {
    client: Client,
    config: SearchServiceConfig,
}

impl AzureSearchProvider {
    /// Create a new provider for the configured service.
    ///
    /// # Returns
    ///
    /// * `Ok(AzureSearchProvider)` - A new provider instance
    /// * `Err(ProvisioningError)` - If the HTTP client cannot be built
    pub fn new(config: SearchServiceConfig) -> Result<Self, ProvisioningError> {
        let mut builder = Client::builder().timeout(config.request_timeout);
        // Local endpoints bypass any proxy configured in the environment.
        if matches!(
            config.endpoint.host_str(),
            Some("localhost") | Some("127.0.0.1") | Some("[::1]")
        ) {
            builder = builder.no_proxy();
        }
        let client = builder
            .build()
            .map_err(|e| ProvisioningError::transport(e.to_string()))?;

        info!(
            endpoint = %config.endpoint,
            api_version = %config.api_version,
            timeout_secs = config.request_timeout.as_secs(),
            "Created Azure AI Search provider"
        );

        Ok(Self { client, config })
    }

    /// POST `body` to the collection of `kind`.
    ///
    /// Any 2xx answer counts as created. Other statuses are turned into errors
    /// carrying the response body.
    async fn post_resource<T: Serialize + Sync>(
        &self,
        kind: ResourceKind,
        name: &str,
        body: &T,
    ) -> Result<ProvisionedResource, ProvisioningError> {
        let url = self.config.collection_url(kind)?;

        debug!(kind = %kind, name = %name, url = %url, "Submitting resource");

        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!(kind = %kind, name = %name, error = %e, "Request failed");
                ProvisioningError::from(e)
            })?;

        let response = Self::check_status(kind, name, response).await?;
        Ok(ProvisionedResource::new(
            kind,
            name,
            response.status().as_u16(),
        ))
    }

    /// Pass success responses through; read the body of anything else into an error.
    async fn check_status(
        kind: ResourceKind,
        name: &str,
        response: Response,
    ) -> Result<Response, ProvisioningError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|e| format!("<failed to read response body: {}>", e));

        error!(
            kind = %kind,
            name = %name,
            status = status.as_u16(),
            body = %body,
            "Search service rejected request"
        );

        Err(ProvisioningError::from_response(
            kind,
            name,
            status.as_u16(),
            body,
        ))
    }
}

#[async_trait]
impl SearchServiceProvider for AzureSearchProvider {
    async fn create_data_source(
        &self,
        spec: &DataSourceSpec,
    ) -> Result<ProvisionedResource, ProvisioningError> {
        self.post_resource(ResourceKind::DataSource, &spec.name, spec)
            .await
    }

    async fn create_index(&self, spec: &IndexSpec) -> Result<ProvisionedResource, ProvisioningError> {
        self.post_resource(ResourceKind::Index, &spec.name, spec).await
    }

    async fn create_indexer(
        &self,
        spec: &IndexerSpec,
    ) -> Result<ProvisionedResource, ProvisioningError> {
        self.post_resource(ResourceKind::Indexer, &spec.name, spec)
            .await
    }

    async fn get_indexer_status(&self, name: &str) -> Result<IndexerStatus, ProvisioningError> {
        let url = self.config.indexer_status_url(name)?;

        debug!(indexer = %name, url = %url, "Fetching indexer status");

        let response = self
            .client
            .get(url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .send()
            .await?;

        let response = Self::check_status(ResourceKind::Indexer, name, response).await?;
        let text = response.text().await?;
        serde_json::from_str::<IndexerStatus>(&text).map_err(|e| {
            ProvisioningError::parse(format!("invalid indexer status for '{}': {}", name, e))
        })
    }
}
