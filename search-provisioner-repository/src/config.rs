//! Connection settings for the search service REST API.

use std::fmt;
use std::time::Duration;

use url::Url;

use crate::errors::ProvisioningError;
use crate::types::ResourceKind;

/// Stable REST API version used for plain text schemas.
pub const DEFAULT_API_VERSION: &str = "2020-06-30";

/// First API version accepted for indexes with vector fields.
pub const VECTOR_API_VERSION: &str = "2023-10-01-Preview";

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// DNS suffix of public-cloud search services.
const SEARCH_SERVICE_DOMAIN: &str = "search.windows.net";

/// Connection settings for one search service.
///
/// The admin API key is held here once and attached to every request by the
/// provider, instead of being threaded through each call.
#[derive(Clone)]
pub struct SearchServiceConfig {
    /// Base URL of the service, e.g. `https://my-service.search.windows.net/`.
    pub endpoint: Url,
    pub api_key: String,
    pub api_version: String,
    pub request_timeout: Duration,
}

impl SearchServiceConfig {
    /// Configuration for the public-cloud service `{service_name}.search.windows.net`.
    ///
    /// # Errors
    ///
    /// Returns `ProvisioningError::Configuration` if the name does not form a valid host.
    pub fn for_service(
        service_name: &str,
        api_key: impl Into<String>,
    ) -> Result<Self, ProvisioningError> {
        let host = format!("{}.{}", service_name, SEARCH_SERVICE_DOMAIN);
        let endpoint = Url::parse(&format!("https://{}/", host)).map_err(|e| {
            ProvisioningError::configuration(format!(
                "invalid search service name '{}': {}",
                service_name, e
            ))
        })?;

        if endpoint.host_str() != Some(host.to_ascii_lowercase().as_str()) {
            return Err(ProvisioningError::configuration(format!(
                "invalid search service name '{}'",
                service_name
            )));
        }

        Ok(Self::new(endpoint, api_key))
    }

    /// Configuration for an explicit endpoint (private clouds, local test servers).
    pub fn with_endpoint(
        endpoint: &str,
        api_key: impl Into<String>,
    ) -> Result<Self, ProvisioningError> {
        let endpoint = Url::parse(endpoint).map_err(|e| {
            ProvisioningError::configuration(format!("invalid endpoint '{}': {}", endpoint, e))
        })?;
        if endpoint.cannot_be_a_base() {
            return Err(ProvisioningError::configuration(format!(
                "endpoint '{}' cannot be used as a base URL",
                endpoint
            )));
        }
        Ok(Self::new(endpoint, api_key))
    }

    fn new(endpoint: Url, api_key: impl Into<String>) -> Self {
        Self {
            endpoint,
            api_key: api_key.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// URL of the collection holding resources of `kind`, e.g. `/indexers?api-version=...`.
    pub fn collection_url(&self, kind: ResourceKind) -> Result<Url, ProvisioningError> {
        self.url_for(&[kind.collection()])
    }

    /// URL of the status document of indexer `name`.
    pub fn indexer_status_url(&self, name: &str) -> Result<Url, ProvisioningError> {
        self.url_for(&[ResourceKind::Indexer.collection(), name, "status"])
    }

    fn url_for(&self, segments: &[&str]) -> Result<Url, ProvisioningError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ProvisioningError::configuration(format!(
                    "endpoint '{}' cannot be used as a base URL",
                    self.endpoint
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        url.query_pairs_mut()
            .clear()
            .append_pair("api-version", &self.api_version);
        Ok(url)
    }
}

impl fmt::Debug for SearchServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchServiceConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &"<redacted>")
            .field("api_version", &self.api_version)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}
