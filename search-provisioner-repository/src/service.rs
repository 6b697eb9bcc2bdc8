//! Provisioning service implementation.
//!
//! This module provides the service application code uses to create resources
//! on the search service. It validates each payload locally before handing it
//! to a `SearchServiceProvider`, so malformed schemas fail before any request.

use std::collections::HashSet;

use search_provisioner_shared::{
    DataSourceSpec, FieldType, IndexField, IndexSpec, IndexerSpec, IndexerStatus,
};
use tracing::info;

use crate::errors::ProvisioningError;
use crate::interfaces::SearchServiceProvider;
use crate::types::{ProvisionedResource, ResourceKind};
use crate::utils::validate_resource_name;

/// The main service for provisioning search resources.
///
/// Provides payload validation and delegates to a `SearchServiceProvider` for
/// the actual remote calls.
///
/// # Example
///
/// ```no_run
/// use search_provisioner_repository::{AzureSearchProvider, ProvisioningService, SearchServiceConfig};
/// use search_provisioner_shared::{FieldType, IndexField, IndexSpec};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = SearchServiceConfig::for_service("my-service", "admin-key")?;
/// let service = ProvisioningService::new(Box::new(AzureSearchProvider::new(config)?));
///
/// let index = IndexSpec::new(
///     "main-search-index",
///     vec![IndexField::new("rid", FieldType::String).key()],
/// );
/// service.create_index(&index).await?;
/// # Ok(())
/// # }
/// ```
pub struct ProvisioningService {
    provider: Box<dyn SearchServiceProvider>,
}

impl ProvisioningService {
    pub fn new(provider: Box<dyn SearchServiceProvider>) -> Self {
        Self { provider }
    }

    /// Validate and register a data source.
    pub async fn register_data_source(
        &self,
        spec: &DataSourceSpec,
    ) -> Result<ProvisionedResource, ProvisioningError> {
        Self::validate_data_source(spec)?;
        let created = self.provider.create_data_source(spec).await?;
        info!(name = %created.name, status = created.status, "Data source registered");
        Ok(created)
    }

    /// Validate and create an index.
    pub async fn create_index(
        &self,
        spec: &IndexSpec,
    ) -> Result<ProvisionedResource, ProvisioningError> {
        Self::validate_index(spec)?;
        let created = self.provider.create_index(spec).await?;
        info!(
            name = %created.name,
            field_count = spec.fields.len(),
            status = created.status,
            "Index created"
        );
        Ok(created)
    }

    /// Validate and create an indexer.
    pub async fn create_indexer(
        &self,
        spec: &IndexerSpec,
    ) -> Result<ProvisionedResource, ProvisioningError> {
        Self::validate_indexer(spec)?;
        let created = self.provider.create_indexer(spec).await?;
        info!(
            name = %created.name,
            data_source = %spec.data_source_name,
            target_index = %spec.target_index_name,
            status = created.status,
            "Indexer created"
        );
        Ok(created)
    }

    pub async fn indexer_status(&self, name: &str) -> Result<IndexerStatus, ProvisioningError> {
        validate_resource_name(ResourceKind::Indexer, name)?;
        self.provider.get_indexer_status(name).await
    }

    /// Check a data source payload.
    pub fn validate_data_source(spec: &DataSourceSpec) -> Result<(), ProvisioningError> {
        validate_resource_name(ResourceKind::DataSource, &spec.name)?;

        if spec.source_type.trim().is_empty() {
            return Err(ProvisioningError::validation("data source type is required"));
        }
        if spec.credentials.connection_string.trim().is_empty() {
            return Err(ProvisioningError::validation(
                "data source connection string is required",
            ));
        }
        if spec.container.name.trim().is_empty() {
            return Err(ProvisioningError::validation(
                "data source container name is required",
            ));
        }
        Ok(())
    }

    /// Check an index schema.
    ///
    /// Exactly one field must be the key, and it must be an `Edm.String`. Field
    /// names must be unique. Every vector field needs dimensions and a profile
    /// that resolves to a defined algorithm.
    pub fn validate_index(spec: &IndexSpec) -> Result<(), ProvisioningError> {
        validate_resource_name(ResourceKind::Index, &spec.name)?;

        if spec.fields.is_empty() {
            return Err(ProvisioningError::validation(format!(
                "index '{}' has no fields",
                spec.name
            )));
        }

        let keys = spec.key_fields();
        match keys.as_slice() {
            [key] if key.field_type == FieldType::String => {}
            [key] => {
                return Err(ProvisioningError::validation(format!(
                    "key field '{}' must be of type Edm.String",
                    key.name
                )))
            }
            _ => {
                return Err(ProvisioningError::validation(format!(
                    "index '{}' must have exactly one key field, found {}",
                    spec.name,
                    keys.len()
                )))
            }
        }

        let mut seen = HashSet::new();
        for field in &spec.fields {
            if field.name.trim().is_empty() {
                return Err(ProvisioningError::validation("field name is required"));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(ProvisioningError::validation(format!(
                    "duplicate field '{}'",
                    field.name
                )));
            }
            Self::validate_vector_field(spec, field)?;
        }

        Ok(())
    }

    fn validate_vector_field(
        spec: &IndexSpec,
        field: &IndexField,
    ) -> Result<(), ProvisioningError> {
        if !field.field_type.is_vector() {
            if field.dimensions.is_some() || field.vector_search_profile.is_some() {
                return Err(ProvisioningError::validation(format!(
                    "field '{}' is not a vector field but declares vector settings",
                    field.name
                )));
            }
            return Ok(());
        }

        let (Some(dimensions), Some(profile)) = (field.dimensions, &field.vector_search_profile)
        else {
            return Err(ProvisioningError::validation(format!(
                "vector field '{}' needs dimensions and a vector search profile",
                field.name
            )));
        };

        if dimensions == 0 {
            return Err(ProvisioningError::validation(format!(
                "vector field '{}' must have at least one dimension",
                field.name
            )));
        }

        let vector_search = spec.vector_search.as_ref().ok_or_else(|| {
            ProvisioningError::validation(format!(
                "vector field '{}' requires a vectorSearch section",
                field.name
            ))
        })?;

        let resolved = vector_search
            .profiles
            .iter()
            .find(|p| &p.name == profile)
            .is_some_and(|p| vector_search.has_algorithm(&p.algorithm));
        if !resolved {
            return Err(ProvisioningError::validation(format!(
                "vector field '{}' references undefined profile '{}'",
                field.name, profile
            )));
        }

        Ok(())
    }

    /// Check an indexer payload and the names it references.
    pub fn validate_indexer(spec: &IndexerSpec) -> Result<(), ProvisioningError> {
        validate_resource_name(ResourceKind::Indexer, &spec.name)?;
        validate_resource_name(ResourceKind::DataSource, &spec.data_source_name)?;
        validate_resource_name(ResourceKind::Index, &spec.target_index_name)?;
        Ok(())
    }
}
