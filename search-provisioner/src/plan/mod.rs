//! Provisioning plan.
//!
//! Builds the three request payloads submitted by the pipeline. The indexer
//! payload takes its data source and index names from the other two payloads,
//! so the three requests always agree on the resources they reference.

use clap::ValueEnum;
use search_provisioner_repository::{
    ProvisioningService, ResourceKind, SearchServiceConfig, DEFAULT_API_VERSION,
    VECTOR_API_VERSION,
};
use search_provisioner_shared::{
    CosmosConnection, DataSourceSpec, FieldType, IndexField, IndexSpec, IndexerSchedule,
    IndexerSpec, VectorSearch, VectorSearchAlgorithm, VectorSearchProfile,
};
use serde::Serialize;
use serde_json::Value;

use crate::errors::PipelineError;
use crate::pipeline::ProvisioningStep;
use crate::ProvisionerError;

/// Name of the Cosmos DB data source.
pub const DATA_SOURCE_NAME: &str = "cosmosdb-ds";

/// Name of the search index.
pub const INDEX_NAME: &str = "main-search-index";

/// Name of the indexer linking the two.
pub const INDEXER_NAME: &str = "main_indexer";

/// Document key field of the minimal schema. Cosmos DB exposes its resource
/// id as `rid` to indexers.
pub const KEY_FIELD: &str = "rid";

/// Document key field of the full schema. Services that push user documents
/// into the index key them by their Cosmos DB `id`.
pub const FULL_KEY_FIELD: &str = "id";

/// Output size of the embedding model used for user descriptions (text-embedding-ada-002).
pub const EMBEDDING_DIMENSIONS: u32 = 1536;

pub const VECTOR_ALGORITHM_NAME: &str = "description-hnsw";
pub const VECTOR_PROFILE_NAME: &str = "description-vector-profile";

/// Index schema variant to provision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SchemaProfile {
    /// Key and full-text description only.
    #[default]
    Minimal,
    /// Keyed by user `id`, adds user name, description embeddings and last
    /// known position.
    Full,
}

impl SchemaProfile {
    /// API version used when none is given explicitly.
    pub fn default_api_version(&self) -> &'static str {
        match self {
            SchemaProfile::Minimal => DEFAULT_API_VERSION,
            SchemaProfile::Full => VECTOR_API_VERSION,
        }
    }

    pub fn has_vector_fields(&self) -> bool {
        matches!(self, SchemaProfile::Full)
    }

    /// Name of the document key field.
    pub fn key_field(&self) -> &'static str {
        match self {
            SchemaProfile::Minimal => KEY_FIELD,
            SchemaProfile::Full => FULL_KEY_FIELD,
        }
    }
}

/// Build the index schema for a profile.
pub fn index_schema(profile: SchemaProfile) -> IndexSpec {
    let description = IndexField::new("description", FieldType::String)
        .searchable(true)
        .filterable(false)
        .sortable(false)
        .facetable(false);

    if profile == SchemaProfile::Minimal {
        return IndexSpec::new(
            INDEX_NAME,
            vec![
                IndexField::new(KEY_FIELD, FieldType::String)
                    .key()
                    .searchable(false),
                description,
            ],
        );
    }

    // Field names match the documents uploaded by the embedding and position
    // services, which filter on `id` and `location`.
    let fields = vec![
        IndexField::new(FULL_KEY_FIELD, FieldType::String)
            .key()
            .searchable(false)
            .filterable(true)
            .retrievable(true),
        IndexField::new("name", FieldType::String)
            .searchable(true)
            .filterable(false)
            .sortable(false)
            .facetable(false),
        description,
        IndexField::new("description_embeddings", FieldType::SingleCollection)
            .vector(EMBEDDING_DIMENSIONS, VECTOR_PROFILE_NAME),
        IndexField::new("location", FieldType::GeographyPoint)
            .filterable(true)
            .sortable(true),
    ];

    IndexSpec::new(INDEX_NAME, fields).with_vector_search(VectorSearch {
        algorithms: vec![VectorSearchAlgorithm::hnsw_cosine(VECTOR_ALGORITHM_NAME)],
        profiles: vec![VectorSearchProfile {
            name: VECTOR_PROFILE_NAME.to_string(),
            algorithm: VECTOR_ALGORITHM_NAME.to_string(),
        }],
    })
}

/// The three payloads submitted by one provisioning run.
#[derive(Debug, Clone, PartialEq)]
pub struct ProvisioningPlan {
    pub data_source: DataSourceSpec,
    pub index: IndexSpec,
    pub indexer: IndexerSpec,
}

impl ProvisioningPlan {
    pub fn new(
        cosmos: &CosmosConnection,
        container: &str,
        profile: SchemaProfile,
        schedule: Option<IndexerSchedule>,
    ) -> Self {
        let data_source = DataSourceSpec::cosmos_db(DATA_SOURCE_NAME, cosmos, container);
        let index = index_schema(profile);
        let mut indexer = IndexerSpec::link(INDEXER_NAME, &data_source, &index);
        if let Some(schedule) = schedule {
            indexer = indexer.with_schedule(schedule);
        }

        Self {
            data_source,
            index,
            indexer,
        }
    }

    /// Run the local checks each payload goes through before it is submitted.
    ///
    /// The error names the first step whose payload was rejected.
    pub fn validate(&self) -> Result<(), PipelineError> {
        for step in ProvisioningStep::ORDER {
            let checked = match step {
                ProvisioningStep::RegisterDataSource => {
                    ProvisioningService::validate_data_source(&self.data_source)
                }
                ProvisioningStep::CreateIndex => ProvisioningService::validate_index(&self.index),
                ProvisioningStep::CreateIndexer => {
                    ProvisioningService::validate_indexer(&self.indexer)
                }
            };
            checked.map_err(|e| PipelineError::step(step, e))?;
        }
        Ok(())
    }

    /// Validate the plan and render the requests it would send, for `--dry-run`.
    ///
    /// The Cosmos DB account key is masked in the output.
    pub fn render(&self, search: &SearchServiceConfig) -> Result<String, ProvisionerError> {
        self.validate()?;

        let mut data_source = self.data_source.clone();
        data_source.credentials.connection_string =
            redact_account_key(&data_source.credentials.connection_string);

        let requests = vec![
            PlannedRequest::post(search, ResourceKind::DataSource, &data_source)?,
            PlannedRequest::post(search, ResourceKind::Index, &self.index)?,
            PlannedRequest::post(search, ResourceKind::Indexer, &self.indexer)?,
        ];

        serde_json::to_string_pretty(&requests)
            .map_err(|e| ProvisionerError::output(e.to_string()))
    }
}

#[derive(Debug, Serialize)]
struct PlannedRequest {
    method: &'static str,
    url: String,
    body: Value,
}

impl PlannedRequest {
    fn post<T: Serialize>(
        search: &SearchServiceConfig,
        kind: ResourceKind,
        body: &T,
    ) -> Result<Self, ProvisionerError> {
        Ok(Self {
            method: "POST",
            url: search.collection_url(kind)?.to_string(),
            body: serde_json::to_value(body).map_err(|e| ProvisionerError::output(e.to_string()))?,
        })
    }
}

/// Mask the `AccountKey` segment of a connection string.
fn redact_account_key(connection_string: &str) -> String {
    connection_string
        .split(';')
        .map(|segment| {
            if segment.starts_with("AccountKey=") {
                "AccountKey=<redacted>"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join(";")
}
