//! # Search Provisioner Shared
//!
//! This crate defines the request payloads and status types exchanged with the
//! search service during provisioning: the data source, the index schema, the
//! indexer linking them, and the indexer execution status.

pub mod types;

pub use types::data_source::{
    ChangeDetectionPolicy, CosmosConnection, DataSourceContainer, DataSourceCredentials,
    DataSourceSpec,
};
pub use types::index::{
    FieldType, HnswParameters, IndexField, IndexSpec, VectorSearch, VectorSearchAlgorithm,
    VectorSearchProfile,
};
pub use types::indexer::{IndexerParameters, IndexerSchedule, IndexerSpec};
pub use types::indexer_status::{IndexerExecution, IndexerItemError, IndexerStatus, RunStatus};
