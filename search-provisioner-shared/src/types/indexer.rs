//! Indexer payload linking a data source to an index.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::data_source::DataSourceSpec;
use super::index::IndexSpec;

/// Recurring run schedule for an indexer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexerSchedule {
    /// ISO-8601 duration between runs, e.g. `PT2H`.
    pub interval: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
}

impl IndexerSchedule {
    pub fn every(interval: impl Into<String>) -> Self {
        Self {
            interval: interval.into(),
            start_time: None,
        }
    }
}

/// Execution parameters of an indexer run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexerParameters {
    /// Documents read per batch. `null` uses the service default for the source type.
    pub batch_size: Option<u32>,
    pub max_failed_items: i32,
    pub max_failed_items_per_batch: i32,
    pub base64_encode_keys: bool,
    pub configuration: Map<String, Value>,
}

impl Default for IndexerParameters {
    /// Fail the run on the first failed item and keep document keys as-is.
    fn default() -> Self {
        Self {
            batch_size: None,
            max_failed_items: 0,
            max_failed_items_per_batch: 0,
            base64_encode_keys: false,
            configuration: Map::new(),
        }
    }
}

/// Indexer creation request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexerSpec {
    pub name: String,
    pub data_source_name: String,
    pub target_index_name: String,
    pub disabled: Option<bool>,
    pub schedule: Option<IndexerSchedule>,
    pub parameters: IndexerParameters,
    pub field_mappings: Vec<Value>,
    pub encryption_key: Option<Value>,
}

impl IndexerSpec {
    /// Build an indexer that copies documents from `data_source` into `index`.
    ///
    /// The referenced names are taken from the payloads themselves so the
    /// indexer always points at the resources provisioned before it.
    pub fn link(name: impl Into<String>, data_source: &DataSourceSpec, index: &IndexSpec) -> Self {
        Self {
            name: name.into(),
            data_source_name: data_source.name.clone(),
            target_index_name: index.name.clone(),
            disabled: None,
            schedule: None,
            parameters: IndexerParameters::default(),
            field_mappings: Vec::new(),
            encryption_key: None,
        }
    }

    pub fn with_schedule(mut self, schedule: IndexerSchedule) -> Self {
        self.schedule = Some(schedule);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::data_source::CosmosConnection;
    use crate::types::index::{FieldType, IndexField};
    use serde_json::json;

    fn sources() -> (DataSourceSpec, IndexSpec) {
        let conn = CosmosConnection::new("acct", "key", "maindb");
        (
            DataSourceSpec::cosmos_db("cosmosdb-ds", &conn, "users"),
            IndexSpec::new(
                "main-search-index",
                vec![IndexField::new("rid", FieldType::String).key()],
            ),
        )
    }

    #[test]
    fn test_link_references_prior_resources() {
        let (data_source, index) = sources();
        let indexer = IndexerSpec::link("main_indexer", &data_source, &index);

        assert_eq!(indexer.data_source_name, data_source.name);
        assert_eq!(indexer.target_index_name, index.name);
    }

    #[test]
    fn test_indexer_payload_shape() {
        let (data_source, index) = sources();
        let indexer = IndexerSpec::link("main_indexer", &data_source, &index);

        assert_eq!(
            serde_json::to_value(&indexer).unwrap(),
            json!({
                "name": "main_indexer",
                "dataSourceName": "cosmosdb-ds",
                "targetIndexName": "main-search-index",
                "disabled": null,
                "schedule": null,
                "parameters": {
                    "batchSize": null,
                    "maxFailedItems": 0,
                    "maxFailedItemsPerBatch": 0,
                    "base64EncodeKeys": false,
                    "configuration": {}
                },
                "fieldMappings": [],
                "encryptionKey": null
            })
        );
    }

    #[test]
    fn test_schedule_serialization() {
        let (data_source, index) = sources();
        let indexer = IndexerSpec::link("main_indexer", &data_source, &index)
            .with_schedule(IndexerSchedule::every("PT2H"));
        let value = serde_json::to_value(&indexer).unwrap();

        assert_eq!(value["schedule"], json!({ "interval": "PT2H" }));
    }
}
