//! Data source registration payload.
//!
//! A data source tells the search service where to pull documents from. Here it
//! is always a Cosmos DB (NoSQL) container tracked with a high-water-mark policy.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Data source type recognised by the search service for Cosmos DB NoSQL accounts.
pub const COSMOS_DB_SOURCE_TYPE: &str = "cosmosdb";

/// Cosmos DB system column holding the last-modified epoch timestamp.
pub const COSMOS_TIMESTAMP_COLUMN: &str = "_ts";

/// Cosmos DB account coordinates used to build the data source connection string.
#[derive(Clone, PartialEq, Eq)]
pub struct CosmosConnection {
    pub account: String,
    pub key: String,
    pub database: String,
}

impl CosmosConnection {
    pub fn new(
        account: impl Into<String>,
        key: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            account: account.into(),
            key: key.into(),
            database: database.into(),
        }
    }

    /// Account endpoint, e.g. `https://myaccount.documents.azure.com`.
    pub fn endpoint(&self) -> String {
        format!("https://{}.documents.azure.com", self.account)
    }

    /// Connection string in the form the search service expects for `cosmosdb` sources.
    ///
    /// # Example
    ///
    /// ```
    /// use search_provisioner_shared::CosmosConnection;
    ///
    /// let conn = CosmosConnection::new("acct", "secret", "maindb");
    /// assert_eq!(
    ///     conn.connection_string(),
    ///     "AccountEndpoint=https://acct.documents.azure.com;AccountKey=secret;Database=maindb"
    /// );
    /// ```
    pub fn connection_string(&self) -> String {
        format!(
            "AccountEndpoint={};AccountKey={};Database={}",
            self.endpoint(),
            self.key,
            self.database
        )
    }
}

impl fmt::Debug for CosmosConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CosmosConnection")
            .field("account", &self.account)
            .field("key", &"<redacted>")
            .field("database", &self.database)
            .finish()
    }
}

/// Credentials block of a data source.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceCredentials {
    pub connection_string: String,
}

impl fmt::Debug for DataSourceCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataSourceCredentials")
            .field("connection_string", &"<redacted>")
            .finish()
    }
}

/// Container (collection) the data source reads from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSourceContainer {
    pub name: String,
    /// Optional projection query. `null` reads whole documents.
    pub query: Option<String>,
}

/// Incremental change-detection strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "@odata.type")]
pub enum ChangeDetectionPolicy {
    /// Detects changed rows through a monotonically increasing column.
    #[serde(rename = "#Microsoft.Azure.Search.HighWaterMarkChangeDetectionPolicy")]
    HighWaterMark {
        #[serde(rename = "highWaterMarkColumnName")]
        column: String,
    },
}

/// Data source registration request body.
///
/// Optional sections the provisioner does not configure are serialized as
/// explicit `null` values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub source_type: String,
    pub credentials: DataSourceCredentials,
    pub container: DataSourceContainer,
    pub data_change_detection_policy: Option<ChangeDetectionPolicy>,
    pub data_deletion_detection_policy: Option<Value>,
    pub encryption_key: Option<Value>,
    pub identity: Option<Value>,
}

impl DataSourceSpec {
    /// Build a change-tracked Cosmos DB data source reading `container`.
    ///
    /// Changes are detected through the `_ts` high-water mark. The container
    /// query is left unset so documents are read whole.
    pub fn cosmos_db(
        name: impl Into<String>,
        connection: &CosmosConnection,
        container: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            source_type: COSMOS_DB_SOURCE_TYPE.to_string(),
            credentials: DataSourceCredentials {
                connection_string: connection.connection_string(),
            },
            container: DataSourceContainer {
                name: container.into(),
                query: None,
            },
            data_change_detection_policy: Some(ChangeDetectionPolicy::HighWaterMark {
                column: COSMOS_TIMESTAMP_COLUMN.to_string(),
            }),
            data_deletion_detection_policy: None,
            encryption_key: None,
            identity: None,
        }
    }
}
