//! Command-line interface.
//!
//! Every required value can also come from the environment (or a `.env` file),
//! so keys do not have to appear in shell history.

use clap::Parser;

use crate::plan::SchemaProfile;

#[derive(Debug, Clone, Parser)]
#[command(name = "search-provisioner", version)]
#[command(
    about = "Provision an Azure AI Search data source, index and indexer over a Cosmos DB container"
)]
pub struct Cli {
    /// Search service name, the `{name}` in `{name}.search.windows.net`
    #[arg(long, env = "AZURE_SEARCH_SERVICE_NAME")]
    pub search_service_name: Option<String>,

    /// Admin API key of the search service
    #[arg(long, env = "AZURE_SEARCH_KEY", hide_env_values = true)]
    pub search_key: Option<String>,

    /// Name of the existing Cosmos DB NoSQL account
    #[arg(long, env = "AZURE_COSMOS_ACCOUNT")]
    pub cosmosdb_account_name: Option<String>,

    /// Key of the Cosmos DB account
    #[arg(long, env = "AZURE_COSMOS_KEY", hide_env_values = true)]
    pub cosmosdb_account_key: Option<String>,

    /// Full search endpoint URL, overriding the one derived from the service name
    #[arg(long, env = "AZURE_SEARCH_ENDPOINT")]
    pub search_endpoint: Option<String>,

    /// Cosmos DB database holding the documents
    #[arg(long, default_value = "maindb")]
    pub database: String,

    /// Cosmos DB container to index
    #[arg(long, default_value = "users")]
    pub container: String,

    /// Index schema to create
    #[arg(long, value_enum, default_value_t = SchemaProfile::Minimal)]
    pub schema: SchemaProfile,

    /// REST API version (default depends on --schema)
    #[arg(long)]
    pub api_version: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Run the indexer on a schedule, as an ISO-8601 duration (e.g. PT2H)
    #[arg(long)]
    pub schedule_interval: Option<String>,

    /// Wait for the indexer's first run to finish
    #[arg(long)]
    pub monitor: bool,

    /// Seconds between indexer status polls
    #[arg(long, default_value_t = 5)]
    pub monitor_interval_secs: u64,

    /// Seconds to wait for the indexer run before giving up
    #[arg(long, default_value_t = 300)]
    pub monitor_timeout_secs: u64,

    /// Print the requests instead of sending them
    #[arg(long)]
    pub dry_run: bool,
}
