//! Search Provisioner Main Entry Point
//!
//! Registers the Cosmos DB data source, creates the search index and links
//! them with an indexer on an Azure AI Search service.

use clap::Parser;
use dotenv::dotenv;
use search_provisioner::{Cli, Dependencies, ProvisionerConfig, ProvisionerError, RunOutcome};
use std::env;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
///
/// Logs go to stderr so `--dry-run` output on stdout stays machine-readable.
fn init_tracing() -> Result<(), ProvisionerError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("search_provisioner=info,search_provisioner_repository=info")
    });

    let json_logs = env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .map_err(|e| ProvisionerError::config(format!("failed to init tracing: {}", e)))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .pretty()
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .map_err(|e| ProvisionerError::config(format!("failed to init tracing: {}", e)))?;
    }

    info!(
        service_name = "search-provisioner",
        service_version = env!("CARGO_PKG_VERSION"),
        json = json_logs,
        "Tracing initialized"
    );

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), ProvisionerError> {
    // Load environment variables from .env file before clap reads env fallbacks
    dotenv().ok();

    init_tracing()?;

    let config = match ProvisionerConfig::from_cli(Cli::parse()) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return Err(e);
        }
    };

    let deps = Dependencies::new(&config)?;

    match deps.run().await {
        Ok(RunOutcome::DryRun(rendered)) => {
            println!("{}", rendered);
            Ok(())
        }
        Ok(RunOutcome::Provisioned(report)) => {
            for resource in &report.resources {
                info!(
                    kind = %resource.kind,
                    name = %resource.name,
                    status = resource.status,
                    "Provisioned"
                );
            }
            info!("Search provisioning completed successfully");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Search provisioning failed");
            Err(e)
        }
    }
}
