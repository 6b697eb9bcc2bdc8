//! Validated provisioner configuration.

use std::time::Duration;

use search_provisioner_repository::{SearchServiceConfig, VECTOR_API_VERSION};
use search_provisioner_shared::{CosmosConnection, IndexerSchedule};
use tracing::warn;

use crate::config::Cli;
use crate::monitor::MonitorConfig;
use crate::plan::{ProvisioningPlan, SchemaProfile};
use crate::ProvisionerError;

/// Oldest API version that accepts vector fields, compared on its date prefix.
const MIN_VECTOR_API_DATE: &str = "2023-07-01";

/// Configuration for one provisioning run.
///
/// Built from the CLI with [`ProvisionerConfig::from_cli`], which fails before
/// any network call when a required value is missing.
#[derive(Debug, Clone)]
pub struct ProvisionerConfig {
    pub search: SearchServiceConfig,
    pub cosmos: CosmosConnection,
    pub container: String,
    pub schema: SchemaProfile,
    pub schedule: Option<IndexerSchedule>,
    /// Set when the indexer run should be awaited.
    pub monitor: Option<MonitorConfig>,
    pub dry_run: bool,
}

impl ProvisionerConfig {
    /// Validate the parsed command line.
    ///
    /// # Errors
    ///
    /// Returns `ProvisionerError::ConfigError` naming the flag when one of the
    /// four required values is missing or blank, or when an option is unusable.
    pub fn from_cli(cli: Cli) -> Result<Self, ProvisionerError> {
        let service_name = required("--search-service-name", cli.search_service_name)?;
        let search_key = required("--search-key", cli.search_key)?;
        let account_name = required("--cosmosdb-account-name", cli.cosmosdb_account_name)?;
        let account_key = required("--cosmosdb-account-key", cli.cosmosdb_account_key)?;

        let database = non_blank("--database", cli.database)?;
        let container = non_blank("--container", cli.container)?;

        if cli.timeout_secs == 0 {
            return Err(ProvisionerError::config("--timeout-secs must be greater than 0"));
        }

        let api_version = match cli.api_version {
            Some(version) => {
                let version = non_blank("--api-version", version)?;
                check_api_version(cli.schema, &version)?;
                version
            }
            None => cli.schema.default_api_version().to_string(),
        };

        let search = match cli.search_endpoint {
            Some(endpoint) => SearchServiceConfig::with_endpoint(&endpoint, search_key)?,
            None => SearchServiceConfig::for_service(&service_name, search_key)?,
        }
        .api_version(api_version)
        .request_timeout(Duration::from_secs(cli.timeout_secs));

        let schedule = cli
            .schedule_interval
            .map(|interval| {
                let interval = non_blank("--schedule-interval", interval)?;
                if !interval.starts_with('P') {
                    return Err(ProvisionerError::config(format!(
                        "--schedule-interval '{}' is not an ISO-8601 duration (e.g. PT2H)",
                        interval
                    )));
                }
                Ok(IndexerSchedule::every(interval))
            })
            .transpose()?;

        let monitor = if cli.monitor {
            if cli.monitor_interval_secs == 0 {
                return Err(ProvisionerError::config(
                    "--monitor-interval-secs must be greater than 0",
                ));
            }
            Some(MonitorConfig {
                poll_interval: Duration::from_secs(cli.monitor_interval_secs),
                timeout: Duration::from_secs(cli.monitor_timeout_secs),
            })
        } else {
            None
        };

        if monitor.is_some() && cli.dry_run {
            warn!("--monitor has no effect with --dry-run");
        }

        Ok(Self {
            search,
            cosmos: CosmosConnection::new(account_name, account_key, database),
            container,
            schema: cli.schema,
            schedule,
            monitor,
            dry_run: cli.dry_run,
        })
    }

    /// Build the payloads for this configuration.
    pub fn plan(&self) -> ProvisioningPlan {
        ProvisioningPlan::new(
            &self.cosmos,
            &self.container,
            self.schema,
            self.schedule.clone(),
        )
    }
}

fn required(flag: &str, value: Option<String>) -> Result<String, ProvisionerError> {
    match value {
        Some(v) => non_blank(flag, v),
        None => Err(ProvisionerError::config(format!("missing required {}", flag))),
    }
}

fn non_blank(flag: &str, value: String) -> Result<String, ProvisionerError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ProvisionerError::config(format!("{} must not be empty", flag)));
    }
    Ok(trimmed.to_string())
}

/// Reject API versions that predate vector support when the full schema is requested.
fn check_api_version(schema: SchemaProfile, version: &str) -> Result<(), ProvisionerError> {
    if !schema.has_vector_fields() {
        return Ok(());
    }
    match version.get(..MIN_VECTOR_API_DATE.len()) {
        Some(date) if date < MIN_VECTOR_API_DATE => Err(ProvisionerError::config(format!(
            "--schema full needs API version {} or later, got {}",
            VECTOR_API_VERSION, version
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use search_provisioner_repository::ResourceKind;

    fn base_cli() -> Cli {
        Cli::try_parse_from([
            "search-provisioner",
            "--search-service-name",
            "localink",
            "--search-key",
            "admin",
            "--cosmosdb-account-name",
            "acct",
            "--cosmosdb-account-key",
            "key",
        ])
        .unwrap()
    }

    #[test]
    fn test_valid_config() {
        let config = ProvisionerConfig::from_cli(base_cli()).unwrap();

        assert_eq!(config.search.api_version, "2020-06-30");
        assert_eq!(config.search.api_key, "admin");
        assert_eq!(config.search.request_timeout, Duration::from_secs(30));
        assert_eq!(
            config.cosmos.connection_string(),
            "AccountEndpoint=https://acct.documents.azure.com;AccountKey=key;Database=maindb"
        );
        assert_eq!(
            config
                .search
                .collection_url(ResourceKind::Indexer)
                .unwrap()
                .as_str(),
            "https://localink.search.windows.net/indexers?api-version=2020-06-30"
        );
        assert!(config.monitor.is_none());
        assert!(!config.dry_run);
    }

    #[test]
    fn test_each_missing_required_value_is_a_config_error() {
        let cases: [(fn(&mut Cli), &str); 4] = [
            (|c| c.search_service_name = None, "--search-service-name"),
            (|c| c.search_key = None, "--search-key"),
            (|c| c.cosmosdb_account_name = None, "--cosmosdb-account-name"),
            (|c| c.cosmosdb_account_key = None, "--cosmosdb-account-key"),
        ];

        for (clear, flag) in cases {
            let mut cli = base_cli();
            clear(&mut cli);

            let err = ProvisionerConfig::from_cli(cli).unwrap_err();
            assert!(err.is_config_error());
            assert!(err.to_string().contains(flag), "{}", err);
        }
    }

    #[test]
    fn test_blank_value_is_a_config_error() {
        let mut cli = base_cli();
        cli.cosmosdb_account_key = Some("   ".to_string());

        let err = ProvisionerConfig::from_cli(cli).unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_invalid_service_name_is_a_config_error() {
        let mut cli = base_cli();
        cli.search_service_name = Some("not/a/host".to_string());

        assert!(ProvisionerConfig::from_cli(cli).unwrap_err().is_config_error());
    }

    #[test]
    fn test_full_schema_defaults_to_vector_api() {
        let mut cli = base_cli();
        cli.schema = SchemaProfile::Full;

        let config = ProvisionerConfig::from_cli(cli).unwrap();
        assert_eq!(config.search.api_version, VECTOR_API_VERSION);
    }

    #[test]
    fn test_full_schema_rejects_old_api_version() {
        let mut cli = base_cli();
        cli.schema = SchemaProfile::Full;
        cli.api_version = Some("2020-06-30".to_string());
        assert!(ProvisionerConfig::from_cli(cli).unwrap_err().is_config_error());

        let mut cli = base_cli();
        cli.schema = SchemaProfile::Full;
        cli.api_version = Some("2024-07-01".to_string());
        assert!(ProvisionerConfig::from_cli(cli).is_ok());
    }

    #[test]
    fn test_schedule_and_monitor() {
        let mut cli = base_cli();
        cli.schedule_interval = Some("PT2H".to_string());
        cli.monitor = true;
        cli.monitor_interval_secs = 2;

        let config = ProvisionerConfig::from_cli(cli).unwrap();
        assert_eq!(config.schedule, Some(IndexerSchedule::every("PT2H")));
        assert_eq!(
            config.monitor.unwrap().poll_interval,
            Duration::from_secs(2)
        );
    }

    #[test]
    fn test_bad_schedule_rejected() {
        let mut cli = base_cli();
        cli.schedule_interval = Some("2 hours".to_string());
        assert!(ProvisionerConfig::from_cli(cli).unwrap_err().is_config_error());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut cli = base_cli();
        cli.timeout_secs = 0;
        assert!(ProvisionerConfig::from_cli(cli).unwrap_err().is_config_error());
    }

    #[test]
    fn test_custom_endpoint() {
        let mut cli = base_cli();
        cli.search_endpoint = Some("https://search.example.internal/".to_string());

        let config = ProvisionerConfig::from_cli(cli).unwrap();
        assert_eq!(config.search.endpoint.as_str(), "https://search.example.internal/");
    }
}
