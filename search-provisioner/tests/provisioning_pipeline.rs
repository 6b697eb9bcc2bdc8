//! Integration tests for the provisioning pipeline.
//!
//! These tests use the real Provisioner, ProvisioningService and plan but a
//! recording mock SearchServiceProvider, so no request leaves the process.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use search_provisioner::config::{Cli, Dependencies, ProvisionerConfig, RunOutcome};
use search_provisioner::errors::PipelineError;
use search_provisioner::monitor::{IndexerMonitor, MonitorConfig};
use search_provisioner::pipeline::{Provisioner, ProvisioningStep};
use search_provisioner::plan::{ProvisioningPlan, SchemaProfile};
use search_provisioner_repository::{
    ProvisionedResource, ProvisioningError, ProvisioningService, ResourceKind,
    SearchServiceProvider,
};
use search_provisioner_shared::{
    CosmosConnection, DataSourceSpec, IndexSpec, IndexerExecution, IndexerSpec, IndexerStatus,
    RunStatus,
};
use serde_json::Value;

/// A request captured by the mock provider.
#[derive(Debug, Clone)]
struct RecordedRequest {
    kind: ResourceKind,
    body: Value,
}

// Mock Search Provider for testing
#[derive(Clone, Default)]
struct MockSearchProvider {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    status_polls: Arc<Mutex<usize>>,
    /// Kind of resource whose creation is rejected, with the status to return.
    reject: Option<(ResourceKind, u16)>,
    /// Statuses returned by successive polls; the last one repeats.
    statuses: Arc<Mutex<VecDeque<IndexerStatus>>>,
}

impl MockSearchProvider {
    fn new() -> Self {
        Self::default()
    }

    fn rejecting(kind: ResourceKind, status: u16) -> Self {
        Self {
            reject: Some((kind, status)),
            ..Self::default()
        }
    }

    fn with_statuses(statuses: Vec<IndexerStatus>) -> Self {
        Self {
            statuses: Arc::new(Mutex::new(statuses.into())),
            ..Self::default()
        }
    }

    fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn kinds(&self) -> Vec<ResourceKind> {
        self.requests().iter().map(|r| r.kind).collect()
    }

    fn poll_count(&self) -> usize {
        *self.status_polls.lock().unwrap()
    }

    fn record<T: serde::Serialize>(
        &self,
        kind: ResourceKind,
        name: &str,
        body: &T,
    ) -> Result<ProvisionedResource, ProvisioningError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            kind,
            body: serde_json::to_value(body).unwrap(),
        });

        match self.reject {
            Some((rejected, status)) if rejected == kind => Err(ProvisioningError::from_response(
                kind,
                name,
                status,
                "{\"error\":{\"message\":\"mock rejection\"}}",
            )),
            _ => Ok(ProvisionedResource::new(kind, name, 201)),
        }
    }
}

#[async_trait::async_trait]
impl SearchServiceProvider for MockSearchProvider {
    async fn create_data_source(
        &self,
        spec: &DataSourceSpec,
    ) -> Result<ProvisionedResource, ProvisioningError> {
        self.record(ResourceKind::DataSource, &spec.name, spec)
    }

    async fn create_index(&self, spec: &IndexSpec) -> Result<ProvisionedResource, ProvisioningError> {
        self.record(ResourceKind::Index, &spec.name, spec)
    }

    async fn create_indexer(
        &self,
        spec: &IndexerSpec,
    ) -> Result<ProvisionedResource, ProvisioningError> {
        self.record(ResourceKind::Indexer, &spec.name, spec)
    }

    async fn get_indexer_status(&self, name: &str) -> Result<IndexerStatus, ProvisioningError> {
        *self.status_polls.lock().unwrap() += 1;

        let mut statuses = self.statuses.lock().unwrap();
        let status = if statuses.len() > 1 {
            statuses.pop_front()
        } else {
            statuses.front().cloned()
        };
        status.ok_or_else(|| {
            ProvisioningError::from_response(ResourceKind::Indexer, name, 404, "not found")
        })
    }
}

fn plan() -> ProvisioningPlan {
    ProvisioningPlan::new(
        &CosmosConnection::new("localink", "cosmos-key", "maindb"),
        "users",
        SchemaProfile::Minimal,
        None,
    )
}

fn provisioner(provider: &MockSearchProvider) -> Provisioner {
    Provisioner::new(ProvisioningService::new(Box::new(provider.clone())))
}

fn run_status(status: RunStatus) -> IndexerStatus {
    IndexerStatus {
        name: Some("main_indexer".to_string()),
        status: "running".to_string(),
        last_result: Some(IndexerExecution {
            status,
            error_message: None,
            start_time: None,
            end_time: None,
            items_processed: 12,
            items_failed: 0,
            errors: Vec::new(),
        }),
    }
}

fn monitor() -> IndexerMonitor {
    IndexerMonitor::new(MonitorConfig {
        poll_interval: Duration::from_secs(5),
        timeout: Duration::from_secs(60),
    })
}

#[tokio::test]
async fn test_three_requests_in_order() {
    let provider = MockSearchProvider::new();

    let report = provisioner(&provider).run(&plan()).await.unwrap();

    assert_eq!(
        provider.kinds(),
        vec![
            ResourceKind::DataSource,
            ResourceKind::Index,
            ResourceKind::Indexer
        ]
    );
    assert_eq!(report.resources.len(), 3);
    assert!(report.indexer_status.is_none());
    assert_eq!(provider.poll_count(), 0);
}

#[tokio::test]
async fn test_payloads_reference_each_other() {
    let provider = MockSearchProvider::new();

    provisioner(&provider).run(&plan()).await.unwrap();
    let requests = provider.requests();
    let (data_source, index, indexer) = (&requests[0].body, &requests[1].body, &requests[2].body);

    assert_eq!(
        data_source["credentials"]["connectionString"],
        "AccountEndpoint=https://localink.documents.azure.com;AccountKey=cosmos-key;Database=maindb"
    );
    assert_eq!(indexer["dataSourceName"], data_source["name"]);
    assert_eq!(indexer["targetIndexName"], index["name"]);

    let key_fields = index["fields"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|f| f["key"] == Value::Bool(true))
        .count();
    assert_eq!(key_fields, 1);
}

#[tokio::test]
async fn test_failed_step_stops_pipeline() {
    let provider = MockSearchProvider::rejecting(ResourceKind::Index, 400);

    let err = provisioner(&provider).run(&plan()).await.unwrap_err();

    assert_eq!(err.failed_step(), Some(ProvisioningStep::CreateIndex));
    assert_eq!(err.provisioning_error().status(), Some(400));
    assert!(err.to_string().contains("mock rejection"));
    // The indexer is never submitted once the index failed
    assert_eq!(
        provider.kinds(),
        vec![ResourceKind::DataSource, ResourceKind::Index]
    );
}

#[tokio::test]
async fn test_existing_data_source_is_a_conflict() {
    let provider = MockSearchProvider::rejecting(ResourceKind::DataSource, 409);

    let err = provisioner(&provider).run(&plan()).await.unwrap_err();

    assert!(matches!(
        err,
        PipelineError::StepFailed {
            step: ProvisioningStep::RegisterDataSource,
            source: ProvisioningError::Conflict { .. },
        }
    ));
    assert_eq!(provider.kinds(), vec![ResourceKind::DataSource]);
}

#[tokio::test(start_paused = true)]
async fn test_monitor_waits_for_success() {
    let provider = MockSearchProvider::with_statuses(vec![
        IndexerStatus {
            name: None,
            status: "running".to_string(),
            last_result: None,
        },
        run_status(RunStatus::InProgress),
        run_status(RunStatus::Success),
    ]);

    let report = provisioner(&provider)
        .with_monitor(monitor())
        .run(&plan())
        .await
        .unwrap();

    assert_eq!(provider.poll_count(), 3);
    assert_eq!(
        report.indexer_status.unwrap().last_run_status(),
        Some(RunStatus::Success)
    );
}

#[tokio::test(start_paused = true)]
async fn test_monitor_reports_failed_run() {
    let provider = MockSearchProvider::with_statuses(vec![
        run_status(RunStatus::InProgress),
        run_status(RunStatus::PersistentFailure),
    ]);

    let err = provisioner(&provider)
        .with_monitor(monitor())
        .run(&plan())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PipelineError::MonitorFailed(ProvisioningError::IndexerRunFailed { .. })
    ));
    assert_eq!(provider.kinds().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_monitor_times_out() {
    let provider = MockSearchProvider::with_statuses(vec![run_status(RunStatus::InProgress)]);

    let err = provisioner(&provider)
        .with_monitor(monitor())
        .run(&plan())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PipelineError::MonitorFailed(ProvisioningError::MonitorTimeout { .. })
    ));
    // One poll at t=0 and one every 5s until the 60s deadline
    assert!((12..=13).contains(&provider.poll_count()));
}

#[tokio::test]
async fn test_missing_argument_fails_before_any_request() {
    let provider = MockSearchProvider::new();
    let mut cli = Cli::try_parse_from([
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
    .unwrap();
    cli.search_key = None;

    let result = ProvisionerConfig::from_cli(cli).map(|config| {
        Dependencies::with_provider(&config, Box::new(provider.clone()))
    });

    assert!(result.err().unwrap().is_config_error());
    assert!(provider.requests().is_empty());
}

#[tokio::test]
async fn test_dependencies_wire_full_schema() {
    let provider = MockSearchProvider::new();
    let cli = Cli::try_parse_from([
        "search-provisioner",
        "--search-service-name",
        "localink",
        "--search-key",
        "admin",
        "--cosmosdb-account-name",
        "acct",
        "--cosmosdb-account-key",
        "key",
        "--schema",
        "full",
    ])
    .unwrap();
    let config = ProvisionerConfig::from_cli(cli).unwrap();

    let deps = Dependencies::with_provider(&config, Box::new(provider.clone()));
    let outcome = deps.run().await.unwrap();
    assert!(matches!(outcome, RunOutcome::Provisioned(_)));

    let index = &provider.requests()[1].body;
    let fields = index["fields"].as_array().unwrap();
    assert!(index["vectorSearch"]["profiles"].is_array());
    assert!(fields.iter().any(|f| f["name"] == "description_embeddings"));

    let keys: Vec<_> = fields.iter().filter(|f| f["key"] == Value::Bool(true)).collect();
    assert_eq!(keys.len(), 1);
    assert_eq!(keys[0]["name"], "id");
}

fn dry_run_cli() -> Cli {
    Cli::try_parse_from([
        "search-provisioner",
        "--search-service-name",
        "localink",
        "--search-key",
        "admin",
        "--cosmosdb-account-name",
        "acct",
        "--cosmosdb-account-key",
        "cosmos-secret",
        "--monitor",
        "--dry-run",
    ])
    .unwrap()
}

#[tokio::test]
async fn test_dry_run_sends_no_requests() {
    let provider = MockSearchProvider::new();
    let config = ProvisionerConfig::from_cli(dry_run_cli()).unwrap();

    let deps = Dependencies::with_provider(&config, Box::new(provider.clone()));
    let outcome = deps.run().await.unwrap();

    let rendered = match outcome {
        RunOutcome::DryRun(rendered) => rendered,
        other => panic!("expected a dry run, got {:?}", other),
    };
    let requests: Vec<Value> = serde_json::from_str(&rendered).unwrap();
    assert_eq!(requests.len(), 3);
    assert!(!rendered.contains("cosmos-secret"));
    assert!(provider.requests().is_empty());
    assert_eq!(provider.poll_count(), 0);
}

#[tokio::test]
async fn test_dry_run_rejects_invalid_plan() {
    let provider = MockSearchProvider::new();
    let config = ProvisionerConfig::from_cli(dry_run_cli()).unwrap();

    let mut deps = Dependencies::with_provider(&config, Box::new(provider.clone()));
    deps.plan.indexer.target_index_name = "Not A Valid Index".to_string();

    let err = deps.run().await.unwrap_err();
    assert!(err.to_string().contains("create-indexer"), "{}", err);
    assert!(provider.requests().is_empty());
}
