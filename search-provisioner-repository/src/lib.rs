//! # Search Provisioner Repository
//!
//! This crate provides the interface and implementation used to create
//! resources on a search service. It includes definitions for errors, the
//! provider interface, a validating service, and a concrete implementation
//! for the Azure AI Search REST API.

pub mod azure;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod service;
pub mod types;
pub mod utils;

pub use azure::AzureSearchProvider;
pub use config::{SearchServiceConfig, DEFAULT_API_VERSION, VECTOR_API_VERSION};
pub use errors::ProvisioningError;
pub use interfaces::SearchServiceProvider;
pub use service::ProvisioningService;
pub use types::{ProvisionedResource, ResourceKind};
pub use utils::validate_resource_name;
