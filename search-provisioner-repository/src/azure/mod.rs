//! Azure AI Search implementation of the search service provider.
//!
//! This module provides a concrete implementation of `SearchServiceProvider`
//! on top of the service's REST API.

mod provider;

pub use provider::AzureSearchProvider;
