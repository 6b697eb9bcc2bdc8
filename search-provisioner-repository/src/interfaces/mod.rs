//! Interface definitions for the search service provider.
//!
//! This module defines the abstract `SearchServiceProvider` trait that allows
//! for dependency injection of the HTTP backend.

mod search_service_provider;

pub use search_service_provider::SearchServiceProvider;
