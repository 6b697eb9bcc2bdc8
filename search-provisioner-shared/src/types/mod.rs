//! Payload types sent to the search service and the status types it returns.

pub mod data_source;
pub mod index;
pub mod indexer;
pub mod indexer_status;
