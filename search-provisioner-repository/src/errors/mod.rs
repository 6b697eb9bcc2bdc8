//! Error types for the search provisioner repository.
//!
//! This module provides a unified error type for all provisioning operations.

mod provisioning_error;

pub use provisioning_error::ProvisioningError;
