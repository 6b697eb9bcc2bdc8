//! Utility functions for the search provisioner repository.

use crate::errors::ProvisioningError;
use crate::types::ResourceKind;

/// Longest resource name the service accepts.
const MAX_RESOURCE_NAME_LEN: usize = 128;

/// Check a resource name against the service naming rules.
///
/// All names must start with a letter or digit and be at most 128 characters.
/// Index names are restricted to lowercase letters, digits and single dashes;
/// data source and indexer names may also contain uppercase letters and underscores.
///
/// # Example
///
/// ```
/// use search_provisioner_repository::{validate_resource_name, ResourceKind};
///
/// assert!(validate_resource_name(ResourceKind::Index, "main-search-index").is_ok());
/// assert!(validate_resource_name(ResourceKind::Index, "Main_Index").is_err());
/// assert!(validate_resource_name(ResourceKind::Indexer, "main_indexer").is_ok());
/// ```
pub fn validate_resource_name(kind: ResourceKind, name: &str) -> Result<(), ProvisioningError> {
    let first = name
        .chars()
        .next()
        .ok_or_else(|| ProvisioningError::validation(format!("{} name is required", kind)))?;

    if name.len() > MAX_RESOURCE_NAME_LEN {
        return Err(ProvisioningError::validation(format!(
            "{} name '{}' is longer than {} characters",
            kind, name, MAX_RESOURCE_NAME_LEN
        )));
    }

    if !first.is_ascii_alphanumeric() {
        return Err(ProvisioningError::validation(format!(
            "{} name '{}' must start with a letter or digit",
            kind, name
        )));
    }

    let valid = match kind {
        ResourceKind::Index => {
            name.chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
                && !name.contains("--")
                && !name.ends_with('-')
        }
        ResourceKind::DataSource | ResourceKind::Indexer => name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
    };

    if !valid {
        return Err(ProvisioningError::validation(format!(
            "{} name '{}' contains invalid characters",
            kind, name
        )));
    }

    Ok(())
}
