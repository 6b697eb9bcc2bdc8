//! Resource and response types for provisioning operations.

use std::fmt;

/// Kind of resource managed on the search service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    DataSource,
    Index,
    Indexer,
}

impl ResourceKind {
    /// REST collection path segment for this kind of resource.
    pub fn collection(&self) -> &'static str {
        match self {
            ResourceKind::DataSource => "datasources",
            ResourceKind::Index => "indexes",
            ResourceKind::Indexer => "indexers",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ResourceKind::DataSource => "data source",
            ResourceKind::Index => "index",
            ResourceKind::Indexer => "indexer",
        };
        f.write_str(label)
    }
}

/// A resource accepted by the search service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedResource {
    pub kind: ResourceKind,
    pub name: String,
    /// HTTP status returned by the service (201 on creation).
    pub status: u16,
}

impl ProvisionedResource {
    pub fn new(kind: ResourceKind, name: impl Into<String>, status: u16) -> Self {
        Self {
            kind,
            name: name.into(),
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collections_are_distinct() {
        assert_eq!(ResourceKind::DataSource.collection(), "datasources");
        assert_eq!(ResourceKind::Index.collection(), "indexes");
        assert_eq!(ResourceKind::Indexer.collection(), "indexers");
    }
}
