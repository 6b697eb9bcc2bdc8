//! Index schema payload.
//!
//! This module defines the search index definition: its ordered field list and
//! the optional vector search configuration used by embedding fields.

use serde::{Deserialize, Serialize};

/// Entity Data Model type of an index field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    #[serde(rename = "Edm.String")]
    String,
    #[serde(rename = "Edm.Int32")]
    Int32,
    #[serde(rename = "Edm.Int64")]
    Int64,
    #[serde(rename = "Edm.Double")]
    Double,
    #[serde(rename = "Edm.Boolean")]
    Boolean,
    #[serde(rename = "Edm.DateTimeOffset")]
    DateTimeOffset,
    #[serde(rename = "Edm.GeographyPoint")]
    GeographyPoint,
    #[serde(rename = "Collection(Edm.String)")]
    StringCollection,
    /// Vector of single-precision floats, used for embeddings.
    #[serde(rename = "Collection(Edm.Single)")]
    SingleCollection,
}

impl FieldType {
    /// Whether this type can carry vector dimensions.
    pub fn is_vector(&self) -> bool {
        matches!(self, FieldType::SingleCollection)
    }
}

/// A single field of the index schema.
///
/// Attribute flags left as `None` are omitted from the payload and take the
/// service defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub searchable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filterable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sortable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facetable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrievable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vector_search_profile: Option<String>,
}

impl IndexField {
    /// Create a field with no attribute flags set.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            key: None,
            searchable: None,
            filterable: None,
            sortable: None,
            facetable: None,
            retrievable: None,
            dimensions: None,
            vector_search_profile: None,
        }
    }

    /// Mark this field as the document key.
    pub fn key(mut self) -> Self {
        self.key = Some(true);
        self
    }

    pub fn searchable(mut self, value: bool) -> Self {
        self.searchable = Some(value);
        self
    }

    pub fn filterable(mut self, value: bool) -> Self {
        self.filterable = Some(value);
        self
    }

    pub fn sortable(mut self, value: bool) -> Self {
        self.sortable = Some(value);
        self
    }

    pub fn facetable(mut self, value: bool) -> Self {
        self.facetable = Some(value);
        self
    }

    pub fn retrievable(mut self, value: bool) -> Self {
        self.retrievable = Some(value);
        self
    }

    /// Attach vector dimensions and the vector search profile used to query them.
    ///
    /// Vector fields must be searchable for the service to build the vector index.
    pub fn vector(mut self, dimensions: u32, profile: impl Into<String>) -> Self {
        self.searchable = Some(true);
        self.dimensions = Some(dimensions);
        self.vector_search_profile = Some(profile.into());
        self
    }

    pub fn is_key(&self) -> bool {
        self.key == Some(true)
    }
}

/// HNSW algorithm configuration for approximate nearest neighbour search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorSearchAlgorithm {
    pub name: String,
    pub kind: String,
    pub hnsw_parameters: HnswParameters,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HnswParameters {
    pub m: u32,
    pub ef_construction: u32,
    pub ef_search: u32,
    pub metric: String,
}

impl VectorSearchAlgorithm {
    /// HNSW with cosine similarity and the service's recommended defaults.
    pub fn hnsw_cosine(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: "hnsw".to_string(),
            hnsw_parameters: HnswParameters {
                m: 4,
                ef_construction: 400,
                ef_search: 500,
                metric: "cosine".to_string(),
            },
        }
    }
}

/// Named profile binding vector fields to an algorithm configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorSearchProfile {
    pub name: String,
    pub algorithm: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VectorSearch {
    pub algorithms: Vec<VectorSearchAlgorithm>,
    pub profiles: Vec<VectorSearchProfile>,
}

impl VectorSearch {
    /// Whether a profile with the given name is defined.
    pub fn has_profile(&self, name: &str) -> bool {
        self.profiles.iter().any(|p| p.name == name)
    }

    /// Whether an algorithm configuration with the given name is defined.
    pub fn has_algorithm(&self, name: &str) -> bool {
        self.algorithms.iter().any(|a| a.name == name)
    }
}

/// Index creation request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexSpec {
    pub name: String,
    pub fields: Vec<IndexField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vector_search: Option<VectorSearch>,
}

impl IndexSpec {
    pub fn new(name: impl Into<String>, fields: Vec<IndexField>) -> Self {
        Self {
            name: name.into(),
            fields,
            vector_search: None,
        }
    }

    pub fn with_vector_search(mut self, vector_search: VectorSearch) -> Self {
        self.vector_search = Some(vector_search);
        self
    }

    /// All fields flagged as key, in declaration order.
    pub fn key_fields(&self) -> Vec<&IndexField> {
        self.fields.iter().filter(|f| f.is_key()).collect()
    }

    pub fn field(&self, name: &str) -> Option<&IndexField> {
        self.fields.iter().find(|f| f.name == name)
    }
}
