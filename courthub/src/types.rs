use serde::{Serialize, de::DeserializeOwned};

/// Service segment used in every storage key.
pub const SERVICE: &str = "hub";

/// Outgoing reference from one document to another, indexed so the target's
/// dependents can be listed without scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub field: &'static str,
    pub target_id: String,
}

impl Reference {
    pub fn new(field: &'static str, target_id: impl Into<String>) -> Self {
        Self {
            field,
            target_id: target_id.into(),
        }
    }
}

/// A unique (single or compound) value claimed by a document.
///
/// Values are stored already normalized, so case-insensitive constraints
/// lower-case before building the claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueValue {
    pub fields: Vec<&'static str>,
    pub values: Vec<String>,
}

impl UniqueValue {
    pub fn single(field: &'static str, value: impl Into<String>) -> Self {
        Self {
            fields: vec![field],
            values: vec![value.into()],
        }
    }

    pub fn compound(fields: Vec<&'static str>, values: Vec<String>) -> Self {
        Self { fields, values }
    }
}

/// Trait for records persisted as JSON documents.
///
/// It provides the collection name used for key generation plus the index
/// entries the store maintains alongside the document body.
pub trait DocumentModel: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection segment of the storage key.
    const COLLECTION: &'static str;

    /// Fields maintained by the store itself (counters, aggregates). A
    /// document replace keeps their stored values.
    const DERIVED_FIELDS: &'static [&'static str] = &[];

    fn id(&self) -> &str;

    fn references(&self) -> Vec<Reference> {
        Vec::new()
    }

    fn unique_values(&self) -> Vec<UniqueValue> {
        Vec::new()
    }
}
