use serde::Serialize;

use crate::{
    errors::StoreError,
    keys::KeyContext,
    types::{DocumentModel, UniqueValue},
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationCommand {
    InsertDocument(DocumentInsert),
    ReplaceDocument(DocumentReplace),
    DeleteDocument(DocumentDelete),
    AdjustCounter(CounterAdjust),
    AssignFields(FieldAssign),
}

/// Represents a unique key to be claimed (or checked) by a Lua script.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UniqueClaim {
    pub key: String,
    /// Field names that make up the constraint (single or compound)
    pub fields: Vec<String>,
    /// The values to claim, in the same order as fields
    pub values: Vec<String>,
}

/// Writes a new document together with its membership, reference and unique
/// keys. Fails without writing anything if a unique key belongs to another id.
#[derive(Debug, Serialize)]
pub struct DocumentInsert {
    pub key: String,
    pub entity_id: String,
    pub payload_json: String,
    pub members_key: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unique_constraints: Vec<UniqueClaim>,
}

/// Overwrites an existing document, moving reference and unique keys whose
/// values changed.
#[derive(Debug, Serialize)]
pub struct DocumentReplace {
    pub key: String,
    pub entity_id: String,
    pub payload_json: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub add_references: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub remove_references: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub claim_unique: Vec<UniqueClaim>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub release_unique: Vec<String>,
    /// Paths whose stored value survives the overwrite.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub preserve_paths: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DocumentDelete {
    pub key: String,
    pub entity_id: String,
    pub members_key: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<String>,
    /// Only released when still owned by `entity_id`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unique_keys: Vec<String>,
}

/// Adds `delta` to a numeric field, clamping the result at `floor`, and
/// stamps `touch_path` with `touched_at_json`.
#[derive(Debug, Serialize)]
pub struct CounterAdjust {
    pub key: String,
    pub path: String,
    pub delta: i64,
    pub floor: i64,
    pub touch_path: String,
    pub touched_at_json: String,
}

/// Sets top-level fields of an existing document.
#[derive(Debug, Serialize)]
pub struct FieldAssign {
    pub key: String,
    pub assignments: Vec<FieldAssignment>,
}

#[derive(Debug, Serialize)]
pub struct FieldAssignment {
    pub path: String,
    pub value_json: String,
}

pub fn json_path(field: &str) -> String {
    format!("$.{field}")
}

pub fn unique_claims(keys: &KeyContext<'_>, collection: &str, values: &[UniqueValue]) -> Vec<UniqueClaim> {
    values
        .iter()
        .map(|unique| {
            let values: Vec<&str> = unique.values.iter().map(String::as_str).collect();
            UniqueClaim {
                key: keys.unique(collection, &unique.fields, &values),
                fields: unique.fields.iter().map(|field| (*field).to_string()).collect(),
                values: unique.values.clone(),
            }
        })
        .collect()
}

fn reference_keys<T: DocumentModel>(keys: &KeyContext<'_>, document: &T) -> Vec<String> {
    document
        .references()
        .iter()
        .map(|reference| keys.reverse_reference(T::COLLECTION, reference.field, &reference.target_id))
        .collect()
}

pub fn build_document_insert<T: DocumentModel>(keys: &KeyContext<'_>, document: &T) -> Result<DocumentInsert, StoreError> {
    Ok(DocumentInsert {
        key: keys.entity(T::COLLECTION, document.id()),
        entity_id: document.id().to_string(),
        payload_json: serde_json::to_string(document)?,
        members_key: keys.members(T::COLLECTION),
        references: reference_keys(keys, document),
        unique_constraints: unique_claims(keys, T::COLLECTION, &document.unique_values()),
    })
}

pub fn build_document_replace<T: DocumentModel>(
    keys: &KeyContext<'_>,
    previous: &T,
    next: &T,
) -> Result<DocumentReplace, StoreError> {
    let before = reference_keys(keys, previous);
    let after = reference_keys(keys, next);
    let old_claims = unique_claims(keys, T::COLLECTION, &previous.unique_values());
    let new_claims = unique_claims(keys, T::COLLECTION, &next.unique_values());

    Ok(DocumentReplace {
        key: keys.entity(T::COLLECTION, next.id()),
        entity_id: next.id().to_string(),
        payload_json: serde_json::to_string(next)?,
        add_references: after.iter().filter(|key| !before.contains(key)).cloned().collect(),
        remove_references: before.iter().filter(|key| !after.contains(key)).cloned().collect(),
        release_unique: old_claims
            .iter()
            .filter(|claim| !new_claims.iter().any(|next| next.key == claim.key))
            .map(|claim| claim.key.clone())
            .collect(),
        claim_unique: new_claims
            .into_iter()
            .filter(|claim| !old_claims.iter().any(|old| old.key == claim.key))
            .collect(),
        preserve_paths: T::DERIVED_FIELDS.iter().map(|field| json_path(field)).collect(),
    })
}

pub fn build_document_delete<T: DocumentModel>(keys: &KeyContext<'_>, document: &T) -> DocumentDelete {
    DocumentDelete {
        key: keys.entity(T::COLLECTION, document.id()),
        entity_id: document.id().to_string(),
        members_key: keys.members(T::COLLECTION),
        references: reference_keys(keys, document),
        unique_keys: unique_claims(keys, T::COLLECTION, &document.unique_values())
            .into_iter()
            .map(|claim| claim.key)
            .collect(),
    }
}
