use std::{
    borrow::Cow,
    collections::{BTreeSet, HashMap},
    sync::{Arc, Mutex, MutexGuard},
};

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::UPDATED_AT;
use crate::{
    errors::StoreError,
    keys::KeyContext,
    runtime::commands::{
        DocumentDelete, DocumentInsert, DocumentReplace, UniqueClaim, build_document_delete, build_document_insert,
        build_document_replace,
    },
    types::{DocumentModel, SERVICE, UniqueValue},
};

const PREFIX: &str = "memory";

/// In-process store used by tests and the `memory` backend.
///
/// It applies the same insert/replace/delete commands the Redis scripts
/// receive, keyed the same way, under a single lock.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

#[derive(Default)]
struct MemoryState {
    documents: HashMap<String, Value>,
    sets: HashMap<String, BTreeSet<String>>,
    unique: HashMap<String, String>,
}

impl MemoryState {
    fn check_claims(&self, entity_id: &str, claims: &[UniqueClaim]) -> Result<(), StoreError> {
        for claim in claims {
            if let Some(owner) = self.unique.get(&claim.key)
                && owner != entity_id
            {
                return Err(StoreError::UniqueConstraintViolation {
                    fields: claim.fields.clone(),
                    values: claim.values.clone(),
                    existing_entity_id: owner.clone(),
                });
            }
        }
        Ok(())
    }

    fn add_to_set(&mut self, key: &str, member: &str) {
        self.sets.entry(key.to_string()).or_default().insert(member.to_string());
    }

    fn remove_from_set(&mut self, key: &str, member: &str) {
        if let Some(set) = self.sets.get_mut(key) {
            set.remove(member);
            if set.is_empty() {
                self.sets.remove(key);
            }
        }
    }

    fn release_owned(&mut self, key: &str, entity_id: &str) {
        if self.unique.get(key).is_some_and(|owner| owner == entity_id) {
            self.unique.remove(key);
        }
    }

    fn apply_insert(&mut self, command: DocumentInsert) -> Result<(), StoreError> {
        self.check_claims(&command.entity_id, &command.unique_constraints)?;
        let document: Value = serde_json::from_str(&command.payload_json)?;
        self.documents.insert(command.key, document);
        self.add_to_set(&command.members_key, &command.entity_id);
        for reference in &command.references {
            self.add_to_set(reference, &command.entity_id);
        }
        for claim in command.unique_constraints {
            self.unique.insert(claim.key, command.entity_id.clone());
        }
        Ok(())
    }

    fn apply_replace(&mut self, command: DocumentReplace) -> Result<(), StoreError> {
        if !self.documents.contains_key(&command.key) {
            return Err(StoreError::NotFound {
                entity_id: Some(command.entity_id),
            });
        }
        self.check_claims(&command.entity_id, &command.claim_unique)?;
        let mut document: Value = serde_json::from_str(&command.payload_json)?;
        if let (Some(Value::Object(stored)), Value::Object(next)) = (self.documents.get(&command.key), &mut document) {
            for path in &command.preserve_paths {
                let field = path.trim_start_matches("$.");
                if let Some(value) = stored.get(field) {
                    next.insert(field.to_string(), value.clone());
                }
            }
        }
        self.documents.insert(command.key, document);
        for reference in &command.remove_references {
            self.remove_from_set(reference, &command.entity_id);
        }
        for reference in &command.add_references {
            self.add_to_set(reference, &command.entity_id);
        }
        for key in &command.release_unique {
            self.release_owned(key, &command.entity_id);
        }
        for claim in command.claim_unique {
            self.unique.insert(claim.key, command.entity_id.clone());
        }
        Ok(())
    }

    fn apply_delete(&mut self, command: DocumentDelete) -> bool {
        if self.documents.remove(&command.key).is_none() {
            return false;
        }
        self.remove_from_set(&command.members_key, &command.entity_id);
        for reference in &command.references {
            self.remove_from_set(reference, &command.entity_id);
        }
        for key in &command.unique_keys {
            self.release_owned(key, &command.entity_id);
        }
        true
    }

    fn load<T: DocumentModel>(&self, keys: &KeyContext<'_>, ids: Option<&BTreeSet<String>>) -> Result<Vec<T>, StoreError> {
        let Some(ids) = ids else {
            return Ok(Vec::new());
        };
        ids.iter()
            .filter_map(|id| self.documents.get(&keys.entity(T::COLLECTION, id)))
            .map(|document| serde_json::from_value::<T>(document.clone()).map_err(StoreError::from))
            .collect()
    }
}

impl MemoryStore {
    fn keys() -> KeyContext<'static> {
        KeyContext::new(PREFIX, SERVICE)
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, StoreError> {
        self.state.lock().map_err(|_| StoreError::Other {
            message: Cow::Borrowed("memory store lock poisoned"),
        })
    }

    pub fn get<T: DocumentModel>(&self, id: &str) -> Result<Option<T>, StoreError> {
        let key = Self::keys().entity(T::COLLECTION, id);
        let state = self.lock()?;
        match state.documents.get(&key) {
            Some(document) => Ok(Some(serde_json::from_value(document.clone())?)),
            None => Ok(None),
        }
    }

    pub fn list<T: DocumentModel>(&self) -> Result<Vec<T>, StoreError> {
        let keys = Self::keys();
        let state = self.lock()?;
        state.load(&keys, state.sets.get(&keys.members(T::COLLECTION)))
    }

    pub fn list_by_reference<T: DocumentModel>(&self, field: &str, target_id: &str) -> Result<Vec<T>, StoreError> {
        let keys = Self::keys();
        let state = self.lock()?;
        state.load(&keys, state.sets.get(&keys.reverse_reference(T::COLLECTION, field, target_id)))
    }

    pub fn find_unique<T: DocumentModel>(&self, value: &UniqueValue) -> Result<Option<String>, StoreError> {
        let values: Vec<&str> = value.values.iter().map(String::as_str).collect();
        let key = Self::keys().unique(T::COLLECTION, &value.fields, &values);
        Ok(self.lock()?.unique.get(&key).cloned())
    }

    pub fn insert<T: DocumentModel>(&self, document: &T) -> Result<(), StoreError> {
        let command = build_document_insert(&Self::keys(), document)?;
        self.lock()?.apply_insert(command)
    }

    pub fn replace<T: DocumentModel>(&self, previous: &T, next: &T) -> Result<(), StoreError> {
        let command = build_document_replace(&Self::keys(), previous, next)?;
        self.lock()?.apply_replace(command)
    }

    pub fn delete<T: DocumentModel>(&self, document: &T) -> Result<bool, StoreError> {
        let command = build_document_delete(&Self::keys(), document);
        Ok(self.lock()?.apply_delete(command))
    }

    pub fn adjust_counter<T: DocumentModel>(
        &self,
        id: &str,
        field: &str,
        delta: i64,
        touched_at: DateTime<Utc>,
    ) -> Result<Option<i64>, StoreError> {
        let key = Self::keys().entity(T::COLLECTION, id);
        let touched_at = serde_json::to_value(touched_at)?;
        let mut state = self.lock()?;
        let Some(Value::Object(document)) = state.documents.get_mut(&key) else {
            return Ok(None);
        };
        let current = document.get(field).and_then(Value::as_i64).unwrap_or(0);
        let next = current.saturating_add(delta).max(0);
        document.insert(field.to_string(), Value::from(next));
        document.insert(UPDATED_AT.to_string(), touched_at);
        Ok(Some(next))
    }

    pub fn set_fields<T: DocumentModel>(&self, id: &str, fields: &[(&str, Value)]) -> Result<bool, StoreError> {
        let key = Self::keys().entity(T::COLLECTION, id);
        let mut state = self.lock()?;
        let Some(Value::Object(document)) = state.documents.get_mut(&key) else {
            return Ok(false);
        };
        for (field, value) in fields {
            document.insert((*field).to_string(), value.clone());
        }
        Ok(true)
    }

    pub fn purge(&self) -> Result<u64, StoreError> {
        let mut state = self.lock()?;
        let removed = state.documents.len() + state.sets.len() + state.unique.len();
        *state = MemoryState::default();
        Ok(removed as u64)
    }
}
