//! Document storage.
//!
//! [`Store`] is the single storage handle passed to every workflow. It
//! dispatches to either the RedisJSON backend or the in-memory backend; both
//! keep the same guarantees:
//!
//! - `insert` claims unique keys atomically with the write, so a clashing
//!   insert fails with [`StoreError::UniqueConstraintViolation`] and writes
//!   nothing.
//! - `adjust_counter` is an atomic read-modify-write on one document.
//! - `delete` releases only the unique keys the document still owns.

mod memory;
mod redis_store;

pub use memory::MemoryStore;
pub use redis_store::RedisStore;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::{
    errors::StoreError,
    types::{DocumentModel, UniqueValue},
};

#[derive(Clone)]
pub enum Store {
    Redis(RedisStore),
    Memory(MemoryStore),
}

impl Store {
    /// Connects to Redis and returns a store whose keys start with `prefix`.
    pub async fn connect(url: &str, prefix: impl Into<String>) -> Result<Self, StoreError> {
        Ok(Store::Redis(RedisStore::connect(url, prefix).await?))
    }

    /// Fresh, empty in-memory store.
    pub fn memory() -> Self {
        Store::Memory(MemoryStore::default())
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Store::Redis(_) => "redis",
            Store::Memory(_) => "memory",
        }
    }

    pub async fn get<T: DocumentModel>(&self, id: &str) -> Result<Option<T>, StoreError> {
        match self {
            Store::Redis(store) => store.get(id).await,
            Store::Memory(store) => store.get(id),
        }
    }

    /// Every document of the collection, in no particular order.
    pub async fn list<T: DocumentModel>(&self) -> Result<Vec<T>, StoreError> {
        match self {
            Store::Redis(store) => store.list().await,
            Store::Memory(store) => store.list(),
        }
    }

    /// Documents of `T` whose `field` references `target_id`.
    pub async fn list_by_reference<T: DocumentModel>(
        &self,
        field: &str,
        target_id: &str,
    ) -> Result<Vec<T>, StoreError> {
        match self {
            Store::Redis(store) => store.list_by_reference(field, target_id).await,
            Store::Memory(store) => store.list_by_reference(field, target_id),
        }
    }

    /// Id of the document currently owning `value`, if any.
    pub async fn find_unique<T: DocumentModel>(&self, value: &UniqueValue) -> Result<Option<String>, StoreError> {
        match self {
            Store::Redis(store) => store.find_unique::<T>(value).await,
            Store::Memory(store) => store.find_unique::<T>(value),
        }
    }

    pub async fn insert<T: DocumentModel>(&self, document: &T) -> Result<(), StoreError> {
        match self {
            Store::Redis(store) => store.insert(document).await,
            Store::Memory(store) => store.insert(document),
        }
    }

    /// Overwrites `previous` with `next` (same id). Fails with
    /// [`StoreError::NotFound`] when the document is gone.
    pub async fn replace<T: DocumentModel>(&self, previous: &T, next: &T) -> Result<(), StoreError> {
        match self {
            Store::Redis(store) => store.replace(previous, next).await,
            Store::Memory(store) => store.replace(previous, next),
        }
    }

    /// Returns `false` when the document was already gone.
    pub async fn delete<T: DocumentModel>(&self, document: &T) -> Result<bool, StoreError> {
        match self {
            Store::Redis(store) => store.delete(document).await,
            Store::Memory(store) => store.delete(document),
        }
    }

    /// Adds `delta` to the numeric `field`, never going below zero, and
    /// stamps `updatedAt`. Returns the new value, or `None` when the document
    /// does not exist.
    pub async fn adjust_counter<T: DocumentModel>(
        &self,
        id: &str,
        field: &str,
        delta: i64,
        touched_at: DateTime<Utc>,
    ) -> Result<Option<i64>, StoreError> {
        match self {
            Store::Redis(store) => store.adjust_counter::<T>(id, field, delta, touched_at).await,
            Store::Memory(store) => store.adjust_counter::<T>(id, field, delta, touched_at),
        }
    }

    /// Sets top-level fields. Returns `false` when the document does not exist.
    pub async fn set_fields<T: DocumentModel>(&self, id: &str, fields: &[(&str, Value)]) -> Result<bool, StoreError> {
        match self {
            Store::Redis(store) => store.set_fields::<T>(id, fields).await,
            Store::Memory(store) => store.set_fields::<T>(id, fields),
        }
    }

    /// Deletes everything this store owns. Returns the number of removed keys
    /// (or documents for the memory backend).
    pub async fn purge(&self) -> Result<u64, StoreError> {
        match self {
            Store::Redis(store) => store.purge().await,
            Store::Memory(store) => store.purge(),
        }
    }
}

/// Field name of the system-managed modification timestamp.
pub(crate) const UPDATED_AT: &str = "updatedAt";
