use std::borrow::Cow;

use chrono::{DateTime, Utc};
use redis::{aio::ConnectionManager, cmd};
use serde_json::Value;

use super::UPDATED_AT;
use crate::{
    errors::StoreError,
    keys::KeyContext,
    runtime::{
        MutationCommand,
        commands::{
            CounterAdjust, FieldAssign, FieldAssignment, build_document_delete, build_document_insert,
            build_document_replace, json_path,
        },
        execute_command,
    },
    types::{DocumentModel, SERVICE, UniqueValue},
};

/// RedisJSON-backed document store.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
    prefix: String,
}

impl RedisStore {
    pub fn new(conn: ConnectionManager, prefix: String) -> Self {
        Self { conn, prefix }
    }

    /// Create a store from a Redis connection URL.
    pub async fn connect(url: &str, prefix: impl Into<String>) -> Result<Self, StoreError> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self::new(conn, prefix.into()))
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn keys(&self) -> KeyContext<'_> {
        KeyContext::new(&self.prefix, SERVICE)
    }

    pub async fn get<T: DocumentModel>(&self, id: &str) -> Result<Option<T>, StoreError> {
        let key = self.keys().entity(T::COLLECTION, id);
        let mut conn = self.conn.clone();
        let result: Option<String> = cmd("JSON.GET").arg(&key).query_async(&mut conn).await?;
        match result {
            Some(json) => Ok(Some(serde_json::from_str::<T>(&json)?)),
            None => Ok(None),
        }
    }

    pub async fn list<T: DocumentModel>(&self) -> Result<Vec<T>, StoreError> {
        let members_key = self.keys().members(T::COLLECTION);
        self.load_members(&members_key).await
    }

    pub async fn list_by_reference<T: DocumentModel>(&self, field: &str, target_id: &str) -> Result<Vec<T>, StoreError> {
        let reference_key = self.keys().reverse_reference(T::COLLECTION, field, target_id);
        self.load_members(&reference_key).await
    }

    /// Loads every document whose id is a member of `set_key`. Ids whose
    /// document vanished between the two reads are skipped.
    async fn load_members<T: DocumentModel>(&self, set_key: &str) -> Result<Vec<T>, StoreError> {
        let mut conn = self.conn.clone();
        let ids: Vec<String> = cmd("SMEMBERS").arg(set_key).query_async(&mut conn).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let keys = self.keys();
        let document_keys: Vec<String> = ids.iter().map(|id| keys.entity(T::COLLECTION, id)).collect();
        let raw: Vec<Option<String>> = cmd("JSON.MGET")
            .arg(&document_keys)
            .arg(".")
            .query_async(&mut conn)
            .await?;

        raw.into_iter()
            .flatten()
            .map(|json| serde_json::from_str::<T>(&json).map_err(StoreError::from))
            .collect()
    }

    pub async fn find_unique<T: DocumentModel>(&self, value: &UniqueValue) -> Result<Option<String>, StoreError> {
        let values: Vec<&str> = value.values.iter().map(String::as_str).collect();
        let key = self.keys().unique(T::COLLECTION, &value.fields, &values);
        let mut conn = self.conn.clone();
        let owner: Option<String> = cmd("GET").arg(&key).query_async(&mut conn).await?;
        Ok(owner)
    }

    pub async fn insert<T: DocumentModel>(&self, document: &T) -> Result<(), StoreError> {
        let command = MutationCommand::InsertDocument(build_document_insert(&self.keys(), document)?);
        let mut conn = self.conn.clone();
        execute_command(&mut conn, &command).await?;
        Ok(())
    }

    pub async fn replace<T: DocumentModel>(&self, previous: &T, next: &T) -> Result<(), StoreError> {
        let command = MutationCommand::ReplaceDocument(build_document_replace(&self.keys(), previous, next)?);
        let mut conn = self.conn.clone();
        execute_command(&mut conn, &command).await?;
        Ok(())
    }

    pub async fn delete<T: DocumentModel>(&self, document: &T) -> Result<bool, StoreError> {
        let command = MutationCommand::DeleteDocument(build_document_delete(&self.keys(), document));
        let mut conn = self.conn.clone();
        let reply = execute_command(&mut conn, &command).await?;
        Ok(reply.get("deleted").and_then(Value::as_bool).unwrap_or(false))
    }

    pub async fn adjust_counter<T: DocumentModel>(
        &self,
        id: &str,
        field: &str,
        delta: i64,
        touched_at: DateTime<Utc>,
    ) -> Result<Option<i64>, StoreError> {
        let command = MutationCommand::AdjustCounter(CounterAdjust {
            key: self.keys().entity(T::COLLECTION, id),
            path: json_path(field),
            delta,
            floor: 0,
            touch_path: json_path(UPDATED_AT),
            touched_at_json: serde_json::to_string(&touched_at)?,
        });
        let mut conn = self.conn.clone();
        let reply = execute_command(&mut conn, &command).await?;
        if reply.get("missing").and_then(Value::as_bool).unwrap_or(false) {
            return Ok(None);
        }
        // cjson encodes whole numbers as integers but older builds may emit
        // them as floats.
        let value = reply
            .get("value")
            .and_then(|value| value.as_i64().or_else(|| value.as_f64().map(|float| float as i64)))
            .ok_or(StoreError::Other {
                message: Cow::Borrowed("counter script returned no value"),
            })?;
        Ok(Some(value))
    }

    pub async fn set_fields<T: DocumentModel>(&self, id: &str, fields: &[(&str, Value)]) -> Result<bool, StoreError> {
        let assignments = fields
            .iter()
            .map(|(field, value)| {
                Ok(FieldAssignment {
                    path: json_path(field),
                    value_json: serde_json::to_string(value)?,
                })
            })
            .collect::<Result<Vec<_>, StoreError>>()?;
        let command = MutationCommand::AssignFields(FieldAssign {
            key: self.keys().entity(T::COLLECTION, id),
            assignments,
        });
        let mut conn = self.conn.clone();
        let reply = execute_command(&mut conn, &command).await?;
        Ok(!reply.get("missing").and_then(Value::as_bool).unwrap_or(false))
    }

    /// Delete all keys under this store's prefix.
    ///
    /// This performs a SCAN + DEL loop to avoid blocking Redis.
    pub async fn purge(&self) -> Result<u64, StoreError> {
        const SCAN_COUNT: usize = 1000;
        let pattern = self.keys().service_pattern();
        let mut conn = self.conn.clone();
        let mut cursor: u64 = 0;
        let mut total_deleted: u64 = 0;

        loop {
            let (next_cursor, keys): (u64, Vec<String>) = cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_COUNT)
                .query_async(&mut conn)
                .await?;

            if !keys.is_empty() {
                let deleted: u64 = cmd("DEL").arg(&keys).query_async(&mut conn).await?;
                total_deleted += deleted;
            }

            cursor = next_cursor;
            if cursor == 0 {
                break;
            }
        }

        Ok(total_deleted)
    }
}
