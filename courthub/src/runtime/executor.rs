use std::borrow::Cow;

use redis::aio::ConnectionLike;
use serde_json::Value;

use crate::{
    errors::StoreError,
    runtime::{
        commands::MutationCommand,
        scripts::{
            COUNTER_ADJUST_SCRIPT, DOCUMENT_DELETE_SCRIPT, DOCUMENT_INSERT_SCRIPT, DOCUMENT_REPLACE_SCRIPT,
            FIELDS_ASSIGN_SCRIPT,
        },
    },
};

/// Runs one command through its Lua script and decodes the JSON reply.
///
/// Script-level failures (`{"error": ...}`) are mapped onto [`StoreError`].
pub async fn execute_command<C>(conn: &mut C, command: &MutationCommand) -> Result<Value, StoreError>
where
    C: ConnectionLike + Send,
{
    let (script, payload) = match command {
        MutationCommand::InsertDocument(inner) => (&*DOCUMENT_INSERT_SCRIPT, serde_json::to_string(inner)),
        MutationCommand::ReplaceDocument(inner) => (&*DOCUMENT_REPLACE_SCRIPT, serde_json::to_string(inner)),
        MutationCommand::DeleteDocument(inner) => (&*DOCUMENT_DELETE_SCRIPT, serde_json::to_string(inner)),
        MutationCommand::AdjustCounter(inner) => (&*COUNTER_ADJUST_SCRIPT, serde_json::to_string(inner)),
        MutationCommand::AssignFields(inner) => (&*FIELDS_ASSIGN_SCRIPT, serde_json::to_string(inner)),
    };
    let payload = payload.map_err(|err| StoreError::Other {
        message: Cow::Owned(format!("failed to serialize command: {err}")),
    })?;

    let mut invocation = script.prepare_invoke();
    invocation.arg(payload);
    let raw: String = invocation.invoke_async(conn).await?;

    let value: Value = serde_json::from_str(&raw).map_err(|err| StoreError::Other {
        message: Cow::Owned(format!("failed to parse lua response: {err}")),
    })?;

    match value.get("error") {
        Some(error) => Err(decode_script_error(error, &value)),
        None => Ok(value),
    }
}

fn decode_script_error(error: &Value, value: &Value) -> StoreError {
    match error.as_str() {
        Some("entity_not_found") => {
            let entity_id = value.get("entity_id").and_then(|v| v.as_str()).map(|s| s.to_string());
            StoreError::NotFound { entity_id }
        }
        Some("unique_constraint_violation") => {
            let strings = |name: &str| -> Vec<String> {
                value
                    .get(name)
                    .and_then(|v| v.as_array())
                    .map(|arr| {
                        arr.iter()
                            .map(|v| match v {
                                Value::String(s) => s.clone(),
                                other => other.to_string(),
                            })
                            .collect()
                    })
                    .unwrap_or_default()
            };
            let existing_entity_id = value
                .get("existing_entity_id")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
                .unwrap_or_default();
            StoreError::UniqueConstraintViolation {
                fields: strings("fields"),
                values: strings("values"),
                existing_entity_id,
            }
        }
        Some(other) => StoreError::Other {
            message: Cow::Owned(other.to_string()),
        },
        None => StoreError::Other {
            message: Cow::Borrowed("lua_error"),
        },
    }
}
