use redis::Script;
use std::sync::LazyLock;

pub const DOCUMENT_INSERT_SCRIPT_BODY: &str = include_str!("../../lua/document_insert.lua");
pub const DOCUMENT_REPLACE_SCRIPT_BODY: &str = include_str!("../../lua/document_replace.lua");
pub const DOCUMENT_DELETE_SCRIPT_BODY: &str = include_str!("../../lua/document_delete.lua");
pub const COUNTER_ADJUST_SCRIPT_BODY: &str = include_str!("../../lua/counter_adjust.lua");
pub const FIELDS_ASSIGN_SCRIPT_BODY: &str = include_str!("../../lua/fields_assign.lua");

pub static DOCUMENT_INSERT_SCRIPT: LazyLock<Script> = LazyLock::new(|| Script::new(DOCUMENT_INSERT_SCRIPT_BODY));
pub static DOCUMENT_REPLACE_SCRIPT: LazyLock<Script> = LazyLock::new(|| Script::new(DOCUMENT_REPLACE_SCRIPT_BODY));
pub static DOCUMENT_DELETE_SCRIPT: LazyLock<Script> = LazyLock::new(|| Script::new(DOCUMENT_DELETE_SCRIPT_BODY));
pub static COUNTER_ADJUST_SCRIPT: LazyLock<Script> = LazyLock::new(|| Script::new(COUNTER_ADJUST_SCRIPT_BODY));
pub static FIELDS_ASSIGN_SCRIPT: LazyLock<Script> = LazyLock::new(|| Script::new(FIELDS_ASSIGN_SCRIPT_BODY));
