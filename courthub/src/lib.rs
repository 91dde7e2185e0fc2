//! CourtHub core library.
//!
//! REST backend for a badminton equipment catalogue and discussion board.
//! Documents live in RedisJSON (or in memory for tests and local runs);
//! review and comment mutations keep the equipment rating and the post
//! comment count consistent with the collections they summarize.

pub mod auth;
pub mod config;
pub mod errors;
pub mod filters;
pub mod http;
pub mod hub;
pub mod id;
pub mod keys;
pub mod models;
pub mod runtime;
pub mod store;
pub mod types;
pub mod validators;
pub mod workflows;

pub use config::HubConfig;
pub use errors::{HubError, HubResult, StoreError, ValidationError, ValidationIssue};
pub use hub::Hub;
pub use store::Store;
