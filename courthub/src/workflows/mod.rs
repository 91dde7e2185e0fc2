//! Request-level operations over the store.
//!
//! Each module groups the operations of one resource. Review and comment
//! mutations keep the denormalized aggregates in [`aggregates`] up to date
//! before they return.

pub mod accounts;
pub mod aggregates;
pub mod catalogue;
pub mod discussion;
pub mod ownership;
pub mod posting;
pub mod reconcile;
pub mod reviews;

mod populate;

pub use aggregates::{RatingSummary, recompute_rating, summarize};
pub use ownership::{Action, authorize};
pub use reconcile::{Drift, ReconcileReport, reconcile};
