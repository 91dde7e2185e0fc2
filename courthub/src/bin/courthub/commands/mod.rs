pub mod promote;
pub mod reconcile;
pub mod serve;
