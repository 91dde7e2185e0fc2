//! Lua-scripted mutations for the Redis backend.
//!
//! Every multi-key write (document body, membership set, reverse references,
//! unique claims) runs inside one script so it is applied atomically.

pub mod commands;
pub mod executor;
pub mod scripts;

pub use commands::MutationCommand;
pub use executor::execute_command;
