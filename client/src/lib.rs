//! Client-side provisioning and submission for the PriceDB program.
//!
//! Includes the idempotent provisioning orchestrator, the retrying
//! transaction submitter, the persisted configuration store, and the
//! high-level keeper operations.

pub mod chain;
pub mod config;
pub mod logs;
pub mod operations;
pub mod provision;
pub mod secret;
pub mod submit;
pub mod testing;

pub use logs::LogColor;
