//! Reconciliation of remote files onto local disk
//!
//! This module provides:
//! - **engine**: [`SyncEngine`] fetches, compares by SHA-256 and writes
//! - **report**: [`SyncReport`] with one [`ItemReport`] per file considered

mod engine;
mod report;

pub use engine::{SyncEngine, SyncOptions};
pub use report::{ItemReport, Outcome, SyncReport, WriteReason};
