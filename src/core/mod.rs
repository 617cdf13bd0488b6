//! Core sync logic.
//!
//! This module contains:
//! - Categories: built-in and configured category definitions
//! - Orchestrator: per-category fetch, enrichment and batch execution

pub mod categories;
pub mod orchestrator;

pub use categories::{CategoryDef, CategoryError};
pub use orchestrator::{
    BatchReport, CategoryOutcome, CategoryStatus, Orchestrator, DEFAULT_CONCURRENCY,
};
