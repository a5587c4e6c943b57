//! Export orchestration
//!
//! This module provides the export pipeline, including:
//! - The synchronous per-document engine (embed, validate, project)
//! - Concurrent coordination over a lab directory
//! - Checksums, summary and reporting

pub mod checksum;
pub mod coordinator;
pub mod engine;
pub mod summary;

pub use coordinator::ExportCoordinator;
pub use engine::{ExportEngine, ExportOutcome};
pub use summary::{DocumentFailure, ExportSummary, FailureKind, WrittenOutput};
