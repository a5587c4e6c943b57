//! Export summary and reporting
//!
//! This module defines structures for tracking and reporting export results.

use crate::domain::{DocumentName, NbExportError, OutputLabel};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Information about one output notebook handed to the writer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenOutput {
    /// Development document it came from
    pub document: DocumentName,

    /// Variant label
    pub label: OutputLabel,

    /// Where the writer put it (a path for the filesystem writer)
    pub location: String,

    /// SHA-256 of the serialised notebook
    pub checksum: String,

    /// Serialised size in bytes
    pub bytes: usize,
}

/// Summary of an export operation
#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    /// When the run started
    pub started_at: DateTime<Utc>,

    /// Development documents found by the source locator
    pub documents_total: usize,

    /// Documents whose every variant was produced
    pub documents_succeeded: usize,

    /// Documents that produced no output
    pub documents_failed: usize,

    /// Output notebooks written (or, in a dry run, that would be written)
    pub outputs_written: usize,

    /// Nothing was written
    pub dry_run: bool,

    /// Duration of the export
    #[serde(with = "duration_ms")]
    pub duration: Duration,

    /// Produced outputs, in document then variant order
    pub outputs: Vec<WrittenOutput>,

    /// Failed documents, in document order
    pub failures: Vec<DocumentFailure>,
}

impl ExportSummary {
    /// Create a new empty export summary
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            documents_total: 0,
            documents_succeeded: 0,
            documents_failed: 0,
            outputs_written: 0,
            dry_run: false,
            duration: Duration::from_secs(0),
            outputs: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Record the outputs of a document that succeeded
    pub fn add_document_outputs(&mut self, outputs: Vec<WrittenOutput>) {
        self.documents_succeeded += 1;
        self.outputs_written += outputs.len();
        self.outputs.extend(outputs);
    }

    /// Record a failed document
    pub fn add_failure(&mut self, failure: DocumentFailure) {
        self.documents_failed += 1;
        self.failures.push(failure);
    }

    /// Check if the export was successful (no failures)
    pub fn is_successful(&self) -> bool {
        self.documents_failed == 0 && self.failures.is_empty()
    }

    /// Get success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.documents_total == 0 {
            return 100.0;
        }
        (self.documents_succeeded as f64 / self.documents_total as f64) * 100.0
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            documents_total = self.documents_total,
            succeeded = self.documents_succeeded,
            failed = self.documents_failed,
            outputs_written = self.outputs_written,
            dry_run = self.dry_run,
            duration_ms = self.duration.as_millis() as u64,
            success_rate = format!("{:.2}%", self.success_rate()),
            "Export completed"
        );

        if !self.failures.is_empty() {
            tracing::warn!(
                failure_count = self.failures.len(),
                "Export completed with failures"
            );
            for failure in &self.failures {
                tracing::warn!(
                    document = %failure.document,
                    kind = %failure.kind,
                    message = %failure.message,
                    "Document failed"
                );
            }
        }
    }
}

impl Default for ExportSummary {
    fn default() -> Self {
        Self::new()
    }
}

/// Why a document failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// A referenced image could not be read
    MissingAsset,
    /// A referenced image has an unknown file type
    UnsupportedImage,
    /// A cell carries conflicting tags
    AmbiguousTag,
    /// The development notebook could not be read or parsed
    Notebook,
    /// An output could not be written
    Write,
    /// Anything else
    Other,
}

impl FailureKind {
    /// Classifies an engine error
    pub fn of(error: &NbExportError) -> Self {
        match error {
            NbExportError::MissingAsset { .. } => FailureKind::MissingAsset,
            NbExportError::UnsupportedImage { .. } => FailureKind::UnsupportedImage,
            NbExportError::AmbiguousTag { .. } => FailureKind::AmbiguousTag,
            NbExportError::Notebook { .. } => FailureKind::Notebook,
            _ => FailureKind::Other,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::MissingAsset => "missing asset",
            FailureKind::UnsupportedImage => "unsupported image",
            FailureKind::AmbiguousTag => "ambiguous tag",
            FailureKind::Notebook => "invalid notebook",
            FailureKind::Write => "write failed",
            FailureKind::Other => "error",
        };
        f.write_str(name)
    }
}

/// A document that produced no output, and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentFailure {
    /// Document name (file name for documents that could not be loaded)
    pub document: String,

    /// Failure classification
    pub kind: FailureKind,

    /// Error message
    pub message: String,
}

impl DocumentFailure {
    /// Create a new document failure
    pub fn new(document: impl Into<String>, kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            kind,
            message: message.into(),
        }
    }

    /// Builds a failure from an engine error
    pub fn from_error(document: impl Into<String>, error: &NbExportError) -> Self {
        Self::new(document, FailureKind::of(error), error.to_string())
    }

    /// Marks the failure as a write failure
    pub fn as_write(mut self) -> Self {
        self.kind = FailureKind::Write;
        self
    }
}

impl fmt::Display for DocumentFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.document, self.kind, self.message)
    }
}

mod duration_ms {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(document: &str, label: &str) -> WrittenOutput {
        WrittenOutput {
            document: DocumentName::new(document).unwrap(),
            label: OutputLabel::new(label).unwrap(),
            location: format!("{label}/{document}"),
            checksum: "0".repeat(64),
            bytes: 10,
        }
    }

    #[test]
    fn test_export_summary_creation() {
        let summary = ExportSummary::new();

        assert_eq!(summary.documents_total, 0);
        assert_eq!(summary.documents_succeeded, 0);
        assert_eq!(summary.documents_failed, 0);
        assert_eq!(summary.outputs_written, 0);
        assert_eq!(summary.duration, Duration::from_secs(0));
        assert!(summary.failures.is_empty());
        assert!(summary.is_successful());
    }

    #[test]
    fn test_export_summary_with_duration() {
        let summary = ExportSummary::new().with_duration(Duration::from_secs(120));
        assert_eq!(summary.duration, Duration::from_secs(120));
    }

    #[test]
    fn test_add_document_outputs_and_failure() {
        let mut summary = ExportSummary::new();
        summary.documents_total = 2;
        summary.add_document_outputs(vec![
            written("a.ipynb", "STUDENTS_EN"),
            written("a.ipynb", "TEACHERS_EN"),
        ]);
        summary.add_failure(DocumentFailure::new(
            "b.ipynb",
            FailureKind::MissingAsset,
            "img/x.png",
        ));

        assert_eq!(summary.documents_succeeded, 1);
        assert_eq!(summary.documents_failed, 1);
        assert_eq!(summary.outputs_written, 2);
        assert!(!summary.is_successful());
        assert_eq!(summary.success_rate(), 50.0);
    }

    #[test]
    fn test_success_rate_empty_run() {
        assert_eq!(ExportSummary::new().success_rate(), 100.0);
    }

    #[test]
    fn test_failure_kind_of_error() {
        let err = NbExportError::UnsupportedImage {
            document: "a.ipynb".to_string(),
            reference: "x.pdf".to_string(),
        };
        assert_eq!(FailureKind::of(&err), FailureKind::UnsupportedImage);
        assert_eq!(
            FailureKind::of(&NbExportError::Io("disk".to_string())),
            FailureKind::Other
        );

        let failure = DocumentFailure::from_error("a.ipynb", &err);
        assert_eq!(failure.kind, FailureKind::UnsupportedImage);
        assert!(failure.message.contains("x.pdf"));
        assert_eq!(failure.as_write().kind, FailureKind::Write);
    }

    #[test]
    fn test_summary_serializes() {
        let mut summary = ExportSummary::new().with_duration(Duration::from_millis(1500));
        summary.add_document_outputs(vec![written("a.ipynb", "STUDENTS_EN")]);
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["duration"], 1500);
        assert_eq!(value["outputs"][0]["label"], "STUDENTS_EN");
    }
}
