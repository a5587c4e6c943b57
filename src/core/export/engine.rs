//! Export engine
//!
//! The synchronous heart of an export run. For each development document:
//!
//! 1. embed images once (optional),
//! 2. check every cell for conflicting tags,
//! 3. project the embedded notebook onto every variant of the matrix.
//!
//! A document either yields one output per variant or none at all. A
//! failing document never stops the others.

use crate::core::classify::validate_tags;
use crate::core::embed::ImageEmbedder;
use crate::core::export::summary::DocumentFailure;
use crate::core::matrix::VersionMatrix;
use crate::core::project::project;
use crate::domain::{DevelopmentDocument, OutputDocument, Result, TagVocabulary};
use std::borrow::Cow;

/// Result of exporting a batch of documents
#[derive(Debug, Clone, Default)]
pub struct ExportOutcome {
    /// Outputs of every successful document, in document then variant order
    pub outputs: Vec<OutputDocument>,

    /// One entry per failed document, in document order
    pub failures: Vec<DocumentFailure>,
}

impl ExportOutcome {
    /// True when no document failed
    pub fn is_successful(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Projects development documents onto a version matrix
#[derive(Debug, Clone)]
pub struct ExportEngine {
    embedder: Option<ImageEmbedder>,
    matrix: VersionMatrix,
    vocabulary: TagVocabulary,
}

impl ExportEngine {
    /// Creates an engine that projects without embedding images
    pub fn new(matrix: VersionMatrix, vocabulary: TagVocabulary) -> Self {
        Self {
            embedder: None,
            matrix,
            vocabulary,
        }
    }

    /// Embeds images with `embedder` before projecting
    pub fn with_embedder(mut self, embedder: ImageEmbedder) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// The variants every document is projected onto
    pub fn matrix(&self) -> &VersionMatrix {
        &self.matrix
    }

    /// Runs the whole pipeline for one document.
    ///
    /// # Errors
    ///
    /// Returns the first document-level error: a missing or unsupported image
    /// or an ambiguously tagged cell. No outputs are returned in that case.
    pub fn export_document(&self, document: &DevelopmentDocument) -> Result<Vec<OutputDocument>> {
        let notebook = match &self.embedder {
            Some(embedder) => Cow::Owned(embedder.embed(document)?),
            None => Cow::Borrowed(&document.notebook),
        };

        validate_tags(document.name.as_str(), &notebook, &self.vocabulary)?;

        self.matrix
            .variants()
            .iter()
            .map(|variant| project(&document.name, &notebook, variant, &self.vocabulary))
            .collect()
    }

    /// Exports every document, collecting outputs and per-document failures
    pub fn export(&self, documents: &[DevelopmentDocument]) -> ExportOutcome {
        let mut outcome = ExportOutcome::default();

        for document in documents {
            crate::log_document_start!(document.name, self.matrix.len());
            match self.export_document(document) {
                Ok(outputs) => outcome.outputs.extend(outputs),
                Err(e) => {
                    tracing::warn!(document = %document.name, error = %e, "Document failed");
                    outcome
                        .failures
                        .push(DocumentFailure::from_error(document.name.as_str(), &e));
                }
            }
        }

        outcome
    }
}
