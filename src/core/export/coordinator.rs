//! Export coordinator - main orchestrator for the export process
//!
//! Locates the development notebooks of a lab, runs the export engine on
//! each of them concurrently, hands the outputs to the destination writer
//! and produces the run summary.

use crate::adapters::{DestinationWriter, FsDestinationWriter, FsSourceLocator, SourceLocator};
use crate::config::NbExportConfig;
use crate::core::embed::ImageEmbedder;
use crate::core::export::checksum::calculate_checksum_bytes;
use crate::core::export::engine::ExportEngine;
use crate::core::export::summary::{DocumentFailure, ExportSummary, FailureKind, WrittenOutput};
use crate::core::matrix::VersionMatrix;
use crate::domain::{NbExportError, OutputDocument, Result};
use futures::stream::{self, StreamExt};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Export coordinator
pub struct ExportCoordinator {
    engine: Arc<ExportEngine>,
    locator: Arc<dyn SourceLocator>,
    writer: Arc<dyn DestinationWriter>,
    parallel_documents: usize,
    dry_run: bool,
}

impl ExportCoordinator {
    /// Create a new export coordinator
    pub fn new(
        engine: ExportEngine,
        locator: Arc<dyn SourceLocator>,
        writer: Arc<dyn DestinationWriter>,
    ) -> Self {
        Self {
            engine: Arc::new(engine),
            locator,
            writer,
            parallel_documents: 1,
            dry_run: false,
        }
    }

    /// Builds a filesystem coordinator for one lab directory.
    ///
    /// Outputs go to `<export.output_dir>/<label>/<lab_subdir>/`, where
    /// `lab_subdir` is `lab_dir` as given when relative (without `.` and
    /// `..` parts) and its last component when absolute.
    ///
    /// # Errors
    ///
    /// Returns [`NbExportError::Configuration`] if the variant matrix or the
    /// tag vocabulary is invalid.
    pub fn from_config(
        config: &NbExportConfig,
        matrix: VersionMatrix,
        lab_dir: impl Into<PathBuf>,
    ) -> Result<Self> {
        let lab_dir = lab_dir.into();
        let vocabulary = config.vocabulary().map_err(NbExportError::Configuration)?;

        let mut engine = ExportEngine::new(matrix, vocabulary);
        if config.export.embed_images {
            engine = engine.with_embedder(ImageEmbedder::from_filesystem());
        }

        let lab_subdir = lab_subdir(&lab_dir);
        let writer = FsDestinationWriter::new(&config.export.output_dir, lab_subdir);

        Ok(Self::new(engine, Arc::new(FsSourceLocator::new(lab_dir)), Arc::new(writer))
            .with_parallelism(config.export.parallel_documents)
            .with_dry_run(config.application.dry_run))
    }

    /// Number of documents processed at once (at least 1)
    pub fn with_parallelism(mut self, parallel_documents: usize) -> Self {
        self.parallel_documents = parallel_documents.max(1);
        self
    }

    /// Project everything but write nothing
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Execute the export
    ///
    /// 1. Locates development notebooks
    /// 2. For each of them, on a blocking worker:
    ///    - loads and parses the notebook
    ///    - embeds images, validates tags, projects every variant
    ///    - serialises and writes the outputs (unless dry run)
    /// 3. Collects results in document order and logs the summary
    ///
    /// # Errors
    ///
    /// Only a failure to list the sources is returned as an error; every
    /// per-document problem ends up in the summary.
    pub async fn execute_export(&self) -> Result<ExportSummary> {
        let start_time = Instant::now();
        let mut summary = ExportSummary::new();
        summary.dry_run = self.dry_run;

        tracing::info!(
            variants = self.engine.matrix().len(),
            parallel_documents = self.parallel_documents,
            dry_run = self.dry_run,
            "Starting export process"
        );

        let locator = Arc::clone(&self.locator);
        let paths = tokio::task::spawn_blocking(move || locator.locate())
            .await
            .map_err(|e| NbExportError::Io(format!("source listing task failed: {e}")))??;
        summary.documents_total = paths.len();

        if paths.is_empty() {
            tracing::warn!("No development notebooks found");
        }

        let results: Vec<std::result::Result<Vec<WrittenOutput>, DocumentFailure>> =
            stream::iter(paths)
                .map(|path| {
                    let engine = Arc::clone(&self.engine);
                    let locator = Arc::clone(&self.locator);
                    let writer = Arc::clone(&self.writer);
                    let dry_run = self.dry_run;
                    let fallback_name = display_name(&path);
                    async move {
                        tokio::task::spawn_blocking(move || {
                            process_document(&engine, locator.as_ref(), writer.as_ref(), &path, dry_run)
                        })
                        .await
                        .unwrap_or_else(|e| {
                            Err(DocumentFailure::new(
                                fallback_name,
                                FailureKind::Other,
                                format!("worker task failed: {e}"),
                            ))
                        })
                    }
                })
                .buffered(self.parallel_documents)
                .collect()
                .await;

        for result in results {
            match result {
                Ok(outputs) => summary.add_document_outputs(outputs),
                Err(failure) => summary.add_failure(failure),
            }
        }

        summary = summary.with_duration(start_time.elapsed());
        summary.log_summary();

        Ok(summary)
    }
}

/// Runs one document end to end. All outputs are serialised before the
/// first one is written, so a serialisation error leaves nothing behind.
fn process_document(
    engine: &ExportEngine,
    locator: &dyn SourceLocator,
    writer: &dyn DestinationWriter,
    path: &Path,
    dry_run: bool,
) -> std::result::Result<Vec<WrittenOutput>, DocumentFailure> {
    let document = locator
        .load(path)
        .map_err(|e| DocumentFailure::from_error(display_name(path), &e))?;
    let name = document.name.to_string();

    crate::log_document_start!(name, engine.matrix().len());

    let outputs = engine.export_document(&document).map_err(|e| {
        crate::log_error_with_context!(&e, name.as_str());
        DocumentFailure::from_error(name.as_str(), &e)
    })?;

    let serialised = outputs
        .into_iter()
        .map(|output| -> Result<(OutputDocument, Vec<u8>)> {
            let bytes = output.to_ipynb_bytes()?;
            Ok((output, bytes))
        })
        .collect::<Result<Vec<(OutputDocument, Vec<u8>)>>>()
        .map_err(|e| DocumentFailure::from_error(name.as_str(), &e))?;

    let mut written = Vec::with_capacity(serialised.len());
    for (output, bytes) in serialised {
        let location = if dry_run {
            format!("{}/{}", output.label, output.document)
        } else {
            writer
                .write(&output, &bytes)
                .map_err(|e| DocumentFailure::from_error(name.as_str(), &e).as_write())?
        };
        crate::log_variant_written!(output.document, output.label, location);

        written.push(WrittenOutput {
            checksum: calculate_checksum_bytes(&bytes),
            bytes: bytes.len(),
            document: output.document,
            label: output.label,
            location,
        });
    }

    Ok(written)
}

fn lab_subdir(lab_dir: &Path) -> PathBuf {
    if lab_dir.is_relative() {
        lab_dir
            .components()
            .filter(|c| matches!(c, Component::Normal(_)))
            .collect()
    } else {
        lab_dir.file_name().map(PathBuf::from).unwrap_or_default()
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
