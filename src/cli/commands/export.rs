//! Export command implementation
//!
//! This module implements the `export` command: project every development
//! notebook of a lab directory onto the configured variants.

use crate::config::load_config_or_default;
use crate::core::export::{ExportCoordinator, ExportSummary};
use clap::Args;
use std::path::Path;

/// Maximum number of failures listed in the printed summary
const MAX_LISTED_FAILURES: usize = 20;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Directory with the tagged notebooks, e.g. "L1_python_intro"
    #[arg(short = 's', long, value_name = "LAB_SUBDIR")]
    pub lab_subdir: String,

    /// Root directory for exported notebooks (overrides export.output_dir)
    #[arg(short = 'o', long)]
    pub outdir: Option<String>,

    /// Do not embed images into the exported notebooks
    #[arg(short = 'd', long)]
    pub no_image_embed: bool,

    /// Dry run mode - project every notebook but write nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Export only these variant labels (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub variant: Vec<String>,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(lab_subdir = %self.lab_subdir, "Starting export command");

        let mut config = match load_config_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("{e}");
                return Ok(2);
            }
        };

        // Apply CLI overrides
        if let Some(outdir) = &self.outdir {
            tracing::info!(outdir = %outdir, "Overriding output directory from CLI");
            config.export.output_dir = outdir.clone();
        }
        if self.no_image_embed {
            tracing::info!("Disabling image embedding from CLI");
            config.export.embed_images = false;
        }
        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        let matrix = match config.version_matrix() {
            Ok(m) if self.variant.is_empty() => m,
            Ok(m) => match m.select(self.variant.as_slice()) {
                Ok(selected) => selected,
                Err(e) => {
                    eprintln!("{e}");
                    return Ok(2);
                }
            },
            Err(e) => {
                eprintln!("Invalid variants: {e}");
                return Ok(2);
            }
        };

        let coordinator =
            match ExportCoordinator::from_config(&config, matrix.clone(), &self.lab_subdir) {
                Ok(c) => c,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to create export coordinator");
                    eprintln!("Failed to initialize export: {e}");
                    return Ok(2);
                }
            };

        if config.application.dry_run {
            println!("🔍 DRY RUN MODE - No notebooks will be written");
            println!();
        }

        println!("🚀 Exporting '{}'", self.lab_subdir);
        for variant in matrix.variants() {
            println!("  - {variant}");
        }
        if !config.export.embed_images {
            println!("  (image embedding disabled)");
        }
        println!();

        let summary = match coordinator.execute_export().await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Export failed");
                eprintln!("Export failed: {e}");
                return Ok(5);
            }
        };

        print_summary(&summary, Path::new(&config.export.output_dir));

        let exit_code = if summary.is_successful() {
            println!("✅ Export completed successfully!");
            0
        } else {
            println!("⚠️  Export completed with failures");
            1
        };

        Ok(exit_code)
    }
}

fn print_summary(summary: &ExportSummary, output_dir: &Path) {
    println!("📊 Export Summary:");
    println!("  Documents: {}", summary.documents_total);
    println!("  Succeeded: {}", summary.documents_succeeded);
    println!("  Failed: {}", summary.documents_failed);
    if summary.dry_run {
        println!("  Outputs (not written): {}", summary.outputs_written);
    } else {
        println!("  Outputs written: {}", summary.outputs_written);
        println!("  Output directory: {}", output_dir.display());
    }
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!("  Success Rate: {:.2}%", summary.success_rate());
    println!();

    if !summary.failures.is_empty() {
        println!("⚠️  Failed documents:");
        for failure in summary.failures.iter().take(MAX_LISTED_FAILURES) {
            println!("  - {} [{}]", failure.document, failure.kind);
            println!("    {}", failure.message);
        }
        if summary.failures.len() > MAX_LISTED_FAILURES {
            println!(
                "  ... and {} more",
                summary.failures.len() - MAX_LISTED_FAILURES
            );
        }
        println!();
    }
}
