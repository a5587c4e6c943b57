//! Core business logic for nbexport.
//!
//! # Modules
//!
//! - [`classify`] - Per-cell inclusion and output-clearing decisions
//! - [`embed`] - Inlining of locally referenced images
//! - [`project`] - Building one output notebook per variant
//! - [`matrix`] - Resolving the configured variants
//! - [`export`] - Engine, concurrent coordinator and summary
//!
//! # Export Workflow
//!
//! 1. **Resolve**: validate the configured variants into a [`matrix::VersionMatrix`]
//! 2. **Locate**: list the development notebooks of a lab
//! 3. **Embed**: inline images once per document
//! 4. **Validate**: reject cells with conflicting tags
//! 5. **Project**: one fresh notebook per variant
//! 6. **Write**: hand every output to the destination writer
//! 7. **Report**: generate the export summary
//!
//! # Example
//!
//! ```rust,no_run
//! use nbexport::config::load_config;
//! use nbexport::core::export::ExportCoordinator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("nbexport.toml")?;
//! let matrix = config.version_matrix()?;
//!
//! let coordinator = ExportCoordinator::from_config(&config, matrix, "labs/lab01")?;
//! let summary = coordinator.execute_export().await?;
//!
//! println!("Documents: {}", summary.documents_total);
//! println!("Outputs: {}", summary.outputs_written);
//! println!("Failed: {}", summary.documents_failed);
//! # Ok(())
//! # }
//! ```

pub mod classify;
pub mod embed;
pub mod export;
pub mod matrix;
pub mod project;
