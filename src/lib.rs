// nbexport - Notebook variant export tool
// Copyright (c) 2025 nbexport Contributors
// Licensed under the MIT License

//! # nbexport - Tagged notebook variant exporter
//!
//! nbexport turns one set of tagged development notebooks into several
//! published notebook sets: one per audience (students, teachers) and
//! language.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Embedding** locally referenced images into markdown cells
//! - **Classifying** cells by their `drop`, `keep`, audience and language tags
//! - **Projecting** a notebook onto every configured variant
//! - **Writing** the outputs to `<output_dir>/<label>/<lab>/<notebook>`
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (embed, classify, project, export)
//! - [`adapters`] - Source notebooks and output destinations
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nbexport::config::load_config_or_default;
//! use nbexport::core::export::ExportCoordinator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config_or_default("nbexport.toml")?;
//!     let matrix = config.version_matrix()?;
//!
//!     let coordinator = ExportCoordinator::from_config(&config, matrix, "L1_python_intro")?;
//!     let summary = coordinator.execute_export().await?;
//!
//!     println!("Wrote {} notebooks", summary.outputs_written);
//!     Ok(())
//! }
//! ```
//!
//! ## Projection without I/O
//!
//! The engine works on in-memory notebooks, so a single projection needs
//! no filesystem at all:
//!
//! ```rust
//! use nbexport::core::project::project;
//! use nbexport::domain::{
//!     Audience, Cell, DocumentName, Language, Notebook, OutputLabel, TagVocabulary, VariantSpec,
//! };
//!
//! let notebook = Notebook::builder()
//!     .cell(Cell::markdown("Úvod").with_tags(["sk"]))
//!     .cell(Cell::markdown("Introduction").with_tags(["en"]))
//!     .cell(Cell::markdown("Solution").with_tags(["teacher"]))
//!     .build();
//!
//! let variant = VariantSpec::new(
//!     Audience::Student,
//!     Language::new("en")?,
//!     OutputLabel::new("STUDENTS_EN")?,
//! );
//! let name = DocumentName::new("intro.ipynb")?;
//! let output = project(&name, &notebook, &variant, &TagVocabulary::default())
//!     .map_err(|e| e.to_string())?;
//!
//! assert_eq!(output.notebook.cells.len(), 1);
//! # Ok::<(), String>(())
//! ```
//!
//! ## Error Handling
//!
//! Library errors are [`domain::NbExportError`]. Per-document problems never
//! abort a run; they are collected in the
//! [`ExportSummary`](core::export::ExportSummary).

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
