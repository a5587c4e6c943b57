//! Configuration management for nbexport.
//!
//! This module provides TOML-based configuration loading, parsing, and
//! validation.
//!
//! # Overview
//!
//! nbexport uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `NBEXPORT_*` environment overrides
//! - Default values for every setting
//! - Validation, including the variant matrix
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use nbexport::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("nbexport.toml")?;
//!
//! println!("Output directory: {}", config.export.output_dir);
//! for variant in &config.variants {
//!     println!("{} ({}, {})", variant.label, variant.audience, variant.language);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level and dry-run mode
//! - [`ExportConfig`] - Output directory, image embedding, parallelism
//! - [`TagsConfig`] - Language tags
//! - [`VariantConfig`] - One `[[variants]]` entry
//! - [`LoggingConfig`] - Log files
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [export]
//! output_dir = "${COURSE_ROOT}/DRIVE_MATERIAL"
//! embed_images = true
//! parallel_documents = 4
//!
//! [tags]
//! languages = ["en", "sk"]
//!
//! [[variants]]
//! label = "STUDENTS_SK"
//! audience = "student"
//! language = "sk"
//!
//! [[variants]]
//! label = "TEACHERS_EN"
//! audience = "teacher"
//! language = "en"
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::{load_config, load_config_or_default, DEFAULT_CONFIG_FILE};
pub use schema::{
    ApplicationConfig, ExportConfig, LoggingConfig, NbExportConfig, TagsConfig, VariantConfig,
};
