//! Configuration schema types
//!
//! This module defines the configuration structure for nbexport.

use crate::core::matrix::{self, VersionMatrix};
use crate::domain::ids::Language;
use crate::domain::TagVocabulary;
use serde::{Deserialize, Serialize};

/// Main nbexport configuration
///
/// This is the root configuration structure that maps to the TOML file.
/// Every section is optional; a missing section takes its defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NbExportConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Tag vocabulary
    #[serde(default)]
    pub tags: TagsConfig,

    /// Ordered variant list (`[[variants]]` tables)
    #[serde(default = "default_variants")]
    pub variants: Vec<VariantConfig>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl NbExportConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.export.validate()?;
        self.logging.validate()?;
        self.version_matrix()?;
        Ok(())
    }

    /// Language vocabulary from the `[tags]` section
    ///
    /// # Errors
    ///
    /// Returns an error if the language list is empty, repeats a code or
    /// uses a reserved tag
    pub fn vocabulary(&self) -> Result<TagVocabulary, String> {
        self.tags.vocabulary()
    }

    /// Resolves the configured variants against the vocabulary
    ///
    /// # Errors
    ///
    /// Returns an error describing the first malformed or duplicate variant
    pub fn version_matrix(&self) -> Result<VersionMatrix, String> {
        let vocabulary = self.vocabulary()?;
        matrix::resolve(&self.variants, &vocabulary).map_err(|e| e.to_string())
    }
}

impl Default for NbExportConfig {
    fn default() -> Self {
        Self {
            application: ApplicationConfig::default(),
            export: ExportConfig::default(),
            tags: TagsConfig::default(),
            variants: default_variants(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode (project everything, write nothing)
    #[serde(default)]
    pub dry_run: bool,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

/// Export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Root directory output notebooks are written under
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Inline locally referenced images before projection
    #[serde(default = "default_true")]
    pub embed_images: bool,

    /// Number of documents processed concurrently
    #[serde(default = "default_parallel_documents")]
    pub parallel_documents: usize,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.output_dir.trim().is_empty() {
            return Err("export.output_dir cannot be empty".to_string());
        }

        if self.parallel_documents == 0 || self.parallel_documents > 64 {
            return Err(format!(
                "export.parallel_documents must be between 1 and 64, got {}",
                self.parallel_documents
            ));
        }

        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            embed_images: true,
            parallel_documents: default_parallel_documents(),
        }
    }
}

/// Tag vocabulary configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagsConfig {
    /// Language tags, in declaration order
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,
}

impl TagsConfig {
    fn vocabulary(&self) -> Result<TagVocabulary, String> {
        let languages = self
            .languages
            .iter()
            .map(|code| Language::new(code.as_str()).map_err(|e| format!("tags.languages: {e}")))
            .collect::<Result<Vec<_>, String>>()?;
        TagVocabulary::new(languages).map_err(|e| format!("tags.languages: {e}"))
    }
}

impl Default for TagsConfig {
    fn default() -> Self {
        Self {
            languages: default_languages(),
        }
    }
}

/// One `[[variants]]` entry as written in the file.
///
/// Fields stay plain strings here; [`crate::core::matrix::resolve`] turns
/// them into typed variant specifications and reports what is wrong.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantConfig {
    /// Output label, used as the output directory name
    #[serde(default)]
    pub label: String,

    /// `student` or `teacher`
    #[serde(default)]
    pub audience: String,

    /// Language code from the tag vocabulary
    #[serde(default)]
    pub language: String,
}

impl VariantConfig {
    /// Creates a variant entry
    pub fn new(label: &str, audience: &str, language: &str) -> Self {
        Self {
            label: label.to_string(),
            audience: audience.to_string(),
            language: language.to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_output_dir() -> String {
    "DRIVE_MATERIAL".to_string()
}

fn default_parallel_documents() -> usize {
    4
}

fn default_languages() -> Vec<String> {
    vec!["en".to_string(), "sk".to_string()]
}

/// The three variants course material is published in
pub fn default_variants() -> Vec<VariantConfig> {
    vec![
        VariantConfig::new("STUDENTS_SK", "student", "sk"),
        VariantConfig::new("STUDENTS_EN", "student", "en"),
        VariantConfig::new("TEACHERS_EN", "teacher", "en"),
    ]
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
