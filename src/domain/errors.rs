//! Domain error types
//!
//! This module defines the error hierarchy for nbexport. Errors that are
//! fatal for a single document carry the document name (and, where it
//! applies, the offending reference or cell) so a failed batch can point
//! the author at the exact notebook to fix.

use thiserror::Error;

/// Main nbexport error type
///
/// This is the primary error type used throughout the library.
#[derive(Debug, Error)]
pub enum NbExportError {
    /// Malformed or duplicate variant specification, invalid configuration.
    /// Fatal for the whole batch.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An image referenced by a notebook cannot be located or read
    #[error("Missing asset in '{document}': cannot read image '{reference}': {reason}")]
    MissingAsset {
        document: String,
        reference: String,
        reason: String,
    },

    /// An image reference whose file type has no known MIME type
    #[error("Unsupported image in '{document}': no MIME type known for '{reference}'")]
    UnsupportedImage { document: String, reference: String },

    /// A cell carries more than one tag of the same axis
    #[error(
        "Ambiguous tags in '{document}', cell {cell_index}{}: {}",
        .cell_id.as_deref().map(|id| format!(" (id {id})")).unwrap_or_default(),
        .tags.join(", ")
    )]
    AmbiguousTag {
        document: String,
        cell_index: usize,
        cell_id: Option<String>,
        tags: Vec<String>,
    },

    /// A development notebook could not be parsed
    #[error("Invalid notebook '{document}': {message}")]
    Notebook { document: String, message: String },

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl NbExportError {
    /// Name of the document this error belongs to, if it is document-scoped
    pub fn document(&self) -> Option<&str> {
        match self {
            Self::MissingAsset { document, .. }
            | Self::UnsupportedImage { document, .. }
            | Self::AmbiguousTag { document, .. }
            | Self::Notebook { document, .. } => Some(document),
            _ => None,
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for NbExportError {
    fn from(err: std::io::Error) -> Self {
        NbExportError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for NbExportError {
    fn from(err: serde_json::Error) -> Self {
        NbExportError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for NbExportError {
    fn from(err: toml::de::Error) -> Self {
        NbExportError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_display() {
        let err = NbExportError::Configuration("duplicate label 'X'".to_string());
        assert_eq!(err.to_string(), "Configuration error: duplicate label 'X'");
    }

    #[test]
    fn test_missing_asset_names_document_and_reference() {
        let err = NbExportError::MissingAsset {
            document: "intro.ipynb".to_string(),
            reference: "img/plot.png".to_string(),
            reason: "No such file or directory".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("intro.ipynb"));
        assert!(msg.contains("img/plot.png"));
        assert_eq!(err.document(), Some("intro.ipynb"));
    }

    #[test]
    fn test_ambiguous_tag_display_with_cell_id() {
        let err = NbExportError::AmbiguousTag {
            document: "loops.ipynb".to_string(),
            cell_index: 3,
            cell_id: Some("a1b2".to_string()),
            tags: vec!["en".to_string(), "sk".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Ambiguous tags in 'loops.ipynb', cell 3 (id a1b2): en, sk"
        );
    }

    #[test]
    fn test_ambiguous_tag_display_without_cell_id() {
        let err = NbExportError::AmbiguousTag {
            document: "loops.ipynb".to_string(),
            cell_index: 0,
            cell_id: None,
            tags: vec!["student".to_string(), "teacher".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Ambiguous tags in 'loops.ipynb', cell 0: student, teacher"
        );
    }

    #[test]
    fn test_batch_scoped_errors_have_no_document() {
        let err = NbExportError::Configuration("bad".to_string());
        assert!(err.document().is_none());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: NbExportError = io_err.into();
        assert!(matches!(err, NbExportError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: NbExportError = json_err.into();
        assert!(matches!(err, NbExportError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: NbExportError = toml_err.into();
        assert!(matches!(err, NbExportError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }
}
