//! Development and output documents

use super::errors::NbExportError;
use super::ids::{DocumentName, OutputLabel};
use super::notebook::Notebook;
use super::result::Result;
use std::path::{Path, PathBuf};

/// An authored notebook with every language and audience interleaved.
///
/// Read-only input to the engine; relative image paths inside it are
/// resolved against `base_dir`.
#[derive(Debug, Clone, PartialEq)]
pub struct DevelopmentDocument {
    /// File name of the notebook
    pub name: DocumentName,
    /// Parsed notebook
    pub notebook: Notebook,
    /// Directory containing the notebook
    pub base_dir: PathBuf,
}

impl DevelopmentDocument {
    /// Creates a development document
    pub fn new(name: DocumentName, notebook: Notebook, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            name,
            notebook,
            base_dir: base_dir.into(),
        }
    }

    /// Parses notebook JSON into a development document
    ///
    /// # Errors
    ///
    /// Returns [`NbExportError::Notebook`] naming the document if the JSON is
    /// not a valid nbformat v4 notebook.
    pub fn from_json(name: DocumentName, json: &str, base_dir: impl Into<PathBuf>) -> Result<Self> {
        let notebook = Notebook::from_json(json).map_err(|e| NbExportError::Notebook {
            document: name.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self::new(name, notebook, base_dir))
    }

    /// Directory relative image paths are resolved against
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

/// One projected notebook for one (document, variant) pair
#[derive(Debug, Clone, PartialEq)]
pub struct OutputDocument {
    /// Label of the variant that produced it
    pub label: OutputLabel,
    /// Name of the development document it was projected from
    pub document: DocumentName,
    /// Projected notebook
    pub notebook: Notebook,
}

impl OutputDocument {
    /// Serialised `.ipynb` bytes
    pub fn to_ipynb_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.notebook.to_ipynb_bytes()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_from_json_valid() {
        let name = DocumentName::from_str("intro.ipynb").unwrap();
        let doc = DevelopmentDocument::from_json(
            name,
            r#"{"cells": [], "metadata": {}, "nbformat": 4, "nbformat_minor": 5}"#,
            "lab",
        )
        .unwrap();
        assert!(doc.notebook.cells.is_empty());
        assert_eq!(doc.base_dir(), Path::new("lab"));
    }

    #[test]
    fn test_from_json_invalid_names_document() {
        let name = DocumentName::from_str("broken.ipynb").unwrap();
        let err = DevelopmentDocument::from_json(name, "{not json", "lab").unwrap_err();
        assert!(matches!(err, NbExportError::Notebook { .. }));
        assert_eq!(err.document(), Some("broken.ipynb"));
    }
}
