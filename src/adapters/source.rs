//! Source locator
//!
//! Finds the development notebooks of one lab directory and loads them.

use crate::domain::{DevelopmentDocument, DocumentName, NbExportError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File extension of development notebooks
pub const NOTEBOOK_EXTENSION: &str = "ipynb";

/// Supplies the development documents of an export run
///
/// Implementations are called from blocking worker threads.
pub trait SourceLocator: Send + Sync {
    /// Paths of the notebooks to export, in processing order
    ///
    /// # Errors
    ///
    /// Returns an error if the source location cannot be listed. This is
    /// fatal for the run.
    fn locate(&self) -> Result<Vec<PathBuf>>;

    /// Loads one located notebook
    ///
    /// # Errors
    ///
    /// Returns [`NbExportError::Notebook`] if the file cannot be read or parsed.
    fn load(&self, path: &Path) -> Result<DevelopmentDocument> {
        load_document(path)
    }
}

/// Lists `*.ipynb` files directly inside a lab directory.
///
/// Files whose name starts with `_` are scratch notebooks and are skipped.
#[derive(Debug, Clone)]
pub struct FsSourceLocator {
    lab_dir: PathBuf,
}

impl FsSourceLocator {
    /// Creates a locator for `lab_dir`
    pub fn new(lab_dir: impl Into<PathBuf>) -> Self {
        Self {
            lab_dir: lab_dir.into(),
        }
    }

    /// The directory being scanned
    pub fn lab_dir(&self) -> &Path {
        &self.lab_dir
    }
}

impl SourceLocator for FsSourceLocator {
    fn locate(&self) -> Result<Vec<PathBuf>> {
        if !self.lab_dir.is_dir() {
            return Err(NbExportError::Io(format!(
                "Lab directory not found: {}",
                self.lab_dir.display()
            )));
        }

        let mut paths = Vec::new();
        for entry in WalkDir::new(&self.lab_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| NbExportError::Io(e.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let is_notebook = path
                .extension()
                .is_some_and(|ext| ext == NOTEBOOK_EXTENSION);
            let is_private = DocumentName::new(entry.file_name().to_string_lossy())
                .is_ok_and(|name| name.is_private());

            if !is_notebook {
                continue;
            }
            if is_private {
                tracing::debug!(path = %path.display(), "Skipping private notebook");
                continue;
            }
            paths.push(path.to_path_buf());
        }

        tracing::info!(
            lab_dir = %self.lab_dir.display(),
            count = paths.len(),
            "Located development notebooks"
        );
        Ok(paths)
    }
}

/// Reads and parses a development notebook from disk
///
/// # Errors
///
/// Returns [`NbExportError::Notebook`] naming the file if it cannot be read
/// or is not a valid notebook.
pub fn load_document(path: &Path) -> Result<DevelopmentDocument> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = DocumentName::new(file_name.clone()).map_err(|e| NbExportError::Notebook {
        document: path.display().to_string(),
        message: e,
    })?;

    let json = fs::read_to_string(path).map_err(|e| NbExportError::Notebook {
        document: file_name,
        message: format!("cannot read {}: {e}", path.display()),
    })?;

    let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    DevelopmentDocument::from_json(name, &json, base_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const EMPTY_NOTEBOOK: &str = r#"{"cells": [], "metadata": {}, "nbformat": 4, "nbformat_minor": 5}"#;

    #[test]
    fn test_locate_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        for name in ["b.ipynb", "a.ipynb", "_scratch.ipynb", "notes.md"] {
            fs::write(dir.path().join(name), EMPTY_NOTEBOOK).unwrap();
        }
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/c.ipynb"), EMPTY_NOTEBOOK).unwrap();

        let paths = FsSourceLocator::new(dir.path()).locate().unwrap();
        let names: Vec<String> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.ipynb", "b.ipynb"]);
    }

    #[test]
    fn test_locate_missing_directory() {
        let dir = TempDir::new().unwrap();
        let result = FsSourceLocator::new(dir.path().join("nope")).locate();
        assert!(result.is_err());
    }

    #[test]
    fn test_load_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("intro.ipynb");
        fs::write(&path, EMPTY_NOTEBOOK).unwrap();

        let doc = load_document(&path).unwrap();
        assert_eq!(doc.name.as_str(), "intro.ipynb");
        assert_eq!(doc.base_dir(), dir.path());
    }

    #[test]
    fn test_load_invalid_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.ipynb");
        fs::write(&path, "{").unwrap();

        let err = load_document(&path).unwrap_err();
        assert_eq!(err.document(), Some("broken.ipynb"));
    }
}
