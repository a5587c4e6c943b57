//! Destination writers
//!
//! Receive serialised output notebooks. The filesystem writer files them
//! as `<output_dir>/<label>/<lab_subdir>/<document name>`.

use crate::domain::{NbExportError, OutputDocument, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Persists output notebooks
///
/// Implementations are called from blocking worker threads.
pub trait DestinationWriter: Send + Sync {
    /// Stores `bytes` (the serialised `output`) and returns where it went
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be stored.
    fn write(&self, output: &OutputDocument, bytes: &[u8]) -> Result<String>;
}

/// Writes output notebooks below a root directory
#[derive(Debug, Clone)]
pub struct FsDestinationWriter {
    output_dir: PathBuf,
    lab_subdir: PathBuf,
}

impl FsDestinationWriter {
    /// Creates a writer for `output_dir`, filing outputs under `lab_subdir`
    pub fn new(output_dir: impl Into<PathBuf>, lab_subdir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            lab_subdir: lab_subdir.into(),
        }
    }

    /// Path an output document is written to
    pub fn output_path(&self, output: &OutputDocument) -> PathBuf {
        self.output_dir
            .join(output.label.as_str())
            .join(&self.lab_subdir)
            .join(output.document.as_str())
    }
}

impl DestinationWriter for FsDestinationWriter {
    fn write(&self, output: &OutputDocument, bytes: &[u8]) -> Result<String> {
        let path = self.output_path(output);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| write_error(parent, e))?;
        }
        fs::write(&path, bytes).map_err(|e| write_error(&path, e))?;
        Ok(path.display().to_string())
    }
}

fn write_error(path: &Path, err: std::io::Error) -> NbExportError {
    NbExportError::Io(format!("cannot write {}: {err}", path.display()))
}

/// Keeps outputs in memory, keyed `<label>/<document name>`
#[derive(Debug, Default)]
pub struct MemoryWriter {
    written: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemoryWriter {
    /// Creates an empty writer
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, in write order
    pub fn written(&self) -> Vec<(String, Vec<u8>)> {
        self.written
            .lock()
            .map(|w| w.clone())
            .unwrap_or_default()
    }

    /// Bytes stored under `key`
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.written()
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, bytes)| bytes)
    }
}

impl DestinationWriter for MemoryWriter {
    fn write(&self, output: &OutputDocument, bytes: &[u8]) -> Result<String> {
        let key = format!("{}/{}", output.label, output.document);
        self.written
            .lock()
            .map_err(|_| NbExportError::Io("memory writer lock poisoned".to_string()))?
            .push((key.clone(), bytes.to_vec()));
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DocumentName, Notebook, OutputLabel};
    use tempfile::TempDir;

    fn output() -> OutputDocument {
        OutputDocument {
            label: OutputLabel::new("STUDENTS_EN").unwrap(),
            document: DocumentName::new("intro.ipynb").unwrap(),
            notebook: Notebook::builder().build(),
        }
    }

    #[test]
    fn test_fs_writer_layout() {
        let dir = TempDir::new().unwrap();
        let writer = FsDestinationWriter::new(dir.path(), "lab01");
        let out = output();
        let bytes = out.to_ipynb_bytes().unwrap();

        let location = writer.write(&out, &bytes).unwrap();

        let expected = dir.path().join("STUDENTS_EN").join("lab01").join("intro.ipynb");
        assert_eq!(location, expected.display().to_string());
        assert_eq!(fs::read(expected).unwrap(), bytes);
    }

    #[test]
    fn test_fs_writer_overwrites() {
        let dir = TempDir::new().unwrap();
        let writer = FsDestinationWriter::new(dir.path(), "lab01");
        let out = output();
        writer.write(&out, b"old").unwrap();
        writer.write(&out, b"new").unwrap();
        assert_eq!(fs::read(writer.output_path(&out)).unwrap(), b"new");
    }

    #[test]
    fn test_memory_writer() {
        let writer = MemoryWriter::new();
        let key = writer.write(&output(), b"{}").unwrap();
        assert_eq!(key, "STUDENTS_EN/intro.ipynb");
        assert_eq!(writer.get(&key), Some(b"{}".to_vec()));
        assert_eq!(writer.written().len(), 1);
    }
}
