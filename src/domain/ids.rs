//! Domain identifier types with validation
//!
//! Newtype wrappers for the names that flow through an export: the
//! development document's file name, a variant's output label and a
//! language code. Each rejects empty input so a blank value in the
//! configuration is caught before any document is touched.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// File name of a development notebook (e.g. `01_intro.ipynb`)
///
/// # Examples
///
/// ```
/// use nbexport::domain::ids::DocumentName;
/// use std::str::FromStr;
///
/// let name = DocumentName::from_str("01_intro.ipynb").unwrap();
/// assert_eq!(name.as_str(), "01_intro.ipynb");
/// assert!(!name.is_private());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentName(String);

impl DocumentName {
    /// Creates a new DocumentName from a string
    pub fn new(name: impl Into<String>) -> Result<Self, String> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err("Document name cannot be empty".to_string());
        }
        if name.contains('/') || name.contains('\\') {
            return Err(format!(
                "Document name must be a bare file name, got: {name}"
            ));
        }
        Ok(Self(name))
    }

    /// Returns the document name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Names starting with `_` are scratch notebooks that are never exported
    pub fn is_private(&self) -> bool {
        self.0.starts_with('_')
    }
}

impl fmt::Display for DocumentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DocumentName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for DocumentName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Output label of a variant (e.g. `STUDENTS_SK`)
///
/// The label doubles as the name of the output directory, so it must not
/// contain path separators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OutputLabel(String);

impl OutputLabel {
    /// Creates a new OutputLabel from a string
    pub fn new(label: impl Into<String>) -> Result<Self, String> {
        let label = label.into();
        if label.trim().is_empty() {
            return Err("Output label cannot be empty".to_string());
        }
        if label.contains('/') || label.contains('\\') || label == "." || label == ".." {
            return Err(format!("Output label is not a valid directory name: {label}"));
        }
        Ok(Self(label))
    }

    /// Returns the label as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OutputLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OutputLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for OutputLabel {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OutputLabel> for String {
    fn from(label: OutputLabel) -> Self {
        label.0
    }
}

/// Language code used both as a variant's language and as a cell tag
/// (e.g. `en`, `sk`). Tags are case-sensitive, so no normalisation happens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Language(String);

impl Language {
    /// Creates a new Language from a string
    pub fn new(code: impl Into<String>) -> Result<Self, String> {
        let code = code.into();
        if code.trim().is_empty() {
            return Err("Language cannot be empty".to_string());
        }
        if code.chars().any(char::is_whitespace) {
            return Err(format!("Language must not contain whitespace, got: '{code}'"));
        }
        Ok(Self(code))
    }

    /// Returns the language code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Language {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Language> for String {
    fn from(language: Language) -> Self {
        language.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_name_valid() {
        let name = DocumentName::new("02_loops.ipynb").unwrap();
        assert_eq!(name.as_str(), "02_loops.ipynb");
        assert_eq!(name.to_string(), "02_loops.ipynb");
    }

    #[test]
    fn test_document_name_rejects_empty_and_paths() {
        assert!(DocumentName::new("").is_err());
        assert!(DocumentName::new("   ").is_err());
        assert!(DocumentName::new("lab/intro.ipynb").is_err());
    }

    #[test]
    fn test_document_name_private() {
        assert!(DocumentName::new("_scratch.ipynb").unwrap().is_private());
        assert!(!DocumentName::new("scratch_.ipynb").unwrap().is_private());
    }

    #[test]
    fn test_output_label_validation() {
        assert!(OutputLabel::new("STUDENTS_SK").is_ok());
        assert!(OutputLabel::new("").is_err());
        assert!(OutputLabel::new("..").is_err());
        assert!(OutputLabel::new("A/B").is_err());
    }

    #[test]
    fn test_language_validation() {
        assert_eq!(Language::new("en").unwrap().as_str(), "en");
        assert!(Language::new("").is_err());
        assert!(Language::new("e n").is_err());
    }

    #[test]
    fn test_label_deserialize_rejects_empty() {
        let parsed: Result<OutputLabel, _> = serde_json::from_str("\"\"");
        assert!(parsed.is_err());
        let parsed: OutputLabel = serde_json::from_str("\"TEACHERS_EN\"").unwrap();
        assert_eq!(parsed.as_str(), "TEACHERS_EN");
    }
}
