//! Version matrix resolution
//!
//! Turns the configured `[[variants]]` entries into the ordered list of
//! variants every document is projected onto. Any problem here is fatal for
//! the whole batch and is reported before a single document is read.

use crate::config::schema::VariantConfig;
use crate::domain::ids::{Language, OutputLabel};
use crate::domain::{Audience, NbExportError, Result, TagVocabulary, VariantSpec};
use std::collections::HashSet;

/// The resolved, ordered set of variants
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionMatrix {
    variants: Vec<VariantSpec>,
}

impl VersionMatrix {
    /// Variants in configured order
    pub fn variants(&self) -> &[VariantSpec] {
        &self.variants
    }

    /// Number of variants
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    /// Always false for a resolved matrix
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Narrows the matrix to the given labels, keeping configured order.
    ///
    /// # Errors
    ///
    /// Returns [`NbExportError::Configuration`] if a label is not part of the
    /// matrix or no label is given.
    pub fn select<S: AsRef<str>>(&self, labels: &[S]) -> Result<VersionMatrix> {
        if labels.is_empty() {
            return Err(NbExportError::Configuration(
                "variant selection cannot be empty".to_string(),
            ));
        }

        let known: HashSet<&str> = self.variants.iter().map(|v| v.label.as_str()).collect();
        let unknown: Vec<&str> = labels
            .iter()
            .map(AsRef::as_ref)
            .filter(|l| !known.contains(l))
            .collect();
        if !unknown.is_empty() {
            return Err(NbExportError::Configuration(format!(
                "Unknown variant label(s): {}. Configured: {}",
                unknown.join(", "),
                self.variants
                    .iter()
                    .map(|v| v.label.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )));
        }

        let wanted: HashSet<&str> = labels.iter().map(AsRef::as_ref).collect();
        Ok(VersionMatrix {
            variants: self
                .variants
                .iter()
                .filter(|v| wanted.contains(v.label.as_str()))
                .cloned()
                .collect(),
        })
    }
}

/// Validates the configured variants and produces the version matrix.
///
/// # Errors
///
/// Returns [`NbExportError::Configuration`] if the list is empty, an entry
/// has an empty or invalid field, a language is outside `vocabulary`, or two
/// entries share a label.
pub fn resolve(specs: &[VariantConfig], vocabulary: &TagVocabulary) -> Result<VersionMatrix> {
    if specs.is_empty() {
        return Err(NbExportError::Configuration(
            "at least one variant must be configured".to_string(),
        ));
    }

    let mut labels = HashSet::new();
    let mut variants = Vec::with_capacity(specs.len());

    for (index, spec) in specs.iter().enumerate() {
        let invalid = |msg: String| NbExportError::Configuration(format!("variants[{index}]: {msg}"));

        let label = OutputLabel::new(spec.label.as_str()).map_err(invalid)?;
        let audience = spec.audience.parse::<Audience>().map_err(invalid)?;
        let language = Language::new(spec.language.as_str()).map_err(invalid)?;

        if !vocabulary.knows(&language) {
            let known: Vec<&str> = vocabulary.languages().iter().map(Language::as_str).collect();
            return Err(invalid(format!(
                "language '{language}' is not in the tag vocabulary ({})",
                known.join(", ")
            )));
        }

        if !labels.insert(label.clone()) {
            return Err(invalid(format!("duplicate output label '{label}'")));
        }

        variants.push(VariantSpec::new(audience, language, label));
    }

    tracing::debug!(variants = variants.len(), "Resolved version matrix");

    Ok(VersionMatrix { variants })
}
