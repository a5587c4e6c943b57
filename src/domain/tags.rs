//! Cell tags and the tag vocabulary
//!
//! Tags are case-sensitive labels read from a cell's `metadata.tags`.
//! The engine recognises the audience tags, `keep`, `drop` and one tag per
//! configured language; anything else is ignored.

use super::ids::Language;
use std::collections::BTreeSet;

/// Excludes a cell from every variant
pub const DROP: &str = "drop";

/// Keeps a code cell's output in student variants
pub const KEEP: &str = "keep";

/// Marks a cell as teacher-only
pub const TEACHER: &str = "teacher";

/// Marks a cell as student-only
pub const STUDENT: &str = "student";

/// Immutable set of tags attached to one cell
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet(BTreeSet<String>);

impl TagSet {
    /// Whether the tag is present
    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    /// Number of distinct tags
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the cell has no tags
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates tags in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Tags of this set that also appear in `candidates`, in sorted order
    pub fn matching<'a, I>(&self, candidates: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut found: Vec<String> = candidates
            .into_iter()
            .filter(|c| self.contains(c))
            .map(str::to_string)
            .collect();
        found.sort();
        found.dedup();
        found
    }
}

impl FromIterator<String> for TagSet {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a str> for TagSet {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        Self(iter.into_iter().map(str::to_string).collect())
    }
}

/// The language tags the classifier treats as the language axis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagVocabulary {
    languages: Vec<Language>,
}

impl TagVocabulary {
    /// Creates a vocabulary from a list of language codes.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty, contains duplicates, or uses a
    /// code that collides with an audience or control tag.
    pub fn new(languages: Vec<Language>) -> Result<Self, String> {
        if languages.is_empty() {
            return Err("tag vocabulary needs at least one language".to_string());
        }
        let mut seen = BTreeSet::new();
        for language in &languages {
            if [DROP, KEEP, TEACHER, STUDENT].contains(&language.as_str()) {
                return Err(format!(
                    "'{language}' is reserved and cannot be used as a language tag"
                ));
            }
            if !seen.insert(language.as_str()) {
                return Err(format!("language '{language}' listed more than once"));
            }
        }
        Ok(Self { languages })
    }

    /// Configured languages in declaration order
    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    /// Whether `language` is part of the vocabulary
    pub fn knows(&self, language: &Language) -> bool {
        self.languages.contains(language)
    }

    /// Language tags present on a cell, sorted
    pub fn language_tags(&self, tags: &TagSet) -> Vec<String> {
        tags.matching(self.languages.iter().map(Language::as_str))
    }
}

impl Default for TagVocabulary {
    /// `en` and `sk`
    fn default() -> Self {
        Self {
            languages: vec![
                Language::new("en").expect("static language code"),
                Language::new("sk").expect("static language code"),
            ],
        }
    }
}
