//! Variant specifications
//!
//! A variant is one (audience, language) combination plus the label its
//! output notebooks are filed under.

use super::ids::{Language, OutputLabel};
use super::tags::{STUDENT, TEACHER};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Who an exported notebook is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    /// Students: outputs are cleared unless the cell is tagged `keep`
    Student,
    /// Teachers: outputs are kept
    Teacher,
}

impl Audience {
    /// The cell tag that marks content for this audience
    pub fn tag(self) -> &'static str {
        match self {
            Audience::Student => STUDENT,
            Audience::Teacher => TEACHER,
        }
    }

    /// Both audience tags
    pub fn all_tags() -> [&'static str; 2] {
        [STUDENT, TEACHER]
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Audience {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "student" | "students" => Ok(Audience::Student),
            "teacher" | "teachers" => Ok(Audience::Teacher),
            "" => Err("Audience cannot be empty".to_string()),
            other => Err(format!(
                "Invalid audience '{other}'. Expected 'student' or 'teacher'"
            )),
        }
    }
}

/// A resolved variant: audience, language and output label
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariantSpec {
    /// Requested audience
    pub audience: Audience,
    /// Requested language
    pub language: Language,
    /// Label naming the output directory
    pub label: OutputLabel,
}

impl VariantSpec {
    /// Creates a variant specification
    pub fn new(audience: Audience, language: Language, label: OutputLabel) -> Self {
        Self {
            audience,
            language,
            label,
        }
    }

    /// Whether cell outputs are cleared by default in this variant
    pub fn clears_outputs(&self) -> bool {
        self.audience == Audience::Student
    }
}

impl fmt::Display for VariantSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.label, self.audience, self.language)
    }
}
