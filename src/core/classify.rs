//! Cell classification
//!
//! Decides, for one cell and one requested variant, whether the cell is
//! part of the variant and whether its stored output must be cleared.
//!
//! Two independent axes are checked, with a fixed precedence:
//!
//! 1. `drop` excludes the cell from every variant.
//! 2. Language axis: a cell without a language tag belongs to every
//!    language; otherwise its single language tag must match the variant.
//! 3. Audience axis: the same rule with `student` / `teacher`.
//!
//! A cell carrying two tags of the same axis is rejected with
//! [`NbExportError::AmbiguousTag`] instead of guessing.

use crate::domain::notebook::{Cell, Notebook};
use crate::domain::tags::{TagSet, TagVocabulary, DROP, KEEP};
use crate::domain::variant::{Audience, VariantSpec};
use crate::domain::{NbExportError, Result};

/// Outcome of classifying one cell for one variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellDecision {
    /// Cell is copied into the variant
    pub include: bool,
    /// Stored output is removed from the copy
    pub clear_output: bool,
}

impl CellDecision {
    const EXCLUDED: CellDecision = CellDecision {
        include: false,
        clear_output: false,
    };
}

/// Result of checking one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Pass,
    Fail,
}

/// Where a cell sits, used to name it in errors
#[derive(Debug, Clone, Copy)]
pub struct CellLocation<'a> {
    /// Document name
    pub document: &'a str,
    /// Zero-based position of the cell in the development notebook
    pub index: usize,
}

/// Classifies `cell` for `variant`.
///
/// Pure function of the cell's tags, its type and the variant; the cell is
/// never modified.
///
/// # Errors
///
/// Returns [`NbExportError::AmbiguousTag`] if a cell that is not dropped
/// carries two language tags or both audience tags.
pub fn classify(
    cell: &Cell,
    variant: &VariantSpec,
    vocabulary: &TagVocabulary,
    location: CellLocation<'_>,
) -> Result<CellDecision> {
    let tags = cell.tags();

    if tags.contains(DROP) {
        return Ok(CellDecision::EXCLUDED);
    }

    let language = language_axis(&tags, variant, vocabulary, cell, location)?;
    let audience = audience_axis(&tags, variant.audience, cell, location)?;

    if language == Axis::Fail || audience == Axis::Fail {
        return Ok(CellDecision::EXCLUDED);
    }

    let clear_output =
        !cell.cell_type.is_narrative() && variant.clears_outputs() && !tags.contains(KEEP);

    Ok(CellDecision {
        include: true,
        clear_output,
    })
}

fn language_axis(
    tags: &TagSet,
    variant: &VariantSpec,
    vocabulary: &TagVocabulary,
    cell: &Cell,
    location: CellLocation<'_>,
) -> Result<Axis> {
    let found = vocabulary.language_tags(tags);
    match found.as_slice() {
        [] => Ok(Axis::Pass),
        [only] if only == variant.language.as_str() => Ok(Axis::Pass),
        [_] => Ok(Axis::Fail),
        _ => Err(ambiguous(cell, location, found)),
    }
}

fn audience_axis(
    tags: &TagSet,
    audience: Audience,
    cell: &Cell,
    location: CellLocation<'_>,
) -> Result<Axis> {
    let found = tags.matching(Audience::all_tags());
    match found.as_slice() {
        [] => Ok(Axis::Pass),
        [only] if only == audience.tag() => Ok(Axis::Pass),
        [_] => Ok(Axis::Fail),
        _ => Err(ambiguous(cell, location, found)),
    }
}

fn ambiguous(cell: &Cell, location: CellLocation<'_>, tags: Vec<String>) -> NbExportError {
    NbExportError::AmbiguousTag {
        document: location.document.to_string(),
        cell_index: location.index,
        cell_id: cell.id.clone(),
        tags,
    }
}

/// Checks every cell of a notebook for conflicting tags.
///
/// Run once per document before fan-out so an ambiguous cell fails the
/// document as a whole rather than whichever variant reaches it first.
/// Dropped cells are skipped since they never reach any output.
///
/// # Errors
///
/// Returns the first [`NbExportError::AmbiguousTag`] found.
pub fn validate_tags(document: &str, notebook: &Notebook, vocabulary: &TagVocabulary) -> Result<()> {
    for (index, cell) in notebook.cells.iter().enumerate() {
        let tags = cell.tags();
        if tags.contains(DROP) {
            continue;
        }
        let location = CellLocation { document, index };

        let languages = vocabulary.language_tags(&tags);
        if languages.len() > 1 {
            return Err(ambiguous(cell, location, languages));
        }

        let audiences = tags.matching(Audience::all_tags());
        if audiences.len() > 1 {
            return Err(ambiguous(cell, location, audiences));
        }
    }
    Ok(())
}
