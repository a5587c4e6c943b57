//! Variant projection
//!
//! Builds one output notebook for one variant from a development notebook.
//! The output is assembled cell by cell into a fresh [`Notebook`], so the
//! development notebook (shared by every variant of the document) is only
//! ever read.

use crate::core::classify::{classify, CellLocation};
use crate::domain::notebook::Notebook;
use crate::domain::{DocumentName, OutputDocument, Result, TagVocabulary, VariantSpec};

/// Projects `notebook` onto `variant`.
///
/// `notebook` is normally the image-embedded copy of the development
/// document named `document`. Cells keep their source order; document
/// metadata and format versions are copied verbatim.
///
/// # Errors
///
/// Returns [`crate::domain::NbExportError::AmbiguousTag`] if a cell carries
/// conflicting tags.
pub fn project(
    document: &DocumentName,
    notebook: &Notebook,
    variant: &VariantSpec,
    vocabulary: &TagVocabulary,
) -> Result<OutputDocument> {
    let mut builder = Notebook::builder().header_from(notebook);
    let mut cleared = 0usize;

    for (index, cell) in notebook.cells.iter().enumerate() {
        let location = CellLocation {
            document: document.as_str(),
            index,
        };
        let decision = classify(cell, variant, vocabulary, location)?;
        if !decision.include {
            continue;
        }

        let mut copy = cell.clone();
        if decision.clear_output {
            copy.clear_output();
            cleared += 1;
        }
        builder.push_cell(copy);
    }

    let projected = builder.build();

    tracing::debug!(
        document = %document,
        variant = %variant.label,
        cells_in = notebook.cells.len(),
        cells_out = projected.cells.len(),
        outputs_cleared = cleared,
        "Projected variant"
    );

    Ok(OutputDocument {
        label: variant.label.clone(),
        document: document.clone(),
        notebook: projected,
    })
}
