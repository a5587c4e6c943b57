//! Domain models and types for nbexport.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`DocumentName`], [`OutputLabel`], [`Language`])
//! - **The notebook model** ([`Notebook`], [`Cell`], [`CellType`])
//! - **Tags and variants** ([`TagSet`], [`TagVocabulary`], [`Audience`], [`VariantSpec`])
//! - **Documents** ([`DevelopmentDocument`], [`OutputDocument`])
//! - **Error types** ([`NbExportError`]) and the [`Result`] alias
//!
//! # Builder Pattern
//!
//! Projected notebooks are assembled with [`NotebookBuilder`] so a shared
//! development notebook is never filtered in place:
//!
//! ```rust
//! use nbexport::domain::{Cell, Notebook};
//!
//! let notebook = Notebook::builder()
//!     .cell(Cell::markdown("# Loops").with_tags(["en"]))
//!     .cell(Cell::code("for i in range(3): print(i)"))
//!     .build();
//! assert_eq!(notebook.cells.len(), 2);
//! ```

pub mod document;
pub mod errors;
pub mod ids;
pub mod notebook;
pub mod result;
pub mod tags;
pub mod variant;

// Re-export commonly used types for convenience
pub use document::{DevelopmentDocument, OutputDocument};
pub use errors::NbExportError;
pub use ids::{DocumentName, Language, OutputLabel};
pub use notebook::{Cell, CellType, MultilineText, Notebook, NotebookBuilder};
pub use result::Result;
pub use tags::{TagSet, TagVocabulary};
pub use variant::{Audience, VariantSpec};
