//! Collaborator adapters for nbexport.
//!
//! The export engine itself is pure; these adapters connect it to the
//! world:
//!
//! - [`source`] - finds and loads development notebooks ([`SourceLocator`])
//! - [`writer`] - persists output notebooks ([`DestinationWriter`])
//!
//! Image bytes are read through [`crate::core::embed::AssetResolver`],
//! which lives with the embedder.
//!
//! # Design Pattern
//!
//! Adapters sit behind traits so the coordinator can be driven against
//! in-memory implementations in tests:
//!
//! ```rust,no_run
//! use nbexport::adapters::{FsDestinationWriter, FsSourceLocator, SourceLocator};
//!
//! # fn example() -> nbexport::domain::Result<()> {
//! let locator = FsSourceLocator::new("labs/lab01");
//! for path in locator.locate()? {
//!     let document = locator.load(&path)?;
//!     println!("{} has {} cells", document.name, document.notebook.cells.len());
//! }
//! let _writer = FsDestinationWriter::new("DRIVE_MATERIAL", "lab01");
//! # Ok(())
//! # }
//! ```

pub mod source;
pub mod writer;

pub use source::{load_document, FsSourceLocator, SourceLocator};
pub use writer::{DestinationWriter, FsDestinationWriter, MemoryWriter};
