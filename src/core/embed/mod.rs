//! Image embedding
//!
//! Makes a development notebook self-contained by carrying every locally
//! referenced image inside the document. The remote execution environment
//! that opens the exported notebooks cannot follow relative paths.
//!
//! Embedding happens once per development document, before variants are
//! projected, so every variant of a document carries identical image bytes.

pub mod markdown;
pub mod mime;
pub mod resolver;

pub use resolver::{AssetResolver, FsAssetResolver, MemoryAssetResolver};

use crate::domain::notebook::{CellType, Notebook};
use crate::domain::{DevelopmentDocument, NbExportError, Result};
use base64::{engine::general_purpose, Engine as _};
use markdown::ImageSink;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// An image read and encoded for inlining
#[derive(Debug, Clone, PartialEq)]
struct EncodedImage {
    mime: &'static str,
    base64: String,
}

impl EncodedImage {
    fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, self.base64)
    }

    fn attachment_bundle(&self) -> Value {
        let mut bundle = Map::new();
        bundle.insert(self.mime.to_string(), Value::String(self.base64.clone()));
        Value::Object(bundle)
    }
}

/// Statistics of one embedding pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmbedStats {
    /// Markdown cells whose source was rewritten
    pub cells_rewritten: usize,
    /// Image references replaced
    pub references_embedded: usize,
}

/// Inlines local images of a development document
#[derive(Clone)]
pub struct ImageEmbedder {
    resolver: Arc<dyn AssetResolver>,
}

impl ImageEmbedder {
    /// Creates an embedder reading assets through `resolver`
    pub fn new(resolver: Arc<dyn AssetResolver>) -> Self {
        Self { resolver }
    }

    /// Creates an embedder reading assets from disk
    pub fn from_filesystem() -> Self {
        Self::new(Arc::new(FsAssetResolver))
    }

    /// Returns a copy of the document's notebook with local images embedded.
    ///
    /// Markdown image syntax becomes a cell attachment, HTML `<img>` tags get
    /// a `data:` URI. Already-embedded references are skipped, so running
    /// this on its own output changes nothing.
    ///
    /// # Errors
    ///
    /// - [`NbExportError::MissingAsset`] if a referenced image cannot be read
    /// - [`NbExportError::UnsupportedImage`] if its file type is unknown
    pub fn embed(&self, document: &DevelopmentDocument) -> Result<Notebook> {
        self.embed_with_stats(document).map(|(notebook, _)| notebook)
    }

    /// Like [`ImageEmbedder::embed`], also reporting what was rewritten
    pub fn embed_with_stats(&self, document: &DevelopmentDocument) -> Result<(Notebook, EmbedStats)> {
        let mut notebook = document.notebook.clone();
        let mut cache: HashMap<String, EncodedImage> = HashMap::new();
        let mut stats = EmbedStats::default();

        for cell in notebook
            .cells
            .iter_mut()
            .filter(|c| c.cell_type == CellType::Markdown)
        {
            let text = cell.source.text();
            let mut sink = CellSink {
                document: document.name.as_str(),
                base_dir: document.base_dir(),
                resolver: self.resolver.as_ref(),
                cache: &mut cache,
                attachments: cell.attachments.clone().unwrap_or_default(),
                embedded: 0,
            };

            if let Some(rewritten) = markdown::rewrite_images(&text, &mut sink)? {
                stats.cells_rewritten += 1;
                stats.references_embedded += sink.embedded;
                let attachments = sink.attachments;
                cell.source = cell.source.with_text(&rewritten);
                if !attachments.is_empty() {
                    cell.attachments = Some(attachments);
                }
            }
        }

        tracing::debug!(
            document = %document.name,
            cells_rewritten = stats.cells_rewritten,
            references_embedded = stats.references_embedded,
            "Embedded images"
        );

        Ok((notebook, stats))
    }
}

impl std::fmt::Debug for ImageEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageEmbedder").finish_non_exhaustive()
    }
}

/// Per-cell sink: reads images once per document and files attachments
/// into the cell being rewritten
struct CellSink<'a> {
    document: &'a str,
    base_dir: &'a Path,
    resolver: &'a dyn AssetResolver,
    cache: &'a mut HashMap<String, EncodedImage>,
    attachments: Map<String, Value>,
    embedded: usize,
}

impl CellSink<'_> {
    fn load(&mut self, reference: &str) -> Result<EncodedImage> {
        let path = resolver::strip_suffix(reference);
        if let Some(image) = self.cache.get(path) {
            return Ok(image.clone());
        }

        let mime = mime::mime_type(path).ok_or_else(|| NbExportError::UnsupportedImage {
            document: self.document.to_string(),
            reference: reference.to_string(),
        })?;

        let bytes = self
            .resolver
            .read(self.base_dir, path)
            .map_err(|e| NbExportError::MissingAsset {
                document: self.document.to_string(),
                reference: reference.to_string(),
                reason: e.to_string(),
            })?;

        let image = EncodedImage {
            mime,
            base64: general_purpose::STANDARD.encode(bytes),
        };
        self.cache.insert(path.to_string(), image.clone());
        Ok(image)
    }
}

impl ImageSink for CellSink<'_> {
    fn attach(&mut self, reference: &str) -> Result<String> {
        let image = self.load(reference)?;
        let bundle = image.attachment_bundle();
        let base = attachment_name(resolver::strip_suffix(reference));

        let mut name = base.clone();
        let mut n = 1;
        loop {
            match self.attachments.get(&name) {
                None => {
                    self.attachments.insert(name.clone(), bundle);
                    break;
                }
                Some(existing) if *existing == bundle => break,
                Some(_) => {
                    n += 1;
                    name = suffixed(&base, n);
                }
            }
        }

        self.embedded += 1;
        Ok(name)
    }

    fn data_uri(&mut self, reference: &str) -> Result<String> {
        let image = self.load(reference)?;
        self.embedded += 1;
        Ok(image.data_uri())
    }
}

/// Attachment name derived from the file name, restricted to characters that
/// are safe inside a markdown link target
fn attachment_name(reference: &str) -> String {
    let file_name = reference
        .rsplit(['/', '\\'])
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("image");
    file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// `plot.png` -> `plot-2.png`
fn suffixed(name: &str, n: usize) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem}-{n}.{ext}"),
        _ => format!("{name}-{n}"),
    }
}
