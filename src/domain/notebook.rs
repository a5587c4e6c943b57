//! Notebook domain model
//!
//! A typed view of the nbformat v4 JSON document. Only the fields the
//! engine reads or rewrites are modelled; everything else is carried in
//! `extra` maps so a projected notebook loses nothing the author wrote.

use super::tags::TagSet;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Cell metadata keys that only describe how a stored output is displayed
pub const OUTPUT_METADATA_FIELDS: [&str; 2] = ["collapsed", "scrolled"];

/// Kind of notebook cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    /// Executable code cell
    Code,
    /// Markdown prose
    Markdown,
    /// Raw, unrendered text
    Raw,
}

impl CellType {
    /// Markdown and raw cells are narrative; they never carry outputs
    pub fn is_narrative(self) -> bool {
        !matches!(self, CellType::Code)
    }
}

/// Multi-line text as stored by nbformat: either one string or a list of
/// lines. The original form is kept so re-serialisation is faithful.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MultilineText {
    /// Whole text in one string
    Single(String),
    /// Text split into lines, each keeping its trailing newline
    Lines(Vec<String>),
}

impl MultilineText {
    /// Joined text
    pub fn text(&self) -> String {
        match self {
            MultilineText::Single(s) => s.clone(),
            MultilineText::Lines(lines) => lines.concat(),
        }
    }

    /// Replaces the text while keeping the storage form
    pub fn with_text(&self, text: &str) -> Self {
        match self {
            MultilineText::Single(_) => MultilineText::Single(text.to_string()),
            MultilineText::Lines(_) => MultilineText::Lines(split_lines_keep_ends(text)),
        }
    }
}

impl Default for MultilineText {
    fn default() -> Self {
        MultilineText::Single(String::new())
    }
}

impl From<&str> for MultilineText {
    fn from(s: &str) -> Self {
        MultilineText::Single(s.to_string())
    }
}

fn split_lines_keep_ends(text: &str) -> Vec<String> {
    text.split_inclusive('\n').map(str::to_string).collect()
}

/// Deserializes a present-but-null field as `Some(None)` and a missing
/// field (via `#[serde(default)]`) as `None`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// A single notebook cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Cell kind
    pub cell_type: CellType,

    /// Cell id (nbformat >= 4.5)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Cell metadata; `tags` lives here
    #[serde(default)]
    pub metadata: Map<String, Value>,

    /// Cell body
    #[serde(default)]
    pub source: MultilineText,

    /// Inline attachments: name -> { mime type -> base64 payload }
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Map<String, Value>>,

    /// Stored outputs (code cells only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<Vec<Value>>,

    /// Execution counter (code cells only); `Some(None)` serialises as `null`
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub execution_count: Option<Option<u64>>,

    /// Any other keys, preserved verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Cell {
    /// Creates an empty code cell with the given source
    pub fn code(source: &str) -> Self {
        Self {
            cell_type: CellType::Code,
            id: None,
            metadata: Map::new(),
            source: source.into(),
            attachments: None,
            outputs: Some(Vec::new()),
            execution_count: Some(None),
            extra: Map::new(),
        }
    }

    /// Creates a markdown cell with the given source
    pub fn markdown(source: &str) -> Self {
        Self {
            cell_type: CellType::Markdown,
            id: None,
            metadata: Map::new(),
            source: source.into(),
            attachments: None,
            outputs: None,
            execution_count: None,
            extra: Map::new(),
        }
    }

    /// Sets `metadata.tags`
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tags: Vec<Value> = tags.into_iter().map(|t| Value::String(t.into())).collect();
        self.metadata.insert("tags".to_string(), Value::Array(tags));
        self
    }

    /// Sets the cell id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets stored outputs and execution counter
    pub fn with_outputs(mut self, outputs: Vec<Value>, execution_count: Option<u64>) -> Self {
        self.outputs = Some(outputs);
        self.execution_count = Some(execution_count);
        self
    }

    /// Tags read from `metadata.tags`; non-string entries are ignored
    pub fn tags(&self) -> TagSet {
        match self.metadata.get("tags") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            _ => TagSet::default(),
        }
    }

    /// Whether the cell has a stored result or counter
    pub fn has_output(&self) -> bool {
        self.outputs.as_ref().is_some_and(|o| !o.is_empty())
            || matches!(self.execution_count, Some(Some(_)))
    }

    /// Removes the stored execution result, the counter and the metadata
    /// that only affects output display. No-op for narrative cells.
    pub fn clear_output(&mut self) {
        if self.cell_type.is_narrative() {
            return;
        }
        self.outputs = Some(Vec::new());
        self.execution_count = Some(None);
        for field in OUTPUT_METADATA_FIELDS {
            self.metadata.remove(field);
        }
    }
}

/// A Jupyter notebook (nbformat v4)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notebook {
    /// Ordered cells
    pub cells: Vec<Cell>,

    /// Document-level metadata (kernelspec, language_info, ...)
    #[serde(default)]
    pub metadata: Map<String, Value>,

    /// Major format version
    #[serde(default = "default_nbformat")]
    pub nbformat: u32,

    /// Minor format version
    #[serde(default = "default_nbformat_minor")]
    pub nbformat_minor: u32,

    /// Any other top-level keys, preserved verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Notebook {
    /// Creates a builder for a notebook
    pub fn builder() -> NotebookBuilder {
        NotebookBuilder::default()
    }

    /// Parses notebook JSON
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Serialises the way nbformat writes files: keys sorted, one-space
    /// indent, non-ASCII kept as-is, trailing newline.
    pub fn to_ipynb_bytes(&self) -> serde_json::Result<Vec<u8>> {
        // Going through Value sorts keys (serde_json maps are ordered).
        let value = serde_json::to_value(self)?;
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        value.serialize(&mut serializer)?;
        out.push(b'\n');
        Ok(out)
    }
}

fn default_nbformat() -> u32 {
    4
}

fn default_nbformat_minor() -> u32 {
    5
}

/// Builder for notebooks; projection uses it to assemble a fresh document
/// per variant instead of filtering a shared one.
#[derive(Debug, Default)]
pub struct NotebookBuilder {
    cells: Vec<Cell>,
    metadata: Map<String, Value>,
    nbformat: Option<u32>,
    nbformat_minor: Option<u32>,
    extra: Map<String, Value>,
}

impl NotebookBuilder {
    /// Creates an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies metadata, format versions and extra keys of `source`, but no cells
    pub fn header_from(mut self, source: &Notebook) -> Self {
        self.metadata = source.metadata.clone();
        self.nbformat = Some(source.nbformat);
        self.nbformat_minor = Some(source.nbformat_minor);
        self.extra = source.extra.clone();
        self
    }

    /// Sets document metadata
    pub fn metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Appends a cell
    pub fn cell(mut self, cell: Cell) -> Self {
        self.cells.push(cell);
        self
    }

    /// Appends a cell in place (for loops)
    pub fn push_cell(&mut self, cell: Cell) {
        self.cells.push(cell);
    }

    /// Builds the notebook
    pub fn build(self) -> Notebook {
        Notebook {
            cells: self.cells,
            metadata: self.metadata,
            nbformat: self.nbformat.unwrap_or_else(default_nbformat),
            nbformat_minor: self.nbformat_minor.unwrap_or_else(default_nbformat_minor),
            extra: self.extra,
        }
    }
}
