//! Document payloads.

use crate::error::Result;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::{Map, Value};
use std::path::Path;

/// A document: identifier plus field map, with an optional parent reference
/// and the engine-assigned version after a fetch.
///
/// # Example
///
/// ```rust
/// use trawl::Document;
///
/// let doc = Document::new(1)
///     .field("title", "Hello world")
///     .field("tags", vec!["intro", "greeting"]);
/// assert_eq!(doc.id(), "1");
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    id: String,
    fields: Map<String, Value>,
    parent: Option<String>,
    version: Option<i64>,
}

impl Document {
    /// Create a document with the given identifier. Identifiers may be
    /// strings or integers; both are carried as strings on the wire.
    pub fn new(id: impl ToString) -> Self {
        Self {
            id: id.to_string(),
            fields: Map::new(),
            parent: None,
            version: None,
        }
    }

    /// Rebuild a document from a fetched source body.
    pub(crate) fn from_source(id: String, fields: Map<String, Value>, version: Option<i64>) -> Self {
        Self {
            id,
            fields,
            parent: None,
            version,
        }
    }

    /// Set a field value.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Set the parent document identifier. The child type's mapping must
    /// declare the parent link for the reference to take effect.
    pub fn parent(mut self, id: impl ToString) -> Self {
        self.parent = Some(id.to_string());
        self
    }

    /// Attach the contents of a binary file to an attachment field.
    ///
    /// The content is base64-encoded for transport; the engine extracts
    /// searchable text and metadata at index time.
    pub fn file(self, field: impl Into<String>, path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read(path)?;
        Ok(self.file_content(field, content))
    }

    /// Attach in-memory binary content to an attachment field.
    pub fn file_content(mut self, field: impl Into<String>, content: impl AsRef<[u8]>) -> Self {
        self.fields
            .insert(field.into(), Value::String(BASE64.encode(content)));
        self
    }

    /// The document identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The parent document identifier, if set.
    pub fn parent_id(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// The engine-assigned version, if known. Populated on fetched
    /// documents; writes report their version on the returned response.
    pub fn version(&self) -> Option<i64> {
        self.version
    }

    /// Get a field value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// The full field map.
    pub fn data(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Consume the document and return its field map.
    pub fn into_data(self) -> Map<String, Value> {
        self.fields
    }
}
