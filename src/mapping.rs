//! Declarative schema builder for type mappings.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::BTreeMap;

/// Mapping declaration for a document type.
///
/// Set the mapping before indexing documents; otherwise the engine infers
/// field types from the first write and later declarations may conflict.
///
/// # Example
///
/// ```rust
/// use trawl::{Mapping, MappingField};
///
/// let mapping = Mapping::new()
///     .field("id", MappingField::integer().store(true))
///     .field("email", MappingField::string().store(false))
///     .field("file", MappingField::attachment())
///     .source_excludes(["file"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Mapping {
    properties: BTreeMap<String, MappingField>,
    parent_type: Option<String>,
    source_excludes: Option<Vec<String>>,
}

impl Mapping {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field.
    pub fn field(mut self, name: impl Into<String>, field: MappingField) -> Self {
        self.properties.insert(name.into(), field);
        self
    }

    /// Declare the parent type for parent/child linkage. The link is
    /// declared once per type and is immutable thereafter.
    pub fn parent(mut self, parent_type: impl Into<String>) -> Self {
        self.parent_type = Some(parent_type.into());
        self
    }

    /// Exclude named fields from the stored source document. Excluded
    /// fields stay indexed and searchable but are absent from fetched
    /// document bodies.
    pub fn source_excludes<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source_excludes = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Convert the mapping to its wire representation.
    pub fn to_json(&self) -> Value {
        let mut mapping = serde_json::Map::new();

        if let Some(parent) = &self.parent_type {
            mapping.insert("_parent".to_string(), json!({ "type": parent }));
        }

        if let Some(excludes) = &self.source_excludes {
            mapping.insert("_source".to_string(), json!({ "excludes": excludes }));
        }

        let mut properties = serde_json::Map::new();
        for (name, field) in &self.properties {
            properties.insert(name.clone(), field.to_json());
        }
        mapping.insert("properties".to_string(), Value::Object(properties));

        Value::Object(mapping)
    }
}

/// Field mapping definition: type plus store flag.
#[derive(Debug, Clone)]
pub struct MappingField {
    /// Field type.
    pub field_type: FieldType,
    /// Whether the field value is stored retrievably.
    pub store: Option<bool>,
}

impl MappingField {
    fn of(field_type: FieldType) -> Self {
        Self {
            field_type,
            store: None,
        }
    }

    /// Create a string field.
    pub fn string() -> Self {
        Self::of(FieldType::String)
    }

    /// Create an integer field.
    pub fn integer() -> Self {
        Self::of(FieldType::Integer)
    }

    /// Create a long field.
    pub fn long() -> Self {
        Self::of(FieldType::Long)
    }

    /// Create a float field.
    pub fn float() -> Self {
        Self::of(FieldType::Float)
    }

    /// Create a double field.
    pub fn double() -> Self {
        Self::of(FieldType::Double)
    }

    /// Create a boolean field.
    pub fn boolean() -> Self {
        Self::of(FieldType::Boolean)
    }

    /// Create a date field.
    pub fn date() -> Self {
        Self::of(FieldType::Date)
    }

    /// Create a binary field.
    pub fn binary() -> Self {
        Self::of(FieldType::Binary)
    }

    /// Create an attachment field. The engine extracts searchable text and
    /// metadata (author, title) from supported binary formats at index time.
    pub fn attachment() -> Self {
        Self::of(FieldType::Attachment)
    }

    /// Set the store flag.
    pub fn store(mut self, store: bool) -> Self {
        self.store = Some(store);
        self
    }

    fn to_json(&self) -> Value {
        let mut field = serde_json::Map::new();
        field.insert("type".to_string(), json!(self.field_type.as_str()));
        if let Some(store) = self.store {
            field.insert("store".to_string(), json!(store));
        }
        Value::Object(field)
    }
}

/// Field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Full-text searchable string.
    String,
    /// 32-bit integer.
    Integer,
    /// 64-bit integer.
    Long,
    /// Single precision float.
    Float,
    /// Double precision float.
    Double,
    /// Boolean.
    Boolean,
    /// Date.
    Date,
    /// Opaque binary data.
    Binary,
    /// Binary document with engine-side text/metadata extraction.
    Attachment,
    /// Nested object.
    Object,
}

impl FieldType {
    fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Long => "long",
            FieldType::Float => "float",
            FieldType::Double => "double",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::Binary => "binary",
            FieldType::Attachment => "attachment",
            FieldType::Object => "object",
        }
    }
}
