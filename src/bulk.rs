//! Batch document submission outcomes.

use crate::response::Response;
use serde_json::Value;

/// Outcome of a batch submission.
///
/// A batch is order-preserving but not atomic: each document's outcome is
/// reported independently, and one failed document never discards the
/// outcomes of its siblings. The batch call itself only errors on transport
/// or whole-request failure.
#[derive(Debug, Clone)]
pub struct BulkResponse {
    took_ms: u64,
    errors: bool,
    items: Vec<BulkItem>,
}

impl BulkResponse {
    pub(crate) fn from_response(response: Response) -> Self {
        let body = response.into_body();

        let took_ms = body["took"].as_u64().unwrap_or(0);
        let errors = body["errors"].as_bool().unwrap_or(false);

        let items = body["items"]
            .as_array()
            .map(|items| items.iter().map(BulkItem::from_value).collect())
            .unwrap_or_default();

        Self {
            took_ms,
            errors,
            items,
        }
    }

    /// Engine-side processing time in milliseconds.
    pub fn took_ms(&self) -> u64 {
        self.took_ms
    }

    /// Whether any item in the batch failed.
    pub fn has_errors(&self) -> bool {
        self.errors
    }

    /// Per-document outcomes, in submission order.
    pub fn items(&self) -> &[BulkItem] {
        &self.items
    }

    /// Number of items in the batch.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the batch was empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over the failed items.
    pub fn failures(&self) -> impl Iterator<Item = &BulkItem> {
        self.items.iter().filter(|item| !item.is_ok())
    }
}

/// Outcome of a single document within a batch.
#[derive(Debug, Clone)]
pub struct BulkItem {
    id: String,
    version: Option<i64>,
    status: u16,
    error: Option<String>,
}

impl BulkItem {
    // Each item is keyed by its action ("index", "create", "delete").
    fn from_value(item: &Value) -> Self {
        let status = item
            .as_object()
            .and_then(|actions| actions.values().next())
            .cloned()
            .unwrap_or_default();

        let error = status.get("error").map(|error| {
            error
                .as_str()
                .or_else(|| error.get("reason").and_then(|r| r.as_str()))
                .unwrap_or("unknown error")
                .to_string()
        });

        Self {
            id: status["_id"].as_str().unwrap_or_default().to_string(),
            version: status["_version"].as_i64(),
            status: status["status"].as_u64().unwrap_or(0) as u16,
            error,
        }
    }

    /// The document identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The engine-assigned version, when the write succeeded.
    pub fn version(&self) -> Option<i64> {
        self.version
    }

    /// The per-item HTTP status.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// The engine's error reason for this item, if it failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether this document was accepted.
    pub fn is_ok(&self) -> bool {
        self.error.is_none() && (200..300).contains(&self.status)
    }
}
