//! Search results.

use crate::{document::Document, response::Response};
use serde_json::{Map, Value};

/// Default number of hits returned when no explicit limit is given.
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// The result of a search: hit count, engine totals, and the hits
/// themselves.
///
/// `count()` is the number of hits actually returned (bounded by the search
/// limit); `total_hits()` is the engine's count of all matching documents.
#[derive(Debug, Clone)]
pub struct ResultSet {
    total: u64,
    max_score: Option<f64>,
    took_ms: u64,
    hits: Vec<SearchHit>,
}

impl ResultSet {
    pub(crate) fn from_response(response: Response) -> Self {
        let body = response.into_body();

        let total = parse_total(&body["hits"]["total"]);
        let max_score = body["hits"]["max_score"].as_f64();
        let took_ms = body["took"].as_u64().unwrap_or(0);

        let hits = body["hits"]["hits"]
            .as_array()
            .map(|hits| hits.iter().map(SearchHit::from_value).collect())
            .unwrap_or_default();

        Self {
            total,
            max_score,
            took_ms,
            hits,
        }
    }

    /// Number of hits returned.
    pub fn count(&self) -> usize {
        self.hits.len()
    }

    /// Whether no hits were returned.
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Engine-reported total of matching documents, which may exceed the
    /// number of hits returned.
    pub fn total_hits(&self) -> u64 {
        self.total
    }

    /// Maximum relevance score across hits.
    pub fn max_score(&self) -> Option<f64> {
        self.max_score
    }

    /// Engine-side search time in milliseconds.
    pub fn took_ms(&self) -> u64 {
        self.took_ms
    }

    /// Get a hit by position.
    pub fn get(&self, index: usize) -> Option<&SearchHit> {
        self.hits.get(index)
    }

    /// Iterate over the hits.
    pub fn iter(&self) -> std::slice::Iter<'_, SearchHit> {
        self.hits.iter()
    }

    /// The hits as a slice.
    pub fn hits(&self) -> &[SearchHit] {
        &self.hits
    }
}

impl IntoIterator for ResultSet {
    type Item = SearchHit;
    type IntoIter = std::vec::IntoIter<SearchHit>;

    fn into_iter(self) -> Self::IntoIter {
        self.hits.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a SearchHit;
    type IntoIter = std::slice::Iter<'a, SearchHit>;

    fn into_iter(self) -> Self::IntoIter {
        self.hits.iter()
    }
}

// The classic protocol reports `hits.total` as a bare number; current
// engines wrap it as `{value, relation}`. Accept both.
fn parse_total(value: &Value) -> u64 {
    value
        .as_u64()
        .or_else(|| value.get("value").and_then(|v| v.as_u64()))
        .unwrap_or(0)
}

/// A single search hit.
#[derive(Debug, Clone)]
pub struct SearchHit {
    id: String,
    index: String,
    doc_type: Option<String>,
    score: Option<f64>,
    source: Map<String, Value>,
}

impl SearchHit {
    fn from_value(hit: &Value) -> Self {
        let source = hit
            .get("_source")
            .and_then(|s| s.as_object())
            .cloned()
            .unwrap_or_default();

        Self {
            id: hit["_id"].as_str().unwrap_or_default().to_string(),
            index: hit["_index"].as_str().unwrap_or_default().to_string(),
            doc_type: hit["_type"].as_str().map(|s| s.to_string()),
            score: hit["_score"].as_f64(),
            source,
        }
    }

    /// The document identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The index the hit came from.
    pub fn index(&self) -> &str {
        &self.index
    }

    /// The document type, when the engine reports one.
    pub fn doc_type(&self) -> Option<&str> {
        self.doc_type.as_deref()
    }

    /// Relevance score.
    pub fn score(&self) -> Option<f64> {
        self.score
    }

    /// The hit's source fields.
    pub fn data(&self) -> &Map<String, Value> {
        &self.source
    }

    /// Get a source field value.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.source.get(name)
    }

    /// Convert the hit into a [`Document`].
    pub fn into_document(self) -> Document {
        Document::from_source(self.id, self.source, None)
    }
}
