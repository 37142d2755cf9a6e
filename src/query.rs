//! Query forms accepted by the search endpoints.

use serde_json::{Value, json};

/// A search query.
///
/// The engine accepts either free text (query-string) or a structured query
/// object; both forms convert into [`Query`], so `search("ruflin")` and
/// `search(Query::term("username", "ruflin"))` read the same way.
#[derive(Debug, Clone)]
pub enum Query {
    /// Match all documents.
    MatchAll,
    /// Free-text query-string query.
    QueryString {
        /// The query text.
        query: String,
    },
    /// Exact term match.
    Term {
        /// Field name.
        field: String,
        /// Exact value to match.
        value: Value,
    },
    /// Match parent documents that have a matching child.
    HasChild {
        /// Child type the inner query runs against.
        child_type: String,
        /// Inner query.
        query: Box<Query>,
    },
    /// Raw JSON query, passed through unchanged.
    Raw(Value),
}

impl Query {
    /// Create a query-string query.
    pub fn query_string(query: impl Into<String>) -> Self {
        Query::QueryString {
            query: query.into(),
        }
    }

    /// Create a term query.
    pub fn term(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Query::Term {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create a has-child query. Issued against the parent type, it matches
    /// parents whose children of `child_type` match the inner query.
    pub fn has_child(child_type: impl Into<String>, query: impl Into<Query>) -> Self {
        Query::HasChild {
            child_type: child_type.into(),
            query: Box::new(query.into()),
        }
    }

    /// Convert the query to its wire representation.
    pub fn to_json(&self) -> Value {
        match self {
            Query::MatchAll => json!({ "match_all": {} }),
            Query::QueryString { query } => json!({
                "query_string": { "query": query }
            }),
            Query::Term { field, value } => json!({ "term": { field: value } }),
            Query::HasChild { child_type, query } => json!({
                "has_child": {
                    "type": child_type,
                    "query": query.to_json()
                }
            }),
            Query::Raw(value) => value.clone(),
        }
    }
}

impl From<&str> for Query {
    fn from(query: &str) -> Self {
        Query::query_string(query)
    }
}

impl From<String> for Query {
    fn from(query: String) -> Self {
        Query::query_string(query)
    }
}

impl From<Value> for Query {
    fn from(value: Value) -> Self {
        Query::Raw(value)
    }
}
