//! Read-only introspection over index and alias existence.

use crate::{client::Client, error::Result, request::Request, response::Response};
use http::Method;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// A snapshot of which indices and aliases currently exist.
///
/// The snapshot is taken when fetched and never invalidated implicitly:
/// changes made through other handles are only observed after an explicit
/// [`Status::refresh`].
#[derive(Debug, Clone)]
pub struct Status {
    client: Client,
    indices: BTreeMap<String, BTreeSet<String>>,
}

impl Status {
    /// Fetch a fresh snapshot.
    pub(crate) async fn fetch(client: Client) -> Result<Self> {
        let mut status = Self {
            client,
            indices: BTreeMap::new(),
        };
        status.refresh().await?;
        Ok(status)
    }

    /// Re-fetch the snapshot from the engine.
    pub async fn refresh(&mut self) -> Result<()> {
        debug!("Refreshing status snapshot");

        let request = Request::new(Method::GET, "_aliases");
        let response = self.client.send_ok(request).await?;

        self.indices = parse_alias_table(response.body());
        Ok(())
    }

    /// Whether an index with the given name existed at snapshot time.
    pub fn index_exists(&self, name: &str) -> bool {
        self.indices.contains_key(name)
    }

    /// Whether any index held the given alias at snapshot time.
    pub fn alias_exists(&self, alias: &str) -> bool {
        self.indices.values().any(|aliases| aliases.contains(alias))
    }

    /// The indices holding the given alias at snapshot time.
    pub fn indices_with_alias(&self, alias: &str) -> Vec<&str> {
        self.indices
            .iter()
            .filter(|(_, aliases)| aliases.contains(alias))
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// The names of all indices at snapshot time.
    pub fn index_names(&self) -> Vec<&str> {
        self.indices.keys().map(|name| name.as_str()).collect()
    }
}

/// Status snapshot of a single index: bound aliases plus document and
/// storage counts.
#[derive(Debug, Clone)]
pub struct IndexStatus {
    name: String,
    aliases: Vec<String>,
    num_docs: Option<u64>,
    size_in_bytes: Option<u64>,
}

impl IndexStatus {
    pub(crate) fn from_responses(name: &str, status: Response, aliases: Response) -> Self {
        let index_status = &status.body()["indices"][name];

        let alias_table = parse_alias_table(aliases.body());
        let aliases = alias_table
            .get(name)
            .map(|aliases| aliases.iter().cloned().collect())
            .unwrap_or_default();

        Self {
            name: name.to_string(),
            aliases,
            num_docs: index_status["docs"]["num_docs"].as_u64(),
            size_in_bytes: index_status["index"]["size_in_bytes"].as_u64(),
        }
    }

    /// The index name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The aliases bound to this index at snapshot time.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Whether the given alias was bound to this index at snapshot time.
    pub fn has_alias(&self, alias: &str) -> bool {
        self.aliases.iter().any(|a| a == alias)
    }

    /// Number of documents in the index, when the engine reports it.
    pub fn num_docs(&self) -> Option<u64> {
        self.num_docs
    }

    /// On-disk size in bytes, when the engine reports it.
    pub fn size_in_bytes(&self) -> Option<u64> {
        self.size_in_bytes
    }
}

// The alias table endpoint answers `{index: {"aliases": {alias: {}}}}`.
fn parse_alias_table(body: &Value) -> BTreeMap<String, BTreeSet<String>> {
    let mut indices = BTreeMap::new();

    if let Some(table) = body.as_object() {
        for (index, entry) in table {
            let aliases = entry["aliases"]
                .as_object()
                .map(|aliases| aliases.keys().cloned().collect())
                .unwrap_or_default();
            indices.insert(index.clone(), aliases);
        }
    }

    indices
}
