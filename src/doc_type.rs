//! Per-type mapping and document operations.

use crate::{
    bulk::BulkResponse,
    client::Client,
    document::Document,
    error::{Error, Result},
    mapping::Mapping,
    query::Query,
    request::Request,
    response::Response,
    search::{DEFAULT_SEARCH_LIMIT, ResultSet},
};
use http::Method;
use serde_json::{Value, json};
use tracing::debug;

/// A document type within an index: one mapping, shared by all its
/// documents.
#[derive(Debug, Clone)]
pub struct DocType {
    client: Client,
    index: String,
    name: String,
}

impl DocType {
    pub(crate) fn new(client: Client, index: String, name: String) -> Self {
        Self {
            client,
            index,
            name,
        }
    }

    /// The type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The owning index name.
    pub fn index_name(&self) -> &str {
        &self.index
    }

    // =========================================================================
    // Mapping
    // =========================================================================

    /// Set this type's mapping.
    ///
    /// Do this before indexing documents; otherwise the engine infers field
    /// types from the first write.
    pub async fn set_mapping(&self, mapping: &Mapping) -> Result<Response> {
        debug!("Setting mapping for {}/{}", self.index, self.name);

        let body = json!({ &self.name: mapping.to_json() });
        let request = Request::new(Method::PUT, self.mapping_path()).json(body);
        self.client.send_ok(request).await
    }

    /// Set this type's mapping from a raw JSON mapping definition.
    pub async fn set_mapping_json(&self, mapping: Value) -> Result<Response> {
        debug!("Setting raw mapping for {}/{}", self.index, self.name);

        let body = json!({ &self.name: mapping });
        let request = Request::new(Method::PUT, self.mapping_path()).json(body);
        self.client.send_ok(request).await
    }

    /// Get this type's stored mapping definition. A type with no mapping
    /// yields an empty object.
    pub async fn mapping(&self) -> Result<Value> {
        let request = Request::new(Method::GET, self.mapping_path());
        let response = self.client.send_ok(request).await?;

        let mut body = response.into_body();
        match body.get_mut(&self.name) {
            Some(mapping) => Ok(mapping.take()),
            None => Ok(json!({})),
        }
    }

    // =========================================================================
    // Documents
    // =========================================================================

    /// Index a document, creating or overwriting it.
    ///
    /// The returned response exposes the engine-assigned version via
    /// [`Response::version`]: 1 on first write, incremented on each
    /// overwrite of the same identifier.
    pub async fn add_document(&self, doc: &Document) -> Result<Response> {
        debug!("Indexing document {} in {}/{}", doc.id(), self.index, self.name);

        let mut request = Request::new(Method::PUT, self.doc_path(doc.id()))
            .json(Value::Object(doc.data().clone()));

        if let Some(parent) = doc.parent_id() {
            request = request.param("parent", parent);
        }

        self.client.send_ok(request).await
    }

    /// Index a batch of documents through the bulk endpoint.
    ///
    /// Order-preserving, not atomic: each document's outcome is reported
    /// independently in the returned [`BulkResponse`], and a failed
    /// document never suppresses its siblings.
    pub async fn add_documents(&self, docs: &[Document]) -> Result<BulkResponse> {
        debug!(
            "Bulk indexing {} documents in {}/{}",
            docs.len(),
            self.index,
            self.name
        );

        let mut payload = String::new();
        for doc in docs {
            let mut action = json!({
                "index": { "_index": &self.index, "_type": &self.name, "_id": doc.id() }
            });
            if let Some(parent) = doc.parent_id() {
                action["index"]["_parent"] = json!(parent);
            }

            payload.push_str(&serde_json::to_string(&action)?);
            payload.push('\n');
            payload.push_str(&serde_json::to_string(doc.data())?);
            payload.push('\n');
        }

        let request = Request::new(Method::POST, "_bulk").ndjson(payload);
        let response = self.client.send_ok(request).await?;

        Ok(BulkResponse::from_response(response))
    }

    /// Fetch a document by identifier. Returns `Ok(None)` if it does not
    /// exist.
    pub async fn get_document(&self, id: impl ToString) -> Result<Option<Document>> {
        let id = id.to_string();
        debug!("Getting document {} from {}/{}", id, self.index, self.name);

        let request = Request::new(Method::GET, self.doc_path(&id));
        let response = self.client.send(request.clone()).await?;

        if response.status() == http::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.is_success() {
            return Err(Error::remote(request, response));
        }

        let body = response.into_body();
        if !body["found"].as_bool().unwrap_or(false) {
            return Ok(None);
        }

        let version = body["_version"].as_i64();
        let fields = body
            .get("_source")
            .and_then(|s| s.as_object())
            .cloned()
            .unwrap_or_default();

        Ok(Some(Document::from_source(id, fields, version)))
    }

    /// Delete a document by identifier. Returns `false` if it did not
    /// exist.
    pub async fn delete_document(&self, id: impl ToString) -> Result<bool> {
        let id = id.to_string();
        debug!("Deleting document {} from {}/{}", id, self.index, self.name);

        let request = Request::new(Method::DELETE, self.doc_path(&id));
        let response = self.client.send(request.clone()).await?;

        if response.status() == http::StatusCode::NOT_FOUND {
            return Ok(false);
        }
        if !response.is_success() {
            return Err(Error::remote(request, response));
        }

        Ok(true)
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Search this type with the default limit of
    /// [`DEFAULT_SEARCH_LIMIT`] hits.
    ///
    /// Writes become visible to search only after a `refresh`, `flush`, or
    /// `optimize` boundary; the staleness window is an engine property, not
    /// a client one.
    pub async fn search(&self, query: impl Into<Query>) -> Result<ResultSet> {
        self.search_with_limit(query, DEFAULT_SEARCH_LIMIT).await
    }

    /// Search this type with an explicit hit limit.
    pub async fn search_with_limit(
        &self,
        query: impl Into<Query>,
        limit: usize,
    ) -> Result<ResultSet> {
        let path = format!("{}/{}/_search", self.index, self.name);
        search(&self.client, &path, query.into(), limit).await
    }

    /// Count the documents of this type matching the query.
    pub async fn count(&self, query: impl Into<Query>) -> Result<u64> {
        let path = format!("{}/{}/_count", self.index, self.name);
        count(&self.client, &path, query.into()).await
    }

    fn mapping_path(&self) -> String {
        format!("{}/{}/_mapping", self.index, self.name)
    }

    fn doc_path(&self, id: &str) -> String {
        format!("{}/{}/{}", self.index, self.name, id)
    }
}

/// Issue a search against the given endpoint path. Shared by index-level
/// and type-level search.
pub(crate) async fn search(
    client: &Client,
    path: &str,
    query: Query,
    limit: usize,
) -> Result<ResultSet> {
    debug!("Searching {} with limit {}", path, limit);

    let body = json!({ "query": query.to_json(), "size": limit });
    let request = Request::new(Method::POST, path).json(body);
    let response = client.send_ok(request).await?;

    Ok(ResultSet::from_response(response))
}

/// Issue a count against the given endpoint path.
pub(crate) async fn count(client: &Client, path: &str, query: Query) -> Result<u64> {
    let body = json!({ "query": query.to_json() });
    let request = Request::new(Method::POST, path).json(body);
    let response = client.send_ok(request).await?;

    Ok(response.body()["count"].as_u64().unwrap_or(0))
}
