//! Index administration.

use crate::{
    client::Client,
    doc_type::{self, DocType},
    error::{Error, Result},
    query::Query,
    request::Request,
    response::Response,
    search::{DEFAULT_SEARCH_LIMIT, ResultSet},
    status::IndexStatus,
};
use http::Method;
use serde_json::{Map, Value, json};
use tracing::{debug, info};

/// Handle for a named index.
///
/// Obtained from [`Client::index`]. Creating the handle performs no I/O;
/// every method is a single blocking call against the engine.
#[derive(Debug, Clone)]
pub struct Index {
    client: Client,
    name: String,
}

impl Index {
    pub(crate) fn new(client: Client, name: String) -> Self {
        Self { client, name }
    }

    /// The index name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get a handle for a document type within this index.
    pub fn doc_type(&self, name: impl Into<String>) -> DocType {
        DocType::new(self.client.clone(), self.name.clone(), name.into())
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Create the index.
    pub async fn create(&self, settings: IndexSettings) -> Result<Response> {
        self.create_with(settings, &CreateOptions::default()).await
    }

    /// Create the index with explicit options.
    ///
    /// With `recreate`, an existing index of the same name is deleted
    /// first, destroying its types, documents, and alias bindings; absence
    /// is tolerated, so the call is idempotent.
    pub async fn create_with(
        &self,
        settings: IndexSettings,
        options: &CreateOptions,
    ) -> Result<Response> {
        info!("Creating index: {}", self.name);

        if options.recreate {
            match self.delete().await {
                Ok(_) => {}
                Err(Error::Remote { response, .. })
                    if response.status() == http::StatusCode::NOT_FOUND => {}
                Err(e) => return Err(e),
            }
        }

        let mut request = Request::new(Method::PUT, &self.name).json(settings.to_json());
        if let Some(routing) = &options.routing {
            request = request.param("routing", routing);
        }

        self.client.send_ok(request).await
    }

    /// Delete the index, destroying all contained types, documents, and
    /// alias bindings. Deleting a missing index is an [`Error::Remote`].
    pub async fn delete(&self) -> Result<Response> {
        info!("Deleting index: {}", self.name);

        let request = Request::new(Method::DELETE, &self.name);
        self.client.send_ok(request).await
    }

    /// Check whether the index exists. Absence is `Ok(false)`, never an
    /// error.
    pub async fn exists(&self) -> Result<bool> {
        debug!("Checking if index exists: {}", self.name);

        let request = Request::new(Method::HEAD, &self.name);
        let response = self.client.send(request).await?;

        Ok(response.is_success())
    }

    /// Open the index.
    pub async fn open(&self) -> Result<Response> {
        info!("Opening index: {}", self.name);

        let request = Request::new(Method::POST, format!("{}/_open", self.name));
        self.client.send_ok(request).await
    }

    /// Close the index.
    pub async fn close(&self) -> Result<Response> {
        info!("Closing index: {}", self.name);

        let request = Request::new(Method::POST, format!("{}/_close", self.name));
        self.client.send_ok(request).await
    }

    // =========================================================================
    // Maintenance
    // =========================================================================

    /// Refresh the index, making recent writes visible to search.
    pub async fn refresh(&self) -> Result<Response> {
        debug!("Refreshing index: {}", self.name);

        let request = Request::new(Method::POST, format!("{}/_refresh", self.name));
        self.client.send_ok(request).await
    }

    /// Optimize the index, consolidating segments on disk.
    pub async fn optimize(&self) -> Result<Response> {
        debug!("Optimizing index: {}", self.name);

        let request = Request::new(Method::POST, format!("{}/_optimize", self.name));
        self.client.send_ok(request).await
    }

    /// Flush buffered writes to durable storage.
    pub async fn flush(&self) -> Result<Response> {
        debug!("Flushing index: {}", self.name);

        let request = Request::new(Method::POST, format!("{}/_flush", self.name));
        self.client.send_ok(request).await
    }

    /// Clear the index's caches.
    pub async fn clear_cache(&self) -> Result<Response> {
        debug!("Clearing cache for index: {}", self.name);

        let request = Request::new(Method::POST, format!("{}/_cache/clear", self.name));
        self.client.send_ok(request).await
    }

    // =========================================================================
    // Aliases
    // =========================================================================

    /// Bind an alias to this index.
    ///
    /// With `replace`, the alias is reassigned in a single engine call that
    /// removes it from every index currently holding it and adds it here;
    /// afterwards the alias resolves to exactly this index, with no
    /// observable window of zero or double bindings.
    pub async fn add_alias(&self, alias: &str, replace: bool) -> Result<Response> {
        info!("Adding alias {} to index {}", alias, self.name);

        let mut actions = Vec::new();

        if replace {
            let status = self.client.status().await?;
            for index in status.indices_with_alias(alias) {
                actions.push(json!({ "remove": { "index": index, "alias": alias } }));
            }
        }

        actions.push(json!({ "add": { "index": &self.name, "alias": alias } }));

        let request =
            Request::new(Method::POST, "_aliases").json(json!({ "actions": actions }));
        self.client.send_ok(request).await
    }

    /// Remove an alias binding from this index.
    pub async fn remove_alias(&self, alias: &str) -> Result<Response> {
        info!("Removing alias {} from index {}", alias, self.name);

        let actions = json!({
            "actions": [ { "remove": { "index": &self.name, "alias": alias } } ]
        });

        let request = Request::new(Method::POST, "_aliases").json(actions);
        self.client.send_ok(request).await
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    /// Take a snapshot of this index's status: bound aliases plus document
    /// and storage counts. Assembled from the status and alias endpoints;
    /// call again to observe later changes.
    pub async fn status(&self) -> Result<IndexStatus> {
        debug!("Getting status for index: {}", self.name);

        let request = Request::new(Method::GET, format!("{}/_status", self.name));
        let status = self.client.send_ok(request).await?;

        let request = Request::new(Method::GET, format!("{}/_aliases", self.name));
        let aliases = self.client.send_ok(request).await?;

        Ok(IndexStatus::from_responses(&self.name, status, aliases))
    }

    /// Get the full mapping of this index, keyed by type name. An index
    /// with no types yields an empty map, never an error.
    pub async fn mapping(&self) -> Result<Map<String, Value>> {
        debug!("Getting mapping for index: {}", self.name);

        let request = Request::new(Method::GET, format!("{}/_mapping", self.name));
        let response = self.client.send_ok(request).await?;

        let mut body = response.into_body();
        let mappings = match body.get_mut(&self.name).map(Value::take) {
            Some(mappings) => mappings,
            None => body,
        };

        Ok(mappings.as_object().cloned().unwrap_or_default())
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Search across all types of this index with the default limit of
    /// [`DEFAULT_SEARCH_LIMIT`] hits.
    pub async fn search(&self, query: impl Into<Query>) -> Result<ResultSet> {
        self.search_with_limit(query, DEFAULT_SEARCH_LIMIT).await
    }

    /// Search across all types of this index with an explicit hit limit.
    pub async fn search_with_limit(
        &self,
        query: impl Into<Query>,
        limit: usize,
    ) -> Result<ResultSet> {
        let path = format!("{}/_search", self.name);
        doc_type::search(&self.client, &path, query.into(), limit).await
    }

    /// Count the documents in this index matching the query.
    pub async fn count(&self, query: impl Into<Query>) -> Result<u64> {
        let path = format!("{}/_count", self.name);
        doc_type::count(&self.client, &path, query.into()).await
    }
}

/// Settings for index creation.
#[derive(Debug, Clone, Default)]
pub struct IndexSettings {
    /// Number of shards.
    pub number_of_shards: Option<i32>,
    /// Number of replicas.
    pub number_of_replicas: Option<i32>,
    /// Refresh interval.
    pub refresh_interval: Option<String>,
}

impl IndexSettings {
    /// Create empty settings; the engine applies its defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set number of shards.
    pub fn shards(mut self, shards: i32) -> Self {
        self.number_of_shards = Some(shards);
        self
    }

    /// Set number of replicas.
    pub fn replicas(mut self, replicas: i32) -> Self {
        self.number_of_replicas = Some(replicas);
        self
    }

    /// Set refresh interval.
    pub fn refresh_interval(mut self, interval: impl Into<String>) -> Self {
        self.refresh_interval = Some(interval.into());
        self
    }

    fn to_json(&self) -> Value {
        let mut settings = serde_json::Map::new();

        if let Some(shards) = self.number_of_shards {
            settings.insert("number_of_shards".to_string(), json!(shards));
        }
        if let Some(replicas) = self.number_of_replicas {
            settings.insert("number_of_replicas".to_string(), json!(replicas));
        }
        if let Some(interval) = &self.refresh_interval {
            settings.insert("refresh_interval".to_string(), json!(interval));
        }

        if settings.is_empty() {
            json!({})
        } else {
            json!({ "settings": Value::Object(settings) })
        }
    }
}

/// Options for index creation.
///
/// An explicit struct: compiled callers cannot pass an unrecognized option.
/// Loose configuration goes through [`CreateOptions::from_json`], which
/// rejects unknown keys locally, before any request is sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateOptions {
    /// Delete an existing index of the same name before creating.
    pub recreate: bool,
    /// Routing value passed on the create call.
    pub routing: Option<String>,
}

impl CreateOptions {
    /// Create default options: no recreate, no routing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable delete-then-create semantics.
    pub fn recreate(mut self, recreate: bool) -> Self {
        self.recreate = recreate;
        self
    }

    /// Set the routing value.
    pub fn routing(mut self, routing: impl Into<String>) -> Self {
        self.routing = Some(routing.into());
        self
    }

    /// Parse options from loose JSON configuration.
    ///
    /// Accepted keys are `recreate` and `routing`; anything else fails with
    /// [`Error::InvalidConfiguration`] before any network call.
    pub fn from_json(value: &Value) -> Result<Self> {
        let map = value.as_object().ok_or_else(|| {
            Error::InvalidConfiguration("create options must be a JSON object".to_string())
        })?;

        let mut options = Self::default();
        for (key, value) in map {
            match key.as_str() {
                "recreate" => {
                    options.recreate = value.as_bool().ok_or_else(|| {
                        Error::InvalidConfiguration("`recreate` must be a boolean".to_string())
                    })?;
                }
                "routing" => {
                    let routing = value.as_str().ok_or_else(|| {
                        Error::InvalidConfiguration("`routing` must be a string".to_string())
                    })?;
                    options.routing = Some(routing.to_string());
                }
                other => {
                    return Err(Error::InvalidConfiguration(format!(
                        "unrecognized create option `{other}`"
                    )));
                }
            }
        }

        Ok(options)
    }
}
