//! Engine client implementation.

use crate::{
    config::ClientConfig,
    error::{Error, Result},
    index::Index,
    request::{Request, RequestBody},
    response::Response,
    status::Status,
};
use http::Method;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

/// Client for an Elasticsearch-compatible search engine.
///
/// Holds the connection configuration and resolves named indices. Cloning is
/// cheap; clones share the underlying connection pool.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: Arc<Url>,
    config: Arc<ClientConfig>,
}

impl Client {
    /// Create a new client.
    ///
    /// Fails with [`Error::InvalidConfiguration`] if the configured URL is
    /// not parseable. No connection is opened until the first operation.
    pub fn new(config: ClientConfig) -> Result<Self> {
        info!("Initializing engine client for: {}", config.url);

        let mut base_url = Url::parse(&config.url)
            .map_err(|e| Error::InvalidConfiguration(format!("invalid URL: {e}")))?;

        // Paths are joined relative to the base, so it must end in a slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        debug!("Engine client initialized");

        Ok(Self {
            http,
            base_url: Arc::new(base_url),
            config: Arc::new(config),
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Resolve a named index. An alias name works anywhere a read is issued.
    pub fn index(&self, name: impl Into<String>) -> Index {
        Index::new(self.clone(), name.into())
    }

    /// Take a snapshot of which indices and aliases currently exist.
    pub async fn status(&self) -> Result<Status> {
        Status::fetch(self.clone()).await
    }

    /// Ping the engine.
    pub async fn ping(&self) -> Result<bool> {
        let response = self.send(Request::new(Method::GET, "")).await;
        Ok(response.is_ok_and(|r| r.is_success()))
    }

    /// Dispatch a request, returning the engine response regardless of
    /// status. Only transport failures become errors here.
    pub(crate) async fn send(&self, request: Request) -> Result<Response> {
        debug!(method = %request.method(), path = %request.path(), "dispatching request");

        let url = self.base_url.join(request.path().trim_start_matches('/'))?;
        let mut builder = self.http.request(request.method().clone(), url);

        if !request.query().is_empty() {
            builder = builder.query(request.query());
        }

        if let (Some(user), Some(pass)) = (&self.config.username, &self.config.password) {
            builder = builder.basic_auth(user, Some(pass));
        }

        match request.body() {
            Some(RequestBody::Json(body)) => builder = builder.json(body),
            Some(RequestBody::NdJson(payload)) => {
                builder = builder
                    .header(http::header::CONTENT_TYPE, "application/x-ndjson")
                    .body(payload.clone());
            }
            None => {}
        }

        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        // Non-JSON error bodies are preserved verbatim for diagnostics.
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            match serde_json::from_slice(&bytes) {
                Ok(value) => value,
                Err(_) => Value::String(String::from_utf8_lossy(&bytes).into_owned()),
            }
        };

        Ok(Response::new(status, body))
    }

    /// Dispatch a request and treat any non-2xx status as [`Error::Remote`],
    /// carrying the request and response for the caller.
    pub(crate) async fn send_ok(&self, request: Request) -> Result<Response> {
        let response = self.send(request.clone()).await?;
        if response.is_success() {
            Ok(response)
        } else {
            Err(Error::remote(request, response))
        }
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("url", &self.config.url)
            .finish()
    }
}
