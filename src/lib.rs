//! Asynchronous client for Elasticsearch-compatible search engines.
//!
//! This crate is a thin request/response mapping layer over the engine's
//! HTTP JSON protocol:
//! - Index administration (create/delete/exists, refresh/optimize/flush,
//!   cache clearing, aliasing)
//! - Per-type mappings and document CRUD, including batch submission
//! - Attachment ingestion (engine-side text/metadata extraction)
//! - Parent/child document links
//! - Read-only status introspection over indices and aliases
//!
//! The engine owns indexing, sharding, and query planning; the client owns
//! building correct requests and exposing the responses. Writes are
//! near-real-time: they become visible to search after the caller crosses a
//! `refresh`/`flush`/`optimize` boundary. The client never retries or
//! caches; each operation is one blocking call that succeeds or fails with
//! full diagnostics.
//!
//! # Example
//!
//! ```rust,no_run
//! use trawl::{Client, ClientConfig, Document, IndexSettings, Mapping, MappingField};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new(ClientConfig::new("http://localhost:9200"))?;
//!
//!     let index = client.index("articles");
//!     index.create(IndexSettings::new().shards(1).replicas(0)).await?;
//!
//!     let articles = index.doc_type("article");
//!     articles
//!         .set_mapping(
//!             &Mapping::new()
//!                 .field("title", MappingField::string())
//!                 .field("views", MappingField::integer().store(true)),
//!         )
//!         .await?;
//!
//!     let response = articles
//!         .add_document(&Document::new(1).field("title", "Hello world"))
//!         .await?;
//!     assert_eq!(response.version(), Some(1));
//!
//!     index.refresh().await?;
//!
//!     let results = articles.search("hello").await?;
//!     println!("{} of {} hits", results.count(), results.total_hits());
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod bulk;
mod client;
mod config;
mod doc_type;
mod document;
mod error;
mod index;
mod mapping;
mod query;
mod request;
mod response;
mod search;
mod status;

pub use bulk::{BulkItem, BulkResponse};
pub use client::Client;
pub use config::ClientConfig;
pub use doc_type::DocType;
pub use document::Document;
pub use error::{Error, Result};
pub use index::{CreateOptions, Index, IndexSettings};
pub use mapping::{FieldType, Mapping, MappingField};
pub use query::Query;
pub use request::{Request, RequestBody};
pub use response::Response;
pub use search::{DEFAULT_SEARCH_LIMIT, ResultSet, SearchHit};
pub use status::{IndexStatus, Status};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        Client, ClientConfig, Document, Error, Index, IndexSettings, Mapping, MappingField, Query,
        Result, ResultSet,
    };
}
