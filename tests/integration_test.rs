//! Integration tests for trawl, driven against a mock engine.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::{Value, json};
use trawl::{
    Client, ClientConfig, CreateOptions, Document, Error, IndexSettings, Mapping, MappingField,
    Query,
};
use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client_for(server: &MockServer) -> Client {
    Client::new(ClientConfig::new(server.uri())).unwrap()
}

#[tokio::test]
async fn test_add_document_version_increments() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/test/test/1"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "ok": true, "_index": "test", "_type": "test", "_id": "1", "_version": 1
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/test/test/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true, "_index": "test", "_type": "test", "_id": "1", "_version": 2
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let doc_type = client.index("test").doc_type("test");
    let doc = Document::new(1).field("title", "Hello world");

    let response = doc_type.add_document(&doc).await.unwrap();
    assert_eq!(response.version(), Some(1));

    let response = doc_type.add_document(&doc).await.unwrap();
    assert_eq!(response.version(), Some(2));
}

#[tokio::test]
async fn test_create_with_recreate_deletes_first() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/test"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "ok": true, "acknowledged": true })),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/test"))
        .and(body_json(json!({
            "settings": { "number_of_shards": 1, "number_of_replicas": 0 }
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "ok": true, "acknowledged": true })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let response = client
        .index("test")
        .create_with(
            IndexSettings::new().shards(1).replicas(0),
            &CreateOptions::new().recreate(true),
        )
        .await
        .unwrap();

    assert!(response.acknowledged());
}

#[tokio::test]
async fn test_recreate_tolerates_missing_index() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/test"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": "IndexMissingException[[test] missing]", "status": 404
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/test"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "ok": true, "acknowledged": true })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let result = client
        .index("test")
        .create_with(IndexSettings::new(), &CreateOptions::new().recreate(true))
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_delete_missing_index_is_remote_error() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/index_does_not_exist"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": "IndexMissingException[[index_does_not_exist] missing]", "status": 404
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.index("index_does_not_exist").delete().await.unwrap_err();

    assert!(err.is_remote());
    assert_eq!(err.status_code(), Some(404));

    // The error carries the original request and response for diagnostics.
    let request = err.request().unwrap();
    assert_eq!(request.method(), &http::Method::DELETE);
    assert_eq!(request.path(), "index_does_not_exist");

    let response = err.response().unwrap();
    assert!(response.has_error());
    assert!(response.error_reason().unwrap().contains("IndexMissingException"));
}

#[tokio::test]
async fn test_unrecognized_create_option_fails_before_any_request() {
    let server = MockServer::start().await;
    let client = client_for(&server).await;

    let options = CreateOptions::from_json(&json!({
        "recreate": true, "routing": "r1,r2", "testing_invalid_option": true
    }));

    match options {
        Err(Error::InvalidConfiguration(message)) => {
            assert!(message.contains("testing_invalid_option"));
        }
        other => panic!("expected InvalidConfiguration, got {other:?}"),
    }

    // Keep the client alive so the compiler can't argue it away; the point
    // is that the engine never saw a request.
    drop(client);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_replace_alias_is_a_single_atomic_call() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/_aliases"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "test1": { "aliases": { "test-alias": {} } },
            "test2": { "aliases": {} }
        })))
        .expect(1)
        .mount(&server)
        .await;

    // One _aliases call carrying both the removal and the addition.
    Mock::given(method("POST"))
        .and(path("/_aliases"))
        .and(body_json(json!({
            "actions": [
                { "remove": { "index": "test1", "alias": "test-alias" } },
                { "add": { "index": "test2", "alias": "test-alias" } }
            ]
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "ok": true, "acknowledged": true })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let response = client
        .index("test2")
        .add_alias("test-alias", true)
        .await
        .unwrap();

    assert!(response.acknowledged());
}

#[tokio::test]
async fn test_add_and_remove_alias_without_replace() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/_aliases"))
        .and(body_json(json!({
            "actions": [ { "add": { "index": "test1", "alias": "test-alias" } } ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/_aliases"))
        .and(body_json(json!({
            "actions": [ { "remove": { "index": "test1", "alias": "test-alias" } } ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let index = client.index("test1");

    assert!(index.add_alias("test-alias", false).await.unwrap().acknowledged());
    assert!(index.remove_alias("test-alias").await.unwrap().acknowledged());
}

#[tokio::test]
async fn test_alias_may_bind_multiple_indices() {
    let server = MockServer::start().await;

    for index in ["test1", "test2"] {
        Mock::given(method("GET"))
            .and(path(format!("/{index}/_status")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "indices": { index: { "docs": { "num_docs": 0 } } }
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(format!("/{index}/_aliases")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                index: { "aliases": { "test-alias": {} } }
            })))
            .mount(&server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path("/_aliases"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "test1": { "aliases": { "test-alias": {} } },
            "test2": { "aliases": { "test-alias": {} } }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;

    // Without replace semantics, both indices hold the alias at once.
    assert!(client.index("test1").status().await.unwrap().has_alias("test-alias"));
    assert!(client.index("test2").status().await.unwrap().has_alias("test-alias"));

    let status = client.status().await.unwrap();
    assert_eq!(
        status.indices_with_alias("test-alias"),
        vec!["test1", "test2"]
    );
}

#[tokio::test]
async fn test_status_refresh_observes_removed_alias_bindings() {
    let server = MockServer::start().await;

    // Before: the index exists and holds the alias. After its deletion the
    // alias bindings are gone with it.
    Mock::given(method("GET"))
        .and(path("/_aliases"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "test": { "aliases": { "test-aliase": {} } }
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/_aliases"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = client_for(&server).await;

    let mut status = client.status().await.unwrap();
    assert!(status.index_exists("test"));
    assert!(status.alias_exists("test-aliase"));
    assert_eq!(status.indices_with_alias("test-aliase"), vec!["test"]);

    // The snapshot is only updated by an explicit refresh.
    assert!(status.index_exists("test"));

    status.refresh().await.unwrap();
    assert!(!status.index_exists("test"));
    assert!(!status.alias_exists("test-aliase"));
}

#[tokio::test]
async fn test_search_sends_default_limit_of_ten() {
    let server = MockServer::start().await;

    let hits: Vec<Value> = (1..=10)
        .map(|i| {
            json!({
                "_index": "zero", "_type": "zeroType", "_id": i.to_string(),
                "_score": 1.0, "_source": { "username": "farrelley" }
            })
        })
        .collect();

    Mock::given(method("POST"))
        .and(path("/zero/zeroType/_search"))
        .and(body_json(json!({
            "query": { "query_string": { "query": "farrelley" } },
            "size": 10
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "took": 2,
            "hits": { "total": 11, "max_score": 1.0, "hits": hits }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let results = client
        .index("zero")
        .doc_type("zeroType")
        .search("farrelley")
        .await
        .unwrap();

    assert_eq!(results.count(), 10);
    assert_eq!(results.total_hits(), 11);
}

#[tokio::test]
async fn test_search_with_explicit_limit() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/zero/_search"))
        .and(body_json(json!({
            "query": { "query_string": { "query": "farrelley" } },
            "size": 1
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "took": 1,
            "hits": { "total": 11, "max_score": 1.0, "hits": [
                { "_index": "zero", "_type": "zeroType", "_id": "1", "_score": 1.0,
                  "_source": { "username": "farrelley" } }
            ] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let results = client
        .index("zero")
        .search_with_limit("farrelley", 1)
        .await
        .unwrap();

    assert_eq!(results.count(), 1);
    assert_eq!(results.total_hits(), 11);
}

#[tokio::test]
async fn test_source_excluded_field_absent_from_fetched_document() {
    let server = MockServer::start().await;

    // The mapping declares the attachment field excluded from _source.
    Mock::given(method("PUT"))
        .and(path("/content/content/_mapping"))
        .and(body_json(json!({
            "content": {
                "_source": { "excludes": ["file"] },
                "properties": {
                    "file": { "type": "attachment", "store": true },
                    "text": { "type": "string", "store": true },
                    "title": { "type": "string", "store": true }
                }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/content/content/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_index": "content", "_type": "content", "_id": "1", "_version": 1,
            "found": true,
            "_source": { "title": "No Title", "text": "Basel World" }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let doc_type = client.index("content").doc_type("content");

    let mapping = Mapping::new()
        .field("file", MappingField::attachment().store(true))
        .field("text", MappingField::string().store(true))
        .field("title", MappingField::string().store(true))
        .source_excludes(["file"]);
    doc_type.set_mapping(&mapping).await.unwrap();

    let doc = doc_type.get_document(1).await.unwrap().unwrap();
    assert_eq!(doc.get("title"), Some(&json!("No Title")));
    assert_eq!(doc.get("text"), Some(&json!("Basel World")));
    assert!(doc.get("file").is_none());
    assert_eq!(doc.version(), Some(1));
}

#[tokio::test]
async fn test_attachment_content_is_base64_on_the_wire() {
    let server = MockServer::start().await;

    let content = b"%PDF-1.4 minimal attachment";
    let encoded = BASE64.encode(content);

    Mock::given(method("PUT"))
        .and(path("/test/test/1"))
        .and(body_json(json!({ "file": encoded, "text": "basel world" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "ok": true, "_id": "1", "_version": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let doc = Document::new(1)
        .file_content("file", content)
        .field("text", "basel world");

    let response = client
        .index("test")
        .doc_type("test")
        .add_document(&doc)
        .await
        .unwrap();

    assert_eq!(response.version(), Some(1));
}

#[tokio::test]
async fn test_parent_reference_routes_the_write() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/test/comment/1"))
        .and(query_param("parent", "2"))
        .and(body_json(json!({ "author": "Max" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "ok": true, "_id": "1", "_version": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let comment = Document::new(1).field("author", "Max").parent(2);

    client
        .index("test")
        .doc_type("comment")
        .add_document(&comment)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_has_child_query_against_parent_type() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/test/blog/_search"))
        .and(body_json(json!({
            "query": {
                "has_child": {
                    "type": "comment",
                    "query": { "query_string": { "query": "Max" } }
                }
            },
            "size": 10
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "took": 2,
            "hits": { "total": 1, "max_score": 1.0, "hits": [
                { "_index": "test", "_type": "blog", "_id": "2", "_score": 1.0,
                  "_source": { "title": "Foo bar" } }
            ] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let results = client
        .index("test")
        .doc_type("blog")
        .search(Query::has_child("comment", "Max"))
        .await
        .unwrap();

    assert_eq!(results.count(), 1);
    assert_eq!(results.get(0).unwrap().field("title"), Some(&json!("Foo bar")));
}

#[tokio::test]
async fn test_bulk_outcomes_are_independent_and_ordered() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/_bulk"))
        .and(header("content-type", "application/x-ndjson"))
        .and(body_string_contains("\"_index\":\"test\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "took": 5,
            "errors": true,
            "items": [
                { "index": { "_index": "test", "_id": "1", "_version": 1, "status": 201 } },
                { "index": { "_index": "test", "_id": "2", "status": 400,
                    "error": { "type": "mapper_parsing_exception", "reason": "failed to parse" } } },
                { "index": { "_index": "test", "_id": "3", "_version": 1, "status": 201 } }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let docs = vec![
        Document::new(1).field("title", "first"),
        Document::new(2).field("title", "second"),
        Document::new(3).field("title", "third"),
    ];

    let bulk = client
        .index("test")
        .doc_type("test")
        .add_documents(&docs)
        .await
        .unwrap();

    // A failed document does not suppress its siblings' outcomes.
    assert!(bulk.has_errors());
    assert_eq!(bulk.len(), 3);
    assert_eq!(bulk.items()[0].id(), "1");
    assert!(bulk.items()[0].is_ok());
    assert_eq!(bulk.items()[0].version(), Some(1));
    assert_eq!(bulk.items()[1].error(), Some("failed to parse"));
    assert!(bulk.items()[2].is_ok());
    assert_eq!(bulk.failures().count(), 1);
}

#[tokio::test]
async fn test_empty_index_mapping_is_empty_not_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/test/_mapping"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "test": {} })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let mappings = client.index("test").mapping().await.unwrap();

    assert!(mappings.is_empty());
}

#[tokio::test]
async fn test_index_mapping_lists_types() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/test/_mapping"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "test": {
                "user": { "properties": {
                    "id": { "type": "integer", "store": true },
                    "email": { "type": "string" }
                } }
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let mappings = client.index("test").mapping().await.unwrap();

    assert_eq!(mappings["user"]["properties"]["id"]["type"], "integer");
    assert_eq!(mappings["user"]["properties"]["id"]["store"], true);
}

#[tokio::test]
async fn test_exists_reports_absence_without_error() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/test"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    Mock::given(method("HEAD"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    assert!(client.index("test").exists().await.unwrap());
    assert!(!client.index("missing").exists().await.unwrap());
}

#[tokio::test]
async fn test_maintenance_calls_hit_their_endpoints() {
    let server = MockServer::start().await;

    for endpoint in ["_refresh", "_optimize", "_flush", "_cache/clear"] {
        Mock::given(method("POST"))
            .and(path(format!("/test1/{endpoint}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = client_for(&server).await;
    let index = client.index("test1");

    assert!(!index.refresh().await.unwrap().has_error());
    assert!(!index.optimize().await.unwrap().has_error());
    assert!(!index.flush().await.unwrap().has_error());
    assert!(!index.clear_cache().await.unwrap().has_error());
}

#[tokio::test]
async fn test_index_status_reports_aliases_and_doc_count() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/test1/_status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "indices": { "test1": {
                "docs": { "num_docs": 3 },
                "index": { "size_in_bytes": 2048 }
            } }
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/test1/_aliases"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "test1": { "aliases": { "test-alias": {} } }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let status = client.index("test1").status().await.unwrap();

    assert!(status.has_alias("test-alias"));
    assert!(!status.has_alias("other-alias"));
    assert_eq!(status.num_docs(), Some(3));
    assert_eq!(status.size_in_bytes(), Some(2048));
}

#[tokio::test]
async fn test_delete_document_absence_is_false() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/test/test/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true, "found": true, "_id": "1", "_version": 2
        })))
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/test/test/404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "ok": true, "found": false, "_id": "404"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let doc_type = client.index("test").doc_type("test");

    assert!(doc_type.delete_document(1).await.unwrap());
    assert!(!doc_type.delete_document(404).await.unwrap());
}

#[tokio::test]
async fn test_count_documents() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/test/test/_count"))
        .and(body_json(json!({ "query": { "match_all": {} } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "count": 42 })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let count = client
        .index("test")
        .doc_type("test")
        .count(Query::MatchAll)
        .await
        .unwrap();

    assert_eq!(count, 42);
}

#[tokio::test]
async fn test_ping() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    assert!(client.ping().await.unwrap());
}

// Requires a live engine on localhost:9200.
// Run with: cargo test -- --ignored

#[tokio::test]
#[ignore]
async fn test_live_index_lifecycle() {
    let client = Client::new(ClientConfig::new("http://localhost:9200")).unwrap();
    let index = client.index("trawl_lifecycle_test");

    index
        .create_with(
            IndexSettings::new().shards(1).replicas(0),
            &CreateOptions::new().recreate(true),
        )
        .await
        .unwrap();
    assert!(index.exists().await.unwrap());

    let doc_type = index.doc_type("entry");
    let response = doc_type
        .add_document(&Document::new(1).field("title", "Hello world"))
        .await
        .unwrap();
    assert_eq!(response.version(), Some(1));

    index.refresh().await.unwrap();
    let results = doc_type.search("hello").await.unwrap();
    assert_eq!(results.count(), 1);

    index.delete().await.unwrap();
    assert!(!index.exists().await.unwrap());
}
