#![allow(clippy::unwrap_used)]
// Integration tests for `CouchStore` and `HttpFetcher` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use grove_api::{CouchClient, RemoteClient, TransportConfig};
use grove_core::{
    CouchStore, DocumentStore, FetchError, Fetcher, HttpFetcher, Recipe, StoreError, Variable,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn couch_store() -> (MockServer, CouchStore) {
    let server = MockServer::start().await;
    let db_url = Url::parse(&format!("{}/recipes", server.uri())).unwrap();
    let client = CouchClient::new(db_url, &TransportConfig::default()).unwrap();
    (server, CouchStore::new(client))
}

async fn http_fetcher() -> (MockServer, HttpFetcher) {
    let server = MockServer::start().await;
    let start_url = Url::parse(&format!("{}/api/recipe/start", server.uri())).unwrap();
    let client = RemoteClient::new(&TransportConfig::default()).unwrap();
    (server, HttpFetcher::new(client, start_url))
}

// ── CouchStore ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_restore_skips_unreadable_documents() {
    let (server, store) = couch_store().await;

    Mock::given(method("GET"))
        .and(path("/recipes/_all_docs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "rows": [
                { "id": "basil", "doc": { "_id": "basil", "_rev": "1-a", "name": "Basil" } },
                { "id": "kale", "doc": { "_id": "kale", "_rev": "1-b", "name": null } },
                { "id": "odd", "doc": { "_id": "odd", "name": { "en": "Odd" } } },
                { "id": "chard", "doc": { "_id": "chard", "_rev": "3-c", "name": "Chard",
                                         "operations": [[0, "air_temperature", 22]] } }
            ]
        })))
        .mount(&server)
        .await;

    let recipes = store.restore().await.unwrap();

    let ids: Vec<_> = recipes.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["basil", "kale", "chard"]);
    assert_eq!(recipes[1].title(), "kale");
    assert_eq!(recipes[2].rev.as_deref(), Some("3-c"));
    assert_eq!(recipes[2].extra["operations"], json!([[0, "air_temperature", 22]]));
}

#[tokio::test]
async fn test_restore_failure_is_storage_error() {
    let (server, store) = couch_store().await;

    Mock::given(method("GET"))
        .and(path("/recipes/_all_docs"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": "not_found", "reason": "Database does not exist."
        })))
        .mount(&server)
        .await;

    let err = store.restore().await.unwrap_err();
    assert!(
        matches!(err, StoreError::Storage(ref m) if m.contains("Database does not exist.")),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn test_put_returns_new_revision() {
    let (server, store) = couch_store().await;

    Mock::given(method("PUT"))
        .and(path("/recipes/kale"))
        .and(body_json(json!({ "_id": "kale", "name": "Kale" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "ok": true, "id": "kale", "rev": "1-k"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let confirmation = store.put(Recipe::new("kale", "Kale")).await.unwrap();
    assert_eq!(confirmation.id, "kale");
    assert_eq!(confirmation.rev, "1-k");
}

#[tokio::test]
async fn test_put_conflict_is_classified() {
    let (server, store) = couch_store().await;

    Mock::given(method("PUT"))
        .and(path("/recipes/kale"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "error": "conflict", "reason": "Document update conflict."
        })))
        .mount(&server)
        .await;

    let err = store.put(Recipe::new("kale", "Kale")).await.unwrap_err();
    assert_eq!(err, StoreError::Conflict { id: "kale".into() });
}

#[tokio::test]
async fn test_sync_failure_is_sync_error() {
    let (server, store) = couch_store().await;
    let origin = Url::parse("http://origin.example:5984/recipes").unwrap();

    Mock::given(method("POST"))
        .and(path("/_replicate"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "unauthorized", "reason": "Name or password is incorrect."
        })))
        .mount(&server)
        .await;

    let err = store.sync(origin).await.unwrap_err();
    assert!(
        matches!(err, StoreError::Sync(ref m) if m.contains("Name or password is incorrect.")),
        "unexpected error: {err:?}"
    );
}

// ── HttpFetcher ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_decodes_view_and_skips_bad_rows() {
    let (server, fetcher) = http_fetcher().await;

    Mock::given(method("GET"))
        .and(path("/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_rows": 4,
            "rows": [
                { "id": "p1", "value": { "variable": "air_temperature", "value": 22.5,
                                         "timestamp": 1_465_000_000.0 } },
                { "id": "p2", "value": { "value": 1 } },
                { "id": "p3", "value": { "variable": "water_temperature", "timestamp": [] } },
                { "id": "p4", "value": { "variable": "recipe_start", "value": "basil",
                                         "is_desired": false } }
            ]
        })))
        .mount(&server)
        .await;

    let url = Url::parse(&format!("{}/latest", server.uri())).unwrap();
    let set = fetcher.get(url).await.unwrap();

    let vars: Vec<_> = set.rows.iter().map(|p| p.variable).collect();
    assert_eq!(
        vars,
        [Variable::AirTemperature, Variable::Other, Variable::RecipeStart]
    );
    assert_eq!(set.rows[0].as_f64(), Some(22.5));
    assert_eq!(set.rows[2].as_str(), Some("basil"));
}

#[tokio::test]
async fn test_get_server_error_is_fetch_status() {
    let (server, fetcher) = http_fetcher().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("warming up"))
        .mount(&server)
        .await;

    let url = Url::parse(&format!("{}/latest", server.uri())).unwrap();
    let err = fetcher.get(url).await.unwrap_err();
    assert_eq!(
        err,
        FetchError::Status {
            status: 503,
            message: "warming up".into()
        }
    );
}

#[tokio::test]
async fn test_start_recipe_posts_to_configured_url() {
    let (server, fetcher) = http_fetcher().await;

    Mock::given(method("POST"))
        .and(path("/api/recipe/start"))
        .and(body_json(json!({ "recipe_id": "basil" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    fetcher.start_recipe("basil".into()).await.unwrap();
}
