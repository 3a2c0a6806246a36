//! HTTP server for xhub.
//!
//! Exposes studies, trials, and files as REST resources:
//!
//! | Method | Path | Operation |
//! |---|---|---|
//! | GET, POST | `/studies` | list, create study |
//! | GET, DELETE | `/studies/{study}` | get, delete study (cascades) |
//! | GET, POST | `/studies/{study}/trials` | list, create trial |
//! | GET, DELETE | `/studies/{study}/trials/{trial}` | get, delete trial (cascades) |
//! | GET, POST | `/studies/{study}/files` | list, create study file |
//! | GET, DELETE | `/studies/{study}/files/{file}` | get, delete study file |
//! | GET, POST | `/files/{study}/{trial}` | list, create trial file |
//! | GET, DELETE | `/files/{study}/{trial}/{file}` | get, delete trial file |
//!
//! A get of an absent resource answers 204 rather than 404, and deletes
//! always answer 200.

pub mod body;
pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod state;

pub use body::{CreateRequest, CreatedBody, DeletedBody, HealthResponse, ItemBody};
pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use router::build_router;
pub use server::{XhubServer, RESOURCES_PARTITION, STUDY_INDEX_PARTITION};
pub use state::AppState;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use tower::util::ServiceExt;
    use xhub_resources::ResourceStore;
    use xhub_store::{Entry, InMemoryOrderedStore, OrderedStore, StoreError, StoreResult};

    const HOST: &str = "http://localhost:8081";

    fn app() -> Router {
        build_router(AppState::new(
            ResourceStore::in_memory().with_base_url(HOST),
        ))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
        let body = match body {
            Some(v) => Body::from(v.to_string()),
            None => Body::empty(),
        };
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body)
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    async fn send_raw(app: &Router, method: Method, uri: &str, body: &'static str) -> StatusCode {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::from(body))
            .unwrap();
        app.clone().oneshot(request).await.unwrap().status()
    }

    fn json_of(bytes: &[u8]) -> Value {
        serde_json::from_slice(bytes).unwrap()
    }

    // -----------------------------------------------------------------------
    // Service endpoints
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn health_endpoint() {
        let (status, body) = send(&app(), Method::GET, "/v1/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_of(&body)["status"], "ok");
    }

    #[tokio::test]
    async fn info_endpoint() {
        let (status, body) = send(&app(), Method::GET, "/v1/info", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_of(&body)["name"], "xhub-server");
        assert_eq!(json_of(&body)["api_version"], "1");
    }

    // -----------------------------------------------------------------------
    // Study lifecycle
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn study_lifecycle() {
        let app = app();
        let payload = json!({"desc": "pilot", "n": 3});

        let (status, body) = send(
            &app,
            Method::POST,
            "/studies",
            Some(json!({"id": "study_a", "data": payload})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json_of(&body)["id"], "/studies/study_a");
        assert_eq!(json_of(&body)["url"], format!("{HOST}/studies/study_a"));

        let (status, body) = send(&app, Method::GET, "/studies", None).await;
        assert_eq!(status, StatusCode::OK);
        let items = json_of(&body);
        let items = items.as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["url"], format!("{HOST}/studies/study_a"));
        assert_eq!(items[0]["id"], "/studies/study_a");
        assert_eq!(items[0]["resource"], "study");
        assert_eq!(items[0]["version"], "1");
        assert_eq!(items[0]["data"], payload);
        assert!(items[0]["created"].as_str().unwrap().ends_with('Z'));

        let (status, body) = send(&app, Method::GET, "/studies/study_a", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_of(&body), payload);

        let (status, _) = send(&app, Method::DELETE, "/studies/study_a", None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, Method::GET, "/studies/study_a", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn payload_is_returned_byte_for_byte() {
        let app = app();
        let status = send_raw(
            &app,
            Method::POST,
            "/studies",
            r#"{"id":"s","data": {"b": 2,  "a": [1, 2]}}"#,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let (_, body) = send(&app, Method::GET, "/studies/s", None).await;
        assert_eq!(body, br#"{"b": 2,  "a": [1, 2]}"#.to_vec());
    }

    #[tokio::test]
    async fn studies_list_sorted_by_name() {
        let app = app();
        for name in ["b", "a", "c"] {
            send(&app, Method::POST, "/studies", Some(json!({"id": name, "data": {}}))).await;
        }
        let (_, body) = send(&app, Method::GET, "/studies", None).await;
        let ids: Vec<String> = json_of(&body)
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["/studies/a", "/studies/b", "/studies/c"]);
    }

    #[tokio::test]
    async fn empty_lists_are_empty_arrays() {
        let app = app();
        for uri in ["/studies", "/studies/s/trials", "/studies/s/files", "/files/s/t"] {
            let (status, body) = send(&app, Method::GET, uri, None).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
            assert_eq!(json_of(&body), json!([]), "{uri}");
        }
    }

    // -----------------------------------------------------------------------
    // Cascades
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn deleting_a_study_removes_its_trials_and_files() {
        let app = app();
        let data = json!({"x": 1});
        send(&app, Method::POST, "/studies", Some(json!({"id": "study_a", "data": data}))).await;
        let (status, _) = send(
            &app,
            Method::POST,
            "/studies/study_a/trials",
            Some(json!({"id": "t1", "data": data})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        send(&app, Method::POST, "/studies/study_a/files", Some(json!({"id": "f1", "data": data}))).await;
        send(&app, Method::POST, "/files/study_a/t1", Some(json!({"id": "f2", "data": data}))).await;

        let (status, _) = send(&app, Method::GET, "/studies/study_a/trials/t1", None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, Method::DELETE, "/studies/study_a", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_of(&body)["descendants_removed"], 3);

        for uri in [
            "/studies/study_a/trials/t1",
            "/studies/study_a/files/f1",
            "/files/study_a/t1/f2",
        ] {
            let (status, _) = send(&app, Method::GET, uri, None).await;
            assert_eq!(status, StatusCode::NO_CONTENT, "{uri}");
        }
    }

    #[tokio::test]
    async fn deleting_a_trial_removes_its_files() {
        let app = app();
        let data = json!(null);
        send(&app, Method::POST, "/studies/s/trials", Some(json!({"id": "t", "data": data}))).await;
        send(&app, Method::POST, "/files/s/t", Some(json!({"id": "f", "data": data}))).await;
        send(&app, Method::POST, "/studies/s/files", Some(json!({"id": "g", "data": data}))).await;

        let (status, _) = send(&app, Method::DELETE, "/studies/s/trials/t", None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&app, Method::GET, "/files/s/t/f", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, Method::GET, "/studies/s/files/g", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn delete_of_absent_resource_is_ok() {
        let app = app();
        for _ in 0..2 {
            let (status, body) = send(&app, Method::DELETE, "/studies/ghost", None).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(json_of(&body)["existed"], false);
        }
        let (status, _) = send(&app, Method::DELETE, "/files/s/t/f", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    // -----------------------------------------------------------------------
    // Files
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn file_lists_are_scoped() {
        let app = app();
        send(&app, Method::POST, "/studies/s/files", Some(json!({"id": "f1", "data": 1}))).await;
        send(&app, Method::POST, "/files/s/t", Some(json!({"id": "f2", "data": 2}))).await;

        let (_, body) = send(&app, Method::GET, "/studies/s/files", None).await;
        let items = json_of(&body);
        assert_eq!(items.as_array().unwrap().len(), 1);
        assert_eq!(items[0]["id"], "/studies/s/files/f1");
        assert_eq!(items[0]["resource"], "file");
        assert!(items[0].get("created").is_none());

        let (_, body) = send(&app, Method::GET, "/files/s/t", None).await;
        let items = json_of(&body);
        assert_eq!(items[0]["url"], format!("{HOST}/files/s/t/f2"));
        assert_eq!(items[0]["data"], 2);
    }

    // -----------------------------------------------------------------------
    // Identifiers
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn canonical_id_in_scope_is_accepted() {
        let app = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/studies/s/trials",
            Some(json!({"id": "/studies/s/trials/t", "data": {}})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json_of(&body)["id"], "/studies/s/trials/t");
    }

    #[tokio::test]
    async fn canonical_id_outside_scope_is_rejected() {
        let app = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/studies/s/trials",
            Some(json!({"id": "/studies/other/trials/t", "data": {}})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json_of(&body)["error"].as_str().is_some());

        let (_, body) = send(&app, Method::GET, "/studies/other/trials", None).await;
        assert_eq!(json_of(&body), json!([]));
    }

    #[tokio::test]
    async fn invalid_segments_are_client_errors() {
        let app = app();
        for id in ["a/b", "", ".."] {
            let (status, _) = send(
                &app,
                Method::POST,
                "/studies",
                Some(json!({"id": id, "data": {}})),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{id:?}");
        }
        let (status, _) = send(&app, Method::GET, "/studies/..", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (_, body) = send(&app, Method::GET, "/studies", None).await;
        assert_eq!(json_of(&body), json!([]));
    }

    #[tokio::test]
    async fn unprintable_names_are_rejected_before_any_write() {
        let app = app();
        for id in ["a\nb", "tab\there", "cr\r", "données"] {
            let (status, body) = send(
                &app,
                Method::POST,
                "/studies",
                Some(json!({"id": id, "data": {"n": 1}})),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{id:?}");
            assert!(json_of(&body)["error"].as_str().is_some());
        }
        let (status, _) = send(
            &app,
            Method::POST,
            "/studies/s/trials",
            Some(json!({"id": "/studies/s/trials/a\u{7}b", "data": {}})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, body) = send(&app, Method::GET, "/studies", None).await;
        assert_eq!(json_of(&body), json!([]));
        let (_, body) = send(&app, Method::GET, "/studies/s/trials", None).await;
        assert_eq!(json_of(&body), json!([]));
    }

    #[tokio::test]
    async fn url_unsafe_names_are_rejected() {
        let app = app();
        for id in ["q?x", "frag#1", "a%2Fb", "100%"] {
            let (status, _) = send(
                &app,
                Method::POST,
                "/studies",
                Some(json!({"id": id, "data": {}})),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{id:?}");
        }
        let (_, body) = send(&app, Method::GET, "/studies", None).await;
        assert_eq!(json_of(&body), json!([]));

        // Percent-escapes in a request path decode to names that were
        // never creatable.
        let (status, _) = send(&app, Method::GET, "/studies/q%3Fx", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn listed_urls_route_back_to_their_resource() {
        let app = app();
        for id in ["study.v2", "a+b", "x:y@z", "(draft)~1"] {
            let (status, _) = send(
                &app,
                Method::POST,
                "/studies",
                Some(json!({"id": id, "data": {"name": id}})),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED, "{id:?}");
        }

        let (_, body) = send(&app, Method::GET, "/studies", None).await;
        let items = json_of(&body);
        let items = items.as_array().unwrap();
        assert_eq!(items.len(), 4);
        for item in items {
            let url = item["url"].as_str().unwrap();
            let path = url.strip_prefix(HOST).unwrap();
            let uri: axum::http::Uri = path.parse().unwrap();
            assert_eq!(uri.path(), path, "{url} does not survive as a request path");

            let (status, payload) = send(&app, Method::GET, path, None).await;
            assert_eq!(status, StatusCode::OK, "{url}");
            assert_eq!(json_of(&payload), item["data"]);
        }
    }

    #[tokio::test]
    async fn malformed_bodies_are_client_errors() {
        let app = app();
        assert_eq!(
            send_raw(&app, Method::POST, "/studies", "{not json").await,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            send_raw(&app, Method::POST, "/studies", r#"{"id":"a"}"#).await,
            StatusCode::BAD_REQUEST
        );
    }

    // -----------------------------------------------------------------------
    // Storage failures
    // -----------------------------------------------------------------------

    struct BrokenStore;

    impl OrderedStore for BrokenStore {
        fn put(&self, _: &[u8], _: &[u8]) -> StoreResult<()> {
            Err(StoreError::LockPoisoned("disk on fire".into()))
        }
        fn get(&self, _: &[u8]) -> StoreResult<Option<Vec<u8>>> {
            Err(StoreError::LockPoisoned("disk on fire".into()))
        }
        fn delete(&self, _: &[u8]) -> StoreResult<bool> {
            Err(StoreError::LockPoisoned("disk on fire".into()))
        }
        fn scan_prefix(&self, _: &[u8]) -> StoreResult<Vec<Entry>> {
            Err(StoreError::LockPoisoned("disk on fire".into()))
        }
    }

    #[tokio::test]
    async fn storage_failures_are_server_errors() {
        let store = ResourceStore::new(Arc::new(BrokenStore), Arc::new(InMemoryOrderedStore::new()));
        let app = build_router(AppState::new(store));

        let (status, body) = send(&app, Method::GET, "/studies/s/trials/t", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(json_of(&body)["error"]
            .as_str()
            .unwrap()
            .contains("disk on fire"));

        let (status, _) = send(&app, Method::DELETE, "/studies/s", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
