//! Router-level tests against a mock storage API.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::util::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use amara_api::{create_router, ApiConfig, AppState};
use amara_storage::{StorageClient, StorageConfig};

fn test_router(storage_base_url: &str) -> axum::Router {
    let storage = StorageClient::new(StorageConfig {
        base_url: storage_base_url.to_string(),
        service_key: "service-role-test-key".to_string(),
    });
    let state = AppState::with_storage(ApiConfig::default(), storage);
    create_router(state, None)
}

fn json_post(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_returns_ok() {
    let app = test_router("http://storage.invalid");

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn resolve_path_routes_draft_recipes_to_private() {
    let app = test_router("http://storage.invalid");

    let response = app
        .oneshot(json_post(
            "/api/storage/resolve-path",
            serde_json::json!({
                "contentType": "recipe",
                "mediaType": "image",
                "status": "draft"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["bucket"], "private");
    assert_eq!(body["folder"], "drafts/images");
}

#[tokio::test]
async fn signed_upload_rejects_unknown_bucket() {
    let app = test_router("http://storage.invalid");

    let response = app
        .oneshot(json_post(
            "/api/storage/signed-upload",
            serde_json::json!({
                "path": "images/recipe/a.jpg",
                "contentType": "image/jpeg",
                "bucket": "recipe-photos"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["detail"].as_str().unwrap().contains("recipe-photos"));
}

#[tokio::test]
async fn signed_upload_rejects_path_traversal() {
    let app = test_router("http://storage.invalid");

    let response = app
        .oneshot(json_post(
            "/api/storage/signed-upload",
            serde_json::json!({
                "path": "images/../../secrets",
                "contentType": "image/jpeg",
                "bucket": "public"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn signed_upload_happy_path() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/storage/v1/object/upload/sign/public/images/recipe/a.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "url": "/object/upload/sign/public/images/recipe/a.jpg?token=write-token"
        })))
        .mount(&server)
        .await;

    let app = test_router(&server.uri());

    let response = app
        .oneshot(json_post(
            "/api/storage/signed-upload",
            serde_json::json!({
                "path": "images/recipe/a.jpg",
                "contentType": "image/jpeg",
                "bucket": "public"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["path"], "images/recipe/a.jpg");
    assert!(body["signedUrl"]
        .as_str()
        .unwrap()
        .contains("token=write-token"));
}

#[tokio::test]
async fn get_signed_url_returns_signed_url() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/storage/v1/object/sign/private/drafts/images/a.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "signedURL": "/object/sign/private/drafts/images/a.jpg?token=read-token"
        })))
        .mount(&server)
        .await;

    let app = test_router(&server.uri());

    let response = app
        .oneshot(json_post(
            "/api/storage/get-signed-url",
            serde_json::json!({
                "bucket": "private",
                "path": "drafts/images/a.jpg",
                "expiresIn": 600
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["signedUrl"]
        .as_str()
        .unwrap()
        .contains("token=read-token"));
}
