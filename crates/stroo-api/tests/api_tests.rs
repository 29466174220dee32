//! Service tests driven through the router with `oneshot`

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use stroo_api::{routes, AppState};
use stroo_generation::GenerationConfig;
use tempfile::TempDir;
use tower::ServiceExt;

fn app(assets: &TempDir) -> (Router, AppState) {
    let state = AppState::new(GenerationConfig::default(), assets.path());
    (routes::app(state.clone()), state)
}

async fn post_generate(app: &Router, body: String) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/generate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get_text(app: &Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn test_generate_success() {
    let assets = TempDir::new().unwrap();
    let (app, _) = app(&assets);
    let body = json!({
        "template": "impl {{main.name}} { pub const FIELDS: usize = {{#each main.fields}}1 + {{/each}}0; }",
        "source": "pub struct Order { pub id: u64, pub total: u64 }",
        "sourceChanged": true,
    });
    let (status, value) = post_generate(&app, body.to_string()).await;
    assert_eq!(status, StatusCode::OK);
    let result = value["result"].as_str().unwrap();
    assert!(result.starts_with("//! Generated on"));
    assert!(result.contains("pub const FIELDS: usize = 1 + 1 + 0;"));
}

#[tokio::test]
async fn test_cache_reuse_follows_flag_not_content() {
    let assets = TempDir::new().unwrap();
    let (app, state) = app(&assets);

    let first = json!({
        "template": "pub struct {{main.name}}One;",
        "source": "pub struct Alpha;",
        "sourceChanged": true,
    });
    let (status, value) = post_generate(&app, first.to_string()).await;
    assert_eq!(status, StatusCode::OK);
    assert!(value["result"].as_str().unwrap().contains("pub struct AlphaOne;"));

    // Different source text, flag unset: the cached model is used
    let second = json!({
        "template": "pub struct {{main.name}}Two;",
        "source": "pub struct Beta;",
        "sourceChanged": false,
    });
    let (_, value) = post_generate(&app, second.to_string()).await;
    assert!(value["result"].as_str().unwrap().contains("pub struct AlphaTwo;"));
    assert_eq!(state.cache.cached_root().as_deref(), Some("Alpha"));
}

#[tokio::test]
async fn test_malformed_request() {
    let assets = TempDir::new().unwrap();
    let (app, _) = app(&assets);
    let (status, value) = post_generate(&app, "{not json".to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["type"], "malformed_request");
    assert_eq!(value["status"], 400);
    assert!(value["error"].as_str().unwrap().starts_with("Malformed request"));
}

#[tokio::test]
async fn test_failures_carry_kind_and_status() {
    let assets = TempDir::new().unwrap();
    let (app, _) = app(&assets);
    let cases = [
        (json!({"template": "{{#each}}", "source": "pub struct A;"}), "template_parse"),
        (json!({"template": "x", "source": "", "sourceChanged": true}), "no_types_found"),
        (
            json!({"template": "x", "source": "pub struct A { pub b: Nowhere }", "sourceChanged": true}),
            "analysis_failure",
        ),
        (
            json!({"template": "fn broken( {", "source": "pub struct A;", "sourceChanged": true}),
            "output_format",
        ),
    ];
    for (body, kind) in cases {
        let (status, value) = post_generate(&app, body.to_string()).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{kind}");
        assert_eq!(value["type"], kind);
        assert_eq!(value["status"], 422);
    }
}

#[tokio::test]
async fn test_examples_health_and_static_assets() {
    let assets = TempDir::new().unwrap();
    std::fs::write(assets.path().join("example-source.rs"), "pub struct Demo;\n").unwrap();
    std::fs::write(assets.path().join("index.html"), "<html>stroo</html>").unwrap();
    let (app, _) = app(&assets);

    let (status, text) = get_text(&app, "/example-source").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, "pub struct Demo;\n");

    let (status, _) = get_text(&app, "/example-template").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, text) = get_text(&app, "/index.html").await;
    assert_eq!(status, StatusCode::OK);
    assert!(text.contains("stroo"));

    let (status, text) = get_text(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    let health: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["cache_warm"], false);

    let (status, text) = get_text(&app, "/api-docs/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(text.contains("/generate"));
}
