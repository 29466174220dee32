//! API route definitions

use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir};
use utoipa::OpenApi;

use crate::{
    handlers::{examples, generate, health},
    middleware::logging_middleware,
    state::AppState,
};

/// API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/generate", post(generate::generate))
        // Path used by older playground pages
        .route("/stroo-it", post(generate::generate))
        .route("/example-source", get(examples::example_source))
        .route("/example-template", get(examples::example_template))
        .route("/health", get(health::health_check))
        .route("/api-docs/openapi.json", get(openapi_json))
}

/// Full application: API routes, static assets as fallback, logging and CORS
pub fn app(state: AppState) -> Router {
    let assets = ServeDir::new(&state.assets_dir);
    api_routes()
        .fallback_service(assets)
        .layer(middleware::from_fn(logging_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        generate::generate,
        examples::example_source,
        examples::example_template,
        health::health_check,
    ),
    components(schemas(
        crate::models::GenerateRequest,
        crate::models::GenerateResponse,
        crate::models::HealthResponse,
        crate::error::ErrorResponse,
        crate::error::ErrorKind,
    )),
    info(
        title = "stroo API",
        version = "0.1.0",
        description = "Render templates against Rust snippets"
    )
)]
struct ApiDoc;
