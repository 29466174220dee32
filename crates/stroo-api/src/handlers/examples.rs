//! Example files for the playground UI

use std::path::Path;

use axum::{extract::State, http::StatusCode};

use crate::state::AppState;

/// Example snippet shown on first load
pub const EXAMPLE_SOURCE: &str = "example-source.rs";

/// Example template shown on first load
pub const EXAMPLE_TEMPLATE: &str = "example-template.hbs";

/// Example source
#[utoipa::path(
    get,
    path = "/example-source",
    responses(
        (status = 200, description = "Example Rust snippet", body = String, content_type = "text/plain"),
        (status = 404, description = "No example in the assets directory")
    )
)]
pub async fn example_source(State(state): State<AppState>) -> Result<String, StatusCode> {
    read_asset(&state.assets_dir, EXAMPLE_SOURCE).await
}

/// Example template
#[utoipa::path(
    get,
    path = "/example-template",
    responses(
        (status = 200, description = "Example template", body = String, content_type = "text/plain"),
        (status = 404, description = "No example in the assets directory")
    )
)]
pub async fn example_template(State(state): State<AppState>) -> Result<String, StatusCode> {
    read_asset(&state.assets_dir, EXAMPLE_TEMPLATE).await
}

async fn read_asset(dir: &Path, name: &str) -> Result<String, StatusCode> {
    let path = dir.join(name);
    tokio::fs::read_to_string(&path).await.map_err(|e| {
        tracing::warn!("Could not read {}: {}", path.display(), e);
        StatusCode::NOT_FOUND
    })
}
