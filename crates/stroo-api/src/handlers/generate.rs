//! Generation endpoint

use axum::{body::Bytes, extract::State, Json};

use crate::{
    error::{ApiError, ApiResult, ErrorResponse},
    models::{GenerateRequest, GenerateResponse},
    state::AppState,
};

/// Render a template against a snippet
///
/// The body is decoded by hand so that malformed JSON is reported with the
/// same error body as every other failure.
#[utoipa::path(
    post,
    path = "/generate",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Generated source", body = GenerateResponse),
        (status = 400, description = "Malformed request", body = ErrorResponse),
        (status = 422, description = "Template, analysis or output failure", body = ErrorResponse),
        (status = 500, description = "Snippet could not be written or loaded", body = ErrorResponse)
    )
)]
pub async fn generate(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<GenerateResponse>> {
    let request: GenerateRequest =
        serde_json::from_slice(&body).map_err(|e| ApiError::MalformedRequest(e.to_string()))?;

    let cache = state.cache.clone();
    let result = tokio::task::spawn_blocking(move || cache.generate(&request))
        .await
        .map_err(|e| ApiError::TemplateExec(format!("generation task failed: {}", e)))??;

    Ok(Json(GenerateResponse { result }))
}
