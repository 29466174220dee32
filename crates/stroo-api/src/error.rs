//! API error types and handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use stroo_generation::GenerationError;
use stroo_model::ModelError;
use thiserror::Error;
use utoipa::ToSchema;

/// Failure categories reported in the `type` field of an error body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Body is not a valid generate request
    MalformedRequest,
    /// Template text does not parse
    TemplateParse,
    /// Temporary project could not be written
    TempProject,
    /// Snippet files could not be loaded
    PackageLoad,
    /// Snippet did not yield exactly one package
    PackageCountMismatch,
    /// Declarations could not be read or resolved
    AnalysisFailure,
    /// Snippet declares no type
    NoTypesFound,
    /// Template failed while rendering
    TemplateExec,
    /// Rendered text is not valid Rust
    OutputFormat,
}

impl ErrorKind {
    /// HTTP status for this kind
    pub fn status(self) -> StatusCode {
        match self {
            ErrorKind::MalformedRequest => StatusCode::BAD_REQUEST,
            ErrorKind::TempProject | ErrorKind::PackageLoad => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    /// Body is not a generate request
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// Template text does not parse
    #[error("Template parse error: {0}")]
    TemplateParse(String),

    /// Snippet could not be written to disk
    #[error("Could not prepare temporary project: {0}")]
    TempProject(String),

    /// Snippet files could not be read
    #[error("Package load failed: {0}")]
    PackageLoad(String),

    /// Snippet spans more than one directory
    #[error("Expecting exactly one package, found {0}")]
    PackageCountMismatch(usize),

    /// Snippet does not parse or resolve
    #[error("Analysis failed: {0}")]
    AnalysisFailure(String),

    /// Snippet declares no type
    #[error("No types found, please add a type")]
    NoTypesFound,

    /// Rendering failed
    #[error("Template execution failed: {0}")]
    TemplateExec(String),

    /// Rendered text rejected by the formatter
    #[error("Output is not valid Rust: {0}")]
    OutputFormat(String),
}

impl ApiError {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::MalformedRequest(_) => ErrorKind::MalformedRequest,
            ApiError::TemplateParse(_) => ErrorKind::TemplateParse,
            ApiError::TempProject(_) => ErrorKind::TempProject,
            ApiError::PackageLoad(_) => ErrorKind::PackageLoad,
            ApiError::PackageCountMismatch(_) => ErrorKind::PackageCountMismatch,
            ApiError::AnalysisFailure(_) => ErrorKind::AnalysisFailure,
            ApiError::NoTypesFound => ErrorKind::NoTypesFound,
            ApiError::TemplateExec(_) => ErrorKind::TemplateExec,
            ApiError::OutputFormat(_) => ErrorKind::OutputFormat,
        }
    }

    /// Loading failures; a snippet that does not parse is the caller's fault
    pub fn from_load(error: ModelError) -> Self {
        match error {
            ModelError::Parse { .. } => ApiError::AnalysisFailure(error.to_string()),
            other => ApiError::PackageLoad(other.to_string()),
        }
    }

    /// Failures of the render and format stages
    pub fn from_generation(error: GenerationError) -> Self {
        match error {
            GenerationError::TemplateParse { .. } => ApiError::TemplateParse(error.to_string()),
            GenerationError::Model(e) => ApiError::AnalysisFailure(e.to_string()),
            GenerationError::OutputFormat { line, column, message, .. } => {
                ApiError::OutputFormat(format!("{}:{}: {}", line, column, message))
            }
            other => ApiError::TemplateExec(other.to_string()),
        }
    }
}

/// Error body: `{status, error, type}`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// HTTP status code
    pub status: u16,
    /// Human readable message
    pub error: String,
    /// Failure category
    #[serde(rename = "type")]
    pub kind: ErrorKind,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let status = kind.status();
        tracing::warn!("Request failed ({:?}): {}", kind, self);

        let body = Json(ErrorResponse {
            status: status.as_u16(),
            error: self.to_string(),
            kind,
        });

        (status, body).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;
