//! API request and response models

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Generation request
///
/// The template is parsed on every request. The source is analysed only when
/// `sourceChanged` is set or nothing has been analysed yet; otherwise the
/// cached model is reused and `source` is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// Template text, may contain `{{#define}}` blocks
    #[serde(alias = "Template")]
    pub template: String,
    /// Rust snippet, optionally split with `//--- path.rs` marker lines
    #[serde(alias = "Source")]
    pub source: String,
    /// Rebuild the model from `source`
    #[serde(default, alias = "SourceChanged")]
    pub source_changed: bool,
}

/// Generation response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GenerateResponse {
    /// Formatted output, header included
    pub result: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Version
    pub version: String,
    /// Uptime in seconds
    pub uptime: u64,
    /// Whether a model is cached
    pub cache_warm: bool,
}
