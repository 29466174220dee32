//! Application state for the API server

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use stroo_generation::GenerationConfig;

use crate::cache::AnalysisCache;

/// Application state shared across all API handlers
#[derive(Clone)]
pub struct AppState {
    /// Single-slot model cache
    pub cache: Arc<AnalysisCache>,
    /// Directory holding the UI and example files
    pub assets_dir: PathBuf,
    /// Server start time for uptime calculation
    pub start_time: Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(generation: GenerationConfig, assets_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache: Arc::new(AnalysisCache::new(generation)),
            assets_dir: assets_dir.into(),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
