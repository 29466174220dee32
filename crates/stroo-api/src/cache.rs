//! Single-slot analysis cache
//!
//! One model is cached for the whole service, not per caller: a request that
//! analyses new source replaces the model every later request renders
//! against. A whole cycle runs under the slot lock, so requests are handled
//! one at a time.

use std::sync::Arc;

use parking_lot::Mutex;
use stroo_generation::{GenerationConfig, Generator, InvocationParams, TemplateSet};
use stroo_model::{PackageModel, SourceLoader};
use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};
use crate::models::GenerateRequest;
use crate::project::TemporaryProject;

/// Label used for request templates in errors and the header
pub const TEMPLATE_LABEL: &str = "playground";

/// An analysed snippet
#[derive(Debug, Clone)]
pub struct CachedAnalysis {
    /// The frozen model
    pub model: Arc<PackageModel>,
    /// First declared type; the main template is rendered for it
    pub root: String,
}

/// Model cache shared by all requests
#[derive(Debug)]
pub struct AnalysisCache {
    slot: Mutex<Option<CachedAnalysis>>,
    config: GenerationConfig,
}

impl AnalysisCache {
    /// Create an empty cache
    pub fn new(config: GenerationConfig) -> Self {
        Self {
            slot: Mutex::new(None),
            config,
        }
    }

    /// Run one request: parse the template, analyse if needed, render, format
    ///
    /// A failed analysis leaves the previous model in place.
    pub fn generate(&self, request: &GenerateRequest) -> ApiResult<String> {
        // Templates change more often than sources; parse first
        let templates = TemplateSet::parse(TEMPLATE_LABEL, &request.template)
            .map_err(ApiError::from_generation)?;

        let mut slot = self.slot.lock();
        let mut generator = Generator::with_config(self.config.clone());

        let reusable = if request.source_changed {
            None
        } else {
            slot.clone()
        };
        let analysis = match reusable {
            Some(cached) => {
                debug!("Reusing cached model for {}", cached.root);
                cached
            }
            None => {
                let fresh = self.analyse(&mut generator, &request.source)?;
                *slot = Some(fresh.clone());
                fresh
            }
        };

        let mut params = InvocationParams::new(&analysis.root, TEMPLATE_LABEL);
        params.test_mode = true;
        generator
            .render_with_model(&analysis.model, &templates, &params)
            .map_err(ApiError::from_generation)
    }

    /// Whether a model is cached
    pub fn is_warm(&self) -> bool {
        self.slot.lock().is_some()
    }

    /// Root type of the cached model
    pub fn cached_root(&self) -> Option<String> {
        self.slot.lock().as_ref().map(|cached| cached.root.clone())
    }

    /// Drop the cached model
    pub fn clear(&self) {
        *self.slot.lock() = None;
    }

    fn analyse(&self, generator: &mut Generator, source: &str) -> ApiResult<CachedAnalysis> {
        // Removed on drop, whichever way this returns
        let project =
            TemporaryProject::create(source).map_err(|e| ApiError::TempProject(e.to_string()))?;

        let mut packages = SourceLoader::new()
            .load_tree(project.root())
            .map_err(ApiError::from_load)?;
        if packages.len() != 1 {
            return Err(ApiError::PackageCountMismatch(packages.len()));
        }
        let package = packages
            .pop()
            .ok_or(ApiError::PackageCountMismatch(0))?;

        let model = generator
            .analyse(&package)
            .map_err(|e| ApiError::AnalysisFailure(e.to_string()))?;
        let root = model
            .first_declared_type()
            .map(|info| info.name.clone())
            .ok_or(ApiError::NoTypesFound)?;

        info!(
            "Analysed package {}: {} types, root {}",
            model.name(),
            model.types().len(),
            root
        );
        Ok(CachedAnalysis { model, root })
    }
}
