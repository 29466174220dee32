//! Template loading from files and directories
//!
//! The main template is a single file. Partials are `.hbs` files in a
//! directory, registered under their file stem.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{GenerationError, GenerationResult};
use crate::templates::parser::TemplateParser;
use crate::templates::TemplateSet;

const PARTIAL_EXTENSION: &str = "hbs";

/// Loads template sets from disk
#[derive(Debug, Default, Clone, Copy)]
pub struct TemplateLoader;

impl TemplateLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load a main template file (which may define sub-templates)
    pub fn load_file(&self, path: &Path) -> GenerationResult<TemplateSet> {
        if !path.is_file() {
            return Err(GenerationError::TemplateNotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        let set = TemplateSet::parse(&path.display().to_string(), &content)?;
        info!("Loaded template {} ({} templates)", path.display(), set.len());
        Ok(set)
    }

    /// Add every `.hbs` file of `dir` to the set, in file name order
    pub fn load_partials(&self, dir: &Path, set: &mut TemplateSet) -> GenerationResult<usize> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file()
                && path.extension().and_then(|ext| ext.to_str()) == Some(PARTIAL_EXTENSION)
            {
                paths.push(path);
            }
        }
        paths.sort();

        for path in &paths {
            let name = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .ok_or_else(|| GenerationError::TemplateNotFound(path.display().to_string()))?;
            let content = fs::read_to_string(path)?;
            let bundle = TemplateParser::parse(&path.display().to_string(), &content)?;
            set.add_bundle(name, bundle)?;
            debug!("Loaded partial {} from {}", name, path.display());
        }
        Ok(paths.len())
    }
}
