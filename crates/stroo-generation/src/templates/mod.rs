//! Template sets: compiled templates ready to be bound into a registry
//!
//! Provides bundle parsing, file loading and the text transforms used by helpers.

pub mod loader;
pub mod parser;
pub mod resolver;

use std::collections::BTreeMap;

use handlebars::{Handlebars, Template};
use tracing::debug;

use crate::error::{GenerationError, GenerationResult};

// Re-export public API
pub use loader::TemplateLoader;
pub use parser::{TemplateBundle, TemplateParser};
pub use resolver::CaseTransform;

/// Name the main body of a bundle is registered under
pub const MAIN_TEMPLATE: &str = "main";

/// Compiled templates keyed by name
///
/// Holds no helpers: a fresh registry is built from the set for every
/// rendering cycle so helpers can borrow that cycle's context.
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    templates: BTreeMap<String, Template>,
}

impl TemplateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a bundle; its body becomes `main` and each define its own template
    pub fn parse(label: &str, content: &str) -> GenerationResult<Self> {
        let bundle = TemplateParser::parse(label, content)?;
        let mut set = Self::new();
        set.add_bundle(MAIN_TEMPLATE, bundle)?;
        Ok(set)
    }

    /// Register a bundle's body under `name` plus all of its defines
    pub fn add_bundle(&mut self, name: &str, bundle: TemplateBundle) -> GenerationResult<()> {
        self.add(name, &bundle.main)?;
        for (define, body) in &bundle.defines {
            self.add(define, body)?;
        }
        Ok(())
    }

    /// Compile and register one template
    pub fn add(&mut self, name: &str, source: &str) -> GenerationResult<()> {
        if self.templates.contains_key(name) {
            return Err(GenerationError::TemplateParse {
                name: name.to_string(),
                message: "template is defined more than once".to_string(),
            });
        }
        let template = Template::compile(source).map_err(|e| GenerationError::TemplateParse {
            name: name.to_string(),
            message: e.to_string(),
        })?;
        debug!("Compiled template {}", name);
        self.templates.insert(name.to_string(), template);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Fresh registry holding every template, with HTML escaping disabled
    pub fn registry<'a>(&self, strict: bool) -> Handlebars<'a> {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        registry.set_strict_mode(strict);
        for (name, template) in &self.templates {
            registry.register_template(name, template.clone());
        }
        registry
    }
}
