//! Generation driver
//!
//! Runs one cycle: read declarations, resolve the model, render the main
//! template, prepend the header, validate and format. A failing stage stops the
//! cycle; later stages never see its partial output.

use std::fmt;
use std::sync::Arc;

use stroo_model::{PackageBuilder, PackageModel, ReaderOptions, SourcePackage};
use tracing::{debug, info, warn};

use crate::context::RenderingContext;
use crate::error::{GenerationError, GenerationResult};
use crate::formatter::SourceFormatter;
use crate::helpers;
use crate::models::{GenerationConfig, InvocationParams};
use crate::templates::{TemplateSet, MAIN_TEMPLATE};

/// Where a cycle is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStage {
    Idle,
    Reading,
    Resolving,
    Rendering,
    Formatting,
    Done,
    Failed,
}

impl fmt::Display for GenerationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GenerationStage::Idle => "idle",
            GenerationStage::Reading => "reading",
            GenerationStage::Resolving => "resolving",
            GenerationStage::Rendering => "rendering",
            GenerationStage::Formatting => "formatting",
            GenerationStage::Done => "done",
            GenerationStage::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Result of a full cycle
#[derive(Debug, Clone)]
pub struct GenerationOutput {
    /// Formatted source, header included
    pub text: String,
    /// The model the text was rendered from
    pub model: Arc<PackageModel>,
}

/// Orchestrates generation cycles
#[derive(Debug, Clone)]
pub struct Generator {
    config: GenerationConfig,
    stage: GenerationStage,
    formatter: SourceFormatter,
}

impl Generator {
    /// Creates a generator with default configuration
    pub fn new() -> Self {
        Self::with_config(GenerationConfig::default())
    }

    /// Creates a generator with custom configuration
    pub fn with_config(config: GenerationConfig) -> Self {
        Self {
            config,
            stage: GenerationStage::Idle,
            formatter: SourceFormatter::new(),
        }
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Stage reached by the last cycle
    pub fn stage(&self) -> GenerationStage {
        self.stage
    }

    /// Read and resolve a package
    pub fn analyse(&mut self, package: &SourcePackage) -> GenerationResult<Arc<PackageModel>> {
        self.enter(GenerationStage::Reading);
        let options = ReaderOptions {
            allow_redefinition: self.config.allow_redefinition,
        };
        let mut builder = PackageBuilder::with_options(&package.name, options);
        for item in package.items() {
            if let Err(e) = builder.read_item(item) {
                return Err(self.fail(e.into()));
            }
        }
        debug!(
            "Read {} types from {} files",
            builder.type_count(),
            package.files.len()
        );

        self.enter(GenerationStage::Resolving);
        match builder.resolve() {
            Ok(model) => Ok(Arc::new(model)),
            Err(e) => Err(self.fail(e.into())),
        }
    }

    /// Render and format against an already resolved model
    pub fn render_with_model(
        &mut self,
        model: &PackageModel,
        templates: &TemplateSet,
        params: &InvocationParams,
    ) -> GenerationResult<String> {
        self.enter(GenerationStage::Rendering);
        let rendered = match self.render(model, templates, params) {
            Ok(rendered) => rendered,
            Err(e) => return Err(self.fail(e)),
        };

        self.enter(GenerationStage::Formatting);
        match self.formatter.format(&rendered) {
            Ok(text) => {
                self.enter(GenerationStage::Done);
                info!(
                    "Generated {} bytes for {} from {}",
                    text.len(),
                    params.root_type,
                    params.template_file
                );
                Ok(text)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Full cycle from parsed sources to formatted text
    pub fn run(
        &mut self,
        package: &SourcePackage,
        templates: &TemplateSet,
        params: &InvocationParams,
    ) -> GenerationResult<GenerationOutput> {
        let model = self.analyse(package)?;
        let text = self.render_with_model(&model, templates, params)?;
        Ok(GenerationOutput { text, model })
    }

    /// Header plus rendered main template
    fn render(
        &self,
        model: &PackageModel,
        templates: &TemplateSet,
        params: &InvocationParams,
    ) -> GenerationResult<String> {
        if !templates.contains(MAIN_TEMPLATE) {
            return Err(GenerationError::TemplateNotFound(MAIN_TEMPLATE.to_string()));
        }
        let ctx = RenderingContext::new(model, params.clone(), self.config.max_include_depth)?;
        let mut registry = templates.registry(self.config.strict_templates);
        helpers::register_helpers(&mut registry, &ctx);

        let body = registry
            .render(MAIN_TEMPLATE, ctx.main_data())
            .map_err(|e| {
                ctx.take_failure()
                    .unwrap_or_else(|| GenerationError::TemplateExec(e.to_string()))
            })?;
        Ok(format!("{}{}", ctx.header(), body))
    }

    fn enter(&mut self, stage: GenerationStage) {
        debug!("Generation stage: {} -> {}", self.stage, stage);
        self.stage = stage;
    }

    fn fail(&mut self, error: GenerationError) -> GenerationError {
        warn!("Generation failed while {}: {}", self.stage, error);
        self.stage = GenerationStage::Failed;
        error
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"
        pub struct Point { pub x: i32, pub y: i32 }
    "#;

    #[test]
    fn test_run_reaches_done() {
        let package = SourcePackage::from_source("geo", SOURCE).unwrap();
        let templates = TemplateSet::parse(
            "t",
            "impl {{main.name}} { pub fn last() -> &'static str { \"{{main.fields.[1].name}}\" } }",
        )
        .unwrap();
        let mut generator = Generator::new();
        let output = generator
            .run(&package, &templates, &InvocationParams::new("Point", "t"))
            .unwrap();
        assert_eq!(generator.stage(), GenerationStage::Done);
        assert!(output.text.starts_with("//! Generated on"));
        assert!(output.text.contains("pub fn last() -> &'static str {\n        \"y\"\n    }"));
        assert_eq!(output.model.types().len(), 1);
    }

    #[test]
    fn test_resolution_failure_stops_before_rendering() {
        let package = SourcePackage::from_source("geo", "pub struct Line { pub a: Point }").unwrap();
        let templates = TemplateSet::parse("t", "fn x() {}").unwrap();
        let mut generator = Generator::new();
        let err = generator
            .run(&package, &templates, &InvocationParams::new("Line", "t"))
            .unwrap_err();
        assert!(matches!(err, GenerationError::Model(_)));
        assert_eq!(generator.stage(), GenerationStage::Failed);
    }

    #[test]
    fn test_unknown_root_type() {
        let package = SourcePackage::from_source("geo", SOURCE).unwrap();
        let templates = TemplateSet::parse("t", "fn x() {}").unwrap();
        let err = Generator::new()
            .run(&package, &templates, &InvocationParams::new("Nope", "t"))
            .unwrap_err();
        assert!(matches!(err, GenerationError::UnknownType(name) if name == "Nope"));
    }

    #[test]
    fn test_invalid_output_is_not_emitted() {
        let package = SourcePackage::from_source("geo", SOURCE).unwrap();
        let templates = TemplateSet::parse("t", "impl {{main.name}} {").unwrap();
        let mut generator = Generator::new();
        let err = generator
            .run(&package, &templates, &InvocationParams::new("Point", "t"))
            .unwrap_err();
        assert!(matches!(err, GenerationError::OutputFormat { .. }));
        assert_eq!(generator.stage(), GenerationStage::Failed);
    }
}
