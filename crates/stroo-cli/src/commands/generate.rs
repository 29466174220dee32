// Render a template for one type of a package

use std::path::{Path, PathBuf};

use stroo_generation::{
    GenerationConfig, GenerationError, Generator, InvocationParams, OutputWriter, TemplateLoader,
};
use stroo_model::SourceLoader;
use tracing::{debug, info};

use super::Command;
use crate::error::{CliError, CliResult};
use crate::output::{self, OutputStyle};

/// Arguments of `stroo generate`
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub type_name: String,
    pub template: PathBuf,
    pub output: Option<PathBuf>,
    pub target: Option<String>,
    pub partials: Option<PathBuf>,
    pub test_mode: bool,
    pub package: PathBuf,
}

/// What a successful run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateOutcome {
    /// Test mode: the formatted text
    Printed(String),
    /// The file written
    Written(PathBuf),
}

/// Generate code from a template
pub struct GenerateCommand {
    options: GenerateOptions,
    config: GenerationConfig,
}

impl GenerateCommand {
    pub fn new(options: GenerateOptions, config: GenerationConfig) -> Self {
        Self { options, config }
    }

    /// Validate arguments, run one cycle, write the file unless in test mode
    pub fn run(&self) -> CliResult<GenerateOutcome> {
        let options = &self.options;
        if options.type_name.trim().is_empty() {
            return Err(CliError::InvalidArgument {
                message: "--type must name a type".to_string(),
            });
        }
        let output_path = match (&options.output, options.test_mode) {
            (Some(path), _) => Some(path.clone()),
            (None, true) => None,
            (None, false) => {
                return Err(CliError::InvalidArgument {
                    message: "--output is required unless --test-mode is set".to_string(),
                })
            }
        };

        info!(
            "Processing type {} (test mode: {})",
            options.type_name, options.test_mode
        );
        let package = SourceLoader::new().load(&options.package)?;

        let loader = TemplateLoader::new();
        let mut templates = loader.load_file(&options.template)?;
        if let Some(dir) = &options.partials {
            let count = loader.load_partials(dir, &mut templates)?;
            debug!("Loaded {} partials from {}", count, dir.display());
        }

        let params = InvocationParams {
            root_type: options.type_name.clone(),
            template_file: options.template.display().to_string(),
            output_file: output_path.as_ref().map(|path| path.display().to_string()),
            peer_name: options.target.clone(),
            test_mode: options.test_mode,
            ..InvocationParams::default()
        };

        let mut generator = Generator::with_config(self.config.clone());
        let generated = generator.run(&package, &templates, &params)?;

        match output_path {
            Some(path) if !options.test_mode => {
                let written = OutputWriter::new(self.config.overwrite_output)
                    .write(&path, &generated.text)?;
                Ok(GenerateOutcome::Written(written))
            }
            _ => Ok(GenerateOutcome::Printed(generated.text)),
        }
    }

    /// Details printed under the success line of a written file
    pub fn summary(&self, style: &OutputStyle, written: &Path) -> String {
        let options = &self.options;
        let mut lines = vec![
            style.key_value("type", &options.type_name),
            style.key_value("template", &options.template.display().to_string()),
        ];
        if let Some(target) = &options.target {
            lines.push(style.key_value("target", target));
        }
        lines.push(style.key_value("output", &written.display().to_string()));
        lines.join("\n")
    }
}

#[async_trait::async_trait]
impl Command for GenerateCommand {
    async fn execute(&self) -> CliResult<()> {
        match self.run() {
            Ok(GenerateOutcome::Printed(text)) => {
                println!("{}", text);
                Ok(())
            }
            Ok(GenerateOutcome::Written(path)) => {
                output::print_success(&format!("Created {}", path.display()));
                println!("{}", self.summary(&OutputStyle::default(), &path));
                Ok(())
            }
            Err(CliError::Generation(GenerationError::OutputFormat {
                line,
                column,
                message,
                source_text,
            })) => {
                let style = OutputStyle::default();
                eprintln!("{}", style.numbered_source(&source_text, line));
                Err(CliError::Generation(GenerationError::OutputFormat {
                    line,
                    column,
                    message,
                    source_text,
                }))
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn options(dir: &TempDir) -> GenerateOptions {
        GenerateOptions {
            type_name: "Order".to_string(),
            template: dir.path().join("t.hbs"),
            output: None,
            target: None,
            partials: None,
            test_mode: false,
            package: dir.path().join("src"),
        }
    }

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/lib.rs"), "pub struct Order { pub id: u64 }").unwrap();
        fs::write(dir.path().join("t.hbs"), "pub struct {{main.name}}Id(pub u64);").unwrap();
        dir
    }

    #[test]
    fn test_output_required_without_test_mode() {
        let dir = project();
        let err = GenerateCommand::new(options(&dir), GenerationConfig::default())
            .run()
            .unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument { .. }));
    }

    #[test]
    fn test_test_mode_prints() {
        let dir = project();
        let mut opts = options(&dir);
        opts.test_mode = true;
        let outcome = GenerateCommand::new(opts, GenerationConfig::default())
            .run()
            .unwrap();
        match outcome {
            GenerateOutcome::Printed(text) => {
                assert!(text.contains("pub struct OrderId(pub u64);"));
                assert!(text.contains("-test-mode=true"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_writes_output_file() {
        let dir = project();
        let mut opts = options(&dir);
        let target = dir.path().join("gen/order_id.rs");
        opts.output = Some(target.clone());
        let outcome = GenerateCommand::new(opts, GenerationConfig::default())
            .run()
            .unwrap();
        assert_eq!(outcome, GenerateOutcome::Written(target.clone()));
        assert!(fs::read_to_string(&target).unwrap().contains("OrderId"));
    }

    #[test]
    fn test_summary_lists_invocation() {
        let dir = project();
        let mut opts = options(&dir);
        opts.target = Some("OrderDto".to_string());
        let command = GenerateCommand::new(opts, GenerationConfig::default());
        let style = OutputStyle { use_colors: false };
        let summary = command.summary(&style, Path::new("gen/order.rs"));
        let lines: Vec<_> = summary.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "  type: Order");
        assert!(lines[1].starts_with("  template: "));
        assert_eq!(lines[2], "  target: OrderDto");
        assert_eq!(lines[3], "  output: gen/order.rs");
    }

    #[test]
    fn test_unknown_type() {
        let dir = project();
        let mut opts = options(&dir);
        opts.type_name = "Invoice".to_string();
        opts.test_mode = true;
        let err = GenerateCommand::new(opts, GenerationConfig::default())
            .run()
            .unwrap_err();
        assert!(matches!(
            err,
            CliError::Generation(GenerationError::UnknownType(name)) if name == "Invoice"
        ));
    }
}
