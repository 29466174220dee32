// CLI error types

use stroo_generation::GenerationError;
use stroo_model::ModelError;
use thiserror::Error;

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Package error: {0}")]
    Model(#[from] ModelError),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Server error: {0}")]
    Server(String),
}

impl CliError {
    /// Get a user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            CliError::InvalidArgument { message } => {
                format!("Invalid argument: {}\n\nRun 'stroo help' for usage information.", message)
            }
            CliError::Io(e) => format!("File operation failed: {}", e),
            CliError::Config(msg) => {
                format!("Configuration error: {}\n\nCheck stroo.toml or the file given with --config.", msg)
            }
            CliError::Model(e) => format!("Could not read the package: {}", e),
            CliError::Generation(GenerationError::OutputFormat { line, column, message, .. }) => {
                format!(
                    "Generated code is not valid Rust ({}:{}): {}\n\nThe rendered text was printed above; fix the template.",
                    line, column, message
                )
            }
            CliError::Generation(GenerationError::UnknownType(name)) => {
                format!("Type '{}' is not declared in the package.\n\nCheck the --type argument.", name)
            }
            CliError::Generation(e) => format!("Code generation failed: {}", e),
            CliError::Server(msg) => format!("Server failed: {}", msg),
        }
    }

    /// Get technical details for verbose mode
    pub fn technical_details(&self) -> String {
        format!("{:?}", self)
    }
}

pub type CliResult<T> = Result<T, CliError>;
