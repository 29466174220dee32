//! Error types for template rendering and generation

use stroo_model::ModelError;
use thiserror::Error;

/// Errors that can occur during a generation cycle
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Loading, reading or resolving the package failed
    #[error(transparent)]
    Model(#[from] ModelError),

    /// A template or sub-template failed to compile
    #[error("Template parse error in `{name}`: {message}")]
    TemplateParse {
        /// Template name
        name: String,
        /// Parser message
        message: String,
    },

    /// Template execution failed
    #[error("Template execution failed: {0}")]
    TemplateExec(String),

    /// Nested includes went past the configured limit
    #[error("Include depth {depth} exceeds limit {limit} while including `{template}`")]
    IncludeDepthExceeded {
        /// Depth reached
        depth: usize,
        /// Configured maximum
        limit: usize,
        /// Template being included
        template: String,
    },

    /// Requested root type is not declared in the package
    #[error("Type `{0}` not found in package")]
    UnknownType(String),

    /// Template not found
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// The rendered text is not a valid Rust file
    #[error("Rendered output is not valid Rust at {line}:{column}: {message}")]
    OutputFormat {
        /// Line in the rendered text (1-based)
        line: usize,
        /// Column in the rendered text (1-based)
        column: usize,
        /// Parser message
        message: String,
        /// The unformatted text, for diagnostics
        source_text: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Write failed
    #[error("Write failed: {0}")]
    WriteFailed(String),
}

/// Result type for generation operations
pub type GenerationResult<T> = std::result::Result<T, GenerationError>;
