//! Template rendering for stroo
//!
//! Renders Handlebars templates against a resolved [`PackageModel`](stroo_model::PackageModel)
//! through a per-cycle [`RenderingContext`], then validates and formats the
//! result as a Rust source file.

pub mod context;
pub mod driver;
pub mod error;
pub mod formatter;
pub mod helpers;
pub mod models;
pub mod nodes;
pub mod output;
pub mod templates;

// Re-export public API
pub use context::{RenderingContext, StoredValue, ValueStore};
pub use driver::{GenerationOutput, GenerationStage, Generator};
pub use error::{GenerationError, GenerationResult};
pub use formatter::SourceFormatter;
pub use models::{GenerationConfig, InvocationParams};
pub use output::OutputWriter;
pub use templates::{CaseTransform, TemplateBundle, TemplateLoader, TemplateParser, TemplateSet};
