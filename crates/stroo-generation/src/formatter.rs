//! Validation and formatting of rendered output
//!
//! The rendered text must parse as a Rust file. Accepted text is reprinted with
//! `prettyplease`; rejected text is reported with the parser's position and is
//! never emitted.

use tracing::{debug, warn};

use crate::error::{GenerationError, GenerationResult};

/// Validates and formats generated Rust source
#[derive(Debug, Default, Clone, Copy)]
pub struct SourceFormatter;

impl SourceFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Parse `text` as a file and print it in canonical layout
    ///
    /// # Errors
    /// Returns `GenerationError::OutputFormat` with the 1-based line and column
    /// of the first syntax error.
    pub fn format(&self, text: &str) -> GenerationResult<String> {
        let file = self.check(text)?;
        let formatted = prettyplease::unparse(&file);
        debug!(
            "Formatted output: {} bytes in, {} bytes out",
            text.len(),
            formatted.len()
        );
        Ok(formatted)
    }

    /// Parse only
    pub fn check(&self, text: &str) -> GenerationResult<syn::File> {
        syn::parse_file(text).map_err(|e| {
            let start = e.span().start();
            warn!(
                "Rendered output rejected at {}:{}: {}",
                start.line,
                start.column + 1,
                e
            );
            GenerationError::OutputFormat {
                line: start.line,
                column: start.column + 1,
                message: e.to_string(),
                source_text: text.to_string(),
            }
        })
    }
}
