//! Model builder error types

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading sources, reading declarations or resolving references
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in {path} at {line}:{column}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    #[error("No Rust sources found under {path}")]
    NoSources { path: PathBuf },

    #[error("Unsupported type in `{owner}.{field}`: {shape}")]
    UnsupportedType {
        owner: String,
        field: String,
        shape: String,
    },

    #[error("Type `{name}` is declared more than once")]
    DuplicateType { name: String },

    #[error("Field `{field}` is declared more than once in `{owner}`")]
    DuplicateField { owner: String, field: String },

    #[error("Unresolved type references: {}", join_issues(.0))]
    Resolution(Vec<ResolutionIssue>),
}

impl ModelError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ModelError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, error: &syn::Error) -> Self {
        let start = error.span().start();
        ModelError::Parse {
            path: path.into(),
            line: start.line,
            column: start.column + 1,
            message: error.to_string(),
        }
    }

    /// True for failures that happen before any declaration is read
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            ModelError::Io { .. } | ModelError::Parse { .. } | ModelError::NoSources { .. }
        )
    }
}

/// Result type for model operations
pub type ModelResult<T> = std::result::Result<T, ModelError>;

/// One dangling named reference found during resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionIssue {
    /// Type that holds the reference
    pub owner: String,
    /// Where inside the owner, e.g. "field `parent`"
    pub location: String,
    /// The name that did not resolve
    pub reference: String,
}

impl fmt::Display for ResolutionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "`{}` referenced by {} of `{}`",
            self.reference, self.location, self.owner
        )
    }
}

fn join_issues(issues: &[ResolutionIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_error_lists_every_issue() {
        let err = ModelError::Resolution(vec![
            ResolutionIssue {
                owner: "Order".to_string(),
                location: "field `customer`".to_string(),
                reference: "Customer".to_string(),
            },
            ResolutionIssue {
                owner: "Ids".to_string(),
                location: "element".to_string(),
                reference: "Id".to_string(),
            },
        ]);
        let message = err.to_string();
        assert!(message.contains("`Customer` referenced by field `customer` of `Order`"));
        assert!(message.contains("`Id` referenced by element of `Ids`"));
    }

    #[test]
    fn test_load_errors_are_classified() {
        let err = ModelError::NoSources {
            path: PathBuf::from("/tmp/empty"),
        };
        assert!(err.is_load_error());
        let err = ModelError::DuplicateType {
            name: "A".to_string(),
        };
        assert!(!err.is_load_error());
    }
}
