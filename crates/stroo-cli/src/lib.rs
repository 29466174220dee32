//! stroo command line interface
//!
//! `stroo generate` renders a template against one package and writes or
//! prints the formatted result; `stroo serve` starts the interactive service.

pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod router;

pub use config::{LoggingConfig, StrooConfig};
pub use error::{CliError, CliResult};
