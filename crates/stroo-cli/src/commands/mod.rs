// Command handlers for the stroo CLI

pub mod generate;
pub mod serve;

pub use generate::{GenerateCommand, GenerateOptions};
pub use serve::ServeCommand;

use crate::error::CliResult;

/// Trait for command handlers
#[async_trait::async_trait]
pub trait Command: Send + Sync {
    /// Execute the command
    async fn execute(&self) -> CliResult<()>;
}
