// Start the interactive service

use stroo_api::{ApiServer, ServerConfig};
use stroo_generation::GenerationConfig;

use super::Command;
use crate::error::{CliError, CliResult};
use crate::output;

/// Serve the playground until interrupted
pub struct ServeCommand {
    server: ServerConfig,
    generation: GenerationConfig,
}

impl ServeCommand {
    pub fn new(server: ServerConfig, generation: GenerationConfig) -> Self {
        Self { server, generation }
    }
}

#[async_trait::async_trait]
impl Command for ServeCommand {
    async fn execute(&self) -> CliResult<()> {
        if !self.server.assets_dir.is_dir() {
            output::print_warning(&format!(
                "Assets directory {} not found; only the API will be served",
                self.server.assets_dir.display()
            ));
        }
        output::print_info(&format!("Starting on http://{}", self.server.addr));
        ApiServer::new(self.server.clone(), self.generation.clone())
            .run()
            .await
            .map_err(|e| CliError::Server(format!("{}: {}", self.server.addr, e)))
    }
}
