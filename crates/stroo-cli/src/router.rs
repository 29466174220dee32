// Command routing and dispatch

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::{Command, GenerateCommand, GenerateOptions, ServeCommand};
use crate::config::StrooConfig;
use crate::error::CliResult;

/// stroo - render templates against the declarations of a Rust package
#[derive(Parser, Debug)]
#[command(name = "stroo")]
#[command(bin_name = "stroo")]
#[command(about = "Render templates against the declarations of a Rust package")]
#[command(
    long_about = "stroo reads the types, fields, methods and constants of a Rust package and renders a Handlebars template against them. The output is checked and formatted as Rust before it is written.\n\nExamples:\n  stroo generate --type Order --template json.hbs --output order_json.rs src/\n  stroo generate --type Order --template json.hbs --test-mode src/\n  stroo serve --addr 127.0.0.1:8080"
)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Print debugging output
    #[arg(long, global = true)]
    pub debug: bool,

    /// Configuration file (yaml, toml or json)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Render a template for one type of a package
    #[command(about = "Render a template for one type of a package")]
    Generate {
        /// Type the template is rendered for
        #[arg(long = "type", value_name = "TYPE")]
        type_name: String,

        /// Template file
        #[arg(long, value_name = "FILE")]
        template: PathBuf,

        /// Output file (required unless --test-mode)
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Peer type name passed through to the template
        #[arg(long, value_name = "NAME")]
        target: Option<String>,

        /// Directory of .hbs partials
        #[arg(long, value_name = "DIR")]
        partials: Option<PathBuf>,

        /// Print the result instead of writing it
        #[arg(long, alias = "testmode")]
        test_mode: bool,

        /// Package file or directory
        #[arg(value_name = "PACKAGE", default_value = ".")]
        package: PathBuf,
    },

    /// Start the interactive service
    #[command(about = "Start the interactive playground service")]
    Serve {
        /// Listen address (default from configuration, 0.0.0.0:8080)
        #[arg(long, value_name = "ADDR")]
        addr: Option<String>,

        /// Directory with the playground UI and example files
        #[arg(long, value_name = "DIR")]
        assets: Option<PathBuf>,
    },
}

/// Command router
pub struct CommandRouter;

impl CommandRouter {
    /// Parse CLI arguments and route to appropriate handler
    pub async fn route() -> CliResult<()> {
        let cli = Cli::parse();
        let config = StrooConfig::load(cli.config.as_deref())?;

        crate::logging::init_logging(&config.logging.level, cli.debug);

        Self::execute(&cli, config).await
    }

    /// Execute a command
    pub async fn execute(cli: &Cli, config: StrooConfig) -> CliResult<()> {
        match &cli.command {
            Commands::Generate {
                type_name,
                template,
                output,
                target,
                partials,
                test_mode,
                package,
            } => {
                let options = GenerateOptions {
                    type_name: type_name.clone(),
                    template: template.clone(),
                    output: output.clone(),
                    target: target.clone(),
                    partials: partials.clone(),
                    test_mode: *test_mode,
                    package: package.clone(),
                };
                let cmd = GenerateCommand::new(options, config.generation);
                cmd.execute().await
            }
            Commands::Serve { addr, assets } => {
                let mut server = config.server;
                if let Some(addr) = addr {
                    server.addr = addr.clone();
                }
                if let Some(assets) = assets {
                    server.assets_dir = assets.clone();
                }
                let cmd = ServeCommand::new(server, config.generation);
                cmd.execute().await
            }
        }
    }
}
