//! Configuration loading
//!
//! Settings come from one file (`--config`, else `stroo.toml`, `stroo.yaml`,
//! `stroo.yml` or `stroo.json` in the working directory, else defaults),
//! then `STROO_` environment variables on top.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use stroo_api::ServerConfig;
use stroo_generation::GenerationConfig;
use tracing::debug;

use crate::error::{CliError, CliResult};

/// Prefix of environment overrides
pub const ENV_PREFIX: &str = "STROO_";

/// File names looked up in the working directory, in order
pub const DEFAULT_FILES: [&str; 4] = ["stroo.toml", "stroo.yaml", "stroo.yml", "stroo.json"];

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Maximum level: error, warn, info, debug or trace
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Complete configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrooConfig {
    pub generation: GenerationConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

impl StrooConfig {
    /// Load from `explicit` or the working directory, then apply the environment
    pub fn load(explicit: Option<&Path>) -> CliResult<Self> {
        let dir = std::env::current_dir()?;
        let mut config = ConfigLoader::load_in(&dir, explicit)?;
        EnvOverrides::apply(&mut config)?;
        Ok(config)
    }
}

/// Reads configuration files
pub struct ConfigLoader;

impl ConfigLoader {
    /// File named by `explicit`, else the first default file found in `dir`
    pub fn load_in(dir: &Path, explicit: Option<&Path>) -> CliResult<StrooConfig> {
        match Self::locate(dir, explicit)? {
            Some(path) => Self::from_file(&path),
            None => {
                debug!("No configuration file found, using defaults");
                Ok(StrooConfig::default())
            }
        }
    }

    fn locate(dir: &Path, explicit: Option<&Path>) -> CliResult<Option<PathBuf>> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(CliError::Config(format!(
                    "config file {} does not exist",
                    path.display()
                )));
            }
            return Ok(Some(path.to_path_buf()));
        }
        Ok(DEFAULT_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file()))
    }

    /// Parse a file, choosing the format by extension
    pub fn from_file(path: &Path) -> CliResult<StrooConfig> {
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");
        let config = Self::parse(&content, extension)
            .map_err(|e| CliError::Config(format!("{}: {}", path.display(), e)))?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse `content` in the format named by `extension`
    pub fn parse(content: &str, extension: &str) -> Result<StrooConfig, String> {
        match extension {
            "yaml" | "yml" => serde_yaml::from_str(content).map_err(|e| e.to_string()),
            "toml" => toml::from_str(content).map_err(|e| e.to_string()),
            "json" => serde_json::from_str(content).map_err(|e| e.to_string()),
            other => Err(format!("unsupported config format `{}`", other)),
        }
    }
}

/// Environment variable overrides
pub struct EnvOverrides;

impl EnvOverrides {
    /// Collect `STROO_*` variables, keyed without the prefix
    pub fn parse() -> HashMap<String, String> {
        std::env::vars()
            .filter_map(|(key, value)| {
                key.strip_prefix(ENV_PREFIX)
                    .map(|name| (name.to_string(), value))
            })
            .collect()
    }

    /// Apply the process environment
    pub fn apply(config: &mut StrooConfig) -> CliResult<()> {
        Self::apply_overrides(config, &Self::parse())
    }

    /// Apply specific overrides; unknown keys are ignored
    pub fn apply_overrides(
        config: &mut StrooConfig,
        overrides: &HashMap<String, String>,
    ) -> CliResult<()> {
        for (key, value) in overrides {
            match key.as_str() {
                "GENERATION_MAX_INCLUDE_DEPTH" => {
                    config.generation.max_include_depth = parse_value(key, value)?;
                }
                "GENERATION_OVERWRITE_OUTPUT" => {
                    config.generation.overwrite_output = parse_value(key, value)?;
                }
                "GENERATION_ALLOW_REDEFINITION" => {
                    config.generation.allow_redefinition = parse_value(key, value)?;
                }
                "GENERATION_STRICT_TEMPLATES" => {
                    config.generation.strict_templates = parse_value(key, value)?;
                }
                "SERVER_ADDR" => config.server.addr = value.clone(),
                "SERVER_ASSETS_DIR" => config.server.assets_dir = PathBuf::from(value),
                "LOGGING_LEVEL" => config.logging.level = value.clone(),
                _ => continue,
            }
            debug!("Applied {}{} from the environment", ENV_PREFIX, key);
        }
        Ok(())
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> CliResult<T> {
    value.parse().map_err(|_| {
        CliError::Config(format!(
            "invalid value `{}` for {}{}",
            value, ENV_PREFIX, key
        ))
    })
}
