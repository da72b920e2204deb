//! Configuration System
//!
//! Layered configuration for queues embedded in an importer: built-in defaults,
//! an optional TOML file, then `LAYOUT_QUEUE__*` environment variables (nested
//! keys separated by `__`, e.g. `LAYOUT_QUEUE__LOGGING__LEVEL=debug`).

use crate::error::SetupError;
use crate::logging::LoggingConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Prefix of environment variables read by [`ConfigLoader`].
pub const ENV_PREFIX: &str = "LAYOUT_QUEUE";

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Reject caller errors (second waiter on a child, duplicate ids, ...)
    #[serde(default = "default_true")]
    pub strict: bool,

    /// Attach a tracing observer to queues built from this config
    #[serde(default)]
    pub trace_events: bool,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_true() -> bool {
    true
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            strict: true,
            trace_events: false,
            logging: LoggingConfig::default(),
        }
    }
}

impl QueueConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), SetupError> {
        self.logging
            .validate()
            .map_err(|e| SetupError::Invalid(format!("logging: {}", e)))
    }
}

/// Loads [`QueueConfig`] from defaults, a file and the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    file: Option<PathBuf>,
    env_prefix: Option<String>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the given TOML file. A missing file is an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Read environment variables with a custom prefix instead of `LAYOUT_QUEUE`.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    pub fn load(&self) -> Result<QueueConfig, SetupError> {
        let mut builder = builder_with_defaults()?;

        if let Some(path) = &self.file {
            debug!(config_path = %path.display(), "Loading queue configuration file");
            builder = builder.add_source(File::from(path.as_path()).format(FileFormat::Toml));
        }

        let prefix = self.env_prefix.as_deref().unwrap_or(ENV_PREFIX);
        builder = builder.add_source(
            Environment::with_prefix(prefix)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config: QueueConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}

/// Create a Config builder with defaults applied.
fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, SetupError> {
    let defaults = LoggingConfig::default();
    Ok(Config::builder()
        .set_default("strict", true)?
        .set_default("trace_events", false)?
        .set_default("logging.level", defaults.level)?
        .set_default("logging.format", defaults.format)?
        .set_default("logging.output", defaults.output)?
        .set_default("logging.color", defaults.color)?)
}
