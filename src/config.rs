//! Parser configuration.
//!
//! [`ParserConfig`] is read from the `[parser]` section of
//! `config/config.toml` (optional) layered with `SQLTABLE__PARSER__*`
//! environment variables, e.g. `SQLTABLE__PARSER__DIAGNOSTIC_MODE=true`.
//! A missing section yields the defaults.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_CONFIG_PATH: &str = "config/config.toml";
const ENV_PREFIX: &str = "SQLTABLE";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ParserConfig {
    /// Echo every extracted table and column as debug diagnostics
    #[serde(default)]
    pub diagnostic_mode: bool,
    /// Schema used when a table name has no schema part
    #[serde(default = "default_schema")]
    pub default_schema: String,
}

fn default_schema() -> String {
    "dbo".to_string()
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            diagnostic_mode: false,
            default_schema: default_schema(),
        }
    }
}

impl ParserConfig {
    /// Load from `config/config.toml`, falling back to env vars.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load from the given TOML file (optional) and the environment.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let builder = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(environment());

        let settings = match builder.build() {
            Ok(cfg) => cfg,
            Err(err) => {
                // Unreadable file: warn and retry with env only
                if path.exists() {
                    log::warn!(
                        "failed to load config file {}, falling back to env: {}",
                        path.display(),
                        err
                    );
                }
                Config::builder()
                    .add_source(environment())
                    .build()
                    .map_err(|env_err| {
                        ConfigError::Message(format!(
                            "Failed to load configuration from file and env: {}, then env-only error: {}",
                            err, env_err
                        ))
                    })?
            }
        };

        match settings.get::<ParserConfig>("parser") {
            Ok(parser) => Ok(parser),
            Err(ConfigError::NotFound(_)) => Ok(ParserConfig::default()),
            Err(e) => Err(ConfigError::Message(format!(
                "Parser configuration could not be loaded from file or environment: {}",
                e
            ))),
        }
    }

    pub fn with_diagnostic_mode(mut self, diagnostic_mode: bool) -> Self {
        self.diagnostic_mode = diagnostic_mode;
        self
    }

    pub fn with_default_schema(mut self, schema: impl Into<String>) -> Self {
        self.default_schema = schema.into();
        self
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}
