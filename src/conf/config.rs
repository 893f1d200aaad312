use std::path::Path;

use crate::{
    conf::{BackendConfig, ExportConfig, PollConfig},
    core::DashError::{self, ConfigParsingError},
};
use config::{Config as CConfig, ConfigBuilder, Environment, builder::DefaultState};
use serde::{Deserialize, Serialize};

const ENV_PREFIX: &str = "DASHPOLL";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub poll: PollConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

impl Config {
    pub fn from_str(toml_str: &str) -> Result<Config, DashError> {
        let builder = CConfig::builder()
            .add_source(config::File::from_str(toml_str, config::FileFormat::Toml));
        Self::finish(builder)
    }

    /// Loads a TOML file, then applies `DASHPOLL__SECTION__KEY` overrides.
    pub fn from_file(path: &Path) -> Result<Config, DashError> {
        let builder = CConfig::builder()
            .add_source(config::File::from(path).format(config::FileFormat::Toml))
            .add_source(env_source());
        Self::finish(builder)
    }

    /// Defaults plus environment overrides, for running without a file.
    pub fn from_env() -> Result<Config, DashError> {
        Self::finish(CConfig::builder().add_source(env_source()))
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Config, DashError> {
        let config = builder
            .build()
            .map_err(|e| ConfigParsingError(e.to_string()))?
            .try_deserialize::<Config>()
            .map_err(|e| ConfigParsingError(e.to_string()))?;
        if config.poll.page_limit == 0 {
            return Err(ConfigParsingError("poll.page_limit must be > 0".into()));
        }
        Ok(config)
    }
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
