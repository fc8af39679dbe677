use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::convert::ConvertOptions;
use crate::error::{Error, Result};

static DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub blocks: BlocksConfig,
    pub code: CodeConfig,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct BlocksConfig {
    /// Pass tables through instead of dropping them
    pub allow_unsupported: bool,
    pub strip_frontmatter: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CodeConfig {
    pub default_language: String,
}

impl Default for CodeConfig {
    fn default() -> Self {
        Self {
            default_language: "plain text".to_string(),
        }
    }
}

impl Config {
    /// The config bundled with the crate (validated by the build script).
    pub fn compiled_default() -> Self {
        Self::from_toml(DEFAULT_CONFIG).unwrap_or_else(|err| {
            log::error!("{err}");
            Self::default()
        })
    }

    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(Error::DefaultConfig)
    }

    /// Options for the block mapping.
    pub fn convert_options(&self) -> ConvertOptions {
        ConvertOptions {
            allow_unsupported: self.blocks.allow_unsupported,
            default_language: self.code.default_language.clone(),
        }
    }
}
