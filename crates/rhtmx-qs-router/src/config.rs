// File: src/config.rs
// Purpose: Querystring configuration parsing from TOML

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::querystring::{BracketCodec, DelimitedCodec, QuerystringCodec, DEFAULT_ARRAY_DELIMITER};

/// Top-level configuration file
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub querystring: QuerystringConfig,
}

/// How list values are written to the querystring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ArrayStyle {
    /// `key=a|b`
    #[default]
    Delimited,
    /// `key[]=a&key[]=b`
    Bracket,
}

/// Querystring codec configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuerystringConfig {
    /// Join/split delimiter for list values (default: "|")
    #[serde(default = "default_array_delimiter")]
    pub array_delimiter: String,

    #[serde(default)]
    pub array_style: ArrayStyle,

    /// Whether rejected querystrings are logged (default: true)
    #[serde(default = "default_true")]
    pub log_parse_errors: bool,
}

fn default_array_delimiter() -> String {
    DEFAULT_ARRAY_DELIMITER.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for QuerystringConfig {
    fn default() -> Self {
        Self {
            array_delimiter: default_array_delimiter(),
            array_style: ArrayStyle::default(),
            log_parse_errors: true,
        }
    }
}

impl QuerystringConfig {
    /// Builds the codec this configuration describes
    pub fn codec(&self) -> Box<dyn QuerystringCodec> {
        match self.array_style {
            ArrayStyle::Delimited => Box::new(DelimitedCodec::new(self.array_delimiter.clone())),
            ArrayStyle::Bracket => Box::new(BracketCodec),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // If file doesn't exist or is empty, return default config
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = toml::from_str(content).context("Invalid querystring configuration")?;
        Ok(config)
    }
}
