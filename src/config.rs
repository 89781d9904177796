//! Generator configuration, read from a YAML/JSON file and overridable
//! from the command line.

use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// What to do with a path parameter that is declared optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OptionalPathParams {
    /// Extracted by its path segment only, like a required one.
    #[default]
    Implicit,
    /// Additionally emit `paramOption("name")`, matching output of older
    /// generators.
    QueryFallback,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct GeneratorConfig {
    pub optional_path_params: OptionalPathParams,
}

impl GeneratorConfig {
    /// Parses a config document. YAML is a superset of JSON, so both work.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }
}
