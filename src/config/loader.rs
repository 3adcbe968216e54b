// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Collector configuration.
///
/// Chooses which backend callers get by default and tunes the built-in
/// backends, so that storage is decided by deployment rather than by code.
/// It is typically loaded from a YAML (or TOML) file and turned into a
/// [`Registry`](crate::config::Registry) with `Registry::from_config`.
///
/// # Fields
/// * `default_backend` - Backend used by `get(None)` (optional, defaults to `local`)
/// * `schema` - Path to a replacement push item schema (optional)
/// * `local` - Settings for the local filesystem backend (optional)
///
/// # Example
/// ```yaml
/// default_backend: local
/// local:
///   root: /var/lib/pub/artifacts
/// ```
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectorConfig {
    pub default_backend: Option<String>,
    pub schema: Option<PathBuf>,
    #[serde(default)]
    pub local: LocalConfig,
}

/// Local filesystem backend options.
///
/// # Fields
/// * `root` - Directory holding the run directories and the `latest` pointer
///   (optional, defaults to `artifacts/` under the working directory)
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocalConfig {
    pub root: Option<PathBuf>,
}

/// Load a config from a YAML or TOML file, chosen by extension
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CollectorConfig, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let origin = path.display().to_string();

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => parse_toml(&content, &origin),
        _ => parse_yaml(&content, &origin),
    }
}

fn parse_yaml(content: &str, origin: &str) -> Result<CollectorConfig, ConfigError> {
    // An empty file means "all defaults"
    if content.trim().is_empty() {
        return Ok(CollectorConfig::default());
    }
    serde_yaml::from_str(content).map_err(|source| ConfigError::Yaml {
        origin: origin.to_string(),
        source,
    })
}

fn parse_toml(content: &str, origin: &str) -> Result<CollectorConfig, ConfigError> {
    toml::from_str(content).map_err(|source| ConfigError::Toml {
        origin: origin.to_string(),
        source,
    })
}
