//! Configuration loading.
//!
//! Evaluation order mirrors the rest of the platform's config crates:
//! 1) `$REELEX_CONFIG_PATH` (TOML or JSON file),
//! 2) `$REELEX_CONFIG_JSON` (inline JSON),
//! 3) built-in defaults if neither is set.

use crate::models::EngineConfig;
use anyhow::Context;
use std::{env, fs, path::Path, path::PathBuf};

/// Source that produced the engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConfigSource {
    #[default]
    Default,
    EnvPath(PathBuf),
    EnvInline,
    File(PathBuf),
}

/// Errors surfaced while reading or parsing a config document.
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML config {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to parse JSON config {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported config extension for {0} (expected .toml or .json)")]
    UnsupportedExtension(PathBuf),
}

/// Load engine configuration overrides from the environment.
pub fn load_from_env() -> anyhow::Result<(EngineConfig, ConfigSource)> {
    if let Ok(path_str) = env::var("REELEX_CONFIG_PATH")
        && !path_str.trim().is_empty()
    {
        let path = PathBuf::from(path_str);
        let config = load_from_file(&path)?;
        return Ok((config, ConfigSource::EnvPath(path)));
    }

    if let Ok(raw) = env::var("REELEX_CONFIG_JSON")
        && !raw.trim().is_empty()
    {
        let config: EngineConfig = serde_json::from_str(&raw)
            .context("failed to parse REELEX_CONFIG_JSON")?;
        return Ok((config, ConfigSource::EnvInline));
    }

    Ok((EngineConfig::default(), ConfigSource::Default))
}

/// Load engine configuration from a TOML or JSON file.
pub fn load_from_file(path: &Path) -> Result<EngineConfig, ConfigLoadError> {
    let raw = fs::read_to_string(path).map_err(|source| {
        ConfigLoadError::Read {
            path: path.to_path_buf(),
            source,
        }
    })?;

    match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => {
            toml::from_str(&raw).map_err(|source| ConfigLoadError::Toml {
                path: path.to_path_buf(),
                source,
            })
        }
        Some("json") => serde_json::from_str(&raw).map_err(|source| {
            ConfigLoadError::Json {
                path: path.to_path_buf(),
                source,
            }
        }),
        _ => Err(ConfigLoadError::UnsupportedExtension(path.to_path_buf())),
    }
}
