// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

use crate::config::consts::WORKERS_ENV_VAR;
use crate::config::PoolSize;
use crate::errors::ConfigError;

/// Process configuration for running pipelines.
///
/// Loaded from YAML (`.yaml`/`.yml`) or TOML (`.toml`). Every field is
/// optional.
///
/// # Fields
/// * `workers` - Worker pool capacity (see `PoolSize`), defaults to no parallelism
/// * `strict` - Whether sinks re-raise the first failure, defaults to true
/// * `log_level` - Fallback log filter when `RUST_LOG` is unset
///
/// # Example
/// ```yaml
/// workers: -2        # all cores but one
/// strict: false
/// log_level: debug
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub workers: PoolSize,
    pub strict: bool,
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workers: PoolSize::Disabled,
            strict: true,
            log_level: None,
        }
    }
}

/// Load a config file, then apply the `PACER_WORKERS` override if set.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let cfg: Config = match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
        Some("toml") => toml::from_str(&content)?,
        _ => {
            return Err(ConfigError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
        }
    };

    apply_workers_override(cfg, env::var(WORKERS_ENV_VAR).ok().as_deref())
}

/// Replace the configured worker pool with an override such as the value of
/// `PACER_WORKERS`.
pub fn apply_workers_override(
    mut cfg: Config,
    raw: Option<&str>,
) -> Result<Config, ConfigError> {
    if let Some(raw) = raw {
        cfg.workers = raw.parse()?;
    }
    Ok(cfg)
}
