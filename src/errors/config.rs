// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading process configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("failed to read config '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid YAML for a `Config`
    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The file is not valid TOML for a `Config`
    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    /// The file extension does not map to a supported format
    #[error("unsupported config format for '{}' (expected .yaml, .yml or .toml)", path.display())]
    UnsupportedFormat { path: PathBuf },

    /// A worker count override could not be parsed
    #[error("invalid worker count '{value}': expected an integer")]
    InvalidWorkers { value: String },
}
