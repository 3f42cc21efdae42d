// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::Config;
use crate::engine::Engine;

/// Factory for creating engines from configuration
pub struct EngineFactory;

impl EngineFactory {
    /// Create an engine sized by the configured worker pool
    pub fn from_config(cfg: &Config) -> Engine {
        Engine::new(cfg.workers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PoolSize;

    #[test]
    fn test_from_default_config_is_local() {
        let engine = EngineFactory::from_config(&Config::default());
        assert!(!engine.is_pooled());
    }

    #[test]
    fn test_from_config_with_workers() {
        let cfg = Config {
            workers: PoolSize::Workers(3),
            ..Config::default()
        };
        assert_eq!(EngineFactory::from_config(&cfg).workers(), 3);
    }
}
