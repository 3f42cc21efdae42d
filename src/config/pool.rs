// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::config::consts::FALLBACK_PARALLELISM;
use crate::errors::ConfigError;

/// Requested worker pool capacity.
///
/// Written in configs as a single integer:
/// * `0` - no parallelism, every task runs inline
/// * `n > 0` - exactly `n` workers
/// * `-1` - one worker per core
/// * `-k` - all cores minus `k - 1`
///
/// # Example
/// ```
/// use pacer::config::PoolSize;
///
/// assert_eq!("0".parse::<PoolSize>().unwrap(), PoolSize::Disabled);
/// assert_eq!("8".parse::<PoolSize>().unwrap(), PoolSize::Workers(8));
/// assert_eq!("-2".parse::<PoolSize>().unwrap(), PoolSize::AllCoresMinus(1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "i64")]
pub enum PoolSize {
    #[default]
    Disabled,
    Workers(usize),
    AllCoresMinus(usize),
}

impl PoolSize {
    /// Number of workers this request amounts to on the current machine.
    ///
    /// "All cores minus N" never resolves below one worker.
    pub fn resolve(self) -> usize {
        match self {
            PoolSize::Disabled => 0,
            PoolSize::Workers(n) => n,
            PoolSize::AllCoresMinus(n) => available_cores().saturating_sub(n).max(1),
        }
    }
}

fn available_cores() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(FALLBACK_PARALLELISM)
}

impl From<i64> for PoolSize {
    fn from(value: i64) -> Self {
        match value {
            0 => PoolSize::Disabled,
            n if n > 0 => PoolSize::Workers(n as usize),
            n => PoolSize::AllCoresMinus((n.unsigned_abs() - 1) as usize),
        }
    }
}

impl FromStr for PoolSize {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(PoolSize::from)
            .map_err(|_| ConfigError::InvalidWorkers {
                value: s.to_string(),
            })
    }
}

impl fmt::Display for PoolSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolSize::Disabled => write!(f, "disabled"),
            PoolSize::Workers(n) => write!(f, "{} workers", n),
            PoolSize::AllCoresMinus(0) => write!(f, "all cores"),
            PoolSize::AllCoresMinus(n) => write!(f, "all cores minus {}", n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_convention() {
        assert_eq!(PoolSize::from(0), PoolSize::Disabled);
        assert_eq!(PoolSize::from(6), PoolSize::Workers(6));
        assert_eq!(PoolSize::from(-1), PoolSize::AllCoresMinus(0));
        assert_eq!(PoolSize::from(-3), PoolSize::AllCoresMinus(2));
    }

    #[test]
    fn test_resolve() {
        assert_eq!(PoolSize::Disabled.resolve(), 0);
        assert_eq!(PoolSize::Workers(5).resolve(), 5);
        assert_eq!(PoolSize::AllCoresMinus(0).resolve(), available_cores());
        assert_eq!(PoolSize::AllCoresMinus(10_000).resolve(), 1);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = "lots".parse::<PoolSize>().unwrap_err();
        assert!(err.to_string().contains("invalid worker count 'lots'"));
        assert_eq!(" 3 ".parse::<PoolSize>().unwrap(), PoolSize::Workers(3));
    }
}
