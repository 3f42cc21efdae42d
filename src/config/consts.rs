/// Environment variable overriding the configured worker count
pub const WORKERS_ENV_VAR: &str = "PACER_WORKERS";
/// Log filter used when neither `RUST_LOG` nor the config names one
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// Worker count assumed when the platform cannot report its parallelism
pub const FALLBACK_PARALLELISM: usize = 4;
