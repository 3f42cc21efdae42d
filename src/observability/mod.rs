// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! All diagnostic output goes through message types under [`messages`]. Each
//! message is a small struct with a `Display` implementation and a
//! [`messages::StructuredLog`] implementation that emits the event at its own
//! level with structured fields. This keeps log wording in one place instead
//! of scattering format strings through the engine.
//!
//! # Usage
//!
//! ```rust
//! use pacer::observability::messages::graph::NodeStarted;
//! use pacer::observability::messages::StructuredLog;
//!
//! NodeStarted {
//!     node: "square#3",
//!     kind: "zip",
//!     size: 10,
//!     inputs: 2,
//! }
//! .log();
//! ```

pub mod messages;

use tracing_subscriber::EnvFilter;

use crate::config::consts::DEFAULT_LOG_LEVEL;

/// Install a fmt subscriber filtered by `RUST_LOG`, falling back to
/// `fallback` (or `info`). Safe to call more than once.
pub fn init_tracing(fallback: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(fallback.unwrap_or(DEFAULT_LOG_LEVEL)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
