// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod execution;
mod failure;
mod graph;

pub use config::ConfigError;
pub use execution::ExecutionError;
pub use failure::{Failure, WorkError};
pub use graph::GraphError;
