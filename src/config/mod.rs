// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod loader;
mod pool;

pub mod consts;

pub use loader::{apply_workers_override, load_config, Config};
pub use pool::PoolSize;
