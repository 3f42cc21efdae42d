// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod config;     // config + pool sizing
pub mod engine;     // task execution
pub mod errors;     // error handling
pub mod graph;      // stream nodes
pub mod observability;
pub mod traits;     // unified abstractions
