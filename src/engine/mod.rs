// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod executor;
pub mod factory;
pub mod task;

pub use executor::Engine;
pub use factory::EngineFactory;
pub use task::{ExecMode, MarshalledTask, Task};
