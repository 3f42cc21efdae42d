// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

use super::{Failure, GraphError};

/// Errors surfaced when collecting a pipeline's output
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// The graph could not be started
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// A work unit failed; displays exactly as the original error
    #[error(transparent)]
    Failed(Failure),

    /// The upstream stream went away before delivering every item
    #[error("upstream of '{node}' closed after {received} of {expected} items")]
    UpstreamClosed {
        node: String,
        expected: usize,
        received: usize,
    },

    /// An output node can be collected only once
    #[error("output '{node}' has already been collected")]
    AlreadyCollected { node: String },
}

impl ExecutionError {
    /// The failure envelope behind a re-raised work error, if any
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            ExecutionError::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}
