// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Configuration errors in graph construction or start-up.
///
/// These are raised synchronously from constructors and `start`, and are
/// never routed through the failure envelope path.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Non-constant inputs to a zip disagree on their size
    #[error("zip '{node}' received mismatched non-constant input sizes: {sizes:?}")]
    MismatchedSizes { node: String, sizes: Vec<usize> },

    /// A node was built with the wrong number of inputs
    #[error("'{node}' expects {expected} input(s), got {actual}")]
    InputArity {
        node: String,
        expected: &'static str,
        actual: usize,
    },

    /// A node was started outside of a tokio runtime
    #[error("'{node}' must be started from within a tokio runtime")]
    NoRuntime { node: String },

    /// The generator bound to a computed source failed
    #[error("generator for '{node}' failed: {source}")]
    Generator {
        node: String,
        #[source]
        source: anyhow::Error,
    },
}
