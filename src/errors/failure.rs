// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The failure envelope: a captured work error travelling as data.

use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Causes of failure that originate at the execution boundary rather than
/// inside a work function's own error type.
#[derive(Debug, Error)]
pub enum WorkError {
    /// The work function panicked
    #[error("work function panicked: {message}")]
    Panicked { message: String },

    /// The argument bundle could not be prepared for pooled execution
    #[error("failed to marshal arguments for '{node}': {source}")]
    Marshal {
        node: String,
        #[source]
        source: serde_json::Error,
    },

    /// The pool refused or lost the task before it produced a result
    #[error("worker for '{node}' was lost: {reason}")]
    WorkerLost { node: String, reason: String },

    /// A whole-stream transform returned something other than one value per position
    #[error("expected a sequence of {expected} values, work function returned {actual}")]
    ShapeMismatch { expected: usize, actual: String },
}

/// A captured error, routed downstream exactly like an ordinary value.
///
/// Cloning is cheap; every listener of a stream receives the same envelope.
/// Only the sink unwraps it, either by re-raising it or by handing it to the
/// caller in place.
#[derive(Clone)]
pub struct Failure {
    inner: Arc<Captured>,
}

struct Captured {
    node: String,
    position: usize,
    error: anyhow::Error,
    trace: String,
}

impl Failure {
    /// Capture `error` as raised while computing `position` on `node`.
    pub fn capture(node: &str, position: usize, error: anyhow::Error) -> Self {
        let trace = error.backtrace().to_string();
        Self {
            inner: Arc::new(Captured {
                node: node.to_string(),
                position,
                error,
                trace,
            }),
        }
    }

    /// Id of the node whose work unit failed
    pub fn node(&self) -> &str {
        &self.inner.node
    }

    /// Result position that was being computed when the error was raised
    pub fn position(&self) -> usize {
        self.inner.position
    }

    /// The original error
    pub fn error(&self) -> &anyhow::Error {
        &self.inner.error
    }

    /// Backtrace captured where the error was raised (may read "disabled
    /// backtrace" unless `RUST_BACKTRACE` or `RUST_LIB_BACKTRACE` is set)
    pub fn trace(&self) -> &str {
        &self.inner.trace
    }

    /// Borrow the original error as a concrete type.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: fmt::Display + fmt::Debug + Send + Sync + 'static,
    {
        self.inner.error.downcast_ref::<E>()
    }

    /// Whether two handles refer to the same captured error
    pub fn same_as(&self, other: &Failure) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner.error)
    }
}

impl fmt::Debug for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Failure")
            .field("node", &self.inner.node)
            .field("position", &self.inner.position)
            .field("error", &format_args!("{:#}", self.inner.error))
            .finish()
    }
}

impl std::error::Error for Failure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.inner.error.source()
    }
}
