// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the execution boundary.

use crate::engine::ExecMode;
use crate::errors::Failure;
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Engine created with a resolved pool capacity.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use pacer::observability::messages::engine::EngineConfigured;
///
/// let msg = EngineConfigured {
///     requested: "all cores minus 1",
///     workers: 7,
/// };
///
/// assert_eq!(msg.to_string(), "Engine configured: requested all cores minus 1, 7 workers");
/// ```
pub struct EngineConfigured<'a> {
    pub requested: &'a str,
    pub workers: usize,
}

impl Display for EngineConfigured<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Engine configured: requested {}, {} workers",
            self.requested, self.workers
        )
    }
}

impl StructuredLog for EngineConfigured<'_> {
    fn log(&self) {
        tracing::info!(
            requested = self.requested,
            workers = self.workers,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "engine",
            span_name = name,
            requested = self.requested,
            workers = self.workers,
        )
    }
}

/// Task handed to the engine.
///
/// # Log Level
/// `trace!` - Per-task detail
pub struct TaskSubmitted<'a> {
    pub node: &'a str,
    pub position: usize,
    pub mode: ExecMode,
}

impl Display for TaskSubmitted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Task '{}'[{}] submitted ({:?})",
            self.node, self.position, self.mode
        )
    }
}

impl StructuredLog for TaskSubmitted<'_> {
    fn log(&self) {
        tracing::trace!(
            node = self.node,
            position = self.position,
            mode = ?self.mode,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!(
            "task",
            span_name = name,
            node = self.node,
            position = self.position,
            mode = ?self.mode,
        )
    }
}

/// Work unit failed; the failure continues downstream as a value.
///
/// # Log Level
/// `warn!` - The pipeline continues, but the result will carry the failure
pub struct TaskFailed<'a> {
    pub failure: &'a Failure,
}

impl Display for TaskFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Task '{}'[{}] failed: {}",
            self.failure.node(),
            self.failure.position(),
            self.failure
        )
    }
}

impl StructuredLog for TaskFailed<'_> {
    fn log(&self) {
        tracing::warn!(
            node = self.failure.node(),
            position = self.failure.position(),
            error = %self.failure,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "task_failed",
            span_name = name,
            node = self.failure.node(),
            position = self.failure.position(),
            error = %self.failure,
        )
    }
}

/// A pooled task was submitted outside any tokio runtime and ran inline.
///
/// # Log Level
/// `warn!` - Configuration smell; results are unaffected
pub struct PoolUnavailable<'a> {
    pub node: &'a str,
}

impl Display for PoolUnavailable<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "No tokio runtime for pooled task '{}', running inline",
            self.node
        )
    }
}

impl StructuredLog for PoolUnavailable<'_> {
    fn log(&self) {
        tracing::warn!(node = self.node, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("pool_unavailable", span_name = name, node = self.node)
    }
}
