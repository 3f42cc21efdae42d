// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for node lifecycle and output collection.

use crate::errors::Failure;
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// Node began local production.
///
/// # Log Level
/// `debug!` - Lifecycle detail
///
/// # Example
/// ```
/// use pacer::observability::messages::graph::NodeStarted;
///
/// let msg = NodeStarted {
///     node: "square#3",
///     kind: "zip",
///     size: 10,
///     inputs: 2,
/// };
///
/// assert_eq!(msg.to_string(), "Started zip 'square#3': 2 inputs, 10 items expected");
/// ```
pub struct NodeStarted<'a> {
    pub node: &'a str,
    pub kind: &'a str,
    pub size: usize,
    pub inputs: usize,
}

impl Display for NodeStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Started {} '{}': {} inputs, {} items expected",
            self.kind, self.node, self.inputs, self.size
        )
    }
}

impl StructuredLog for NodeStarted<'_> {
    fn log(&self) {
        tracing::debug!(
            node = self.node,
            kind = self.kind,
            size = self.size,
            inputs = self.inputs,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "node",
            span_name = name,
            node = self.node,
            kind = self.kind,
            size = self.size,
        )
    }
}

/// An argument was already a failure, so the work function was skipped.
///
/// # Log Level
/// `debug!` - The original failure was logged where it was captured
pub struct FailureForwarded<'a> {
    pub node: &'a str,
    pub position: usize,
    pub failure: &'a Failure,
}

impl Display for FailureForwarded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "'{}'[{}] forwarding failure from '{}'[{}]",
            self.node,
            self.position,
            self.failure.node(),
            self.failure.position()
        )
    }
}

impl StructuredLog for FailureForwarded<'_> {
    fn log(&self) {
        tracing::debug!(
            node = self.node,
            position = self.position,
            origin = self.failure.node(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "failure_forwarded",
            span_name = name,
            node = self.node,
            position = self.position,
            origin = self.failure.node(),
        )
    }
}

/// An upstream stream stopped delivering before its declared size.
///
/// # Log Level
/// `error!` - The node cannot finish
pub struct UpstreamClosed<'a> {
    pub node: &'a str,
    pub listener: &'a str,
}

impl Display for UpstreamClosed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Upstream closed while '{}' was waiting on listener '{}'",
            self.node, self.listener
        )
    }
}

impl StructuredLog for UpstreamClosed<'_> {
    fn log(&self) {
        tracing::error!(node = self.node, listener = self.listener, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "upstream_closed",
            span_name = name,
            node = self.node,
            listener = self.listener,
        )
    }
}

/// An item carried a position outside the stream's declared size.
///
/// # Log Level
/// `error!` - The item is dropped
pub struct ItemOutOfRange<'a> {
    pub node: &'a str,
    pub number: usize,
    pub size: usize,
}

impl Display for ItemOutOfRange<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "'{}' dropped item {} outside declared size {}",
            self.node, self.number, self.size
        )
    }
}

impl StructuredLog for ItemOutOfRange<'_> {
    fn log(&self) {
        tracing::error!(
            node = self.node,
            number = self.number,
            size = self.size,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "item_out_of_range",
            span_name = name,
            node = self.node,
            number = self.number,
        )
    }
}

/// Output node collected every expected item.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use pacer::observability::messages::graph::OutputCollected;
/// use std::time::Duration;
///
/// let msg = OutputCollected {
///     node: "output#9",
///     items: 6,
///     failures: 1,
///     duration: Duration::from_millis(12),
/// };
///
/// assert_eq!(msg.to_string(), "Output 'output#9' collected 6 items (1 failures) in 12ms");
/// ```
pub struct OutputCollected<'a> {
    pub node: &'a str,
    pub items: usize,
    pub failures: usize,
    pub duration: Duration,
}

impl Display for OutputCollected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Output '{}' collected {} items ({} failures) in {:?}",
            self.node, self.items, self.failures, self.duration
        )
    }
}

impl StructuredLog for OutputCollected<'_> {
    fn log(&self) {
        tracing::info!(
            node = self.node,
            items = self.items,
            failures = self.failures,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "output_collected",
            span_name = name,
            node = self.node,
            items = self.items,
            failures = self.failures,
            duration = ?self.duration,
        )
    }
}

/// Strict collection is re-raising the first failure in logical order.
///
/// # Log Level
/// `error!` - The caller receives the error
pub struct FailureReraised<'a> {
    pub node: &'a str,
    pub failure: &'a Failure,
}

impl Display for FailureReraised<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Output '{}' re-raising failure from '{}'[{}]: {}",
            self.node,
            self.failure.node(),
            self.failure.position(),
            self.failure
        )
    }
}

impl StructuredLog for FailureReraised<'_> {
    fn log(&self) {
        tracing::error!(
            node = self.node,
            origin = self.failure.node(),
            position = self.failure.position(),
            error = %self.failure,
            trace = self.failure.trace(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "failure_reraised",
            span_name = name,
            node = self.node,
            origin = self.failure.node(),
            error = %self.failure,
        )
    }
}
