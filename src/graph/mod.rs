// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Dataflow nodes: sources, computations and the output sink.
//!
//! A graph is built bottom-up from [`Source`]s, combined by [`Zip`], [`Join`],
//! [`Summarize`] and [`FullStream`] computations, and drained by exactly one
//! [`OutputNode`]. Inside, items travel out of order; the output node puts
//! them back in logical order.
//!
//! # Examples
//!
//! ```rust
//! use pacer::engine::Engine;
//! use pacer::graph::{Input, OutputNode, Source, Zip};
//! use pacer::traits::Work;
//! use serde_json::json;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let scale = Work::new("scale", |args| {
//!     let factor = args[0].as_i64().unwrap_or(1);
//!     let x = args[1].as_i64().unwrap_or(0);
//!     Ok(json!(factor * x))
//! });
//!
//! let samples = Source::new(vec![json!(1), json!(2), json!(3)]);
//! let scaled = Zip::new(scale, vec![Input::scalar(10), Input::from(samples)])?;
//!
//! let output = OutputNode::new(Input::from(scaled));
//! let values = output.values(&Engine::with_workers(2)).await?;
//! assert_eq!(values, vec![json!(10), json!(20), json!(30)]);
//! # Ok(())
//! # }
//! ```

mod broadcast;
mod computation;
mod full_stream;
mod input;
mod item;
mod join;
mod output;
mod source;
mod summarize;
mod zip;

#[cfg(test)]
mod integration_tests;

pub use broadcast::Broadcast;
pub use full_stream::FullStream;
pub use input::{as_stream, Input};
pub use item::{IndexedItem, Payload, Value};
pub use join::Join;
pub use output::OutputNode;
pub use source::{ComputedSource, Source};
pub use summarize::Summarize;
pub use zip::Zip;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

static NODE_SEQUENCE: AtomicUsize = AtomicUsize::new(1);

/// Unique node id of the form `label#seq`
pub(crate) fn next_node_id(label: &str) -> Arc<str> {
    let seq = NODE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    Arc::from(format!("{}#{}", label, seq))
}
