// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use super::{as_stream, next_node_id, Input, Payload, Value};
use crate::engine::Engine;
use crate::errors::ExecutionError;
use crate::observability::messages::graph::{FailureReraised, OutputCollected};
use crate::observability::messages::StructuredLog;
use crate::traits::Stream;

/// The sink of a pipeline.
///
/// Starts the graph, waits for every item its upstream declares, and hands
/// results back in logical order regardless of completion order.
pub struct OutputNode {
    id: Arc<str>,
    input: Arc<dyn Stream>,
    listener: String,
    collected: AtomicBool,
}

impl OutputNode {
    pub fn new(input: Input) -> Self {
        let id = next_node_id("output");
        let input = as_stream(input);
        let listener = id.to_string();
        input.register_listener(&listener);

        Self {
            id,
            input,
            listener,
            collected: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Number of results this node will return
    pub fn size(&self) -> usize {
        self.input.size()
    }

    /// Run the pipeline and collect every result in logical order.
    ///
    /// With `strict`, the failure at the lowest position is returned as
    /// `ExecutionError::Failed` and nothing else is exposed. Without it,
    /// failures stay in place in the returned list.
    pub async fn run(&self, engine: &Engine, strict: bool) -> Result<Vec<Payload>, ExecutionError> {
        if self.collected.swap(true, Ordering::SeqCst) {
            return Err(ExecutionError::AlreadyCollected {
                node: self.id.to_string(),
            });
        }

        let started = Instant::now();
        self.input.clone().start(engine)?;

        let expected = self.size();
        let mut items = Vec::with_capacity(expected);
        for received in 0..expected {
            match self.input.get(&self.listener).await {
                Some(item) => items.push(item),
                None => {
                    return Err(ExecutionError::UpstreamClosed {
                        node: self.id.to_string(),
                        expected,
                        received,
                    })
                }
            }
        }
        items.sort_by_key(|item| item.number);

        let failures = items.iter().filter(|item| item.is_failure()).count();
        OutputCollected {
            node: &self.id,
            items: items.len(),
            failures,
            duration: started.elapsed(),
        }
        .log();

        if strict {
            if let Some(failure) = items.iter().find_map(|item| item.value.as_ref().err()) {
                FailureReraised {
                    node: &self.id,
                    failure,
                }
                .log();
                return Err(ExecutionError::Failed(failure.clone()));
            }
        }

        Ok(items.into_iter().map(|item| item.value).collect())
    }

    /// Strict collection returning plain values.
    pub async fn values(&self, engine: &Engine) -> Result<Vec<Value>, ExecutionError> {
        self.run(engine, true)
            .await?
            .into_iter()
            .collect::<Result<Vec<_>, _>>()
            .map_err(ExecutionError::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Source;
    use serde_json::json;

    #[tokio::test]
    async fn test_output_returns_source_in_order() {
        let output = OutputNode::new(Input::collection(["a", "b", "c"]));
        assert_eq!(output.size(), 3);
        assert!(output.id().starts_with("output#"));

        let values = output.values(&Engine::local()).await.unwrap();
        assert_eq!(values, vec![json!("a"), json!("b"), json!("c")]);
    }

    #[tokio::test]
    async fn test_second_collection_is_rejected() {
        let output = OutputNode::new(Input::from(Source::new(vec![json!(1)])));
        output.run(&Engine::local(), true).await.unwrap();

        let err = output.run(&Engine::local(), true).await.unwrap_err();
        assert!(matches!(err, ExecutionError::AlreadyCollected { .. }));
    }

    #[tokio::test]
    async fn test_two_outputs_share_one_source() {
        let source = Source::new(vec![json!(1), json!(2)]);
        let first = OutputNode::new(Input::from(source.clone()));
        let second = OutputNode::new(Input::from(source));

        let engine = Engine::local();
        assert_eq!(first.values(&engine).await.unwrap(), vec![json!(1), json!(2)]);
        assert_eq!(second.values(&engine).await.unwrap(), vec![json!(1), json!(2)]);
    }
}
