// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::sync::Arc;

use super::{next_node_id, Broadcast, IndexedItem, Value};
use crate::engine::Engine;
use crate::errors::GraphError;
use crate::observability::messages::graph::NodeStarted;
use crate::observability::messages::StructuredLog;
use crate::traits::Stream;

/// Leaf producer of a fixed collection.
///
/// Emits `IndexedItem(0..N-1)` synchronously when started; no work function
/// and no concurrency involved.
pub struct Source {
    outlet: Broadcast,
    values: Vec<Value>,
}

impl Source {
    pub fn new(values: Vec<Value>) -> Arc<Self> {
        Self::named("source", values)
    }

    /// A source whose node id starts with `label`
    pub fn named(label: &str, values: Vec<Value>) -> Arc<Self> {
        Arc::new(Self::build(next_node_id(label), values))
    }

    fn build(id: Arc<str>, values: Vec<Value>) -> Self {
        Self {
            outlet: Broadcast::new(id),
            values,
        }
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    fn emit(&self, kind: &str) {
        if !self.outlet.mark_started() {
            return;
        }

        let started = NodeStarted {
            node: self.outlet.node(),
            kind,
            size: self.values.len(),
            inputs: 0,
        };
        started.log();

        let _entered = started.span("emit").entered();
        for (number, value) in self.values.iter().enumerate() {
            self.outlet.put(IndexedItem::new(number, Ok(value.clone())));
        }
    }
}

#[async_trait]
impl Stream for Source {
    fn outlet(&self) -> &Broadcast {
        &self.outlet
    }

    fn kind(&self) -> &'static str {
        "source"
    }

    fn size(&self) -> usize {
        self.values.len()
    }

    fn start(self: Arc<Self>, _engine: &Engine) -> Result<(), GraphError> {
        self.emit(self.kind());
        Ok(())
    }
}

/// A source whose values come from a generator, e.g. an enumerated parameter
/// sweep.
///
/// The generator runs exactly once, while the graph is being built, because
/// downstream nodes need this node's size before anything starts.
pub struct ComputedSource {
    source: Source,
}

impl ComputedSource {
    pub fn new<G>(label: &str, generator: G) -> Result<Arc<Self>, GraphError>
    where
        G: FnOnce() -> anyhow::Result<Vec<Value>>,
    {
        let id = next_node_id(label);
        let values = generator().map_err(|source| GraphError::Generator {
            node: id.to_string(),
            source,
        })?;

        Ok(Arc::new(Self {
            source: Source::build(id, values),
        }))
    }

    pub fn values(&self) -> &[Value] {
        self.source.values()
    }
}

#[async_trait]
impl Stream for ComputedSource {
    fn outlet(&self) -> &Broadcast {
        &self.source.outlet
    }

    fn kind(&self) -> &'static str {
        "computed_source"
    }

    fn size(&self) -> usize {
        self.source.values.len()
    }

    fn start(self: Arc<Self>, _engine: &Engine) -> Result<(), GraphError> {
        self.source.emit(self.kind());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_source_emits_in_order() {
        let source = Source::new(vec![json!("a"), json!("b"), json!("c")]);
        source.register_listener("l");
        source.clone().start(&Engine::local()).unwrap();

        for expected in 0..3 {
            let item = source.get("l").await.unwrap();
            assert_eq!(item.number, expected);
            assert_eq!(item.value.unwrap(), source.values()[expected]);
        }
        assert!(source.empty("l"));
    }

    #[tokio::test]
    async fn test_second_start_does_not_re_emit() {
        let source = Source::new(vec![json!(1)]);
        source.register_listener("l");
        source.clone().start(&Engine::local()).unwrap();
        source.clone().start(&Engine::local()).unwrap();

        assert!(source.get("l").await.is_some());
        assert!(source.empty("l"));
    }

    #[test]
    fn test_computed_source_runs_generator_once_at_build() {
        let mut calls = 0;
        let sweep = ComputedSource::new("sweep", || {
            calls += 1;
            Ok((0..4).map(|i| json!(i * 10)).collect())
        })
        .unwrap();

        assert_eq!(calls, 1);
        assert_eq!(sweep.size(), 4);
        assert_eq!(sweep.values()[3], json!(30));
        assert!(sweep.id().starts_with("sweep#"));
    }

    #[test]
    fn test_computed_source_generator_error() {
        let err = ComputedSource::new("sweep", || Err(anyhow::anyhow!("no grid")))
            .map(|_| ())
            .unwrap_err();
        assert!(matches!(err, GraphError::Generator { .. }));
        assert!(err.to_string().contains("no grid"));
    }
}
