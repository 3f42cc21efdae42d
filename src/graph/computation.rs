// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Shared machinery for nodes that apply a work function to upstream items.

use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::Instrument;

use super::{as_stream, next_node_id, Broadcast, IndexedItem, Input, Payload, Value};
use crate::engine::{Engine, Task};
use crate::errors::{Failure, GraphError};
use crate::observability::messages::graph::{FailureForwarded, NodeStarted, UpstreamClosed};
use crate::observability::messages::StructuredLog;
use crate::traits::{Stream, Work};

/// Number of inputs a computation kind accepts
#[derive(Debug, Clone, Copy)]
pub(crate) enum Arity {
    AtLeastOne,
    ExactlyOne,
}

impl Arity {
    fn accepts(self, count: usize) -> bool {
        match self {
            Arity::AtLeastOne => count >= 1,
            Arity::ExactlyOne => count == 1,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Arity::AtLeastOne => "at least 1",
            Arity::ExactlyOne => "exactly 1",
        }
    }
}

/// Outcome of draining a whole input
pub(crate) enum Drained {
    /// Every value, in logical order
    Complete(Vec<Value>),
    /// A failure arrived; draining stopped there
    Failed(Failure),
    Closed,
}

/// State every computation carries: its id, work, inputs and outlet.
///
/// Each input slot gets its own listener key on the upstream, so a single
/// stream may feed several slots of the same node.
pub(crate) struct Computation {
    id: Arc<str>,
    work: Work,
    inputs: Vec<Arc<dyn Stream>>,
    output: Arc<Broadcast>,
}

impl Computation {
    pub(crate) fn new(work: Work, inputs: Vec<Input>, arity: Arity) -> Result<Self, GraphError> {
        let id = next_node_id(work.name());
        if !arity.accepts(inputs.len()) {
            return Err(GraphError::InputArity {
                node: id.to_string(),
                expected: arity.describe(),
                actual: inputs.len(),
            });
        }

        let inputs: Vec<Arc<dyn Stream>> = inputs.into_iter().map(as_stream).collect();
        for (slot, input) in inputs.iter().enumerate() {
            input.register_listener(&listener_key(&id, slot));
        }

        Ok(Self {
            output: Arc::new(Broadcast::new(id.clone())),
            id,
            work,
            inputs,
        })
    }

    pub(crate) fn id(&self) -> &str {
        &self.id
    }

    pub(crate) fn outlet(&self) -> &Broadcast {
        &self.output
    }

    pub(crate) fn inputs(&self) -> &[Arc<dyn Stream>] {
        &self.inputs
    }

    pub(crate) fn input_sizes(&self) -> Vec<usize> {
        self.inputs.iter().map(|input| input.size()).collect()
    }

    pub(crate) fn listener(&self, slot: usize) -> String {
        listener_key(&self.id, slot)
    }

    /// Start upstreams, then spawn `production` unless this node already runs.
    pub(crate) fn start<F>(&self, engine: &Engine, kind: &str, size: usize, production: F) -> Result<(), GraphError>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let handle = Handle::try_current().map_err(|_| GraphError::NoRuntime {
            node: self.id.to_string(),
        })?;

        for input in &self.inputs {
            input.clone().start(engine)?;
        }

        if !self.output.mark_started() {
            return Ok(());
        }

        let started = NodeStarted {
            node: &self.id,
            kind,
            size,
            inputs: self.inputs.len(),
        };
        started.log();
        handle.spawn(production.instrument(started.span("produce")));
        Ok(())
    }

    /// Compute result `number` from one payload per input slot.
    ///
    /// If any argument is a failure, the first one (in slot order) is
    /// forwarded and the work function is not called.
    pub(crate) fn launch(&self, engine: &Engine, number: usize, args: Vec<Payload>) {
        let values = match args.into_iter().collect::<Result<Vec<Value>, Failure>>() {
            Ok(values) => values,
            Err(failure) => return self.forward(number, failure),
        };

        let output = self.output.clone();
        self.submit(engine, number, values, move |payload| {
            output.put(IndexedItem::new(number, payload));
        });
    }

    /// Hand the work function's evaluation to the engine with a custom callback.
    pub(crate) fn submit<C>(&self, engine: &Engine, number: usize, values: Vec<Value>, callback: C)
    where
        C: FnOnce(Payload) + Send + 'static,
    {
        let task = Task::new(self.id.clone(), number, self.work.clone(), values);
        engine.run(task, callback);
    }

    /// Put `failure` at `number` on this node's own output
    pub(crate) fn forward(&self, number: usize, failure: Failure) {
        FailureForwarded {
            node: &self.id,
            position: number,
            failure: &failure,
        }
        .log();
        self.output.put(IndexedItem::new(number, Err(failure)));
    }

    pub(crate) fn output_handle(&self) -> Arc<Broadcast> {
        self.output.clone()
    }

    /// Merge the items of several input slots into one receiver of
    /// `(slot, item)`, so a node can wait on all of them at once.
    ///
    /// One forwarding task per slot pulls exactly that input's size.
    pub(crate) fn fan_in(&self, slots: &[usize]) -> mpsc::UnboundedReceiver<(usize, IndexedItem)> {
        let (sender, receiver) = mpsc::unbounded_channel();

        for &slot in slots {
            let input = self.inputs[slot].clone();
            let listener = self.listener(slot);
            let node = self.id.clone();
            let sender = sender.clone();

            tokio::spawn(async move {
                for _ in 0..input.size() {
                    let Some(item) = input.get(&listener).await else {
                        UpstreamClosed {
                            node: &node,
                            listener: &listener,
                        }
                        .log();
                        return;
                    };
                    if sender.send((slot, item)).is_err() {
                        return;
                    }
                }
            });
        }

        receiver
    }

    /// Wait for every item of the single input and restore logical order.
    pub(crate) async fn drain_ordered(&self) -> Drained {
        let input = &self.inputs[0];
        let listener = self.listener(0);
        let mut items = Vec::with_capacity(input.size());

        for _ in 0..input.size() {
            match input.get(&listener).await {
                Some(IndexedItem {
                    number,
                    value: Ok(value),
                }) => items.push((number, value)),
                Some(IndexedItem {
                    value: Err(failure),
                    ..
                }) => return Drained::Failed(failure),
                None => {
                    UpstreamClosed {
                        node: &self.id,
                        listener: &listener,
                    }
                    .log();
                    return Drained::Closed;
                }
            }
        }

        items.sort_by_key(|(number, _)| *number);
        Drained::Complete(items.into_iter().map(|(_, value)| value).collect())
    }
}

fn listener_key(node: &str, slot: usize) -> String {
    format!("{}/{}", node, slot)
}
