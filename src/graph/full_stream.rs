// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::sync::Arc;

use super::computation::{Arity, Computation, Drained};
use super::{Broadcast, IndexedItem, Input, Payload, Value};
use crate::engine::Engine;
use crate::errors::{Failure, GraphError, WorkError};
use crate::traits::{Stream, Work};

/// Transform a whole stream at once, one output per input position.
///
/// Like [`Summarize`](super::Summarize) the entire input is gathered and
/// ordered first, and the work function is called once with the ordered
/// array. It must return an array of the same length; element `i` becomes
/// output position `i`.
///
/// A failure anywhere (in the input, in the work function, or a wrongly
/// shaped result) fills every output position, since no position can be
/// computed without the others.
pub struct FullStream {
    core: Computation,
    size: usize,
}

impl FullStream {
    pub fn new(work: Work, input: Input) -> Result<Arc<Self>, GraphError> {
        Self::from_inputs(work, vec![input])
    }

    pub fn from_inputs(work: Work, inputs: Vec<Input>) -> Result<Arc<Self>, GraphError> {
        let core = Computation::new(work, inputs, Arity::ExactlyOne)?;
        let size = core.input_sizes()[0];
        Ok(Arc::new(Self { core, size }))
    }

    async fn produce(self: Arc<Self>, engine: Engine) {
        let values = match self.core.drain_ordered().await {
            Drained::Complete(values) => values,
            Drained::Failed(failure) => {
                for number in 0..self.size {
                    self.core.forward(number, failure.clone());
                }
                return;
            }
            Drained::Closed => return,
        };

        let output = self.core.output_handle();
        let node = self.core.id().to_string();
        let expected = self.size;

        self.core.submit(&engine, 0, vec![Value::Array(values)], move |payload| {
            for (number, value) in spread(&node, expected, payload).into_iter().enumerate() {
                output.put(IndexedItem::new(number, value));
            }
        });
    }
}

/// Split a whole-stream result into one payload per position.
fn spread(node: &str, expected: usize, payload: Payload) -> Vec<Payload> {
    let failure = match payload {
        Ok(Value::Array(values)) if values.len() == expected => {
            return values.into_iter().map(Ok).collect();
        }
        Ok(other) => {
            let actual = match &other {
                Value::Array(values) => format!("{} values", values.len()),
                _ => format!("a non-sequence ({})", other),
            };
            let error = WorkError::ShapeMismatch { expected, actual };
            Failure::capture(node, 0, error.into())
        }
        Err(failure) => failure,
    };

    vec![Err(failure); expected]
}

#[async_trait]
impl Stream for FullStream {
    fn outlet(&self) -> &Broadcast {
        self.core.outlet()
    }

    fn kind(&self) -> &'static str {
        "full_stream"
    }

    fn size(&self) -> usize {
        self.size
    }

    fn start(self: Arc<Self>, engine: &Engine) -> Result<(), GraphError> {
        let production = self.clone().produce(engine.clone());
        self.core.start(engine, self.kind(), self.size, production)
    }
}
