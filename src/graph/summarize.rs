// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::sync::Arc;

use super::computation::{Arity, Computation, Drained};
use super::{Broadcast, Input, Value};
use crate::engine::Engine;
use crate::errors::GraphError;
use crate::traits::{Stream, Work};

/// Reduce a whole stream to a single result.
///
/// Waits for every item, restores logical order, and calls the work
/// function once with the ordered values as a single array argument. A
/// failure in the input is forwarded as soon as it is seen and the work
/// function is skipped.
pub struct Summarize {
    core: Computation,
}

impl Summarize {
    pub fn new(work: Work, input: Input) -> Result<Arc<Self>, GraphError> {
        Self::from_inputs(work, vec![input])
    }

    /// Build from an input list; anything other than exactly one input is a
    /// configuration error.
    pub fn from_inputs(work: Work, inputs: Vec<Input>) -> Result<Arc<Self>, GraphError> {
        let core = Computation::new(work, inputs, Arity::ExactlyOne)?;
        Ok(Arc::new(Self { core }))
    }

    async fn produce(self: Arc<Self>, engine: Engine) {
        match self.core.drain_ordered().await {
            Drained::Complete(values) => {
                self.core.launch(&engine, 0, vec![Ok(Value::Array(values))]);
            }
            Drained::Failed(failure) => self.core.forward(0, failure),
            Drained::Closed => {}
        }
    }
}

#[async_trait]
impl Stream for Summarize {
    fn outlet(&self) -> &Broadcast {
        self.core.outlet()
    }

    fn kind(&self) -> &'static str {
        "summarize"
    }

    fn size(&self) -> usize {
        1
    }

    fn start(self: Arc<Self>, engine: &Engine) -> Result<(), GraphError> {
        let production = self.clone().produce(engine.clone());
        self.core.start(engine, self.kind(), 1, production)
    }
}
