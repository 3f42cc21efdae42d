// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Position-aligned combination of streams.
//!
//! Inputs of size 1 are constants: their single value is reused at every
//! position. All other inputs must agree on one size, and position `p` of the
//! output is `f(args at p)`.
//!
//! ```text
//!   rate   [r]              (constant)
//!   xs     [x0 x1 x2 x3]
//!   ys     [y0 y1 y2 y3]
//!   ---------------------
//!   out    [f(r,x0,y0) f(r,x1,y1) f(r,x2,y2) f(r,x3,y3)]
//! ```
//!
//! Items of the varying inputs arrive interleaved in any order. They fill a
//! position × slot matrix, and a position launches as soon as its row is
//! complete, so launch order follows arrival, not position.

use async_trait::async_trait;
use std::sync::Arc;

use super::computation::{Arity, Computation};
use super::{Broadcast, Input, Payload};
use crate::engine::Engine;
use crate::errors::GraphError;
use crate::observability::messages::graph::{ItemOutOfRange, UpstreamClosed};
use crate::observability::messages::StructuredLog;
use crate::traits::{Stream, Work};

pub struct Zip {
    core: Computation,
    size: usize,
}

impl Zip {
    pub fn new(work: Work, inputs: Vec<Input>) -> Result<Arc<Self>, GraphError> {
        let core = Computation::new(work, inputs, Arity::AtLeastOne)?;
        let size = core
            .input_sizes()
            .into_iter()
            .find(|&size| size != 1)
            .unwrap_or(1);

        Ok(Arc::new(Self { core, size }))
    }

    /// Slots whose input is not a constant broadcast
    fn varying_slots(&self) -> Vec<usize> {
        self.core
            .input_sizes()
            .into_iter()
            .enumerate()
            .filter(|&(_, size)| size != 1)
            .map(|(slot, _)| slot)
            .collect()
    }

    fn check_sizes(&self) -> Result<(), GraphError> {
        let sizes = self.core.input_sizes();
        let mismatched = sizes
            .iter()
            .filter(|&&size| size != 1)
            .any(|&size| size != self.size);

        if mismatched {
            return Err(GraphError::MismatchedSizes {
                node: self.core.id().to_string(),
                sizes,
            });
        }
        Ok(())
    }

    async fn produce(self: Arc<Self>, engine: Engine) {
        let core = &self.core;
        let slots = core.inputs().len();
        let varying = self.varying_slots();

        // Row template: constants filled in, varying slots empty
        let mut template: Vec<Option<Payload>> = vec![None; slots];
        for slot in (0..slots).filter(|slot| !varying.contains(slot)) {
            let listener = core.listener(slot);
            match core.inputs()[slot].get(&listener).await {
                Some(item) => template[slot] = Some(item.value),
                None => {
                    UpstreamClosed {
                        node: core.id(),
                        listener: &listener,
                    }
                    .log();
                    return;
                }
            }
        }

        if varying.is_empty() {
            core.launch(&engine, 0, template.into_iter().flatten().collect());
            return;
        }

        let mut rows = vec![template; self.size];
        let mut filled = vec![0usize; self.size];
        let mut inbox = core.fan_in(&varying);

        for _ in 0..self.size * varying.len() {
            let Some((slot, item)) = inbox.recv().await else {
                return;
            };
            let Some(row) = rows.get_mut(item.number) else {
                ItemOutOfRange {
                    node: core.id(),
                    number: item.number,
                    size: self.size,
                }
                .log();
                continue;
            };

            row[slot] = Some(item.value);
            filled[item.number] += 1;
            if filled[item.number] == varying.len() {
                let args = row.iter_mut().filter_map(Option::take).collect();
                core.launch(&engine, item.number, args);
            }
        }
    }
}

#[async_trait]
impl Stream for Zip {
    fn outlet(&self) -> &Broadcast {
        self.core.outlet()
    }

    fn kind(&self) -> &'static str {
        "zip"
    }

    fn size(&self) -> usize {
        self.size
    }

    fn start(self: Arc<Self>, engine: &Engine) -> Result<(), GraphError> {
        self.check_sizes()?;
        let production = self.clone().produce(engine.clone());
        self.core.start(engine, self.kind(), self.size, production)
    }
}
