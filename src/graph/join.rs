// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Cross-product combination of streams.
//!
//! Every combination of one item per input is computed once. Output
//! positions use mixed-radix numbering over the input sizes, so for inputs
//! of sizes `[2, 3]` the tuple `(i, j)` lands at `i * 3 + j` no matter in
//! which order the items arrived.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;

use super::computation::{Arity, Computation};
use super::{Broadcast, Input, Payload};
use crate::engine::Engine;
use crate::errors::GraphError;
use crate::observability::messages::graph::ItemOutOfRange;
use crate::observability::messages::StructuredLog;
use crate::traits::{Stream, Work};

pub struct Join {
    core: Computation,
    sizes: Vec<usize>,
    size: usize,
}

impl Join {
    pub fn new(work: Work, inputs: Vec<Input>) -> Result<Arc<Self>, GraphError> {
        let core = Computation::new(work, inputs, Arity::AtLeastOne)?;
        let sizes = core.input_sizes();
        let size = sizes.iter().product();

        Ok(Arc::new(Self { core, sizes, size }))
    }

    async fn produce(self: Arc<Self>, engine: Engine) {
        let core = &self.core;
        let slots: Vec<usize> = (0..self.sizes.len()).collect();
        let mut seen: Vec<Vec<(usize, Payload)>> = vec![Vec::new(); slots.len()];
        let mut launched: HashSet<Vec<usize>> = HashSet::new();
        let mut inbox = core.fan_in(&slots);

        for _ in 0..self.sizes.iter().sum::<usize>() {
            let Some((slot, item)) = inbox.recv().await else {
                return;
            };
            if item.number >= self.sizes[slot] {
                ItemOutOfRange {
                    node: core.id(),
                    number: item.number,
                    size: self.sizes[slot],
                }
                .log();
                continue;
            }
            seen[slot].push((item.number, item.value));

            let lengths: Vec<usize> = seen.iter().map(Vec::len).collect();
            for picks in completable(&lengths, slot) {
                let tuple: Vec<usize> = picks
                    .iter()
                    .enumerate()
                    .map(|(s, &pick)| seen[s][pick].0)
                    .collect();
                let number = mixed_radix(&tuple, &self.sizes);
                if !launched.insert(tuple) {
                    continue;
                }

                let args = picks
                    .iter()
                    .enumerate()
                    .map(|(s, &pick)| seen[s][pick].1.clone())
                    .collect();
                core.launch(&engine, number, args);
            }
        }
    }
}

/// Every pick of one seen item per slot that uses the newest item on `fresh`.
///
/// `lengths[s]` is how many items slot `s` has seen; picks index into those.
fn completable(lengths: &[usize], fresh: usize) -> Vec<Vec<usize>> {
    let mut picks = vec![Vec::with_capacity(lengths.len())];

    for (slot, &len) in lengths.iter().enumerate() {
        let choices: Vec<usize> = if slot == fresh {
            vec![len - 1]
        } else {
            (0..len).collect()
        };

        picks = picks
            .into_iter()
            .flat_map(|prefix| {
                choices.iter().map(move |&choice| {
                    let mut next = prefix.clone();
                    next.push(choice);
                    next
                })
            })
            .collect();
    }

    picks
}

/// `((i0 * size1 + i1) * size2 + i2) ...`
fn mixed_radix(tuple: &[usize], sizes: &[usize]) -> usize {
    tuple
        .iter()
        .zip(sizes)
        .fold(0, |number, (&index, &size)| number * size + index)
}

#[async_trait]
impl Stream for Join {
    fn outlet(&self) -> &Broadcast {
        self.core.outlet()
    }

    fn kind(&self) -> &'static str {
        "join"
    }

    fn size(&self) -> usize {
        self.size
    }

    fn start(self: Arc<Self>, engine: &Engine) -> Result<(), GraphError> {
        let production = self.clone().produce(engine.clone());
        self.core.start(engine, self.kind(), self.size, production)
    }
}
