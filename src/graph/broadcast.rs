// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{mpsc, Mutex as AsyncMutex};

use super::IndexedItem;

/// The fan-out half of a stream: one private FIFO per listener.
///
/// Every `put` is broadcast to every FIFO; each listener sees items in put
/// order. FIFOs are unbounded, so producers never wait on slow consumers.
pub struct Broadcast {
    node: Arc<str>,
    listeners: Mutex<HashMap<String, Fifo>>,
    started: AtomicBool,
}

type Receiver = Arc<AsyncMutex<mpsc::UnboundedReceiver<IndexedItem>>>;

/// One listener's queue. `queued` is raised before a send and lowered after
/// a receive, so it never undercounts what is waiting.
struct Fifo {
    sender: mpsc::UnboundedSender<IndexedItem>,
    receiver: Receiver,
    queued: Arc<AtomicUsize>,
}

impl Fifo {
    fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            sender,
            receiver: Arc::new(AsyncMutex::new(receiver)),
            queued: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl Broadcast {
    pub fn new(node: Arc<str>) -> Self {
        Self {
            node,
            listeners: Mutex::new(HashMap::new()),
            started: AtomicBool::new(false),
        }
    }

    /// Id of the node owning this outlet
    pub fn node(&self) -> &str {
        &self.node
    }

    /// Add an empty FIFO for `listener`; registering twice keeps the first.
    pub fn register_listener(&self, listener: &str) {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(listener.to_string())
            .or_insert_with(Fifo::new);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn put(&self, item: IndexedItem) {
        let listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        for (listener, fifo) in listeners.iter() {
            fifo.queued.fetch_add(1, Ordering::SeqCst);
            if fifo.sender.send(item.clone()).is_err() {
                fifo.queued.fetch_sub(1, Ordering::SeqCst);
                tracing::debug!(node = %self.node, listener = %listener, "listener FIFO closed, item dropped");
            }
        }
    }

    /// Next item for `listener`. Waits until one arrives; returns `None` only
    /// if the listener was never registered.
    pub async fn get(&self, listener: &str) -> Option<IndexedItem> {
        let (receiver, queued) = self.queue(listener)?;
        let item = receiver.lock().await.recv().await;
        if item.is_some() {
            queued.fetch_sub(1, Ordering::SeqCst);
        }
        item
    }

    /// Whether `listener` has nothing queued right now
    pub fn empty(&self, listener: &str) -> bool {
        self.queue(listener)
            .map_or(true, |(_, queued)| queued.load(Ordering::SeqCst) == 0)
    }

    /// Claim the right to produce. True only for the first caller.
    pub(crate) fn mark_started(&self) -> bool {
        !self.started.swap(true, Ordering::SeqCst)
    }

    fn queue(&self, listener: &str) -> Option<(Receiver, Arc<AtomicUsize>)> {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(listener)
            .map(|fifo| (fifo.receiver.clone(), fifo.queued.clone()))
    }
}
