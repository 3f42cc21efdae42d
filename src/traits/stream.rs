use async_trait::async_trait;
use std::sync::Arc;

use crate::engine::Engine;
use crate::errors::GraphError;
use crate::graph::{Broadcast, IndexedItem};

/// A node that produces a fixed number of indexed items and fans them out to
/// every registered listener.
///
/// Listeners must be registered at graph-build time, before `start`; items put
/// before a listener registers are never seen by it.
#[async_trait]
pub trait Stream: Send + Sync {
    /// The per-listener FIFOs this node broadcasts into
    fn outlet(&self) -> &Broadcast;

    /// Short node kind used in logs ("source", "zip", ...)
    fn kind(&self) -> &'static str;

    /// Total number of items this node will emit; fixed at construction
    fn size(&self) -> usize;

    /// Start every upstream node, then begin local production.
    ///
    /// Production happens once per node; starting an already started node
    /// (e.g. a source shared by two branches) is a no-op.
    fn start(self: Arc<Self>, engine: &Engine) -> Result<(), GraphError>;

    fn id(&self) -> &str {
        self.outlet().node()
    }

    fn register_listener(&self, listener: &str) {
        self.outlet().register_listener(listener);
    }

    fn put(&self, item: IndexedItem) {
        self.outlet().put(item);
    }

    /// Next item for `listener`, waiting until one is available
    async fn get(&self, listener: &str) -> Option<IndexedItem> {
        self.outlet().get(listener).await
    }

    fn empty(&self, listener: &str) -> bool {
        self.outlet().empty(listener)
    }
}
