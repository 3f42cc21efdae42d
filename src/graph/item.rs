use crate::errors::Failure;

/// Opaque payload carried between nodes
pub type Value = serde_json::Value;

/// Either an ordinary value or a captured failure
pub type Payload = Result<Value, Failure>;

/// A payload tagged with its logical position in the producing stream.
#[derive(Debug, Clone)]
pub struct IndexedItem {
    pub number: usize,
    pub value: Payload,
}

impl IndexedItem {
    pub fn new(number: usize, value: Payload) -> Self {
        Self { number, value }
    }

    pub fn is_failure(&self) -> bool {
        self.value.is_err()
    }
}
