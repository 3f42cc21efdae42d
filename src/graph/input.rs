use std::sync::Arc;

use super::{Source, Value};
use crate::traits::Stream;

/// Something a computation can consume.
///
/// Existing streams are used as-is; plain data is turned into a [`Source`]
/// by [`as_stream`] once, when the consuming node is built.
pub enum Input {
    Stream(Arc<dyn Stream>),
    /// Becomes a source emitting each element
    Collection(Vec<Value>),
    /// Becomes a one-element source, i.e. a constant broadcast in a zip
    Scalar(Value),
}

impl Input {
    pub fn scalar(value: impl Into<Value>) -> Self {
        Input::Scalar(value.into())
    }

    pub fn collection<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Input::Collection(values.into_iter().map(Into::into).collect())
    }
}

impl<S: Stream + 'static> From<Arc<S>> for Input {
    fn from(stream: Arc<S>) -> Self {
        Input::Stream(stream)
    }
}

impl From<Arc<dyn Stream>> for Input {
    fn from(stream: Arc<dyn Stream>) -> Self {
        Input::Stream(stream)
    }
}

impl From<Vec<Value>> for Input {
    fn from(values: Vec<Value>) -> Self {
        Input::Collection(values)
    }
}

/// Turn an input into the stream a node will listen to.
pub fn as_stream(input: Input) -> Arc<dyn Stream> {
    match input {
        Input::Stream(stream) => stream,
        Input::Collection(values) => Source::new(values),
        Input::Scalar(value) => Source::new(vec![value]),
    }
}
