use std::fmt;
use std::sync::Arc;

use crate::engine::ExecMode;
use crate::graph::Value;

/// A unit of user computation: owned arguments in, one value out.
pub trait WorkFn: Send + Sync {
    fn call(&self, args: Vec<Value>) -> anyhow::Result<Value>;
}

impl<F> WorkFn for F
where
    F: Fn(Vec<Value>) -> anyhow::Result<Value> + Send + Sync,
{
    fn call(&self, args: Vec<Value>) -> anyhow::Result<Value> {
        self(args)
    }
}

/// A named work function plus the execution mode its tasks request.
///
/// The name becomes the label of every node built from it and shows up in
/// logs and failure envelopes.
#[derive(Clone)]
pub struct Work {
    name: Arc<str>,
    func: Arc<dyn WorkFn>,
    mode: ExecMode,
}

impl Work {
    pub fn new<F>(name: &str, func: F) -> Self
    where
        F: Fn(Vec<Value>) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Self::with_fn(name, func)
    }

    /// Build from any `WorkFn` implementor, e.g. a struct carrying parameters
    pub fn with_fn<W>(name: &str, func: W) -> Self
    where
        W: WorkFn + 'static,
    {
        Self {
            name: Arc::from(name),
            func: Arc::new(func),
            mode: ExecMode::Pooled,
        }
    }

    /// Always run this work in the calling task, even when a pool exists
    pub fn local(mut self) -> Self {
        self.mode = ExecMode::Local;
        self
    }

    /// Round-trip arguments through the marshalling path, then run inline
    pub fn debug(mut self) -> Self {
        self.mode = ExecMode::Debug;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> ExecMode {
        self.mode
    }

    pub fn call(&self, args: Vec<Value>) -> anyhow::Result<Value> {
        self.func.call(args)
    }
}

impl fmt::Debug for Work {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Work")
            .field("name", &self.name)
            .field("mode", &self.mode)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_closure_work_is_callable() {
        let offset = 10;
        let work = Work::new("add_offset", move |args| {
            let x = args[0].as_i64().unwrap_or_default();
            Ok(json!(x + offset))
        });

        assert_eq!(work.call(vec![json!(5)]).unwrap(), json!(15));
        assert_eq!(work.name(), "add_offset");
        assert_eq!(work.mode(), ExecMode::Pooled);
    }

    struct Scale(i64);

    impl WorkFn for Scale {
        fn call(&self, args: Vec<Value>) -> anyhow::Result<Value> {
            let x = args[0]
                .as_i64()
                .ok_or_else(|| anyhow::anyhow!("not an integer: {}", args[0]))?;
            Ok(json!(x * self.0))
        }
    }

    #[test]
    fn test_struct_work_fn() {
        let work = Work::with_fn("scale", Scale(3));
        assert_eq!(work.call(vec![json!(4)]).unwrap(), json!(12));
        assert!(work.call(vec![json!("x")]).is_err());
    }

    #[test]
    fn test_mode_markers() {
        let work = Work::new("noop", |_| Ok(Value::Null));
        assert_eq!(work.clone().local().mode(), ExecMode::Local);
        assert_eq!(work.debug().mode(), ExecMode::Debug);
    }
}
