// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Task descriptors: the only thing that crosses the execution boundary.
//!
//! A task is a node id, a result position, a named work function and an owned
//! argument bundle. Pooled execution never shares anything else with the
//! worker; the bundle is marshalled to bytes on the submitting side and
//! rebuilt on the worker.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::errors::{Failure, WorkError};
use crate::graph::{Payload, Value};
use crate::traits::Work;

/// How a task wants to be executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecMode {
    /// Use the engine's worker pool when one is configured
    #[default]
    Pooled,
    /// Run synchronously in the calling task
    Local,
    /// Marshal and unmarshal the arguments, then run synchronously
    Debug,
}

#[derive(Debug)]
pub struct Task {
    node: Arc<str>,
    position: usize,
    work: Work,
    args: Vec<Value>,
}

impl Task {
    pub fn new(node: Arc<str>, position: usize, work: Work, args: Vec<Value>) -> Self {
        Self {
            node,
            position,
            work,
            args,
        }
    }

    pub fn node(&self) -> &str {
        &self.node
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn mode(&self) -> ExecMode {
        self.work.mode()
    }

    /// Evaluate the work function, capturing errors and panics as failures.
    pub fn execute(self) -> Payload {
        let Task {
            node,
            position,
            work,
            args,
        } = self;

        match panic::catch_unwind(AssertUnwindSafe(|| work.call(args))) {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(error)) => Err(Failure::capture(&node, position, error)),
            Err(panic) => {
                let error = WorkError::Panicked {
                    message: panic_message(panic.as_ref()),
                };
                Err(Failure::capture(&node, position, error.into()))
            }
        }
    }

    /// Serialize the argument bundle for hand-off to a worker.
    pub fn marshal(self) -> Result<MarshalledTask, Failure> {
        match serde_json::to_vec(&self.args) {
            Ok(bundle) => Ok(MarshalledTask {
                node: self.node,
                position: self.position,
                work: self.work,
                bundle,
            }),
            Err(source) => Err(marshal_failure(&self.node, self.position, source)),
        }
    }
}

/// A task whose arguments have been reduced to an owned byte bundle
#[derive(Debug)]
pub struct MarshalledTask {
    node: Arc<str>,
    position: usize,
    work: Work,
    bundle: Vec<u8>,
}

impl MarshalledTask {
    pub fn node(&self) -> &str {
        &self.node
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Rebuild the task from its bundle on the executing side.
    pub fn unmarshal(self) -> Result<Task, Failure> {
        match serde_json::from_slice::<Vec<Value>>(&self.bundle) {
            Ok(args) => Ok(Task::new(self.node, self.position, self.work, args)),
            Err(source) => Err(marshal_failure(&self.node, self.position, source)),
        }
    }
}

fn marshal_failure(node: &str, position: usize, source: serde_json::Error) -> Failure {
    let error = WorkError::Marshal {
        node: node.to_string(),
        source,
    };
    Failure::capture(node, position, error.into())
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
