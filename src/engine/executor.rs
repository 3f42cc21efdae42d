// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The execution boundary.
//!
//! `Engine` decides where a task runs: inline in the calling task, or on a
//! bounded pool of blocking worker threads. Whatever happens inside the work
//! function (a returned error, a panic, a marshalling problem, a lost
//! worker) comes back through the callback as a `Failure`, so a worker never
//! takes the pipeline down and no failure is dropped.
//!
//! The pool is an explicit handle. Nothing is global: graphs receive the
//! engine when they are started.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use pacer::engine::{Engine, Task};
//! use pacer::traits::Work;
//! use serde_json::json;
//!
//! let engine = Engine::local();
//! let work = Work::new("double", |args| Ok(json!(args[0].as_i64().unwrap_or(0) * 2)));
//! let seen = Arc::new(Mutex::new(None));
//! let slot = seen.clone();
//!
//! engine.run(Task::new(Arc::from("double#1"), 0, work, vec![json!(21)]), move |payload| {
//!     *slot.lock().unwrap() = Some(payload.unwrap());
//! });
//!
//! // Local execution has already called back by the time `run` returns
//! assert_eq!(*seen.lock().unwrap(), Some(json!(42)));
//! ```

use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::Semaphore;
use tracing::Span;

use crate::config::PoolSize;
use crate::errors::{Failure, WorkError};
use crate::graph::Payload;
use crate::observability::messages::engine::{
    EngineConfigured, PoolUnavailable, TaskFailed, TaskSubmitted,
};
use crate::observability::messages::StructuredLog;

use super::task::{ExecMode, MarshalledTask, Task};

/// Execution handle shared by every node of a graph run.
///
/// Cloning is cheap and clones share one pool.
#[derive(Clone, Debug)]
pub struct Engine {
    pool: Option<Arc<Semaphore>>,
    workers: usize,
}

impl Engine {
    /// Create an engine with the given pool capacity
    pub fn new(pool: PoolSize) -> Self {
        let workers = pool.resolve();
        EngineConfigured {
            requested: &pool.to_string(),
            workers,
        }
        .log();

        Self {
            pool: (workers > 0).then(|| Arc::new(Semaphore::new(workers))),
            workers,
        }
    }

    /// An engine without a pool; every task runs synchronously
    pub fn local() -> Self {
        Self::new(PoolSize::Disabled)
    }

    /// An engine with exactly `workers` pooled workers (0 disables the pool)
    pub fn with_workers(workers: usize) -> Self {
        Self::new(PoolSize::Workers(workers))
    }

    /// Number of pooled workers; 0 means everything runs inline
    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn is_pooled(&self) -> bool {
        self.pool.is_some()
    }

    /// Run `task` and hand its outcome to `callback`.
    ///
    /// Local and debug tasks, and every task on an engine without a pool,
    /// complete and call back before this returns. Pooled tasks call back
    /// later from whichever worker finishes them; there is no ordering
    /// between outstanding submissions.
    pub fn run<C>(&self, task: Task, callback: C)
    where
        C: FnOnce(Payload) + Send + 'static,
    {
        let mode = task.mode();
        let span = {
            let submitted = TaskSubmitted {
                node: task.node(),
                position: task.position(),
                mode,
            };
            submitted.log();
            submitted.span("run")
        };

        match mode {
            ExecMode::Debug => span.in_scope(|| {
                let payload = task
                    .marshal()
                    .and_then(MarshalledTask::unmarshal)
                    .and_then(Task::execute);
                deliver(payload, callback);
            }),
            ExecMode::Local => span.in_scope(|| deliver(task.execute(), callback)),
            ExecMode::Pooled => match (&self.pool, Handle::try_current()) {
                (Some(pool), Ok(handle)) => Self::submit(&handle, pool.clone(), task, span, callback),
                (Some(_), Err(_)) => span.in_scope(|| {
                    PoolUnavailable { node: task.node() }.log();
                    deliver(task.execute(), callback);
                }),
                (None, _) => span.in_scope(|| deliver(task.execute(), callback)),
            },
        }
    }

    fn submit<C>(handle: &Handle, pool: Arc<Semaphore>, task: Task, span: Span, callback: C)
    where
        C: FnOnce(Payload) + Send + 'static,
    {
        let marshalled = match task.marshal() {
            Ok(marshalled) => marshalled,
            Err(failure) => return deliver(Err(failure), callback),
        };
        let node = marshalled.node().to_string();
        let position = marshalled.position();

        handle.spawn(async move {
            let permit = match pool.acquire_owned().await {
                Ok(permit) => permit,
                Err(closed) => {
                    let error = WorkError::WorkerLost {
                        node: node.clone(),
                        reason: closed.to_string(),
                    };
                    deliver(Err(Failure::capture(&node, position, error.into())), callback);
                    return;
                }
            };

            let outcome = tokio::task::spawn_blocking(move || {
                let _permit = permit;
                span.in_scope(|| marshalled.unmarshal().and_then(Task::execute))
            })
            .await;

            let payload = outcome.unwrap_or_else(|join_error| {
                let error = WorkError::WorkerLost {
                    node: node.clone(),
                    reason: join_error.to_string(),
                };
                Err(Failure::capture(&node, position, error.into()))
            });
            deliver(payload, callback);
        });
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::local()
    }
}

fn deliver<C>(payload: Payload, callback: C)
where
    C: FnOnce(Payload),
{
    if let Err(failure) = &payload {
        TaskFailed { failure }.log();
    }
    callback(payload);
}
