//! Ordering manager: pool lifecycle, pending queue and result drain.

use crate::state::{step, Directive, EngineState};
use crate::worker::{Worker, Workload};
use crate::{EngineConfig, EngineError, StreamEvent, Task};
use actors::{spawn, ActorContext, ActorError, ActorRef, Behavior};
use async_trait::async_trait;
use std::collections::VecDeque;
use tracing::{debug, info};

/// The single actor that owns all engine state.
///
/// At start it hands the first `pool_size` tasks to freshly spawned
/// [`Worker`]s, itself as the reply target. Every completion is folded
/// through the pure [`step`] transition; the manager then forwards the
/// drained values downstream, feeds the reporting worker its next task or
/// shuts it down, and emits one [`StreamEvent::Done`] when the drain
/// passes the final index. The pool only ever shrinks; no worker is
/// created after start.
///
/// A worker that never reports stalls the drain at its index forever;
/// there is no timeout or reassignment.
pub struct Manager {
    initial: Vec<Task>,
    state: Option<EngineState>,
    workload: Workload,
    downstream: ActorRef<StreamEvent>,
}

impl Manager {
    /// Start an engine over `values` and return the manager's reference.
    ///
    /// An empty batch spawns nothing: the downstream target receives a
    /// single failure envelope and the error is also returned here.
    pub fn spawn(
        values: Vec<i64>,
        config: EngineConfig,
        workload: Workload,
        downstream: ActorRef<StreamEvent>,
    ) -> Result<ActorRef<Task>, EngineError> {
        config.validate()?;

        if values.is_empty() {
            let err = EngineError::EmptyInput("task batch is empty".into());
            downstream.tell(StreamEvent::Failed(err.to_string()), None);
            return Err(err);
        }

        let tasks: Vec<Task> = values
            .iter()
            .enumerate()
            .map(|(index, &value)| Task::new(index as u64, value))
            .collect();
        let last_index = (tasks.len() - 1) as u64;
        let split = config.pool_size.min(tasks.len());
        let pending: VecDeque<Task> = tasks[split..].iter().copied().collect();

        info!(
            batch = tasks.len(),
            pool = split,
            "starting ordering engine"
        );

        Ok(spawn(
            "manager",
            Manager {
                initial: tasks[..split].to_vec(),
                state: Some(EngineState::new(pending, last_index)),
                workload,
                downstream,
            },
        ))
    }
}

#[async_trait]
impl Behavior<Task> for Manager {
    async fn on_start(&mut self, ctx: &mut ActorContext<Task>) -> Result<(), ActorError> {
        for task in self.initial.drain(..) {
            let worker = spawn(
                &format!("worker-{}", task.index),
                Worker::new(self.workload.clone()),
            );
            debug!(
                actor_id = %ctx.actor_id(),
                worker_id = %worker.id(),
                index = task.index,
                "initial assignment"
            );
            worker.tell(task, Some(ctx.self_ref()));
        }
        Ok(())
    }

    async fn receive(
        &mut self,
        ctx: &mut ActorContext<Task>,
        completed: Task,
        sender: Option<ActorRef<Task>>,
    ) -> Result<(), ActorError> {
        // completions arriving after the drain finished are ignored
        let Some(state) = self.state.take() else {
            return Ok(());
        };

        let outcome = step(state, completed);
        debug!(
            actor_id = %ctx.actor_id(),
            index = completed.index,
            emitted = outcome.emit.len(),
            buffered = outcome.state.buffered_len(),
            "completion folded"
        );

        for value in outcome.emit {
            self.downstream.tell(StreamEvent::Value(value), None);
        }

        if let Some(worker) = sender {
            match outcome.directive {
                Directive::Assign(task) => {
                    debug!(worker_id = %worker.id(), index = task.index, "reassigning worker");
                    worker.tell(task, Some(ctx.self_ref()));
                }
                Directive::Retire => {
                    debug!(worker_id = %worker.id(), "retiring worker");
                    worker.shutdown();
                }
            }
        }

        if outcome.finished {
            info!(actor_id = %ctx.actor_id(), "batch complete, emitting sentinel");
            self.downstream.tell(StreamEvent::Done, None);
            ctx.stop();
        } else {
            self.state = Some(outcome.state);
        }

        Ok(())
    }
}
