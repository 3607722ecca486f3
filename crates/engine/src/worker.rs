//! Stateless worker actor: one computation per message.

use crate::Task;
use actors::{ActorContext, ActorError, ActorRef, Behavior};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// The user-supplied computation applied to each task payload.
///
/// A panic inside the workload is a fatal fault for the worker running
/// it; the drain then stalls at that worker's index.
pub type Workload = Arc<dyn Fn(i64) -> i64 + Send + Sync>;

/// Applies the workload to an assigned [`Task`] and replies to the
/// sender with a task carrying the same index and the computed value.
/// Assignments without a reply target are consumed without effect.
pub struct Worker {
    workload: Workload,
}

impl Worker {
    pub fn new(workload: Workload) -> Self {
        Self { workload }
    }
}

#[async_trait]
impl Behavior<Task> for Worker {
    async fn receive(
        &mut self,
        ctx: &mut ActorContext<Task>,
        task: Task,
        sender: Option<ActorRef<Task>>,
    ) -> Result<(), ActorError> {
        let Some(sender) = sender else {
            return Ok(());
        };
        let result = (self.workload)(task.value);
        debug!(actor_id = %ctx.actor_id(), index = task.index, "task computed");
        sender.tell(Task::new(task.index, result), Some(ctx.self_ref()));
        Ok(())
    }
}
