//! Bulk delivery: fold the ordered stream into one result envelope.

use crate::worker::Workload;
use crate::{BatchResult, EngineConfig, EngineError, Manager, StreamEvent};
use actors::{spawn, ActorContext, ActorError, ActorRef, Behavior};
use async_trait::async_trait;
use tokio::sync::oneshot;
use tracing::debug;

/// Downstream receiver that accumulates streamed values and delivers the
/// complete ordered sequence to its client as a single [`BatchResult`]
/// once the sentinel arrives.
pub struct Collector {
    client: ActorRef<BatchResult>,
    values: Vec<i64>,
}

impl Collector {
    pub fn new(client: ActorRef<BatchResult>) -> Self {
        Self {
            client,
            values: Vec::new(),
        }
    }
}

#[async_trait]
impl Behavior<StreamEvent> for Collector {
    async fn receive(
        &mut self,
        ctx: &mut ActorContext<StreamEvent>,
        event: StreamEvent,
        _sender: Option<ActorRef<StreamEvent>>,
    ) -> Result<(), ActorError> {
        match event {
            StreamEvent::Value(value) => self.values.push(value),
            StreamEvent::Done => {
                debug!(actor_id = %ctx.actor_id(), collected = self.values.len(), "stream complete");
                self.client.tell(Ok(std::mem::take(&mut self.values)), None);
                ctx.stop();
            }
            StreamEvent::Failed(reason) => {
                self.client.tell(Err(EngineError::EmptyInput(reason)), None);
                ctx.stop();
            }
        }
        Ok(())
    }
}

/// Relays the one envelope it receives into a oneshot for a waiting
/// caller, then stops.
struct OneshotClient {
    tx: Option<oneshot::Sender<BatchResult>>,
}

#[async_trait]
impl Behavior<BatchResult> for OneshotClient {
    async fn receive(
        &mut self,
        ctx: &mut ActorContext<BatchResult>,
        envelope: BatchResult,
        _sender: Option<ActorRef<BatchResult>>,
    ) -> Result<(), ActorError> {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(envelope);
        }
        ctx.stop();
        Ok(())
    }
}

/// Run a whole batch in bulk mode and await the ordered envelope.
///
/// Blocks (asynchronously) until every task has completed; a stalled
/// worker therefore stalls this future too.
pub async fn run_batch(
    values: Vec<i64>,
    config: EngineConfig,
    workload: Workload,
) -> BatchResult {
    let (tx, rx) = oneshot::channel();
    let client = spawn("batch-client", OneshotClient { tx: Some(tx) });
    let collector = spawn("collector", Collector::new(client));

    if let Err(err) = Manager::spawn(values, config, workload, collector) {
        match err {
            // the failure envelope is already on its way to the client
            EngineError::EmptyInput(_) => {}
            other => return Err(other),
        }
    }

    rx.await.unwrap_or(Err(EngineError::Aborted))
}
