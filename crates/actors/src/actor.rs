//! Actor references, behaviors and the per-actor run loop.

use crate::{ActorError, ActorId};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error};

enum Envelope<M> {
    User { msg: M, sender: Option<ActorRef<M>> },
    Stop,
}

/// Handle for communicating with an actor. Cloning is cheap; all clones
/// feed the same mailbox.
pub struct ActorRef<M> {
    id: ActorId,
    name: Arc<str>,
    tx: mpsc::UnboundedSender<Envelope<M>>,
}

impl<M> Clone for ActorRef<M> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            name: Arc::clone(&self.name),
            tx: self.tx.clone(),
        }
    }
}

impl<M> std::fmt::Debug for ActorRef<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActorRef")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}

impl<M: Send + 'static> ActorRef<M> {
    /// Enqueue `msg` on the actor's mailbox and return immediately.
    ///
    /// Messages from one sender arrive in send order; there is no
    /// ordering guarantee across distinct senders. Sending to a stopped
    /// actor is a dead letter: the message is dropped silently.
    pub fn tell(&self, msg: M, sender: Option<ActorRef<M>>) {
        if self.tx.send(Envelope::User { msg, sender }).is_err() {
            debug!(actor_id = %self.id, actor = %self.name, "dead letter, message dropped");
        }
    }

    /// Stop the actor once messages queued ahead of this signal have been
    /// handled. Anything sent afterward is dead-lettered.
    pub fn shutdown(&self) {
        if self.tx.send(Envelope::Stop).is_err() {
            debug!(actor_id = %self.id, actor = %self.name, "shutdown of stopped actor ignored");
        }
    }

    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// The active message handler of an actor.
///
/// `receive` is invoked for exactly one message at a time. Returning an
/// error is a fatal fault: the runtime logs it and halts the actor, with
/// no restart.
#[async_trait]
pub trait Behavior<M>: Send + 'static
where
    M: Send + 'static,
{
    /// Runs once, before the first message is dequeued.
    async fn on_start(&mut self, _ctx: &mut ActorContext<M>) -> Result<(), ActorError> {
        Ok(())
    }

    async fn receive(
        &mut self,
        ctx: &mut ActorContext<M>,
        msg: M,
        sender: Option<ActorRef<M>>,
    ) -> Result<(), ActorError>;
}

/// Runtime context handed to every handler invocation.
pub struct ActorContext<M> {
    self_ref: ActorRef<M>,
    next_behavior: Option<Box<dyn Behavior<M>>>,
    stopping: bool,
}

impl<M: Send + 'static> ActorContext<M> {
    /// This actor's own reference, for use as a reply target.
    pub fn self_ref(&self) -> ActorRef<M> {
        self.self_ref.clone()
    }

    pub fn actor_id(&self) -> ActorId {
        self.self_ref.id
    }

    /// Replace the active behavior, effective from the next dequeued
    /// message. Safe to call from within a handler; calling it twice
    /// before the current handler returns keeps the last behavior.
    pub fn become_next(&mut self, behavior: impl Behavior<M>) {
        self.next_behavior = Some(Box::new(behavior));
    }

    /// Stop this actor after the current handler returns.
    pub fn stop(&mut self) {
        self.stopping = true;
    }
}

/// Spawn an actor with `behavior` as its initial handler.
///
/// The returned reference is live immediately; messages sent before
/// `on_start` finishes are queued and handled afterwards.
pub fn spawn<M, B>(name: &str, behavior: B) -> ActorRef<M>
where
    M: Send + 'static,
    B: Behavior<M>,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let actor_ref = ActorRef {
        id: ActorId::new(),
        name: Arc::from(name),
        tx,
    };
    tokio::spawn(run(actor_ref.clone(), Box::new(behavior), rx));
    actor_ref
}

async fn run<M: Send + 'static>(
    self_ref: ActorRef<M>,
    mut behavior: Box<dyn Behavior<M>>,
    mut rx: mpsc::UnboundedReceiver<Envelope<M>>,
) {
    let actor_id = self_ref.id;
    let name = Arc::clone(&self_ref.name);
    let mut ctx = ActorContext {
        self_ref,
        next_behavior: None,
        stopping: false,
    };

    debug!(actor_id = %actor_id, actor = %name, "actor started");

    if let Err(e) = behavior.on_start(&mut ctx).await {
        error!(actor_id = %actor_id, actor = %name, error = %e, "actor startup failed");
        return;
    }
    if let Some(next) = ctx.next_behavior.take() {
        behavior = next;
    }

    while !ctx.stopping {
        let Some(envelope) = rx.recv().await else {
            break;
        };
        match envelope {
            Envelope::Stop => break,
            Envelope::User { msg, sender } => {
                if let Err(e) = behavior.receive(&mut ctx, msg, sender).await {
                    error!(actor_id = %actor_id, actor = %name, error = %e, "handler fault, actor halted");
                    return;
                }
                if let Some(next) = ctx.next_behavior.take() {
                    behavior = next;
                }
            }
        }
    }

    debug!(actor_id = %actor_id, actor = %name, "actor stopped");
}
