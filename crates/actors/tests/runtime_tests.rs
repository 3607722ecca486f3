//! Runtime behavior tests: mailbox ordering, behavior swaps, dead
//! letters and fatal handler faults.

use actors::{spawn, ActorContext, ActorError, ActorRef, Behavior};
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Forwards every message to a probe channel owned by the test.
struct Recorder {
    probe: mpsc::UnboundedSender<u32>,
}

#[async_trait]
impl Behavior<u32> for Recorder {
    async fn receive(
        &mut self,
        _ctx: &mut ActorContext<u32>,
        msg: u32,
        _sender: Option<ActorRef<u32>>,
    ) -> Result<(), ActorError> {
        let _ = self.probe.send(msg);
        Ok(())
    }
}

#[tokio::test]
async fn mailbox_preserves_per_sender_order() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let actor = spawn("recorder", Recorder { probe: tx });

    for i in 0..200u32 {
        actor.tell(i, None);
    }

    for expected in 0..200u32 {
        assert_eq!(rx.recv().await, Some(expected));
    }
}

struct Doubler {
    probe: mpsc::UnboundedSender<u32>,
    /// Number of swap requests issued per swap trigger.
    swaps_per_trigger: u32,
}

struct Tripler {
    probe: mpsc::UnboundedSender<u32>,
}

#[async_trait]
impl Behavior<u32> for Doubler {
    async fn receive(
        &mut self,
        ctx: &mut ActorContext<u32>,
        msg: u32,
        _sender: Option<ActorRef<u32>>,
    ) -> Result<(), ActorError> {
        if msg == 0 {
            for _ in 0..self.swaps_per_trigger {
                ctx.become_next(Tripler {
                    probe: self.probe.clone(),
                });
            }
        } else {
            let _ = self.probe.send(msg * 2);
        }
        Ok(())
    }
}

#[async_trait]
impl Behavior<u32> for Tripler {
    async fn receive(
        &mut self,
        _ctx: &mut ActorContext<u32>,
        msg: u32,
        _sender: Option<ActorRef<u32>>,
    ) -> Result<(), ActorError> {
        let _ = self.probe.send(msg * 3);
        Ok(())
    }
}

#[tokio::test]
async fn become_swaps_from_the_next_message() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let actor = spawn(
        "swapper",
        Doubler {
            probe: tx,
            swaps_per_trigger: 1,
        },
    );

    actor.tell(5, None);
    actor.tell(0, None); // triggers the swap
    actor.tell(5, None);

    assert_eq!(rx.recv().await, Some(10));
    assert_eq!(rx.recv().await, Some(15));
}

#[tokio::test]
async fn become_twice_with_same_behavior_is_idempotent() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let actor = spawn(
        "swapper",
        Doubler {
            probe: tx,
            swaps_per_trigger: 2,
        },
    );

    actor.tell(0, None);
    actor.tell(5, None);
    actor.tell(7, None);

    assert_eq!(rx.recv().await, Some(15));
    assert_eq!(rx.recv().await, Some(21));
}

#[tokio::test]
async fn shutdown_drops_later_messages_silently() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let actor = spawn("recorder", Recorder { probe: tx });

    actor.tell(1, None);
    actor.shutdown();
    actor.tell(2, None);
    actor.tell(3, None);

    assert_eq!(rx.recv().await, Some(1));
    // actor stopped: its probe sender is dropped, nothing else arrives
    assert_eq!(rx.recv().await, None);
}

/// Replies to the sender with `msg + 1`, using its own ref as sender.
struct Incrementer;

#[async_trait]
impl Behavior<u32> for Incrementer {
    async fn receive(
        &mut self,
        ctx: &mut ActorContext<u32>,
        msg: u32,
        sender: Option<ActorRef<u32>>,
    ) -> Result<(), ActorError> {
        if let Some(sender) = sender {
            sender.tell(msg + 1, Some(ctx.self_ref()));
        }
        Ok(())
    }
}

#[tokio::test]
async fn reply_goes_to_the_sender_ref() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let client = spawn("client", Recorder { probe: tx });
    let service = spawn("incrementer", Incrementer);

    service.tell(41, Some(client.clone()));
    assert_eq!(rx.recv().await, Some(42));

    // a message without a reply target is simply consumed
    service.tell(1, None);
    client.tell(7, None);
    assert_eq!(rx.recv().await, Some(7));
}

struct Faulty {
    probe: mpsc::UnboundedSender<u32>,
}

#[async_trait]
impl Behavior<u32> for Faulty {
    async fn receive(
        &mut self,
        ctx: &mut ActorContext<u32>,
        msg: u32,
        _sender: Option<ActorRef<u32>>,
    ) -> Result<(), ActorError> {
        if msg == 13 {
            return Err(ActorError::HandlerFault(
                ctx.actor_id(),
                "unlucky message".into(),
            ));
        }
        let _ = self.probe.send(msg);
        Ok(())
    }
}

#[tokio::test]
async fn handler_fault_halts_the_actor() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let actor = spawn("faulty", Faulty { probe: tx });

    actor.tell(1, None);
    actor.tell(13, None);
    actor.tell(2, None);

    assert_eq!(rx.recv().await, Some(1));
    // halted on the fault; the queued message is never handled
    assert_eq!(rx.recv().await, None);
}

struct StopsOnStart {
    probe: mpsc::UnboundedSender<u32>,
}

#[async_trait]
impl Behavior<u32> for StopsOnStart {
    async fn on_start(&mut self, ctx: &mut ActorContext<u32>) -> Result<(), ActorError> {
        let _ = self.probe.send(99);
        ctx.stop();
        Ok(())
    }

    async fn receive(
        &mut self,
        _ctx: &mut ActorContext<u32>,
        msg: u32,
        _sender: Option<ActorRef<u32>>,
    ) -> Result<(), ActorError> {
        let _ = self.probe.send(msg);
        Ok(())
    }
}

#[tokio::test]
async fn stop_during_start_prevents_any_message_handling() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let actor = spawn("short-lived", StopsOnStart { probe: tx });

    actor.tell(1, None);

    assert_eq!(rx.recv().await, Some(99));
    assert_eq!(rx.recv().await, None);
}
