//! Two players volley a counter back and forth until it reaches 10,
//! then report to a referee.
//!
//! Run with `cargo run -p actors --example pingpong`.

use actors::{spawn, ActorContext, ActorError, ActorRef, Behavior};
use async_trait::async_trait;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

struct Referee {
    game_over: CancellationToken,
}

#[async_trait]
impl Behavior<u32> for Referee {
    async fn receive(
        &mut self,
        ctx: &mut ActorContext<u32>,
        shots: u32,
        _sender: Option<ActorRef<u32>>,
    ) -> Result<(), ActorError> {
        println!("Game ended after {shots} shots");
        self.game_over.cancel();
        ctx.stop();
        Ok(())
    }
}

struct Player {
    sound: &'static str,
    referee: ActorRef<u32>,
}

#[async_trait]
impl Behavior<u32> for Player {
    async fn receive(
        &mut self,
        ctx: &mut ActorContext<u32>,
        shot: u32,
        sender: Option<ActorRef<u32>>,
    ) -> Result<(), ActorError> {
        println!("{} {shot}", self.sound);
        tokio::time::sleep(Duration::from_millis(100)).await;
        match sender {
            Some(sender) if shot < 10 => sender.tell(shot + 1, Some(ctx.self_ref())),
            _ => self.referee.tell(shot, None),
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() {
    let game_over = CancellationToken::new();
    let referee = spawn(
        "referee",
        Referee {
            game_over: game_over.clone(),
        },
    );

    let player1 = spawn(
        "player-1",
        Player {
            sound: "Ping",
            referee: referee.clone(),
        },
    );
    let player2 = spawn(
        "player-2",
        Player {
            sound: "Pong",
            referee,
        },
    );

    player1.tell(1, Some(player2.clone()));
    game_over.cancelled().await;
}
