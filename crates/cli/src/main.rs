//! Demo driver: farm slow-fibonacci computations over a worker pool and
//! print the ordered results.

use actors::{spawn, ActorContext, ActorError, ActorRef, Behavior};
use anyhow::Result;
use async_trait::async_trait;
use clap::{Parser, ValueEnum};
use engine::{run_batch, EngineConfig, EngineError, Manager, StreamEvent, Workload};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "seqfarm")]
#[command(about = "Ordered task farming over an actor worker pool")]
#[command(version)]
struct Cli {
    /// Number of generated inputs
    #[arg(long, default_value_t = 20_000)]
    count: usize,

    /// Worker pool size
    #[arg(long, default_value_t = 6)]
    workers: usize,

    /// Delivery mode
    #[arg(long, value_enum, default_value = "stream")]
    mode: Mode,

    /// Seed for the generated batch
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    /// Values arrive downstream one by one, already ordered
    Stream,
    /// The full ordered sequence is delivered as a single envelope
    Bulk,
}

/// The deliberately naive exponential fibonacci from the original demo,
/// slow enough to keep the pool busy.
fn slow_fibonacci(n: i64) -> i64 {
    match n {
        0 | 1 => 1,
        _ => slow_fibonacci(n - 1) + slow_fibonacci(n - 2),
    }
}

fn preview(values: &[i64]) -> &[i64] {
    &values[..values.len().min(40)]
}

/// Streaming-mode client: buffers the ordered values and reports once
/// the sentinel arrives.
struct StreamClient {
    inputs: Vec<i64>,
    received: Vec<i64>,
    started: Instant,
    finished: CancellationToken,
}

#[async_trait]
impl Behavior<StreamEvent> for StreamClient {
    async fn receive(
        &mut self,
        ctx: &mut ActorContext<StreamEvent>,
        event: StreamEvent,
        _sender: Option<ActorRef<StreamEvent>>,
    ) -> Result<(), ActorError> {
        match event {
            StreamEvent::Value(value) => self.received.push(value),
            StreamEvent::Done => {
                println!(
                    "Total time: {:.3} sec",
                    self.started.elapsed().as_secs_f64()
                );
                println!("Input:  {:?}", preview(&self.inputs));
                println!("Result: {:?}", preview(&self.received));
                self.finished.cancel();
                ctx.stop();
            }
            StreamEvent::Failed(reason) => {
                eprintln!("{reason}");
                self.finished.cancel();
                ctx.stop();
            }
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let mut rng = StdRng::seed_from_u64(cli.seed);
    let inputs: Vec<i64> = (0..cli.count).map(|_| rng.gen_range(0..35)).collect();
    let workload: Workload = Arc::new(slow_fibonacci);
    let config = EngineConfig::with_pool_size(cli.workers);

    info!(count = cli.count, workers = cli.workers, mode = ?cli.mode, "starting demo");
    let started = Instant::now();

    match cli.mode {
        Mode::Stream => {
            let finished = CancellationToken::new();
            let client = spawn(
                "stream-client",
                StreamClient {
                    inputs: inputs.clone(),
                    received: Vec::new(),
                    started,
                    finished: finished.clone(),
                },
            );
            match Manager::spawn(inputs, config, workload, client) {
                // empty input: the failure envelope reaches the client,
                // which reports it and releases the token
                Ok(_) | Err(EngineError::EmptyInput(_)) => finished.cancelled().await,
                Err(err) => eprintln!("{err}"),
            }
        }
        Mode::Bulk => match run_batch(inputs.clone(), config, workload).await {
            Ok(results) => {
                println!(
                    "Total time: {:.3} sec",
                    started.elapsed().as_secs_f64()
                );
                println!("Input:  {:?}", preview(&inputs));
                println!("Result: {:?}", preview(&results));
            }
            Err(err) => eprintln!("{err}"),
        },
    }

    Ok(())
}
