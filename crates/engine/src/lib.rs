//! Ordered task-distribution engine
//!
//! Farms a batch of independent computations out to a bounded pool of
//! worker actors and re-emits the results downstream in original
//! submission order, even though workers finish out of order.
//!
//! The reordering lives in a pure transition function ([`state::step`])
//! over an immutable [`state::EngineState`]; the [`Manager`] actor only
//! applies the effects that `step` computes. Results wait in a persistent
//! heap ordered by task index until the next expected index arrives, then
//! the longest contiguous prefix is drained downstream.
//!
//! Two delivery modes:
//! - streaming: individual [`StreamEvent::Value`]s terminated by one
//!   [`StreamEvent::Done`] sentinel;
//! - bulk: a [`Collector`] actor folds the stream into a single
//!   [`BatchResult`] envelope ([`run_batch`] wires this up).

pub mod collector;
pub mod manager;
pub mod message;
pub mod state;
pub mod task;
pub mod worker;

pub use collector::{run_batch, Collector};
pub use manager::Manager;
pub use message::{BatchResult, StreamEvent};
pub use task::Task;
pub use worker::{Worker, Workload};

/// Engine construction parameters.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Number of workers spawned at start. A hard ceiling on concurrent
    /// in-flight computations for the lifetime of the engine.
    pub pool_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { pool_size: 4 }
    }
}

impl EngineConfig {
    pub fn with_pool_size(pool_size: usize) -> Self {
        Self { pool_size }
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.pool_size == 0 {
            return Err(EngineError::InvalidPoolSize(self.pool_size));
        }
        Ok(())
    }
}

/// Engine errors. `EmptyInput` is the only user-facing recoverable
/// condition; it is also delivered downstream as a failure envelope.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("cannot start engine: {0}")]
    EmptyInput(String),

    #[error("pool size must be at least 1, got {0}")]
    InvalidPoolSize(usize),

    #[error("engine terminated without delivering a result")]
    Aborted,
}
