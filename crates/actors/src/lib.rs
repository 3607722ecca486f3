//! Minimal actor runtime
//!
//! Each actor owns a private FIFO mailbox drained by a dedicated tokio
//! task, so handlers run strictly one message at a time and need no
//! internal locking. Behaviors are swappable from inside a handler via
//! [`ActorContext::become_next`]; the swap takes effect with the next
//! dequeued message.
//!
//! There is no supervision: a handler that returns an error halts its
//! actor for good, and messages sent to a stopped actor are silently
//! dropped (dead-letter swallow) rather than surfaced as an error.

pub mod actor;

pub use actor::{spawn, ActorContext, ActorRef, Behavior};

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for actors in the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(pub Uuid);

impl ActorId {
    /// Create a new random ActorId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID.
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for ActorId {
    fn default() -> Self {
        Self::new()
    }
}

/// Actor-specific errors. Any of these returned from a handler is fatal
/// for that actor; the runtime logs it and halts the executor.
#[derive(Debug, thiserror::Error)]
pub enum ActorError {
    #[error("actor {0} failed to start: {1}")]
    StartupFailed(ActorId, String),

    #[error("actor {0} handler fault: {1}")]
    HandlerFault(ActorId, String),
}
