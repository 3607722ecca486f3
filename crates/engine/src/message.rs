//! Message shapes crossing the engine's downstream boundary.

use crate::EngineError;
use serde::{Deserialize, Serialize};

/// Streaming-mode protocol: values strictly in index order, terminated
/// by exactly one `Done` sentinel. `Failed` occurs only for an empty
/// input batch, in place of any values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreamEvent {
    Value(i64),
    /// Reserved end-of-stream sentinel, distinct from any payload.
    Done,
    Failed(String),
}

/// Bulk-mode envelope: the fully ordered result sequence, or a failure
/// with a human-readable reason. Delivered as one ordinary message, not
/// through a separate error channel.
pub type BatchResult = Result<Vec<i64>, EngineError>;
