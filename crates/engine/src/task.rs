//! One unit of work, tagged with its original batch position.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A payload and the 0-based index it occupied in the input batch. The
/// same shape carries both assignments (value = input) and completions
/// (value = computed result).
///
/// Ordered by `index` alone, so a heap of tasks yields them in original
/// submission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub index: u64,
    pub value: i64,
}

impl Task {
    pub fn new(index: u64, value: i64) -> Self {
        Self { index, value }
    }
}

impl PartialOrd for Task {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Task {
    fn cmp(&self, other: &Self) -> Ordering {
        self.index.cmp(&other.index)
    }
}
