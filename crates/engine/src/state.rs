//! Pure reassembly core of the ordering engine.
//!
//! [`EngineState`] is an immutable value owned by the manager actor and
//! replaced wholesale on every completion. [`step`] computes the next
//! state plus the effects to apply (values to emit, what to do with the
//! reporting worker) without performing any of them, so the whole
//! reordering algorithm is testable without actors.

use crate::Task;
use pheap::Heap;
use std::collections::VecDeque;

/// Reassembly state between two completions.
///
/// Invariants: every task buffered in `results` has
/// `index >= next_expected`; `pending` preserves submission order.
#[derive(Clone)]
pub struct EngineState {
    /// Tasks not yet handed to any worker, in submission order.
    pending: VecDeque<Task>,
    /// Completed tasks waiting for their turn, ordered by index.
    results: Heap<Task>,
    /// Index the downstream receiver is owed next.
    next_expected: u64,
    /// Highest valid index of the batch.
    last_index: u64,
}

/// What the manager owes the worker that just reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Keep the pool saturated with the next pending task.
    Assign(Task),
    /// No work left; the worker is shut down.
    Retire,
}

/// Outcome of one completion.
pub struct Step {
    pub state: EngineState,
    /// Values to forward downstream, already in index order.
    pub emit: Vec<i64>,
    /// True once the drain has passed the last valid index.
    pub finished: bool,
    pub directive: Directive,
}

impl EngineState {
    /// State after the initial pool assignment: `pending` is the batch
    /// tail that did not fit into the pool.
    pub fn new(pending: VecDeque<Task>, last_index: u64) -> Self {
        Self {
            pending,
            results: Heap::new(),
            next_expected: 0,
            last_index,
        }
    }

    pub fn next_expected(&self) -> u64 {
        self.next_expected
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Completions buffered out of order.
    pub fn buffered_len(&self) -> usize {
        self.results.len()
    }
}

/// Fold one completed task into the state.
///
/// Buffers the completion, drains the longest contiguous prefix starting
/// at `next_expected`, and picks the directive for the reporting worker.
pub fn step(state: EngineState, completed: Task) -> Step {
    let EngineState {
        mut pending,
        results,
        mut next_expected,
        last_index,
    } = state;

    let mut results = results.insert(completed);
    let mut emit = Vec::new();
    while let Some((task, rest)) = results.pop() {
        if task.index != next_expected {
            break;
        }
        emit.push(task.value);
        results = rest;
        next_expected += 1;
    }

    debug_assert!(results.peek().map_or(true, |t| t.index >= next_expected));

    let finished = next_expected > last_index;
    let directive = match pending.pop_front() {
        Some(task) => Directive::Assign(task),
        None => Directive::Retire,
    };

    Step {
        state: EngineState {
            pending,
            results,
            next_expected,
            last_index,
        },
        emit,
        finished,
        directive,
    }
}
