//! # Undo Log
//!
//! Bounded history of the most recent operations.
//!
//! ```text
//! capacity 3
//!
//!   push #1   [#1]
//!   push #2   [#1, #2]
//!   push #3   [#1, #2, #3]
//!   push #4   [#2, #3, #4]      #1 evicted (oldest first)
//!   pop       [#2, #3]    ──►   #4 (newest first)
//!   pop       [#2]        ──►   #3
//! ```

use std::collections::VecDeque;

use crate::types::Operation;
use crate::UNDO_DEPTH;

/// A ring of at most `capacity` operations: push evicts the oldest, pop
/// returns the newest.
#[derive(Debug, Clone)]
pub struct UndoLog {
    entries: VecDeque<Operation>,
    capacity: usize,
}

impl UndoLog {
    /// Creates an empty log. A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        UndoLog {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Records an operation, returning the entry evicted to make room.
    pub fn push(&mut self, op: Operation) -> Option<Operation> {
        let evicted = if self.entries.len() == self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(op);
        evicted
    }

    /// Removes and returns the most recent operation.
    pub fn pop(&mut self) -> Option<Operation> {
        self.entries.pop_back()
    }

    /// Removes the entry with sequence number `seq`, wherever it sits.
    pub fn remove(&mut self, seq: u64) -> Option<Operation> {
        let pos = self.entries.iter().position(|op| op.seq() == seq)?;
        self.entries.remove(pos)
    }

    /// The most recent operation, if any.
    pub fn peek(&self) -> Option<&Operation> {
        self.entries.back()
    }

    /// Entries from oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Operation> + ExactSizeIterator {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for UndoLog {
    fn default() -> Self {
        UndoLog::new(UNDO_DEPTH)
    }
}
