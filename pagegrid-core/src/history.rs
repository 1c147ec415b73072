//! # Undo/Redo History
//!
//! A linear history of snapshots with branch clearing on new edits.
//!
//! ```text
//! past: [s0, s1]  present: s2  future: [s3, s4]
//!
//! commit(x) -> past: [s0, s1, s2]  present: x   future: []
//! undo()    -> past: [s0]          present: s1  future: [s2, s3, s4]
//! redo()    -> past: [s0, s1, s2]  present: s3  future: [s4]
//! ```
//!
//! Committing a value that is structurally equal to the present is a no-op,
//! so accidental re-sets never create history entries.

use std::collections::VecDeque;

/// Undo/redo container over snapshot values.
#[derive(Debug, Clone)]
pub struct History<T> {
    /// Older snapshots, most recent last.
    past: VecDeque<T>,
    /// Current snapshot.
    present: T,
    /// Undone snapshots, next redo first.
    future: VecDeque<T>,
    /// Maximum number of past entries kept (oldest dropped first).
    limit: Option<usize>,
}

impl<T: Clone + PartialEq> History<T> {
    /// Create a history with no past or future.
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self {
            past: VecDeque::new(),
            present: initial,
            future: VecDeque::new(),
            limit: None,
        }
    }

    /// Create a history that keeps at most `limit` undo entries.
    #[must_use]
    pub fn with_limit(initial: T, limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::new(initial)
        }
    }

    /// Current snapshot.
    #[must_use]
    pub fn present(&self) -> &T {
        &self.present
    }

    /// Check if there is anything to undo.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    /// Check if there is anything to redo.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Number of undo entries.
    #[must_use]
    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    /// Number of redo entries.
    #[must_use]
    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    /// Make `value` the present, recording the old present for undo.
    ///
    /// Returns `false` (and changes nothing) when `value` equals the
    /// present. A successful commit discards all redo entries.
    pub fn commit(&mut self, value: T) -> bool {
        if value == self.present {
            return false;
        }
        let previous = std::mem::replace(&mut self.present, value);
        self.past.push_back(previous);
        if let Some(limit) = self.limit {
            while self.past.len() > limit {
                self.past.pop_front();
            }
        }
        self.future.clear();
        true
    }

    /// Commit the result of applying `f` to the present.
    pub fn update<F>(&mut self, f: F) -> bool
    where
        F: FnOnce(&T) -> T,
    {
        let next = f(&self.present);
        self.commit(next)
    }

    /// Replace the present without creating an undo entry.
    ///
    /// Used to fold a continuous gesture into the entry its first step
    /// created. Redo entries are dropped if the value changed.
    pub fn amend(&mut self, value: T) -> bool {
        if value == self.present {
            return false;
        }
        self.present = value;
        self.future.clear();
        true
    }

    /// Step back one entry. No-op when there is nothing to undo.
    pub fn undo(&mut self) -> &T {
        if let Some(previous) = self.past.pop_back() {
            let current = std::mem::replace(&mut self.present, previous);
            self.future.push_front(current);
        }
        &self.present
    }

    /// Step forward one entry. No-op when there is nothing to redo.
    pub fn redo(&mut self) -> &T {
        if let Some(next) = self.future.pop_front() {
            let current = std::mem::replace(&mut self.present, next);
            self.past.push_back(current);
        }
        &self.present
    }

    /// Apply `f` to every snapshot (past, present and future).
    pub fn map_all<F>(&mut self, mut f: F)
    where
        F: FnMut(&T) -> T,
    {
        for entry in self.past.iter_mut().chain(self.future.iter_mut()) {
            *entry = f(entry);
        }
        self.present = f(&self.present);
    }

    /// Replace the present and forget all past and future entries.
    pub fn reset(&mut self, value: T) {
        self.past.clear();
        self.future.clear();
        self.present = value;
    }
}

impl<T: Clone + PartialEq + Default> Default for History<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
