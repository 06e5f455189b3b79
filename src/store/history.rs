//! Bounded log of dispatched actions.

use std::collections::VecDeque;

/// Ring buffer of the most recent actions, oldest first.
///
/// A capacity of zero disables recording.
#[derive(Debug, Clone)]
pub struct ActionHistory<A> {
    capacity: usize,
    entries: VecDeque<A>,
}

impl<A: Clone> ActionHistory<A> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity.min(1024)),
        }
    }

    pub fn push(&mut self, action: A) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(action);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &A> {
        self.entries.iter()
    }

    pub fn to_vec(&self) -> Vec<A> {
        self.entries.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
