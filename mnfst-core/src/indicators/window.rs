//! Fixed-capacity history buffer indexed back from the newest sample.
//!
//! `get(0)` is the current bar, `get(k)` is `k` bars before it. Pushing onto a
//! full window evicts the oldest sample.

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
    capacity: usize,
    values: VecDeque<T>,
}

impl<T: Copy> RollingWindow<T> {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 1, "RollingWindow capacity must be >= 1");
        Self {
            capacity,
            values: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, value: T) {
        if self.values.len() == self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    /// Sample `k` bars back from the newest; `None` if not yet seen or evicted.
    pub fn get(&self, k: usize) -> Option<T> {
        let len = self.values.len();
        if k >= len {
            return None;
        }
        self.values.get(len - 1 - k).copied()
    }

    /// Newest-first iterator over at most `n` samples.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = T> + '_ {
        self.values.iter().rev().take(n).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.values.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
