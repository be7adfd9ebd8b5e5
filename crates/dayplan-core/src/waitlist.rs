//! Stable max-priority queue for tasks that could not be placed.
//!
//! Backed by `BinaryHeap`. Each push takes a strictly increasing sequence
//! number, so equal priorities pop in push order.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::error::ScheduleError;

#[derive(Debug)]
struct Entry<T> {
    priority: f64,
    sequence: u64,
    item: T,
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Higher priority first, then lower sequence first.
        self.priority
            .total_cmp(&other.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Entry<T> {}

/// Max-priority queue with FIFO ordering among equal priorities.
#[derive(Debug)]
pub struct Waitlist<T> {
    heap: BinaryHeap<Entry<T>>,
    counter: u64,
}

impl<T> Waitlist<T> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            counter: 0,
        }
    }

    pub fn push(&mut self, priority: f64, item: T) {
        self.heap.push(Entry {
            priority,
            sequence: self.counter,
            item,
        });
        self.counter += 1;
    }

    /// Remove and return the highest-priority item.
    pub fn pop(&mut self) -> Result<(f64, T), ScheduleError> {
        self.heap
            .pop()
            .map(|e| (e.priority, e.item))
            .ok_or(ScheduleError::EmptyQueue { operation: "pop" })
    }

    /// Highest-priority item without removing it.
    pub fn peek(&self) -> Result<(f64, &T), ScheduleError> {
        self.heap
            .peek()
            .map(|e| (e.priority, &e.item))
            .ok_or(ScheduleError::EmptyQueue { operation: "peek" })
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Empty the queue and restart the sequence counter.
    pub fn clear(&mut self) {
        self.heap.clear();
        self.counter = 0;
    }

    /// Pop everything in priority order.
    pub fn drain_ordered(&mut self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.heap.len());
        while let Some(entry) = self.heap.pop() {
            out.push(entry.item);
        }
        out
    }
}

impl<T> Default for Waitlist<T> {
    fn default() -> Self {
        Self::new()
    }
}
