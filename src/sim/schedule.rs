//! Deferred events on a virtual millisecond clock
//!
//! Stands in for `setTimeout`: events fire at the first frame whose timestamp
//! reaches their due time, earliest first, ties in scheduling order. Nothing
//! is ever cancelled; handlers decide whether a late event still matters.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Debug)]
struct Entry<E> {
    due: f64,
    seq: u64,
    event: E,
}

impl<E> PartialEq for Entry<E> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<E> Eq for Entry<E> {}

impl<E> PartialOrd for Entry<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for Entry<E> {
    // Reversed: BinaryHeap is a max-heap, we want the earliest entry on top
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .total_cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Timer queue
#[derive(Debug)]
pub struct Scheduler<E> {
    now: f64,
    next_seq: u64,
    queue: BinaryHeap<Entry<E>>,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self {
            now: 0.0,
            next_seq: 0,
            queue: BinaryHeap::new(),
        }
    }

    /// Current clock (ms)
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Schedule `event` to fire `delay_ms` after the current clock
    pub fn schedule(&mut self, delay_ms: f64, event: E) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Entry {
            due: self.now + delay_ms.max(0.0),
            seq,
            event,
        });
    }

    /// Pop the next event due at or before `until`.
    ///
    /// The clock moves to the event's due time so follow-ups scheduled by its
    /// handler are measured from when it fired, not from the frame.
    pub fn pop_due(&mut self, until: f64) -> Option<(f64, E)> {
        if self.queue.peek()?.due > until {
            return None;
        }
        let entry = self.queue.pop()?;
        self.now = self.now.max(entry.due);
        Some((entry.due, entry.event))
    }

    /// Move the clock forward (never backward)
    pub fn advance_to(&mut self, now: f64) {
        self.now = self.now.max(now);
    }

    /// Due time of the earliest pending event
    pub fn next_due(&self) -> Option<f64> {
        self.queue.peek().map(|e| e.due)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
