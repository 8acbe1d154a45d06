// Deduplicating append-log
//
// Keyed dedup + prepend + truncate-to-capacity. The transport re-delivers
// events aggressively, so consecutive occurrences of the same dedup key
// collapse to one entry; only the last key is remembered.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

pub const DEFAULT_LOG_CAPACITY: usize = 5;

/// Events that can derive a stable key identifying their physical occurrence.
pub trait DedupKeyed {
    fn dedup_key(&self) -> String;
}

/// Logged event wrapped with a locally unique sequence id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry<E> {
    pub id: u64,
    #[serde(flatten)]
    pub event: E,
}

/// Bounded, newest-first log with consecutive-duplicate suppression.
#[derive(Debug, Clone)]
pub struct DedupLog<E> {
    entries: VecDeque<LogEntry<E>>,
    capacity: usize,
    last_key: Option<String>,
    next_id: u64,
}

impl<E: DedupKeyed + Clone> DedupLog<E> {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            last_key: None,
            next_id: 0,
        }
    }

    /// Ingest one event. Returns false when the event was suppressed as a
    /// consecutive duplicate of the previous delivery.
    pub fn ingest(&mut self, event: E) -> bool {
        let key = event.dedup_key();
        if self.last_key.as_deref() == Some(key.as_str()) {
            return false;
        }
        self.last_key = Some(key);

        let id = self.next_id;
        self.next_id += 1;
        self.entries.push_front(LogEntry { id, event });
        self.entries.truncate(self.capacity);
        true
    }

    /// Empty the visible log. The last seen dedup key is intentionally kept,
    /// so a re-delivery of the most recent pre-clear event stays suppressed.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries newest-first (arrival order).
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry<E>> {
        self.entries.iter()
    }

    /// Apply a mutation to every logged event.
    pub fn update_all<F: FnMut(&mut E)>(&mut self, mut f: F) {
        for entry in self.entries.iter_mut() {
            f(&mut entry.event);
        }
    }

    pub fn to_vec(&self) -> Vec<LogEntry<E>> {
        self.entries.iter().cloned().collect()
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

impl<E: DedupKeyed + Clone> Default for DedupLog<E> {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}
