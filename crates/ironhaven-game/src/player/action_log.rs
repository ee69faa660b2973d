//! Bounded log of recent player and NPC action tags

use std::collections::VecDeque;

use ironhaven_core::Millis;
use serde::{Deserialize, Serialize};

/// Default number of entries kept
pub const ACTION_LOG_CAPACITY: usize = 50;

/// One action tag, e.g. `killed_police` or `stole_car`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedAction {
    /// Monotonic sequence number, never reused
    pub seq: u64,
    pub tag: String,
    pub timestamp: Millis,
}

/// Ring buffer of recent actions. Oldest entries fall off once full.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionLog {
    entries: VecDeque<LoggedAction>,
    capacity: usize,
    next_seq: u64,
}

impl ActionLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            next_seq: 1,
        }
    }

    /// Append a tag and return its sequence number
    pub fn push(&mut self, tag: impl Into<String>, timestamp: Millis) -> u64 {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push_back(LoggedAction {
            seq,
            tag: tag.into(),
            timestamp,
        });
        seq
    }

    /// Entries newer than `seq`, oldest first
    pub fn after(&self, seq: u64) -> impl Iterator<Item = &LoggedAction> {
        self.entries.iter().filter(move |entry| entry.seq > seq)
    }

    pub fn latest(&self) -> Option<&LoggedAction> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ActionLog {
    fn default() -> Self {
        Self::new(ACTION_LOG_CAPACITY)
    }
}
