use crate::Snapshot;
use core_events::Direction;
use std::collections::VecDeque;
use tracing::{debug, trace};

/// Default number of snapshots retained before the oldest is evicted.
pub const HISTORY_CAPACITY_DEFAULT: usize = 500;

/// De-duplicated, insertion-ordered command history with circular,
/// substring-filtered stepping.
///
/// `idx` and `filter` are transient search state. Adding an entry or calling
/// `reset` puts them back to "last entry, empty filter".
#[derive(Debug, Clone)]
pub struct HistoryRing {
    entries: VecDeque<Snapshot>,
    capacity: usize,
    idx: usize,
    filter: String,
}

impl Default for HistoryRing {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryRing {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY_DEFAULT)
    }

    /// Ring bounded to `capacity` entries (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
            idx: 0,
            filter: String::new(),
        }
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

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Current search cursor.
    pub fn index(&self) -> usize {
        self.idx
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.entries.iter()
    }

    /// Append `snapshot`, first removing any structurally equal entry so the
    /// newest copy wins. Resets the search state.
    pub fn add(&mut self, snapshot: Snapshot) {
        let before = self.entries.len();
        self.entries.retain(|s| *s != snapshot);
        let removed_duplicates = before - self.entries.len();
        self.entries.push_back(snapshot);
        let mut evicted = 0usize;
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
            evicted += 1;
        }
        self.reset();
        trace!(target: "history.ring", len = self.entries.len(), removed_duplicates, evicted, "add");
    }

    /// Cursor back to the last entry, filter cleared.
    pub fn reset(&mut self) {
        self.idx = self.entries.len().saturating_sub(1);
        self.filter.clear();
    }

    /// Store a new substring filter and move the cursor back to the last entry.
    pub fn set_filter(&mut self, pattern: &str) {
        self.idx = self.entries.len().saturating_sub(1);
        self.filter.clear();
        self.filter.push_str(pattern);
    }

    /// Move the cursor one step in `direction` (wrapping around both ends),
    /// continuing in that direction until an entry whose command contains
    /// the filter is found. At most one full revolution is scanned.
    ///
    /// An empty ring has nothing to step over and yields `None`; callers show
    /// their "no history" state before stepping.
    pub fn step(&mut self, direction: Direction) -> Option<&Snapshot> {
        let len = self.entries.len();
        if len == 0 {
            debug!(target: "history.ring", "step_on_empty_ring");
            return None;
        }
        for scanned in 0..len {
            self.idx = (self.idx as isize + direction.delta()).rem_euclid(len as isize) as usize;
            if self.entries[self.idx].command.contains(self.filter.as_str()) {
                trace!(target: "history.ring", idx = self.idx, scanned, "step_hit");
                return self.entries.get(self.idx);
            }
        }
        trace!(target: "history.ring", filter_len = self.filter.len(), "step_no_match");
        None
    }

    /// Most recently added entry.
    pub fn last(&self) -> Option<&Snapshot> {
        self.entries.back()
    }

    /// Entry under the search cursor.
    pub fn current(&self) -> Option<&Snapshot> {
        self.entries.get(self.idx)
    }
}
