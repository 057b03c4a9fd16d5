//! Incremental history search.
//!
//! Typing narrows the ring's filter. The widget keeps track of the snapshot
//! it currently shows and only steps when the search stops matching it.

use crate::line::{self, LineEdit};
use core_events::{CommandKey, Direction, KeyInput, NavKey};
use core_history::{HistoryRing, Snapshot};
use core_text::{EditBuffer, Segment};
use tracing::{debug, trace};

pub const CAPTION: &str = "Search history:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryOutcome {
    Unchanged,
    /// The shown snapshot or the search line changed.
    Changed,
    /// Search closed; with `accept` set the caller takes `shown()` into the prompt.
    Closed { accept: bool },
}

#[derive(Debug, Clone, Default)]
pub struct HistorySearch {
    ring: HistoryRing,
    search: EditBuffer,
    shown: Option<Snapshot>,
}

impl HistorySearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ring: HistoryRing::with_capacity(capacity),
            ..Self::default()
        }
    }

    pub fn ring(&self) -> &HistoryRing {
        &self.ring
    }

    pub fn search(&self) -> &str {
        self.search.text()
    }

    /// Snapshot currently presented (the last added one until a search moves it).
    pub fn shown(&self) -> Option<&Snapshot> {
        self.shown.as_ref()
    }

    /// Record a completed command and show it.
    pub fn add(&mut self, snapshot: Snapshot) {
        self.shown = Some(snapshot.clone());
        self.ring.add(snapshot);
    }

    /// Clear the search line and the ring filter.
    pub fn reset(&mut self) {
        self.search.clear();
        self.ring.set_filter("");
    }

    pub fn handle_key(&mut self, key: KeyInput) -> HistoryOutcome {
        let outcome = match line::apply(&mut self.search, key) {
            LineEdit::Edited => {
                self.refresh();
                HistoryOutcome::Changed
            }
            LineEdit::Moved => HistoryOutcome::Changed,
            LineEdit::Unchanged => HistoryOutcome::Unchanged,
            LineEdit::Other => match key {
                KeyInput::Nav(NavKey::Up) => self.step(Direction::Backward),
                KeyInput::Nav(NavKey::Down) => self.step(Direction::Forward),
                KeyInput::Command(CommandKey::Enter | CommandKey::Tab) => {
                    self.reset();
                    HistoryOutcome::Closed { accept: true }
                }
                KeyInput::Command(CommandKey::Esc) => {
                    self.reset();
                    HistoryOutcome::Closed { accept: false }
                }
                _ => HistoryOutcome::Unchanged,
            },
        };
        trace!(target: "prompt.history", input = ?key, outcome = ?outcome, idx = self.ring.index(), "key");
        outcome
    }

    /// Caption followed by the search line.
    pub fn render(&self) -> Vec<Segment> {
        let mut out = vec![Segment::plain(CAPTION)];
        out.extend(self.search.render());
        out
    }

    /// Re-apply the search after an edit.
    fn refresh(&mut self) {
        let pattern = self.search.text();
        self.ring.set_filter(pattern);
        if pattern.is_empty() {
            self.shown = self.ring.last().cloned();
            return;
        }
        let still_shown = self
            .shown
            .as_ref()
            .is_some_and(|s| s.command.contains(pattern));
        if still_shown {
            return;
        }
        let hit = self.ring.step(Direction::Backward).cloned();
        if hit.is_none() {
            debug!(target: "prompt.history", pattern_len = pattern.len(), "search_no_match_showing_last");
        }
        self.shown = hit.or_else(|| self.ring.last().cloned());
    }

    fn step(&mut self, direction: Direction) -> HistoryOutcome {
        match self.ring.step(direction).cloned() {
            Some(snapshot) => {
                self.shown = Some(snapshot);
                HistoryOutcome::Changed
            }
            None => HistoryOutcome::Unchanged,
        }
    }
}
