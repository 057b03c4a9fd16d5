//! Single-line edit buffer with a region-mark sub-mode.
//!
//! Invariants:
//! * `cursor` is a byte offset on a grapheme boundary with `0 <= cursor <= text.len()`.
//! * While marking, the anchor is frozen at the cursor position held when the
//!   mode was entered; the other end of the region is always the live cursor.
//! * Marking is read-only over content: only motions move the cursor, edits
//!   are ignored until the mode is left through `exit_mark_mode`.
//!
//! Every operation clamps instead of failing. Moving or deleting past either
//! end of the line is a no-op.

use crate::segment::{MARKED, MARKER_LEFT, MARKER_RIGHT, Segment};
use crate::{grapheme, motion};
use core_events::Direction;
use tracing::{trace, warn};
use unicode_normalization::UnicodeNormalization;

/// Granularity of a motion or deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    /// One grapheme cluster.
    Char,
    /// Word boundary (`Backward` = start of previous word, `Forward` = end of next word).
    Word,
    /// Line edge (`Backward` = line start, `Forward` = line end).
    Line,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkState {
    #[default]
    Normal,
    /// The anchor doubles as the pre-mark cursor restored on cancel.
    Marking { anchor: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditBuffer {
    text: String,
    cursor: usize,
    mark: MarkState,
}

impl EditBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer holding `text` with the cursor at the end.
    pub fn from_text(text: &str) -> Self {
        let text: String = text.nfc().collect();
        let cursor = text.len();
        Self {
            text,
            cursor,
            mark: MarkState::Normal,
        }
    }

    /// Buffer holding `text` with the cursor clamped onto `cursor`.
    pub fn with_cursor(text: &str, cursor: usize) -> Self {
        let mut buf = Self::from_text(text);
        buf.set_cursor(cursor);
        buf
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn mark_state(&self) -> MarkState {
        self.mark
    }

    pub fn is_marking(&self) -> bool {
        matches!(self.mark, MarkState::Marking { .. })
    }

    /// Text before the cursor.
    pub fn before_cursor(&self) -> &str {
        &self.text[..self.cursor]
    }

    /// Text from the cursor to the end.
    pub fn after_cursor(&self) -> &str {
        &self.text[self.cursor..]
    }

    /// Replace the whole content, leaving mark mode and moving the cursor to the end.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.nfc().collect();
        self.cursor = self.text.len();
        self.mark = MarkState::Normal;
        trace!(target: "text.buffer", len = self.text.len(), "set_text");
    }

    /// Replace the whole content with `before + after`, cursor between them.
    ///
    /// The cursor is measured on the normalized `before`, so decomposed input
    /// cannot push it into `after`.
    pub fn set_split(&mut self, before: &str, after: &str) {
        let head: String = before.nfc().collect();
        self.text = head.chars().chain(after.chars()).nfc().collect();
        self.cursor = grapheme::floor_boundary(&self.text, head.len());
        self.mark = MarkState::Normal;
        trace!(target: "text.buffer", len = self.text.len(), cursor = self.cursor, "set_split");
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
        self.mark = MarkState::Normal;
    }

    /// Place the cursor, clamped to the text and snapped back onto a grapheme boundary.
    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = grapheme::floor_boundary(&self.text, cursor);
    }

    /// Target offset of a motion from the current cursor, without moving.
    pub fn motion_target(&self, unit: Unit, direction: Direction) -> usize {
        match (unit, direction) {
            (Unit::Char, Direction::Backward) => motion::left(&self.text, self.cursor),
            (Unit::Char, Direction::Forward) => motion::right(&self.text, self.cursor),
            (Unit::Word, Direction::Backward) => motion::word_start_before(&self.text, self.cursor),
            (Unit::Word, Direction::Forward) => motion::word_end_after(&self.text, self.cursor),
            (Unit::Line, Direction::Backward) => 0,
            (Unit::Line, Direction::Forward) => self.text.len(),
        }
    }

    /// Move the cursor; allowed in both normal and mark mode. Returns whether it moved.
    pub fn move_cursor(&mut self, unit: Unit, direction: Direction) -> bool {
        let from = self.cursor;
        self.cursor = self.motion_target(unit, direction);
        trace!(target: "text.buffer", ?unit, ?direction, from, to = self.cursor, marking = self.is_marking(), "motion");
        from != self.cursor
    }

    /// Delete the span between the cursor and the motion target of `unit` in
    /// `direction`; the cursor lands on the lower bound of the removed span.
    ///
    /// Returns the removed text (empty when nothing was removed, including
    /// every call made while marking).
    pub fn delete(&mut self, unit: Unit, direction: Direction) -> String {
        if self.is_marking() {
            trace!(target: "text.buffer", ?unit, ?direction, "delete_ignored_marking");
            return String::new();
        }
        let target = self.motion_target(unit, direction);
        let (start, end) = if target < self.cursor {
            (target, self.cursor)
        } else {
            (self.cursor, target)
        };
        if start == end {
            return String::new();
        }
        let removed: String = self.text.drain(start..end).collect();
        self.cursor = start;
        trace!(target: "text.buffer", ?unit, ?direction, start, end, "delete");
        removed
    }

    /// Insert a character at the cursor. Ignored while marking.
    pub fn insert_char(&mut self, c: char) -> bool {
        let mut tmp = [0u8; 4];
        self.insert_str(c.encode_utf8(&mut tmp))
    }

    /// Insert text at the cursor (NFC normalized), advancing the cursor past it.
    /// Ignored while marking.
    pub fn insert_str(&mut self, s: &str) -> bool {
        if self.is_marking() {
            trace!(target: "text.buffer", "insert_ignored_marking");
            return false;
        }
        if s.is_empty() {
            return false;
        }
        let normalized: String = s.nfc().collect();
        self.text.insert_str(self.cursor, &normalized);
        self.cursor += normalized.len();
        // A combining mark may have fused with the cluster before it.
        self.cursor = grapheme::floor_boundary(&self.text, self.cursor);
        true
    }

    /// Enter region-mark mode with the anchor frozen at the cursor.
    /// Returns false (and changes nothing) when already marking.
    pub fn enter_mark_mode(&mut self) -> bool {
        if self.is_marking() {
            return false;
        }
        self.mark = MarkState::Marking {
            anchor: self.cursor,
        };
        trace!(target: "text.buffer", anchor = self.cursor, "mark_enter");
        true
    }

    /// `(min(anchor, cursor), max(anchor, cursor))` while marking.
    pub fn region(&self) -> Option<(usize, usize)> {
        match self.mark {
            MarkState::Normal => None,
            MarkState::Marking { anchor } => {
                Some((anchor.min(self.cursor), anchor.max(self.cursor)))
            }
        }
    }

    pub fn region_text(&self) -> Option<&str> {
        self.region().map(|(l, r)| &self.text[l..r])
    }

    /// Leave mark mode.
    ///
    /// With a replacement the region is spliced out for it and the cursor
    /// lands right after the inserted text. Without one the text is left
    /// untouched and the cursor returns to where it was when marking began.
    ///
    /// Calling this outside mark mode is a bug in the calling widget.
    pub fn exit_mark_mode(&mut self, replace_with: Option<&str>) {
        debug_assert!(self.is_marking(), "exit_mark_mode called outside mark mode");
        let MarkState::Marking { anchor } = self.mark else {
            warn!(target: "text.buffer", "mark_exit_outside_mark_mode");
            return;
        };
        let (l, r) = (anchor.min(self.cursor), anchor.max(self.cursor));
        self.mark = MarkState::Normal;
        match replace_with {
            Some(replacement) => {
                let replacement: String = replacement.nfc().collect();
                self.text.replace_range(l..r, &replacement);
                self.cursor = grapheme::floor_boundary(&self.text, l + replacement.len());
                trace!(target: "text.buffer", start = l, end = r, inserted = replacement.len(), "mark_replace");
            }
            None => {
                self.cursor = anchor;
                trace!(target: "text.buffer", restored = anchor, "mark_cancel");
            }
        }
    }

    /// Markup for display: the plain text in normal mode, the highlighted
    /// region in mark mode.
    pub fn render(&self) -> Vec<Segment> {
        if self.is_marking() {
            self.render_marked()
        } else {
            vec![Segment::plain(self.text.clone())]
        }
    }

    /// Markup highlighting the marked region, with a one-cell marker glyph at
    /// whichever end currently holds the live cursor. At end-of-text the
    /// glyph is drawn over a synthetic space.
    ///
    /// Outside mark mode this yields the plain text.
    pub fn render_marked(&self) -> Vec<Segment> {
        let Some((l, r)) = self.region() else {
            return vec![Segment::plain(self.text.clone())];
        };
        let p = self.cursor;
        let marker_right = p == r;
        let (marker, after_marker) = if p < self.text.len() {
            let next = grapheme::next_boundary(&self.text, p);
            (&self.text[p..next], next)
        } else {
            (" ", p)
        };
        let left_plain = &self.text[..l];
        let (marked, right_plain) = if marker_right {
            (&self.text[l..r], &self.text[after_marker..])
        } else {
            (&self.text[after_marker..r], &self.text[r..])
        };

        let mut out = Vec::with_capacity(4);
        if !left_plain.is_empty() {
            out.push(Segment::plain(left_plain));
        }
        if !marker_right {
            out.push(Segment::styled(MARKER_LEFT, marker));
        }
        if !marked.is_empty() {
            out.push(Segment::styled(MARKED, marked));
        }
        if marker_right {
            out.push(Segment::styled(MARKER_RIGHT, marker));
        }
        if !right_plain.is_empty() {
            out.push(Segment::plain(right_plain));
        }
        out
    }
}
