//! Single-line text primitives: the edit buffer, grapheme-aware motions,
//! display width and styled segments.

pub mod buffer;
pub mod motion;
pub mod segment;
pub mod width;

pub use buffer::{EditBuffer, MarkState, Unit};
pub use segment::Segment;
pub use width::{egc_width, str_width};

/// Grapheme utilities. Pure helpers operating on a single line; byte offsets
/// in and out, always on grapheme cluster boundaries.
pub mod grapheme {
    use crate::egc_width;
    use unicode_segmentation::UnicodeSegmentation;

    /// Iterate grapheme clusters in a line.
    pub fn iter(line: &str) -> impl Iterator<Item = &str> {
        line.graphemes(true)
    }

    /// Previous grapheme boundary (returns 0 if already at or below 1st boundary).
    pub fn prev_boundary(line: &str, byte: usize) -> usize {
        if byte == 0 || byte > line.len() {
            return 0;
        }
        let mut last = 0;
        for (idx, _) in line.grapheme_indices(true) {
            if idx >= byte {
                break;
            }
            last = idx;
        }
        last
    }

    /// Next grapheme boundary (returns line.len() if at or beyond end).
    pub fn next_boundary(line: &str, byte: usize) -> usize {
        if byte >= line.len() {
            return line.len();
        }
        for (idx, _) in line.grapheme_indices(true) {
            if idx > byte {
                return idx;
            }
        }
        line.len()
    }

    /// Largest grapheme boundary `<= byte` (clamped to the line length).
    pub fn floor_boundary(line: &str, byte: usize) -> usize {
        if byte >= line.len() {
            return line.len();
        }
        let mut last = 0;
        for (idx, _) in line.grapheme_indices(true) {
            if idx > byte {
                break;
            }
            last = idx;
        }
        last
    }

    /// Compute visual column (terminal cells) up to (but not including) byte offset.
    pub fn visual_col(line: &str, byte: usize) -> usize {
        let mut col = 0;
        for (idx, g) in line.grapheme_indices(true) {
            if idx >= byte {
                break;
            }
            col += egc_width(g) as usize;
        }
        col
    }

    /// Word clusters are alphanumeric; underscore, punctuation and
    /// whitespace all separate words.
    pub fn is_word(g: &str) -> bool {
        g.chars().next().is_some_and(char::is_alphanumeric)
    }
}
