//! Cursor motion helpers over a single line of text.
//!
//! Every function takes the line and a byte offset and returns the target
//! byte offset. Inputs past the end are clamped to the line length and the
//! result always lies on a grapheme boundary in `0..=line.len()`.

use crate::grapheme;

/// One grapheme to the left (0 stays 0).
pub fn left(line: &str, byte: usize) -> usize {
    grapheme::prev_boundary(line, clamp(line, byte))
}

/// One grapheme to the right (end of line stays put).
pub fn right(line: &str, byte: usize) -> usize {
    grapheme::next_boundary(line, clamp(line, byte))
}

/// Start of the `(non-word)*(word)+` run ending at or before `byte`.
///
/// With no word before the cursor the scan runs off the front and lands on 0.
pub fn word_start_before(line: &str, byte: usize) -> usize {
    let mut b = clamp(line, byte);
    while b > 0 {
        let prev = grapheme::prev_boundary(line, b);
        if grapheme::is_word(&line[prev..b]) {
            break;
        }
        b = prev;
    }
    while b > 0 {
        let prev = grapheme::prev_boundary(line, b);
        if !grapheme::is_word(&line[prev..b]) {
            break;
        }
        b = prev;
    }
    b
}

/// End of the `(non-word)*(word)+` run starting at or after `byte`.
///
/// With no word after the cursor the scan runs off the back and lands on `line.len()`.
pub fn word_end_after(line: &str, byte: usize) -> usize {
    let mut b = clamp(line, byte);
    while b < line.len() {
        let next = grapheme::next_boundary(line, b);
        if grapheme::is_word(&line[b..next]) {
            break;
        }
        b = next;
    }
    while b < line.len() {
        let next = grapheme::next_boundary(line, b);
        if !grapheme::is_word(&line[b..next]) {
            break;
        }
        b = next;
    }
    b
}

/// Start of the whitespace-delimited token the cursor sits in or right after.
///
/// Used to pick the completion prefix (`cd proj/sr|` -> start of `proj/sr`).
pub fn token_start(line: &str, byte: usize) -> usize {
    let mut b = clamp(line, byte);
    while b > 0 {
        let prev = grapheme::prev_boundary(line, b);
        if line[prev..b].chars().all(char::is_whitespace) {
            break;
        }
        b = prev;
    }
    b
}

fn clamp(line: &str, byte: usize) -> usize {
    grapheme::floor_boundary(line, byte.min(line.len()))
}
