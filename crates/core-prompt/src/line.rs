//! Shared line-editing keys for every buffer-backed widget.

use core_events::{DeleteKey, Direction, KeyInput, NavKey};
use core_text::{EditBuffer, Unit};

/// What a key did to a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineEdit {
    /// Cursor motion (possibly a no-op at an edge).
    Moved,
    /// Content changed.
    Edited,
    /// An edit key the buffer refused (mark mode, nothing to delete).
    Unchanged,
    /// Not a line-editing key; the widget decides.
    Other,
}

pub(crate) fn nav_motion(key: NavKey) -> Option<(Unit, Direction)> {
    Some(match key {
        NavKey::Left => (Unit::Char, Direction::Backward),
        NavKey::Right => (Unit::Char, Direction::Forward),
        NavKey::WordBackward => (Unit::Word, Direction::Backward),
        NavKey::WordForward => (Unit::Word, Direction::Forward),
        NavKey::LineStart => (Unit::Line, Direction::Backward),
        NavKey::LineEnd => (Unit::Line, Direction::Forward),
        NavKey::Up | NavKey::Down => return None,
    })
}

pub(crate) fn delete_span(key: DeleteKey) -> (Unit, Direction) {
    match key {
        DeleteKey::CharBackward => (Unit::Char, Direction::Backward),
        DeleteKey::CharForward => (Unit::Char, Direction::Forward),
        DeleteKey::WordBackward => (Unit::Word, Direction::Backward),
        DeleteKey::WordForward => (Unit::Word, Direction::Forward),
        DeleteKey::ToLineStart => (Unit::Line, Direction::Backward),
        DeleteKey::ToLineEnd => (Unit::Line, Direction::Forward),
    }
}

/// Apply horizontal motions, deletions and insertions to `buffer`.
pub(crate) fn apply(buffer: &mut EditBuffer, key: KeyInput) -> LineEdit {
    match key {
        KeyInput::Nav(nav) => match nav_motion(nav) {
            Some((unit, direction)) => {
                buffer.move_cursor(unit, direction);
                LineEdit::Moved
            }
            None => LineEdit::Other,
        },
        KeyInput::Delete(del) => {
            let (unit, direction) = delete_span(del);
            if buffer.delete(unit, direction).is_empty() {
                LineEdit::Unchanged
            } else {
                LineEdit::Edited
            }
        }
        KeyInput::Insert(c) => {
            if buffer.insert_char(c) {
                LineEdit::Edited
            } else {
                LineEdit::Unchanged
            }
        }
        KeyInput::Command(_) | KeyInput::Unbound => LineEdit::Other,
    }
}
