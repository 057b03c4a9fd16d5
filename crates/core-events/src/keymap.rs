//! Emacs-style key bindings for single-line editing.
//!
//! `classify` is pure and total: every `KeyEvent` maps to exactly one
//! `KeyInput`, with `KeyInput::Unbound` for chords nothing listens to.
//! `parse_key` reads the textual key names used by scripted input
//! (`ctrl-a`, `alt-backspace`, `enter`, `x`).

use crate::{CommandKey, DeleteKey, KeyCode, KeyEvent, KeyInput, KeyModifiers, NavKey};
use thiserror::Error;
use tracing::trace;

pub fn classify(ev: &KeyEvent) -> KeyInput {
    let ctrl = ev.mods.contains(KeyModifiers::CTRL);
    let alt = ev.mods.contains(KeyModifiers::ALT);
    let out = match (ev.code, ctrl, alt) {
        // ctrl-space arrives as a NUL / space chord depending on the terminal.
        (KeyCode::Char(' ') | KeyCode::Char('@'), true, false) => {
            KeyInput::Command(CommandKey::ToggleMark)
        }
        (KeyCode::Char(c), true, false) => match c.to_ascii_lowercase() {
            'a' => KeyInput::Nav(NavKey::LineStart),
            'e' => KeyInput::Nav(NavKey::LineEnd),
            'b' => KeyInput::Nav(NavKey::Left),
            'f' => KeyInput::Nav(NavKey::Right),
            'd' => KeyInput::Delete(DeleteKey::CharForward),
            'k' => KeyInput::Delete(DeleteKey::ToLineEnd),
            'u' => KeyInput::Delete(DeleteKey::ToLineStart),
            _ => KeyInput::Unbound,
        },
        (KeyCode::Char(c), false, true) => match c.to_ascii_lowercase() {
            'b' => KeyInput::Nav(NavKey::WordBackward),
            'f' => KeyInput::Nav(NavKey::WordForward),
            'd' => KeyInput::Delete(DeleteKey::WordForward),
            'q' => KeyInput::Command(CommandKey::Quit),
            _ => KeyInput::Unbound,
        },
        (KeyCode::Char(c), false, false) if !c.is_control() => KeyInput::Insert(c),
        (KeyCode::Char(_), _, _) => KeyInput::Unbound,
        (KeyCode::Backspace, false, true) => KeyInput::Delete(DeleteKey::WordBackward),
        (KeyCode::Backspace, false, false) => KeyInput::Delete(DeleteKey::CharBackward),
        (KeyCode::Delete, false, false) => KeyInput::Delete(DeleteKey::CharForward),
        (KeyCode::Left, false, false) => KeyInput::Nav(NavKey::Left),
        (KeyCode::Right, false, false) => KeyInput::Nav(NavKey::Right),
        (KeyCode::Left, true, _) | (KeyCode::Left, _, true) => KeyInput::Nav(NavKey::WordBackward),
        (KeyCode::Right, true, _) | (KeyCode::Right, _, true) => {
            KeyInput::Nav(NavKey::WordForward)
        }
        (KeyCode::Home, _, _) => KeyInput::Nav(NavKey::LineStart),
        (KeyCode::End, _, _) => KeyInput::Nav(NavKey::LineEnd),
        (KeyCode::Up, false, false) => KeyInput::Nav(NavKey::Up),
        (KeyCode::Down, false, false) => KeyInput::Nav(NavKey::Down),
        (KeyCode::Enter, false, false) => KeyInput::Command(CommandKey::Enter),
        (KeyCode::Esc, _, _) => KeyInput::Command(CommandKey::Esc),
        (KeyCode::Tab, false, false) => KeyInput::Command(CommandKey::Tab),
        _ => KeyInput::Unbound,
    };
    trace!(target: "events.keymap", key = %ev, input = ?out, "classify");
    out
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyParseError {
    #[error("empty key name")]
    Empty,
    #[error("unknown modifier `{0}`")]
    UnknownModifier(String),
    #[error("unknown key `{0}`")]
    UnknownKey(String),
}

/// Parse a textual key name such as `ctrl-a`, `alt-backspace`, `enter` or `x`.
///
/// Modifiers are joined with `-`; a trailing `-` on its own is the minus key.
pub fn parse_key(name: &str) -> Result<KeyEvent, KeyParseError> {
    if name.is_empty() {
        return Err(KeyParseError::Empty);
    }
    let mut mods = KeyModifiers::empty();
    let mut rest = name;
    while let Some((head, tail)) = rest.split_once('-') {
        if tail.is_empty() {
            break;
        }
        match head.to_ascii_lowercase().as_str() {
            "ctrl" | "c" => mods |= KeyModifiers::CTRL,
            "alt" | "meta" | "m" => mods |= KeyModifiers::ALT,
            "shift" | "s" => mods |= KeyModifiers::SHIFT,
            other => return Err(KeyParseError::UnknownModifier(other.to_string())),
        }
        rest = tail;
    }
    let code = match rest.to_ascii_lowercase().as_str() {
        "enter" | "return" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "backspace" | "bs" => KeyCode::Backspace,
        "delete" | "del" => KeyCode::Delete,
        "tab" => KeyCode::Tab,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "space" => KeyCode::Char(' '),
        _ => {
            let mut chars = rest.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return Err(KeyParseError::UnknownKey(rest.to_string())),
            }
        }
    };
    Ok(KeyEvent { code, mods })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn emacs_motion_bindings() {
        assert_eq!(classify(&KeyEvent::ctrl('a')), KeyInput::Nav(NavKey::LineStart));
        assert_eq!(classify(&KeyEvent::ctrl('e')), KeyInput::Nav(NavKey::LineEnd));
        assert_eq!(classify(&KeyEvent::ctrl('b')), KeyInput::Nav(NavKey::Left));
        assert_eq!(classify(&KeyEvent::ctrl('f')), KeyInput::Nav(NavKey::Right));
        assert_eq!(
            classify(&KeyEvent::alt(KeyCode::Char('b'))),
            KeyInput::Nav(NavKey::WordBackward)
        );
        assert_eq!(
            classify(&KeyEvent::alt(KeyCode::Char('f'))),
            KeyInput::Nav(NavKey::WordForward)
        );
    }

    #[test]
    fn deletion_bindings() {
        assert_eq!(
            classify(&KeyEvent::plain(KeyCode::Backspace)),
            KeyInput::Delete(DeleteKey::CharBackward)
        );
        assert_eq!(
            classify(&KeyEvent::alt(KeyCode::Backspace)),
            KeyInput::Delete(DeleteKey::WordBackward)
        );
        assert_eq!(
            classify(&KeyEvent::alt(KeyCode::Char('d'))),
            KeyInput::Delete(DeleteKey::WordForward)
        );
        assert_eq!(classify(&KeyEvent::ctrl('d')), KeyInput::Delete(DeleteKey::CharForward));
        assert_eq!(classify(&KeyEvent::ctrl('k')), KeyInput::Delete(DeleteKey::ToLineEnd));
        assert_eq!(classify(&KeyEvent::ctrl('u')), KeyInput::Delete(DeleteKey::ToLineStart));
    }

    #[test]
    fn printable_and_commands() {
        assert_eq!(classify(&KeyEvent::plain(KeyCode::Char('x'))), KeyInput::Insert('x'));
        assert_eq!(
            classify(&KeyEvent::ctrl(' ')),
            KeyInput::Command(CommandKey::ToggleMark)
        );
        assert_eq!(
            classify(&KeyEvent::plain(KeyCode::Tab)),
            KeyInput::Command(CommandKey::Tab)
        );
        assert_eq!(classify(&KeyEvent::ctrl('z')), KeyInput::Unbound);
    }

    #[test]
    fn parse_key_names() {
        assert_eq!(parse_key("ctrl-a").unwrap(), KeyEvent::ctrl('a'));
        assert_eq!(
            parse_key("alt-backspace").unwrap(),
            KeyEvent::alt(KeyCode::Backspace)
        );
        assert_eq!(parse_key("enter").unwrap(), KeyEvent::plain(KeyCode::Enter));
        assert_eq!(parse_key("ctrl-space").unwrap(), KeyEvent::ctrl(' '));
        assert_eq!(parse_key("-").unwrap(), KeyEvent::plain(KeyCode::Char('-')));
        assert_eq!(parse_key("x").unwrap(), KeyEvent::plain(KeyCode::Char('x')));
    }

    #[test]
    fn parse_key_errors() {
        assert_eq!(parse_key(""), Err(KeyParseError::Empty));
        assert_eq!(
            parse_key("hyper-a"),
            Err(KeyParseError::UnknownModifier("hyper".into()))
        );
        assert_eq!(
            parse_key("pagedown"),
            Err(KeyParseError::UnknownKey("pagedown".into()))
        );
    }
}
