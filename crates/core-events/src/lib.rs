//! Core input vocabulary shared by the text engine crates.
//!
//! The engine never reads raw terminal bytes. A terminal-input collaborator
//! hands over discrete `KeyEvent`s which [`keymap::classify`] turns into a
//! pre-classified [`KeyInput`]: navigation, deletion, a printable insertion or
//! a command key. Everything above this crate matches on `KeyInput` only.

use std::fmt;

pub mod keymap;

pub use keymap::{KeyParseError, classify, parse_key};

/// Direction of a cursor, focus or history step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Backward,
    Forward,
}

impl Direction {
    /// Signed unit step (-1 / +1).
    pub fn delta(self) -> isize {
        match self {
            Direction::Backward => -1,
            Direction::Forward => 1,
        }
    }

    pub fn reverse(self) -> Self {
        match self {
            Direction::Backward => Direction::Forward,
            Direction::Forward => Direction::Backward,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyEvent {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    /// Key without modifiers.
    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::empty())
    }

    pub fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CTRL)
    }

    pub fn alt(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::ALT)
    }
}

/// Normalized logical key representation delivered by the terminal-input collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Delete,
    Tab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const CTRL = 0b0000_0001;
        const ALT  = 0b0000_0010;
        const SHIFT = 0b0000_0100;
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}{:?}", self.code, self.mods)
    }
}

/// Cursor motions. Vertical keys are surfaced as navigation too; line editors
/// pass them on to whichever list or history widget owns the focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavKey {
    Left,
    Right,
    LineStart,
    LineEnd,
    WordBackward,
    WordForward,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeleteKey {
    /// Backspace.
    CharBackward,
    /// Delete under cursor (ctrl-d / Delete).
    CharForward,
    WordBackward,
    WordForward,
    /// Kill from line start to cursor (ctrl-u).
    ToLineStart,
    /// Kill from cursor to line end (ctrl-k).
    ToLineEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKey {
    Enter,
    Esc,
    Tab,
    /// Enter or leave region-mark mode (ctrl-space).
    ToggleMark,
    Quit,
}

/// Pre-classified key consumed by the editing components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyInput {
    Nav(NavKey),
    Delete(DeleteKey),
    Insert(char),
    Command(CommandKey),
    Unbound,
}

impl KeyInput {
    /// True for keys that change buffer content (insertions and deletions).
    pub fn is_edit(&self) -> bool {
        matches!(self, KeyInput::Insert(_) | KeyInput::Delete(_))
    }
}
