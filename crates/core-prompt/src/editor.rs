//! Command prompt: caption plus a single-line edit buffer.
//!
//! The prompt owns its buffer and translates classified keys into buffer
//! operations. Anything that needs another widget (completion popup,
//! history search, command submission) is reported back to the caller as a
//! `PromptOutcome` instead of being performed here.

use crate::line::{self, LineEdit};
use core_events::{CommandKey, DeleteKey, KeyInput, NavKey};
use core_history::Snapshot;
use core_markup::palette;
use core_text::{EditBuffer, Segment, grapheme, motion};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Typed prefix length (in graphemes) that opens completion without tab.
pub const MIN_PREFIX_DEFAULT: usize = 2;

/// Result of feeding one key to the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    /// Key consumed without any visible effect.
    Unchanged,
    /// Cursor, content or mark state changed; redraw.
    Changed,
    /// Enter pressed; carries the command line.
    Submit(String),
    /// Content changed and the caller should try to open completion.
    /// `force` is set for an explicit tab.
    RequestCompletion { force: bool },
    /// Up pressed outside mark mode.
    RequestHistory,
    Quit,
}

#[derive(Debug, Clone)]
pub struct PromptEditor {
    buffer: EditBuffer,
    mode_id: String,
    working_dir: PathBuf,
    min_prefix: usize,
}

impl PromptEditor {
    pub fn new(mode_id: impl Into<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            buffer: EditBuffer::new(),
            mode_id: mode_id.into(),
            working_dir: working_dir.into(),
            min_prefix: MIN_PREFIX_DEFAULT,
        }
    }

    /// Graphemes a typed word prefix needs before completion is requested
    /// unprompted (at least one).
    pub fn with_min_prefix(mut self, min_prefix: usize) -> Self {
        self.min_prefix = min_prefix.max(1);
        self
    }

    pub fn buffer(&self) -> &EditBuffer {
        &self.buffer
    }

    pub fn text(&self) -> &str {
        self.buffer.text()
    }

    pub fn cursor(&self) -> usize {
        self.buffer.cursor()
    }

    pub fn mode_id(&self) -> &str {
        &self.mode_id
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn set_mode(&mut self, mode_id: impl Into<String>) {
        self.mode_id = mode_id.into();
    }

    pub fn set_working_dir(&mut self, dir: impl Into<PathBuf>) {
        self.working_dir = dir.into();
    }

    /// Replace the command line, cursor at the end.
    pub fn set_text(&mut self, text: &str) {
        self.buffer.set_text(text);
    }

    /// Replace the command line and place the cursor.
    pub fn set_text_and_cursor(&mut self, text: &str, cursor: usize) {
        self.buffer.set_text(text);
        self.buffer.set_cursor(cursor);
    }

    /// Replace the command line with `before + after`, cursor between them.
    pub fn set_split(&mut self, before: &str, after: &str) {
        self.buffer.set_split(before, after);
    }

    /// Show a history entry: its mode, directory and command (cursor at the end).
    pub fn load(&mut self, snapshot: &Snapshot) {
        self.mode_id.clone_from(&snapshot.mode);
        self.working_dir.clone_from(&snapshot.working_dir);
        self.buffer.set_text(&snapshot.command);
        debug!(target: "prompt.editor", len = snapshot.command.len(), "load_snapshot");
    }

    /// Empty the command line.
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// `<dir>/` in the directory style followed by ` (<mode>) ` in the mode style.
    pub fn caption(&self) -> Vec<Segment> {
        let dir = self
            .working_dir
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        vec![
            Segment::styled(palette::DIRECTORY, format!("{dir}/")),
            Segment::styled(palette::MODE, format!(" ({}) ", self.mode_id)),
        ]
    }

    /// Start of the word being typed and the text from there to the cursor.
    ///
    /// Words are whitespace-delimited here, so a path fragment such as
    /// `src/ma` is one prefix.
    pub fn word_prefix(&self) -> (usize, &str) {
        let cursor = self.buffer.cursor();
        let start = motion::token_start(self.buffer.text(), cursor);
        (start, &self.buffer.text()[start..cursor])
    }

    /// Caption followed by the buffer markup.
    pub fn render(&self) -> Vec<Segment> {
        let mut out = self.caption();
        out.extend(self.buffer.render());
        out
    }

    pub fn handle_key(&mut self, key: KeyInput) -> PromptOutcome {
        let outcome = if self.buffer.is_marking() {
            self.handle_marking(key)
        } else {
            self.handle_normal(key)
        };
        trace!(target: "prompt.editor", input = ?key, outcome = ?outcome, cursor = self.buffer.cursor(), "key");
        outcome
    }

    fn handle_normal(&mut self, key: KeyInput) -> PromptOutcome {
        match line::apply(&mut self.buffer, key) {
            LineEdit::Moved => return PromptOutcome::Changed,
            LineEdit::Unchanged => return PromptOutcome::Unchanged,
            LineEdit::Edited => return self.after_edit(key),
            LineEdit::Other => {}
        }
        match key {
            KeyInput::Nav(NavKey::Up) => PromptOutcome::RequestHistory,
            KeyInput::Command(CommandKey::ToggleMark) => {
                self.buffer.enter_mark_mode();
                PromptOutcome::Changed
            }
            KeyInput::Command(CommandKey::Enter) => {
                debug!(target: "prompt.editor", len = self.buffer.len(), "submit");
                PromptOutcome::Submit(self.buffer.text().to_string())
            }
            KeyInput::Command(CommandKey::Tab) => PromptOutcome::RequestCompletion { force: true },
            KeyInput::Command(CommandKey::Quit) => PromptOutcome::Quit,
            _ => PromptOutcome::Unchanged,
        }
    }

    fn handle_marking(&mut self, key: KeyInput) -> PromptOutcome {
        match key {
            KeyInput::Delete(DeleteKey::CharBackward) => {
                self.buffer.exit_mark_mode(Some(""));
                PromptOutcome::Changed
            }
            KeyInput::Command(CommandKey::ToggleMark | CommandKey::Esc) => {
                self.buffer.exit_mark_mode(None);
                PromptOutcome::Changed
            }
            KeyInput::Command(CommandKey::Enter) => {
                self.buffer.exit_mark_mode(None);
                debug!(target: "prompt.editor", len = self.buffer.len(), "submit");
                PromptOutcome::Submit(self.buffer.text().to_string())
            }
            KeyInput::Command(CommandKey::Quit) => PromptOutcome::Quit,
            _ => match line::apply(&mut self.buffer, key) {
                LineEdit::Moved => PromptOutcome::Changed,
                _ => PromptOutcome::Unchanged,
            },
        }
    }

    /// Insertions and character/word deletions ask for completion once the
    /// typed prefix is long enough; line kills never do.
    fn after_edit(&self, key: KeyInput) -> PromptOutcome {
        let completes = matches!(
            key,
            KeyInput::Insert(_)
                | KeyInput::Delete(
                    DeleteKey::CharBackward
                        | DeleteKey::CharForward
                        | DeleteKey::WordBackward
                        | DeleteKey::WordForward
                )
        );
        if completes && grapheme::iter(self.word_prefix().1).count() >= self.min_prefix {
            PromptOutcome::RequestCompletion { force: false }
        } else {
            PromptOutcome::Changed
        }
    }
}
