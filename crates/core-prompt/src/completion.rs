//! Completion popup over the prompt.
//!
//! Opening captures the word prefix under the prompt cursor, together with
//! the prompt text to its left and right. The popup then edits its own
//! search line, re-filtering the candidate list after every edit. Accepting
//! splices `left + selection + right` back into the prompt; cancelling
//! leaves the prompt as it was.

use crate::editor::PromptEditor;
use crate::line::{self, LineEdit};
use core_events::{CommandKey, Direction, KeyInput, NavKey};
use core_list::{ListStyles, RenderedRow, SearchableList};
use core_markup::{AttrSpec, AttributeRegistry, palette};
use core_text::{EditBuffer, Segment};
use tracing::{debug, trace};

/// Rows the popup may occupy before it scrolls.
pub const MAX_HEIGHT_DEFAULT: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// Popup closed or key not for it.
    Ignored,
    Unchanged,
    /// Search line, filter or focus changed.
    Changed,
    /// Selection spliced into the prompt; popup closed.
    Accepted,
    /// Popup closed without touching the prompt.
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct Completion {
    list: SearchableList,
    search: EditBuffer,
    left: String,
    right: String,
    open: bool,
    max_height: usize,
    scroll: usize,
}

impl Completion {
    pub fn new(registry: &AttributeRegistry, styles: ListStyles, max_height: usize) -> Self {
        registry.register_with(palette::DROPDOWN_EDITOR, || {
            palette::default_entry(palette::DROPDOWN_EDITOR)
                .map(|(fg, bg)| AttrSpec::new(fg, bg))
                .unwrap_or_default()
        });
        Self {
            list: SearchableList::new(registry, styles),
            search: EditBuffer::new(),
            left: String::new(),
            right: String::new(),
            open: false,
            max_height: max_height.max(1),
            scroll: 0,
        }
    }

    pub fn with_defaults(registry: &AttributeRegistry) -> Self {
        Self::new(registry, ListStyles::default(), MAX_HEIGHT_DEFAULT)
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn list(&self) -> &SearchableList {
        &self.list
    }

    /// Current search line.
    pub fn search(&self) -> &str {
        self.search.text()
    }

    /// Try to open over `prompt` with `candidates`.
    ///
    /// Unforced, the search starts as the word prefix before the prompt
    /// cursor and the popup stays closed when no candidate matches it.
    /// Forced, the search starts empty at the cursor and every candidate is
    /// shown. Returns whether the popup is open.
    pub fn open<I, S>(&mut self, prompt: &PromptEditor, candidates: I, force: bool) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let (start, prefix) = if force {
            (prompt.cursor(), "")
        } else {
            prompt.word_prefix()
        };
        self.list.set_content(candidates, false);
        if !force && !self.list.has_match(prefix) {
            trace!(target: "prompt.completion", prefix_len = prefix.len(), "open_refused_no_match");
            return false;
        }
        let buffer = prompt.buffer();
        self.left = buffer.before_cursor()[..start].to_string();
        self.right = buffer.after_cursor().to_string();
        self.search.set_text(prefix);
        self.list.filter(prefix);
        self.open = true;
        self.scroll = 0;
        debug!(target: "prompt.completion", force, prefix_len = prefix.len(), shown = self.list.len(), "open");
        true
    }

    pub fn handle_key(&mut self, key: KeyInput, prompt: &mut PromptEditor) -> CompletionOutcome {
        if !self.open {
            return CompletionOutcome::Ignored;
        }
        let outcome = match line::apply(&mut self.search, key) {
            LineEdit::Edited => {
                self.list.filter(self.search.text());
                self.scroll = 0;
                CompletionOutcome::Changed
            }
            LineEdit::Moved => CompletionOutcome::Changed,
            LineEdit::Unchanged => CompletionOutcome::Unchanged,
            LineEdit::Other => match key {
                KeyInput::Nav(NavKey::Up) => self.step_focus(Direction::Backward),
                KeyInput::Nav(NavKey::Down) => self.step_focus(Direction::Forward),
                KeyInput::Command(CommandKey::Enter | CommandKey::Tab) => self.accept(prompt),
                KeyInput::Command(CommandKey::Esc) => {
                    self.close();
                    CompletionOutcome::Cancelled
                }
                _ => CompletionOutcome::Unchanged,
            },
        };
        trace!(target: "prompt.completion", input = ?key, outcome = ?outcome, focus = ?self.list.focus(), "key");
        outcome
    }

    /// Rows the popup needs: the filtered count capped at the configured maximum.
    pub fn popup_height(&self) -> usize {
        self.list.content_height().min(self.max_height)
    }

    /// Columns the popup needs.
    pub fn popup_width(&self) -> usize {
        self.list.max_width()
    }

    /// Search line in the dropdown editor style.
    pub fn header(&self) -> Vec<Segment> {
        vec![Segment::styled(
            palette::DROPDOWN_EDITOR,
            self.search.text(),
        )]
    }

    /// Visible rows, scrolled so the focused entry is inside the window.
    pub fn visible_rows(&self) -> Vec<RenderedRow> {
        self.list
            .render()
            .into_iter()
            .skip(self.scroll)
            .take(self.popup_height())
            .collect()
    }

    fn step_focus(&mut self, direction: Direction) -> CompletionOutcome {
        let before = self.list.focus();
        self.list.focus_move(direction);
        let Some(focus) = self.list.focus() else {
            return CompletionOutcome::Unchanged;
        };
        let height = self.popup_height();
        if focus < self.scroll {
            self.scroll = focus;
        } else if focus >= self.scroll + height {
            self.scroll = focus + 1 - height;
        }
        if before == Some(focus) {
            CompletionOutcome::Unchanged
        } else {
            CompletionOutcome::Changed
        }
    }

    fn accept(&mut self, prompt: &mut PromptEditor) -> CompletionOutcome {
        let selection = self
            .list
            .selected()
            .unwrap_or_else(|| self.search.text().to_string());
        let mut before = String::with_capacity(self.left.len() + selection.len());
        before.push_str(&self.left);
        before.push_str(&selection);
        prompt.set_split(&before, &self.right);
        debug!(target: "prompt.completion", selection_len = selection.len(), cursor = prompt.cursor(), "accept");
        self.close();
        CompletionOutcome::Accepted
    }

    fn close(&mut self) {
        self.open = false;
        self.search.clear();
        self.left.clear();
        self.right.clear();
        self.scroll = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_events::DeleteKey;
    use pretty_assertions::assert_eq;

    const FILES: [&str; 4] = ["src", "Cargo.toml", "Cargo.lock", "README.md"];

    fn prompt(text: &str, cursor: usize) -> PromptEditor {
        let mut p = PromptEditor::new("def", "/tmp");
        p.set_text_and_cursor(text, cursor);
        p
    }

    #[test]
    fn unforced_open_needs_a_match() {
        let reg = AttributeRegistry::new();
        let mut c = Completion::with_defaults(&reg);
        let p = prompt("cat zz", 6);
        assert!(!c.open(&p, FILES, false));
        assert!(!c.is_open());
    }

    #[test]
    fn forced_open_shows_everything_and_inserts_at_cursor() {
        let reg = AttributeRegistry::new();
        let mut c = Completion::with_defaults(&reg);
        let mut p = prompt("cat zz", 6);
        assert!(c.open(&p, FILES, true));
        assert_eq!(c.search(), "");
        assert_eq!(c.list().len(), FILES.len());
        assert_eq!(
            c.handle_key(KeyInput::Command(CommandKey::Tab), &mut p),
            CompletionOutcome::Accepted
        );
        assert_eq!((p.text(), p.cursor()), ("cat zzsrc", 9));
    }

    #[test]
    fn accept_places_cursor_after_normalized_selection() {
        let reg = AttributeRegistry::new();
        let mut c = Completion::with_defaults(&reg);
        let mut p = prompt("ls ca -l", 5);
        assert!(c.open(&p, ["cafe\u{301}s"], false));
        c.handle_key(KeyInput::Command(CommandKey::Enter), &mut p);
        assert_eq!(p.text(), "ls caf\u{e9}s -l");
        assert_eq!(p.buffer().before_cursor(), "ls caf\u{e9}s");
    }

    #[test]
    fn accept_splices_selection_between_context() {
        let reg = AttributeRegistry::new();
        let mut c = Completion::with_defaults(&reg);
        let mut p = prompt("cat car -n", 7);
        assert!(c.open(&p, FILES, false));
        assert_eq!(c.search(), "car");
        assert_eq!(c.list().displayed(), vec!["Cargo.toml", "Cargo.lock"]);
        c.handle_key(KeyInput::Nav(NavKey::Down), &mut p);
        assert_eq!(
            c.handle_key(KeyInput::Command(CommandKey::Enter), &mut p),
            CompletionOutcome::Accepted
        );
        assert_eq!(p.text(), "cat Cargo.lock -n");
        assert_eq!(p.cursor(), "cat Cargo.lock".len());
        assert!(!c.is_open());
    }

    #[test]
    fn typing_refilters() {
        let reg = AttributeRegistry::new();
        let mut c = Completion::with_defaults(&reg);
        let mut p = prompt("vi ca", 5);
        c.open(&p, FILES, false);
        assert_eq!(c.list().len(), 2);
        c.handle_key(KeyInput::Insert('r'), &mut p);
        c.handle_key(KeyInput::Insert('g'), &mut p);
        c.handle_key(KeyInput::Insert('o'), &mut p);
        c.handle_key(KeyInput::Insert('.'), &mut p);
        c.handle_key(KeyInput::Insert('t'), &mut p);
        assert_eq!(c.list().displayed(), vec!["Cargo.toml"]);
        c.handle_key(KeyInput::Delete(DeleteKey::ToLineStart), &mut p);
        assert_eq!(c.list().len(), FILES.len());
        // prompt untouched while the popup edits its own line
        assert_eq!(p.text(), "vi ca");
    }

    #[test]
    fn escape_cancels_without_touching_prompt() {
        let reg = AttributeRegistry::new();
        let mut c = Completion::with_defaults(&reg);
        let mut p = prompt("ls sr", 5);
        c.open(&p, FILES, false);
        assert_eq!(
            c.handle_key(KeyInput::Command(CommandKey::Esc), &mut p),
            CompletionOutcome::Cancelled
        );
        assert_eq!((p.text(), p.cursor()), ("ls sr", 5));
        assert_eq!(
            c.handle_key(KeyInput::Insert('x'), &mut p),
            CompletionOutcome::Ignored
        );
    }

    #[test]
    fn accept_with_empty_view_keeps_search() {
        let reg = AttributeRegistry::new();
        let mut c = Completion::with_defaults(&reg);
        let mut p = prompt("cat sr", 6);
        assert!(c.open(&p, FILES, false));
        c.handle_key(KeyInput::Insert('z'), &mut p);
        assert!(c.list().is_empty());
        c.handle_key(KeyInput::Command(CommandKey::Tab), &mut p);
        assert_eq!((p.text(), p.cursor()), ("cat srz", 7));
    }

    #[test]
    fn popup_height_is_capped_and_scrolls() {
        let reg = AttributeRegistry::new();
        let mut c = Completion::new(&reg, ListStyles::default(), 2);
        let mut p = prompt("", 0);
        let items: Vec<String> = (0..5).map(|i| format!("f{i}")).collect();
        c.open(&p, items, true);
        assert_eq!(c.popup_height(), 2);
        for _ in 0..3 {
            c.handle_key(KeyInput::Nav(NavKey::Down), &mut p);
        }
        let rows = c.visible_rows();
        assert_eq!(rows.len(), 2);
        assert!(rows[1].focused);
        assert_eq!(rows[1].segments[0].text, "f3");
        assert_eq!(c.header(), vec![Segment::styled(palette::DROPDOWN_EDITOR, "")]);
    }
}
