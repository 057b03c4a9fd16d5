use crate::pattern::{MatchSpan, PatternError, SearchPattern};
use core_events::Direction;
use core_markup::{AttrSpec, AttributeRegistry, palette};
use core_text::{Segment, str_width};
use tracing::{debug, trace, warn};

const CHECKED: &str = "[X] ";
const UNCHECKED: &str = "[ ] ";

/// Style keys a list paints with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListStyles {
    /// Prefix and suffix of a filtered entry.
    pub plain: String,
    /// Matched span of a filtered entry.
    pub marked: String,
    /// The focused entry.
    pub focus: String,
}

impl Default for ListStyles {
    fn default() -> Self {
        Self {
            plain: palette::DROPDOWN_PLAIN.to_string(),
            marked: palette::DROPDOWN_MARKED.to_string(),
            focus: palette::DROPDOWN_WALK.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    text: String,
    checked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FilteredEntry {
    item: usize,
    span: MatchSpan,
}

/// What is on screen: the full set, or the entries matching the live pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
enum View {
    Full,
    Filtered(Vec<FilteredEntry>),
}

/// One displayed row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRow {
    pub segments: Vec<Segment>,
    pub focused: bool,
}

/// Candidate list with a live, highlighted filter and a focus cursor.
///
/// The full item set only changes through `set_content`. The filtered view is
/// rebuilt from it on every `filter` call, so narrowing and widening a
/// pattern never loses entries.
#[derive(Debug, Clone)]
pub struct SearchableList {
    items: Vec<Entry>,
    multi_select: bool,
    pattern: String,
    view: View,
    focus: Option<usize>,
    styles: ListStyles,
}

impl SearchableList {
    /// Empty list painting with `styles`. Style keys missing from `registry`
    /// are registered from the built-in palette (or the surface default).
    pub fn new(registry: &AttributeRegistry, styles: ListStyles) -> Self {
        for key in [&styles.plain, &styles.marked, &styles.focus] {
            let builtin = palette::default_entry(key);
            let (_, inserted) = registry.register_with(key, || {
                builtin
                    .map(|(fg, bg)| AttrSpec::new(fg, bg))
                    .unwrap_or_default()
            });
            match (inserted, builtin) {
                (true, Some(_)) => {
                    debug!(target: "list.filter", key = %key, "style_key_seeded_from_palette")
                }
                (true, None) => {
                    warn!(target: "list.filter", key = %key, "style_key_unknown_using_default")
                }
                (false, _) => {}
            }
        }
        Self {
            items: Vec::new(),
            multi_select: false,
            pattern: String::new(),
            view: View::Full,
            focus: None,
            styles,
        }
    }

    pub fn with_default_styles(registry: &AttributeRegistry) -> Self {
        Self::new(registry, ListStyles::default())
    }

    pub fn styles(&self) -> &ListStyles {
        &self.styles
    }

    /// Replace the candidate set. Clears the filter and focuses the first entry.
    pub fn set_content<I, S>(&mut self, items: I, multi_select: bool)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.items = items
            .into_iter()
            .map(|s| Entry {
                text: s.into(),
                checked: false,
            })
            .collect();
        self.multi_select = multi_select;
        self.pattern.clear();
        self.view = View::Full;
        self.focus = self.first_focus();
        debug!(target: "list.filter", items = self.items.len(), multi_select, "set_content");
    }

    pub fn is_multi_select(&self) -> bool {
        self.multi_select
    }

    /// Full candidate set in `set_content` order.
    pub fn items(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|e| e.text.as_str())
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn is_filtered(&self) -> bool {
        matches!(self.view, View::Filtered(_))
    }

    /// Narrow the displayed view to entries matching `pattern`.
    ///
    /// An empty pattern shows the full set; so does a pattern that does not
    /// compile. Focus moves to the first displayed entry.
    pub fn filter(&mut self, pattern: &str) {
        if let Err(err) = self.try_filter(pattern) {
            debug!(target: "list.filter", error = %err, "pattern_invalid_showing_full_set");
            self.view = View::Full;
            self.focus = self.first_focus();
        }
    }

    /// Like `filter`, but reports a pattern that does not compile. The view
    /// is left untouched in that case. Returns the number of displayed entries.
    pub fn try_filter(&mut self, pattern: &str) -> Result<usize, PatternError> {
        self.pattern.clear();
        self.pattern.push_str(pattern);
        if pattern.is_empty() {
            self.view = View::Full;
        } else {
            let compiled = SearchPattern::compile(pattern)?;
            let matches = self
                .items
                .iter()
                .enumerate()
                .filter_map(|(item, e)| {
                    compiled
                        .split(&e.text)
                        .map(|span| FilteredEntry { item, span })
                })
                .collect::<Vec<_>>();
            self.view = View::Filtered(matches);
        }
        self.focus = self.first_focus();
        trace!(target: "list.filter", pattern_len = pattern.len(), shown = self.len(), "filter");
        Ok(self.len())
    }

    /// True if any candidate matches `pattern`. The empty pattern never
    /// matches, and neither does one that does not compile.
    pub fn has_match(&self, pattern: &str) -> bool {
        if pattern.is_empty() {
            return false;
        }
        match SearchPattern::compile(pattern) {
            Ok(p) => self.items.iter().any(|e| p.is_match(&e.text)),
            Err(_) => false,
        }
    }

    /// Number of displayed entries.
    pub fn len(&self) -> usize {
        match &self.view {
            View::Full => self.items.len(),
            View::Filtered(m) => m.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn focus(&self) -> Option<usize> {
        self.focus
    }

    /// Move focus one entry, clamped to the displayed view.
    pub fn focus_move(&mut self, direction: Direction) {
        let Some(current) = self.focus else {
            return;
        };
        let last = self.len().saturating_sub(1);
        self.focus = Some(match direction {
            Direction::Backward => current.saturating_sub(1),
            Direction::Forward => (current + 1).min(last),
        });
    }

    /// Text of the focused entry; in multi-select mode the checked entries
    /// joined by single spaces instead (`None` if nothing is checked).
    pub fn selected(&self) -> Option<String> {
        if self.multi_select {
            let checked: Vec<&str> = self
                .items
                .iter()
                .filter(|e| e.checked)
                .map(|e| e.text.as_str())
                .collect();
            return (!checked.is_empty()).then(|| checked.join(" "));
        }
        let item = self.item_at(self.focus?)?;
        Some(self.items[item].text.clone())
    }

    /// Flip the checked state of the focused entry (multi-select lists only).
    /// Returns the new state.
    pub fn toggle_checked(&mut self) -> Option<bool> {
        if !self.multi_select {
            return None;
        }
        let item = self.item_at(self.focus?)?;
        let entry = &mut self.items[item];
        entry.checked = !entry.checked;
        Some(entry.checked)
    }

    /// Plain text of every displayed entry, in display order.
    pub fn displayed(&self) -> Vec<&str> {
        (0..self.len())
            .filter_map(|row| self.item_at(row))
            .map(|item| self.items[item].text.as_str())
            .collect()
    }

    /// Markup of every displayed row. The focused row is shown unhighlighted
    /// in the focus style; the others show their match highlighting when
    /// filtered, or plain text otherwise.
    pub fn render(&self) -> Vec<RenderedRow> {
        (0..self.len())
            .filter_map(|row| {
                let item = self.item_at(row)?;
                let focused = self.focus == Some(row);
                Some(RenderedRow {
                    segments: self.render_row(row, item, focused),
                    focused,
                })
            })
            .collect()
    }

    /// Rows needed to show the displayed view.
    pub fn content_height(&self) -> usize {
        self.len()
    }

    /// Widest candidate in terminal cells (checkbox prefix included).
    pub fn max_width(&self) -> usize {
        let prefix = if self.multi_select {
            str_width(CHECKED)
        } else {
            0
        };
        self.items
            .iter()
            .map(|e| str_width(&e.text) + prefix)
            .max()
            .unwrap_or(0)
    }

    fn render_row(&self, row: usize, item: usize, focused: bool) -> Vec<Segment> {
        let entry = &self.items[item];
        let checkbox = self.multi_select.then_some(if entry.checked {
            CHECKED
        } else {
            UNCHECKED
        });
        if focused {
            let mut text = String::from(checkbox.unwrap_or(""));
            text.push_str(&entry.text);
            return vec![Segment::styled(self.styles.focus.as_str(), text)];
        }
        let mut out = Vec::with_capacity(4);
        match &self.view {
            View::Full => {
                if let Some(cb) = checkbox {
                    out.push(Segment::plain(cb));
                }
                out.push(Segment::plain(entry.text.as_str()));
            }
            View::Filtered(matches) => {
                let (pre, hit, post) = matches[row].span.split(&entry.text);
                if let Some(cb) = checkbox {
                    out.push(Segment::styled(self.styles.plain.as_str(), cb));
                }
                for (style, text) in [
                    (&self.styles.plain, pre),
                    (&self.styles.marked, hit),
                    (&self.styles.plain, post),
                ] {
                    if !text.is_empty() {
                        out.push(Segment::styled(style.as_str(), text));
                    }
                }
            }
        }
        out
    }

    /// Index into `items` of displayed row `row`.
    fn item_at(&self, row: usize) -> Option<usize> {
        match &self.view {
            View::Full => (row < self.items.len()).then_some(row),
            View::Filtered(m) => m.get(row).map(|f| f.item),
        }
    }

    fn first_focus(&self) -> Option<usize> {
        (!self.is_empty()).then_some(0)
    }
}
