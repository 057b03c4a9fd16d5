//! SGR escape sequence parser.
//!
//! Turns command output carrying `ESC [ <params> m` color codes into an
//! ordered list of segments. Only Select Graphic Rendition sequences are
//! interpreted; a trailing `ESC [ K` (clear to end of line, emitted by `grep`
//! and `ls`) is swallowed together with the sequence it follows.
//!
//! The style key of a segment is the raw parameter string (`"01;34"`). The
//! first time a key is seen its parameters are decoded through the fixed
//! color tables and registered; unknown parameters are dropped silently.

use crate::registry::{AttrSpec, AttributeRegistry};
use core_text::Segment;
use regex::Regex;
use std::sync::{Arc, LazyLock};
use tracing::trace;

static SGR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b\[((?:\d{1,3};)*\d{1,3})m(?:\x1b\[K)?").expect("static SGR pattern")
});

/// Alternate spelling of the reset sequence, rewritten to `ESC [ 0 m` before splitting.
const BARE_RESET: &str = "\x1b[m";
const RESET: &str = "\x1b[0m";

/// Foreground colors and text attributes.
const FOREGROUND: &[(u16, &str)] = &[
    (0, "default"),
    (30, "black"),
    (31, "dark red"),
    (32, "dark green"),
    (34, "dark blue"),
    (35, "dark magenta"),
    (36, "dark cyan"),
    (37, "light gray"),
    (90, "dark gray"),
    (91, "light red"),
    (92, "light green"),
    (93, "yellow"),
    (94, "light blue"),
    (95, "light magenta"),
    (96, "light cyan"),
    (97, "white"),
    (1, "bold"),
    (4, "underline"),
    (7, "standout"),
    (5, "blink"),
];

const BACKGROUND: &[(u16, &str)] = &[
    (40, "black"),
    (41, "dark red"),
    (42, "dark green"),
    (44, "dark blue"),
    (45, "dark magenta"),
    (46, "dark cyan"),
    (47, "light gray"),
];

fn lookup(table: &[(u16, &'static str)], code: u16) -> Option<&'static str> {
    table.iter().find(|(c, _)| *c == code).map(|(_, name)| *name)
}

/// Decode a parameter string (`"01;34;42"`) into palette notation.
/// Parameters are compared numerically, so `1` and `01` both mean bold.
pub fn decode_params(params: &str) -> AttrSpec {
    let mut fg = Vec::new();
    let mut bg = Vec::new();
    for code in params.split(';').filter_map(|p| p.parse::<u16>().ok()) {
        if let Some(name) = lookup(FOREGROUND, code) {
            fg.push(name);
        } else if let Some(name) = lookup(BACKGROUND, code) {
            bg.push(name);
        }
    }
    AttrSpec::new(fg.join(","), bg.join(","))
}

/// A key made only of zeros (`"0"`, `"00"`) resets to the default style.
fn is_reset(params: &str) -> bool {
    params
        .split(';')
        .all(|p| p.parse::<u16>().is_ok_and(|n| n == 0))
}

/// True if `s` holds at least one recognizable SGR sequence.
pub fn has_sgr(s: &str) -> bool {
    SGR.is_match(s) || s.contains(BARE_RESET)
}

#[derive(Debug, Clone)]
pub struct AnsiMarkupParser {
    registry: Arc<AttributeRegistry>,
}

impl AnsiMarkupParser {
    pub fn new(registry: Arc<AttributeRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<AttributeRegistry> {
        &self.registry
    }

    /// Split `s` into styled segments, registering unseen style keys.
    ///
    /// A string without SGR sequences comes back unchanged as one plain
    /// segment. Otherwise text runs inherit the most recent style key until
    /// the next sequence; empty runs are not emitted.
    pub fn parse(&self, s: &str) -> Vec<Segment> {
        if !has_sgr(s) {
            return vec![Segment::plain(s)];
        }
        let normalized = s.replace(BARE_RESET, RESET);
        let mut out = Vec::new();
        let mut style: Option<String> = None;
        let mut last = 0usize;
        for caps in SGR.captures_iter(&normalized) {
            let (Some(whole), Some(params)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let text = &normalized[last..whole.start()];
            if !text.is_empty() {
                out.push(Segment {
                    style: style.clone(),
                    text: text.to_string(),
                });
            }
            style = self.style_for(params.as_str());
            last = whole.end();
        }
        let tail = &normalized[last..];
        if !tail.is_empty() {
            out.push(Segment {
                style,
                text: tail.to_string(),
            });
        }
        trace!(target: "markup.parse", input_len = s.len(), segments = out.len(), "parse");
        out
    }

    /// Parse each line of a multi-line block (command presentation output).
    pub fn parse_lines(&self, block: &str) -> Vec<Vec<Segment>> {
        block.lines().map(|line| self.parse(line)).collect()
    }

    fn style_for(&self, params: &str) -> Option<String> {
        if is_reset(params) {
            return None;
        }
        let (_, inserted) = self.registry.register_with(params, || decode_params(params));
        if inserted {
            trace!(target: "markup.parse", key = params, "style_key_registered");
        }
        Some(params.to_string())
    }
}
