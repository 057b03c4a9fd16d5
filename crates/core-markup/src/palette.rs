//! Built-in palette: named styles used by the prompt, marked regions,
//! status line and completion list.

use core_text::segment::{MARKED, MARKER_LEFT, MARKER_RIGHT};

pub const DIRECTORY: &str = "directory";
pub const MODE: &str = "mode";
pub const INFOLINE: &str = "infoline";
pub const PROGRAM_PRESENTATION: &str = "programpresentation";
pub const DROPDOWN_EDITOR: &str = "dropdown_editor";
pub const DROPDOWN_PLAIN: &str = "dropdown_plain";
pub const DROPDOWN_MARKED: &str = "dropdown_marked";
pub const DROPDOWN_WALK: &str = "dropdown_walk";

/// `(key, foreground, background)`.
pub const DEFAULT_PALETTE: &[(&str, &str, &str)] = &[
    (DIRECTORY, "dark blue, bold", ""),
    (MODE, "dark green, bold", ""),
    (MARKED, "black", "light green"),
    (MARKER_LEFT, "black, bold, underline, blink", "light green"),
    (MARKER_RIGHT, "standout, bold, underline, blink", ""),
    (INFOLINE, "standout", ""),
    ("init", "dark blue, bold", "light gray"),
    (PROGRAM_PRESENTATION, "dark blue, bold", ""),
    ("success", "black", "dark green"),
    ("failure", "black", "dark red"),
    ("error", "black", "dark red"),
    ("prompt", "black", "yellow"),
    (DROPDOWN_EDITOR, "", "dark gray"),
    (DROPDOWN_PLAIN, "white", "dark green"),
    (DROPDOWN_MARKED, "dark red, bold", "dark green"),
    (DROPDOWN_WALK, "black", "light green"),
];

/// Palette entry for `key`, if it is one of the built-ins.
pub fn default_entry(key: &str) -> Option<(&'static str, &'static str)> {
    DEFAULT_PALETTE
        .iter()
        .find(|(k, _, _)| *k == key)
        .map(|&(_, fg, bg)| (fg, bg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn keys_are_unique() {
        let keys: HashSet<_> = DEFAULT_PALETTE.iter().map(|(k, _, _)| *k).collect();
        assert_eq!(keys.len(), DEFAULT_PALETTE.len());
    }

    #[test]
    fn lookup_builtin() {
        assert_eq!(default_entry(MARKED), Some(("black", "light green")));
        assert_eq!(default_entry("nope"), None);
    }
}
