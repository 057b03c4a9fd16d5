//! Styled text segments: the markup currency handed to the rendering collaborator.
//!
//! A segment is a `(style key, text)` pair. `style == None` renders with the
//! surface's default attribute; any other key must have been registered with
//! the attribute registry before the markup is painted.

use serde::Serialize;

/// Style key of the highlighted span of a marked region.
pub const MARKED: &str = "marked";
/// Marker glyph when the live cursor sits at the left end of the region.
pub const MARKER_LEFT: &str = "marker_left";
/// Marker glyph when the live cursor sits at the right end of the region.
pub const MARKER_RIGHT: &str = "marker_right";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Segment {
    pub style: Option<String>,
    pub text: String,
}

impl Segment {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            style: None,
            text: text.into(),
        }
    }

    pub fn styled(style: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            style: Some(style.into()),
            text: text.into(),
        }
    }

    pub fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }

    pub fn is_plain(&self) -> bool {
        self.style.is_none()
    }
}

/// Concatenated text of a markup list with all styling dropped.
pub fn plain_text(segments: &[Segment]) -> String {
    segments.iter().map(|s| s.text.as_str()).collect()
}

/// Display width in terminal cells of a markup list.
pub fn markup_width(segments: &[Segment]) -> usize {
    segments.iter().map(|s| crate::str_width(&s.text)).sum()
}
