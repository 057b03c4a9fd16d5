//! Filterable candidate list: the model behind the completion dropdown.
//!
//! Holds the full candidate set, a live regex filter producing the displayed
//! subset with per-entry match highlighting, and a focus cursor.

mod list;
mod pattern;

pub use list::{ListStyles, RenderedRow, SearchableList};
pub use pattern::{MatchSpan, PatternError, SearchPattern};
