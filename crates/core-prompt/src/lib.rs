//! Prompt widgets composed from the text, list and history engines.
//!
//! * `PromptEditor` - caption plus command line, emacs-style editing and
//!   region marking.
//! * `Completion` - filtered candidate popup spliced back into the prompt.
//! * `HistorySearch` - incremental substring search over past commands.
//!
//! Widgets never call each other. Their `handle_key` results tell the
//! caller which widget should take over next.

mod completion;
mod editor;
mod history;
mod line;

pub use completion::{Completion, CompletionOutcome, MAX_HEIGHT_DEFAULT};
pub use editor::{MIN_PREFIX_DEFAULT, PromptEditor, PromptOutcome};
pub use history::{CAPTION as HISTORY_CAPTION, HistoryOutcome, HistorySearch};
