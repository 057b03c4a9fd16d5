//! Style registry and SGR markup parsing.
//!
//! `AttributeRegistry` is the single shared table of named styles;
//! `AnsiMarkupParser` feeds it with style keys discovered in colored command
//! output, while the prompt and list widgets reference the built-in
//! `palette` keys.

pub mod palette;
pub mod parser;
pub mod registry;

pub use parser::{AnsiMarkupParser, decode_params, has_sgr};
pub use registry::{AttrId, AttrSpec, AttributeRegistry};
