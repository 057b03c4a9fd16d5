//! Search pattern compilation and the prefix / match / suffix split.
//!
//! A pattern is a case-insensitive regular expression. It is wrapped into a
//! single capture anchored at the item start, `^(.*?)(pattern)`, so the
//! first (leftmost) occurrence becomes the highlighted span and whatever
//! follows it is the suffix. The pattern must compile on its own first, so
//! an unbalanced group cannot escape the wrapper.

use regex::{Regex, RegexBuilder};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("invalid search pattern `{pattern}`")]
    Invalid {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Compiled search pattern.
#[derive(Debug, Clone)]
pub struct SearchPattern {
    source: String,
    re: Regex,
}

/// Byte split of one matching item: `text[..prefix_end]` is the prefix,
/// `text[prefix_end..hit_end]` the highlighted match, the rest the suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSpan {
    pub prefix_end: usize,
    pub hit_end: usize,
}

impl MatchSpan {
    pub fn split<'a>(&self, text: &'a str) -> (&'a str, &'a str, &'a str) {
        (
            &text[..self.prefix_end],
            &text[self.prefix_end..self.hit_end],
            &text[self.hit_end..],
        )
    }
}

impl SearchPattern {
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        let invalid = |source: regex::Error| PatternError::Invalid {
            pattern: pattern.to_string(),
            source,
        };
        RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(invalid)?;
        let wrapped = format!("^(?P<pre>.*?)(?P<hit>{pattern})");
        let re = RegexBuilder::new(&wrapped)
            .case_insensitive(true)
            .build()
            .map_err(invalid)?;
        Ok(Self {
            source: pattern.to_string(),
            re,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.re.is_match(text)
    }

    pub fn split(&self, text: &str) -> Option<MatchSpan> {
        let caps = self.re.captures(text)?;
        let hit = caps.name("hit")?;
        Some(MatchSpan {
            prefix_end: hit.start(),
            hit_end: hit.end(),
        })
    }
}
