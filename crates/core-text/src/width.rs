//! Grapheme cluster display width.
//!
//! All display-width decisions (list layout hints, marker glyph cells) flow
//! through `egc_width`. The baseline comes from `unicode_width`; clusters
//! that carry an emoji presentation selector or a ZWJ join are widened to two
//! cells since terminals render them as a single wide glyph. Over-estimating
//! only costs a blank cell, under-estimating shifts every following column.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const ZWJ: char = '\u{200D}';
const VS16: char = '\u{FE0F}';

fn is_extended_pictographic(c: char) -> bool {
    ('\u{1F300}'..='\u{1FAFF}').contains(&c) || ('\u{2600}'..='\u{27BF}').contains(&c)
}

/// Width in terminal cells of a single grapheme cluster.
///
/// Empty input is zero wide; any other cluster occupies at least one cell.
pub fn egc_width(egc: &str) -> u16 {
    if egc.is_empty() {
        return 0;
    }
    let base = UnicodeWidthStr::width(egc) as u16;
    let pictographic = egc.chars().any(is_extended_pictographic);
    if pictographic && egc.chars().any(|c| c == ZWJ || c == VS16) {
        return 2;
    }
    base.clamp(1, 2)
}

/// Sum of cluster widths across a whole string.
pub fn str_width(s: &str) -> usize {
    s.graphemes(true).map(|g| egc_width(g) as usize).sum()
}
