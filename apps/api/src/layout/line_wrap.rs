//! Line Wrapper: greedy word-wrap against a point-width budget.
//!
//! Never drops or splits a word: a word wider than the budget sits alone on
//! its own line. Only the degradation ladder is allowed to remove content.

use crate::layout::font_metrics::{FontVariant, TextMetrics};

/// Splits `text` into display lines no wider than `max_width` (except for
/// single over-wide words).
///
/// Empty or whitespace-only input yields one empty line so callers can still
/// reserve a line's height.
pub fn wrap_lines(
    text: &str,
    max_width: f32,
    variant: FontVariant,
    size_pt: f32,
    metrics: &dyn TextMetrics,
) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{current} {word}");
        if metrics.width(&candidate, variant, size_pt) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    // The final (possibly partial, possibly empty) line.
    lines.push(current);
    lines
}
