//! Column splitting for grouped lines.
//!
//! A wide horizontal gap inside a line usually separates columns or table
//! cells. Splitting there keeps each column's text on its own output line
//! without attempting any table detection.

use super::lines::{Line, Segment};

/// Splits one line at every gap wider than `gap_threshold`.
///
/// The gap is measured from the previous token's `x_end` to the next token's
/// `x_start`. Unlocated lines carry no positions and are returned whole.
pub fn split_line(line: Line, gap_threshold: f64) -> Vec<Segment> {
    if !line.is_located() {
        return vec![line];
    }

    let mut segments = Vec::new();
    let mut current = Segment::default();
    let mut prev_end: Option<f64> = None;
    for token in line.tokens {
        let wide_gap = prev_end.is_some_and(|end| token.x_start - end > gap_threshold);
        if wide_gap && !current.is_empty() {
            segments.push(std::mem::take(&mut current));
        }
        prev_end = Some(token.x_end);
        current.tokens.push(token);
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

/// Splits every line, keeping top-to-bottom then left-to-right order.
pub fn split_columns(lines: Vec<Line>, gap_threshold: f64) -> Vec<Segment> {
    lines
        .into_iter()
        .flat_map(|line| split_line(line, gap_threshold))
        .collect()
}
