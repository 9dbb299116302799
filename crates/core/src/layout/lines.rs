//! Token-to-line grouping.
//!
//! Tokens are sorted top-to-bottom and clustered into lines with a single
//! threshold on the distance between a token's vertical center and the center
//! of the first token of the current line. The anchor is never recomputed, so
//! a line can only drift by one threshold from where it started.

use ordered_float::OrderedFloat;

use super::params::LayoutParams;
use super::token::{Anchor, Token};

/// Tokens sharing a vertical band, sorted by `x_start`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Line {
    pub tokens: Vec<Token>,
}

/// A column piece of a line. Same shape as a line.
pub type Segment = Line;

impl Line {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True when the line holds positioned tokens.
    pub fn is_located(&self) -> bool {
        self.tokens.first().is_some_and(Token::is_located)
    }

    /// Vertical center of the token that opened the line.
    pub fn anchor_y(&self) -> Option<f64> {
        self.tokens.first().map(|t| t.center_y)
    }

    /// Space-joined token texts, trimmed.
    pub fn text(&self) -> String {
        let joined = self
            .tokens
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        joined.trim().to_string()
    }

    fn sort_by_x(&mut self) {
        self.tokens.sort_by_key(|t| OrderedFloat(t.x_start));
    }
}

/// Median of the collected token heights.
///
/// Uses the upper median (`sorted[len / 2]`). Falls back to
/// `params.default_height` when there are no heights or the median is zero.
pub fn median_height(heights: &[f64], params: &LayoutParams) -> f64 {
    let mut sorted = heights.to_vec();
    sorted.sort_by(f64::total_cmp);
    match sorted.get(sorted.len() / 2) {
        Some(&h) if h > 0.0 => h,
        _ => params.default_height,
    }
}

/// Groups tokens into lines ordered top-to-bottom.
///
/// Unlocated tokens form a single leading line in engine order. Located tokens
/// are sorted by `(center_y, x_start)` and clustered with `y_threshold`.
///
/// Unlocated tokens never join a located line, not even one whose center lies
/// within `y_threshold` of the top of the page. Mixed pages therefore always
/// start with the geometry-less text on a line of its own.
pub fn group_lines(tokens: Vec<Token>, y_threshold: f64) -> Vec<Line> {
    let (mut located, mut unlocated): (Vec<Token>, Vec<Token>) =
        tokens.into_iter().partition(Token::is_located);

    let mut lines = Vec::new();
    if !unlocated.is_empty() {
        unlocated.sort_by_key(|t| match t.anchor {
            Anchor::Unlocated { index } => index,
            Anchor::Located { .. } => usize::MAX,
        });
        lines.push(Line::new(unlocated));
    }

    located.sort_by_key(|t| (OrderedFloat(t.center_y), OrderedFloat(t.x_start)));

    let mut current = Line::default();
    let mut anchor_y = 0.0;
    for token in located {
        if current.is_empty() {
            anchor_y = token.center_y;
        } else if (token.center_y - anchor_y).abs() > y_threshold {
            current.sort_by_x();
            lines.push(std::mem::take(&mut current));
            anchor_y = token.center_y;
        }
        current.tokens.push(token);
    }
    if !current.is_empty() {
        current.sort_by_x();
        lines.push(current);
    }

    lines
}
