//! Page assembly: segments to transcript.
//!
//! Also hosts [`reconstruct_page`], which runs a raw engine page through the
//! whole token, line, column and assembly chain, and the merge helpers used
//! for multi-page results and tiles.

use itertools::Itertools;
use serde::Serialize;
use tracing::debug;

use super::columns::split_columns;
use super::fragment::RawPage;
use super::lines::{Segment, group_lines, median_height};
use super::params::LayoutParams;
use super::token::build_tokens;

/// Reconstructed text of a page, tile or whole image.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageText {
    pub text: String,
    pub confidence: f64,
}

impl PageText {
    pub fn new(text: impl Into<String>, confidence: f64) -> Self {
        Self {
            text: text.into(),
            confidence,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Joins segments into a transcript.
///
/// Each segment becomes one line; empty lines are dropped. The confidence is
/// the mean of every score present on the segments' tokens, or `0.0`.
pub fn assemble(segments: &[Segment]) -> PageText {
    let text = segments
        .iter()
        .map(Segment::text)
        .filter(|line| !line.is_empty())
        .join("\n");
    let scores = segments
        .iter()
        .flat_map(|s| s.tokens.iter())
        .filter_map(|t| t.score);
    PageText::new(text.trim(), mean(scores).unwrap_or(0.0))
}

/// Reconstructs the reading-order text of one engine page.
pub fn reconstruct_page(page: &RawPage, params: &LayoutParams) -> PageText {
    let built = build_tokens(page);
    if built.is_empty() {
        return PageText::default();
    }

    let median = median_height(&built.heights, params);
    let lines = group_lines(built.tokens, params.line_threshold(median));
    let segments = split_columns(lines, params.gap_threshold(median));
    debug!(
        median_height = median,
        segments = segments.len(),
        "reconstructed page"
    );
    assemble(&segments)
}

/// Merges partial results (pages of one engine call, or tiles of one image).
///
/// Non-empty texts are joined with newlines in the given order; the
/// confidence is the mean of the positive partial confidences.
pub fn merge_texts<I>(parts: I) -> PageText
where
    I: IntoIterator<Item = PageText>,
{
    let mut texts = Vec::new();
    let mut confidences = Vec::new();
    for part in parts {
        if !part.text.is_empty() {
            texts.push(part.text);
        }
        if part.confidence > 0.0 {
            confidences.push(part.confidence);
        }
    }
    let text = texts.join("\n");
    PageText::new(text.trim(), mean(confidences).unwrap_or(0.0))
}

/// Reconstructs and merges every page returned by one engine call.
pub fn reconstruct_pages(pages: &[RawPage], params: &LayoutParams) -> PageText {
    merge_texts(pages.iter().map(|p| reconstruct_page(p, params)))
}

fn mean<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}
