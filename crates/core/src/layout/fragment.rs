//! Raw recognition output as returned by the OCR engine.
//!
//! The engine reports a page as parallel arrays, PaddleX style: recognized
//! texts, their scores, and geometry as boxes and/or polygons. Any of the
//! parallel arrays may be missing, shorter than `rec_texts`, or not a list at
//! all; a column that is not a list is treated as absent.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::geometry::Point;

/// One page of engine output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPage {
    /// Recognized texts. Entries that are not strings are ignored.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub rec_texts: Value,

    /// Recognition scores, parallel to `rec_texts`.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub rec_scores: Value,

    /// Axis-aligned boxes `[xmin, ymin, xmax, ymax]`, parallel to `rec_texts`.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub rec_boxes: Value,

    /// Polygons as point lists, parallel to `rec_texts`.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub rec_polys: Value,
}

/// A single recognized region, borrowed from a [`RawPage`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fragment<'a> {
    /// Position of the fragment in engine order.
    pub index: usize,
    pub text: &'a str,
    pub score: Option<f64>,
    pub box_hint: Option<&'a Value>,
    pub poly_hint: Option<&'a Value>,
}

impl RawPage {
    /// Creates an empty page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries in `rec_texts`, including non-string ones.
    pub fn len(&self) -> usize {
        self.rec_texts.as_array().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over string fragments in engine order.
    pub fn fragments(&self) -> impl Iterator<Item = Fragment<'_>> + '_ {
        self.rec_texts
            .as_array()
            .into_iter()
            .flatten()
            .enumerate()
            .filter_map(move |(index, text)| {
                Some(Fragment {
                    index,
                    text: text.as_str()?,
                    score: entry(&self.rec_scores, index)
                        .and_then(Value::as_f64)
                        .filter(|v| v.is_finite()),
                    box_hint: entry(&self.rec_boxes, index),
                    poly_hint: entry(&self.rec_polys, index),
                })
            })
    }

    /// Appends a fragment with an axis-aligned box.
    pub fn push_box(&mut self, text: &str, score: Option<f64>, rect: [f64; 4]) {
        self.push(text, score, Value::from(rect.to_vec()), Value::Null);
    }

    /// Appends a fragment with a polygon.
    pub fn push_polygon(&mut self, text: &str, score: Option<f64>, points: &[Point]) {
        let poly = points
            .iter()
            .map(|&(x, y)| Value::from(vec![x, y]))
            .collect::<Vec<_>>();
        self.push(text, score, Value::Null, Value::Array(poly));
    }

    /// Appends a fragment without geometry.
    pub fn push_unlocated(&mut self, text: &str, score: Option<f64>) {
        self.push(text, score, Value::Null, Value::Null);
    }

    fn push(&mut self, text: &str, score: Option<f64>, rect: Value, poly: Value) {
        let index = self.len();
        push_at(&mut self.rec_texts, index, Value::from(text));
        push_at(&mut self.rec_scores, index, score.map_or(Value::Null, Value::from));
        push_at(&mut self.rec_boxes, index, rect);
        push_at(&mut self.rec_polys, index, poly);
    }
}

fn entry(column: &Value, index: usize) -> Option<&Value> {
    column.as_array()?.get(index)
}

// Keeps a parallel array aligned with `rec_texts`, padding with nulls.
fn push_at(column: &mut Value, index: usize, value: Value) {
    if !column.is_array() {
        *column = Value::Array(Vec::new());
    }
    if let Value::Array(items) = column {
        items.resize(index, Value::Null);
        items.push(value);
    }
}
