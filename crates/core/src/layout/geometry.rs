//! Geometry normalization for OCR fragments.
//!
//! Engines describe a recognized region either as an axis-aligned box
//! `[xmin, ymin, xmax, ymax]` or as a polygon of points. Both reduce to the
//! canonical [`Rect`]. Shapes that cannot be read yield `None`; a fragment
//! without geometry is still usable, it just has no position.

use serde_json::Value;

/// A rectangle `(xmin, ymin, xmax, ymax)` in image pixel coordinates, with the
/// origin at the top-left corner.
pub type Rect = (f64, f64, f64, f64);

/// A 2D point (x, y).
pub type Point = (f64, f64);

/// Builds a rectangle from two corners, ordering the coordinates.
pub fn rect_from_corners(x0: f64, y0: f64, x1: f64, y1: f64) -> Rect {
    (x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1))
}

/// Smallest rectangle containing all points, or `None` for an empty slice or
/// non-finite coordinates.
pub fn bounding_rect(points: &[Point]) -> Option<Rect> {
    let (first, rest) = points.split_first()?;
    let mut rect = (first.0, first.1, first.0, first.1);
    for &(x, y) in rest {
        rect.0 = rect.0.min(x);
        rect.1 = rect.1.min(y);
        rect.2 = rect.2.max(x);
        rect.3 = rect.3.max(y);
    }
    let finite = [rect.0, rect.1, rect.2, rect.3]
        .iter()
        .all(|v| v.is_finite());
    finite.then_some(rect)
}

/// Reads a rectangle hint: an array of exactly four numbers.
pub fn rect_from_box(value: &Value) -> Option<Rect> {
    let items = value.as_array()?;
    if items.len() != 4 {
        return None;
    }
    let mut coords = [0.0; 4];
    for (slot, item) in coords.iter_mut().zip(items) {
        *slot = finite_number(item)?;
    }
    Some(rect_from_corners(coords[0], coords[1], coords[2], coords[3]))
}

/// Reads a polygon hint: a non-empty array of points, where a point is either
/// an array `[x, y, ...]` or an object with numeric `x` and `y` fields.
pub fn rect_from_polygon(value: &Value) -> Option<Rect> {
    let points = value
        .as_array()?
        .iter()
        .map(point_from_value)
        .collect::<Option<Vec<Point>>>()?;
    bounding_rect(&points)
}

/// Resolves a fragment's geometry, trying the rectangle hint before the
/// polygon hint.
pub fn resolve(box_hint: Option<&Value>, poly_hint: Option<&Value>) -> Option<Rect> {
    box_hint
        .and_then(rect_from_box)
        .or_else(|| poly_hint.and_then(rect_from_polygon))
}

fn point_from_value(value: &Value) -> Option<Point> {
    match value {
        Value::Array(coords) if coords.len() >= 2 => {
            Some((finite_number(&coords[0])?, finite_number(&coords[1])?))
        }
        Value::Object(map) => Some((
            finite_number(map.get("x")?)?,
            finite_number(map.get("y")?)?,
        )),
        _ => None,
    }
}

fn finite_number(value: &Value) -> Option<f64> {
    value.as_f64().filter(|v| v.is_finite())
}
