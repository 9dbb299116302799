//! Layout reconstruction parameters.
//!
//! Contains LayoutParams for controlling how tokens are grouped into lines
//! and how lines are split into columns.

/// Parameters for layout reconstruction.
///
/// All thresholds are derived from the median token height of a page, so the
/// same parameters work for small screenshots and high-resolution scans.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutParams {
    /// Two tokens belong to the same line if their vertical centers differ by
    /// at most this fraction of the median token height.
    pub line_threshold_ratio: f64,

    /// Lower bound for the vertical line threshold, in pixels.
    pub min_line_threshold: f64,

    /// A horizontal gap wider than this multiple of the median token height
    /// splits a line into separate column segments.
    pub gap_threshold_ratio: f64,

    /// Lower bound for the column gap threshold, in pixels.
    pub min_gap_threshold: f64,

    /// Median height used when a page has no located tokens or the median
    /// is zero.
    pub default_height: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            line_threshold_ratio: 0.6,
            min_line_threshold: 10.0,
            gap_threshold_ratio: 3.0,
            min_gap_threshold: 80.0,
            default_height: 20.0,
        }
    }
}

impl LayoutParams {
    /// Creates new layout parameters with the specified values.
    ///
    /// # Panics
    /// Panics if any value is negative or not finite, or if `default_height`
    /// is not positive.
    pub fn new(
        line_threshold_ratio: f64,
        min_line_threshold: f64,
        gap_threshold_ratio: f64,
        min_gap_threshold: f64,
        default_height: f64,
    ) -> Self {
        for v in [
            line_threshold_ratio,
            min_line_threshold,
            gap_threshold_ratio,
            min_gap_threshold,
        ] {
            assert!(
                v.is_finite() && v >= 0.0,
                "layout thresholds must be finite and non-negative"
            );
        }
        assert!(
            default_height.is_finite() && default_height > 0.0,
            "default_height must be positive"
        );

        Self {
            line_threshold_ratio,
            min_line_threshold,
            gap_threshold_ratio,
            min_gap_threshold,
            default_height,
        }
    }

    /// Vertical distance within which a token joins the current line.
    pub fn line_threshold(&self, median_height: f64) -> f64 {
        self.min_line_threshold
            .max(median_height * self.line_threshold_ratio)
    }

    /// Horizontal gap beyond which a line is split into segments.
    pub fn gap_threshold(&self, median_height: f64) -> f64 {
        self.min_gap_threshold
            .max(median_height * self.gap_threshold_ratio)
    }
}
