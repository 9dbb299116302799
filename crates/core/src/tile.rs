//! Horizontal tiling of tall images.
//!
//! Very tall screenshots are cut into overlapping bands so that each engine
//! call sees a bounded amount of pixels. Bands are produced top to bottom and
//! the last band always ends at the bottom edge of the image.

use crate::error::{OcrError, Result};

/// Environment variable enabling slicing (`"true"`, case-insensitive).
pub const ENV_SLICE_ENABLE: &str = "OCR_SLICE_ENABLE";
/// Environment variable holding the maximum tile height.
pub const ENV_SLICE_MAX_H: &str = "OCR_SLICE_MAX_H";
/// Environment variable holding the overlap between consecutive tiles.
pub const ENV_SLICE_OVERLAP: &str = "OCR_SLICE_OVERLAP";
/// Environment variable holding the image height that triggers slicing.
pub const ENV_SLICE_MIN_H: &str = "OCR_SLICE_MIN_H";

/// Slicing options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceConfig {
    /// Slicing is off unless explicitly enabled.
    pub enabled: bool,
    /// Height of every full tile, in pixels.
    pub max_height: i64,
    /// Rows shared by consecutive tiles. Negative values count as zero.
    pub overlap: i64,
    /// Images must be taller than both this and `max_height` to be sliced.
    pub min_height: i64,
}

impl Default for SliceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_height: 1800,
            overlap: 220,
            min_height: 2200,
        }
    }
}

impl SliceConfig {
    /// Reads the configuration through `lookup`, which maps a variable name
    /// to its value.
    ///
    /// Unset or empty variables keep their defaults; integers that do not
    /// parse are reported as [`OcrError::Config`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let enabled = lookup(ENV_SLICE_ENABLE)
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(defaults.enabled);

        Ok(Self {
            enabled,
            max_height: int_var(&lookup, ENV_SLICE_MAX_H, defaults.max_height)?,
            overlap: int_var(&lookup, ENV_SLICE_OVERLAP, defaults.overlap)?,
            min_height: int_var(&lookup, ENV_SLICE_MIN_H, defaults.min_height)?,
        })
    }

    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Whether an image of `height` pixels is cut into several tiles.
    pub fn applies_to(&self, height: u32) -> bool {
        self.enabled
            && self.max_height > 0
            && i64::from(height) > self.min_height.max(self.max_height)
    }

    /// Distance between the tops of consecutive tiles.
    pub fn step(&self) -> i64 {
        (self.max_height - self.overlap.max(0)).max(1)
    }
}

fn int_var<F>(lookup: &F, key: &'static str, default: i64) -> Result<i64>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| OcrError::Config { key, value: raw }),
        _ => Ok(default),
    }
}

/// A half-open band `[y_start, y_end)` of image rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileSpan {
    pub y_start: u32,
    pub y_end: u32,
}

impl TileSpan {
    pub fn height(&self) -> u32 {
        self.y_end - self.y_start
    }
}

/// Computes the tile bands for an image of `height` rows.
///
/// Returns a single band covering the image when slicing does not apply.
pub fn tile_spans(height: u32, config: &SliceConfig) -> Vec<TileSpan> {
    if !config.applies_to(height) {
        return vec![TileSpan {
            y_start: 0,
            y_end: height,
        }];
    }

    let h = i64::from(height);
    let max_h = config.max_height;
    let step = config.step();

    let mut spans = Vec::new();
    let mut y0 = 0i64;
    while y0 < h {
        let mut y1 = h.min(y0 + max_h);
        if y1 == h && y1 - y0 < max_h {
            y0 = (h - max_h).max(0);
            y1 = h;
        }
        // Both bounds lie in [0, height], so the conversions cannot fail.
        spans.push(TileSpan {
            y_start: u32::try_from(y0).unwrap_or(0),
            y_end: u32::try_from(y1).unwrap_or(height),
        });
        if y1 == h {
            break;
        }
        y0 += step;
    }
    spans
}
