//! Token construction from raw engine fragments.
//!
//! A token is a fragment reduced to what layout reconstruction needs: its
//! vertical center, horizontal extent, text and score. Fragments whose
//! geometry cannot be resolved become unlocated tokens that keep their engine
//! order.

use super::fragment::{Fragment, RawPage};
use super::geometry;

/// How a token is positioned on the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Anchor {
    /// Geometry was resolved; `height` is the box height, clamped at zero.
    Located { height: f64 },
    /// No usable geometry; `index` is the fragment's position in engine order.
    Unlocated { index: usize },
}

/// A positioned piece of recognized text.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub center_y: f64,
    pub x_start: f64,
    pub x_end: f64,
    pub text: String,
    pub score: Option<f64>,
    pub anchor: Anchor,
}

impl Token {
    /// Builds a token from a fragment, or `None` for blank text.
    pub fn from_fragment(frag: &Fragment<'_>) -> Option<Token> {
        if frag.text.trim().is_empty() {
            return None;
        }

        let token = match geometry::resolve(frag.box_hint, frag.poly_hint) {
            Some((x0, y0, x1, y1)) => Token {
                center_y: (y0 + y1) / 2.0,
                x_start: x0,
                x_end: x1,
                text: frag.text.to_string(),
                score: frag.score,
                anchor: Anchor::Located {
                    height: (y1 - y0).max(0.0),
                },
            },
            None => Token {
                center_y: 0.0,
                x_start: 0.0,
                x_end: 0.0,
                text: frag.text.to_string(),
                score: frag.score,
                anchor: Anchor::Unlocated { index: frag.index },
            },
        };
        Some(token)
    }

    pub fn is_located(&self) -> bool {
        matches!(self.anchor, Anchor::Located { .. })
    }

    /// Box height of a located token.
    pub fn height(&self) -> Option<f64> {
        match self.anchor {
            Anchor::Located { height } => Some(height),
            Anchor::Unlocated { .. } => None,
        }
    }
}

/// Tokens of one page together with the heights of the located ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageTokens {
    pub tokens: Vec<Token>,
    pub heights: Vec<f64>,
}

impl PageTokens {
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Converts every usable fragment of a page into a token, in engine order.
pub fn build_tokens(page: &RawPage) -> PageTokens {
    let mut out = PageTokens::default();
    for token in page.fragments().filter_map(|f| Token::from_fragment(&f)) {
        if let Some(h) = token.height() {
            out.heights.push(h);
        }
        out.tokens.push(token);
    }
    out
}
