//! Layout reconstruction for OCR output.
//!
//! This module contains:
//! - Raw engine pages and fragments (RawPage, Fragment)
//! - Geometry normalization (Rect)
//! - Token building, line grouping and column splitting
//! - Page assembly into reading-order text (PageText)
//! - Layout parameters (LayoutParams)

pub mod columns;
pub mod fragment;
pub mod geometry;
pub mod lines;
pub mod page;
pub mod params;
pub mod token;

pub use columns::{split_columns, split_line};
pub use fragment::{Fragment, RawPage};
pub use geometry::{Point, Rect};
pub use lines::{Line, Segment, group_lines, median_height};
pub use page::{PageText, assemble, merge_texts, reconstruct_page, reconstruct_pages};
pub use params::LayoutParams;
pub use token::{Anchor, PageTokens, Token, build_tokens};
