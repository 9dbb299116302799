//! ocrlayout - reading-order text reconstruction for OCR engine output.
//!
//! Takes the unordered fragments an OCR engine reports (text, score and a box
//! or polygon) and rebuilds them into plain text: lines top to bottom, tokens
//! left to right, wide gaps split into separate column lines. Tall images can
//! be cut into overlapping tiles before recognition.

pub mod engine;
pub mod error;
pub mod input;
pub mod layout;
pub mod pipeline;
pub mod tile;

pub use engine::{CommandEngine, OcrEngine, engine_lang};
pub use error::{OcrError, Result};
pub use layout::{LayoutParams, PageText, RawPage, reconstruct_page};
pub use pipeline::Recognizer;
pub use tile::{SliceConfig, TileSpan, tile_spans};
