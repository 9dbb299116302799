//! End-to-end recognition: image in, reading-order text out.
//!
//! The image is cut into tiles (usually just one), each tile is written to a
//! temporary PNG, handed to the engine, and the engine's pages are rebuilt
//! into text. Tiles run strictly one after another; the first failure aborts
//! the whole image.

use std::io::Write;

use image::{ImageFormat, RgbImage, imageops};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::engine::OcrEngine;
use crate::error::Result;
use crate::input::{decode_base64_payload, decode_image};
use crate::layout::{LayoutParams, PageText, merge_texts, reconstruct_pages};
use crate::tile::{SliceConfig, TileSpan, tile_spans};

/// Prefix of the per-tile temporary image files.
pub const TILE_FILE_PREFIX: &str = "ocr_";

/// Runs images through an engine and the layout reconstruction.
#[derive(Debug)]
pub struct Recognizer<E> {
    engine: E,
    slicing: SliceConfig,
    layout: LayoutParams,
}

impl<E: OcrEngine> Recognizer<E> {
    /// Creates a recognizer with default slicing (off) and layout parameters.
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            slicing: SliceConfig::default(),
            layout: LayoutParams::default(),
        }
    }

    pub fn with_slicing(mut self, slicing: SliceConfig) -> Self {
        self.slicing = slicing;
        self
    }

    pub fn with_layout(mut self, layout: LayoutParams) -> Self {
        self.layout = layout;
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn into_engine(self) -> E {
        self.engine
    }

    /// Recognizes a base64 payload. An empty payload yields empty text.
    pub fn recognize_payload(&mut self, payload: &[u8]) -> Result<PageText> {
        match decode_base64_payload(payload)? {
            Some(bytes) => self.recognize_bytes(&bytes),
            None => Ok(PageText::default()),
        }
    }

    /// Decodes encoded image bytes and recognizes them.
    pub fn recognize_bytes(&mut self, bytes: &[u8]) -> Result<PageText> {
        let image = decode_image(bytes)?;
        self.recognize_image(&image)
    }

    /// Recognizes a decoded image, tile by tile.
    pub fn recognize_image(&mut self, image: &RgbImage) -> Result<PageText> {
        let spans = tile_spans(image.height(), &self.slicing);
        debug!(
            width = image.width(),
            height = image.height(),
            tiles = spans.len(),
            "recognizing image"
        );

        let mut parts = Vec::with_capacity(spans.len());
        for span in spans {
            parts.push(self.recognize_tile(image, span)?);
        }
        Ok(merge_texts(parts))
    }

    fn recognize_tile(&mut self, image: &RgbImage, span: TileSpan) -> Result<PageText> {
        let crop = imageops::crop_imm(image, 0, span.y_start, image.width(), span.height())
            .to_image();

        // Removed when `artifact` drops, including on early return.
        let mut artifact = tempfile::Builder::new()
            .prefix(TILE_FILE_PREFIX)
            .suffix(".png")
            .tempfile()?;
        write_png(&crop, &mut artifact)?;

        let pages = self.engine.recognize(artifact.path())?;
        let text = reconstruct_pages(&pages, &self.layout);
        debug!(
            y_start = span.y_start,
            y_end = span.y_end,
            pages = pages.len(),
            chars = text.text.len(),
            "tile done"
        );
        Ok(text)
    }
}

fn write_png(image: &RgbImage, file: &mut NamedTempFile) -> Result<()> {
    image.write_to(file.as_file_mut(), ImageFormat::Png)?;
    file.flush()?;
    Ok(())
}
