#![allow(dead_code)]

use std::path::{Path, PathBuf};

use ocrlayout_core::layout::RawPage;
use ocrlayout_core::{OcrEngine, OcrError, Result};

#[derive(Clone)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    pub fn gen_f64(&mut self, min: f64, max: f64) -> f64 {
        let n = self.next_u64() as f64 / u64::MAX as f64;
        min + (max - min) * n
    }
}

/// Random page of `n` boxed words spread over a 1000x2000 canvas.
pub fn random_page(rng: &mut XorShift64, n: usize) -> RawPage {
    let mut page = RawPage::new();
    for i in 0..n {
        let x0 = rng.gen_f64(0.0, 900.0);
        let y0 = rng.gen_f64(0.0, 1950.0);
        let w = rng.gen_f64(5.0, 100.0);
        let h = rng.gen_f64(8.0, 40.0);
        let score = rng.gen_f64(0.3, 1.0);
        page.push_box(&format!("w{i}"), Some(score), [x0, y0, x0 + w, y0 + h]);
    }
    page
}

/// Engine that replays queued responses and records what it was given.
#[derive(Default)]
pub struct ScriptedEngine {
    pub responses: Vec<Result<Vec<RawPage>>>,
    pub seen_paths: Vec<PathBuf>,
    pub seen_heights: Vec<u32>,
    pub existed_during_call: Vec<bool>,
}

impl ScriptedEngine {
    pub fn new(responses: Vec<Result<Vec<RawPage>>>) -> Self {
        Self {
            responses,
            ..Self::default()
        }
    }
}

impl OcrEngine for ScriptedEngine {
    fn recognize(&mut self, image: &Path) -> Result<Vec<RawPage>> {
        self.seen_paths.push(image.to_path_buf());
        self.existed_during_call.push(image.exists());
        let decoded = image::open(image).map_err(|e| OcrError::InvalidImage(e.to_string()))?;
        self.seen_heights.push(decoded.height());
        if self.responses.is_empty() {
            return Ok(Vec::new());
        }
        self.responses.remove(0)
    }
}

/// Page with one word per entry, each on its own 20px row starting at `top`.
pub fn rows_page(words: &[&str], top: f64, score: f64) -> RawPage {
    let mut page = RawPage::new();
    for (i, word) in words.iter().enumerate() {
        let y = top + i as f64 * 40.0;
        page.push_box(word, Some(score), [10.0, y, 90.0, y + 20.0]);
    }
    page
}
