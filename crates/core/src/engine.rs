//! OCR engine boundary.
//!
//! Text detection and recognition are delegated to an external engine. The
//! [`OcrEngine`] trait is the seam; [`CommandEngine`] drives an engine that
//! runs as a separate program and prints PaddleX-style JSON pages.

use std::ffi::OsString;
use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{OcrError, Result};
use crate::layout::RawPage;

/// Maximum number of trailing stderr bytes kept in engine errors.
pub const ENGINE_DETAIL_LIMIT: usize = 1500;

/// Default time an engine process may run on one image.
pub const DEFAULT_ENGINE_TIMEOUT: Duration = Duration::from_secs(120);

/// Lower bound for engine timeouts; model loading alone takes this long.
pub const MIN_ENGINE_TIMEOUT: Duration = Duration::from_secs(2);

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// An OCR engine that recognizes text in an image file.
pub trait OcrEngine {
    /// Runs recognition on the image at `image`.
    ///
    /// An empty vector means the engine found nothing usable.
    fn recognize(&mut self, image: &Path) -> Result<Vec<RawPage>>;
}

impl<E: OcrEngine + ?Sized> OcrEngine for &mut E {
    fn recognize(&mut self, image: &Path) -> Result<Vec<RawPage>> {
        (**self).recognize(image)
    }
}

impl<E: OcrEngine + ?Sized> OcrEngine for Box<E> {
    fn recognize(&mut self, image: &Path) -> Result<Vec<RawPage>> {
        (**self).recognize(image)
    }
}

/// Parses engine output into pages.
///
/// Accepts a JSON array of pages (null entries are skipped), a single page
/// object, or nothing at all. When the output carries log lines before the
/// JSON document, the last line that parses as JSON is used.
pub fn parse_engine_output(output: &str) -> Result<Vec<RawPage>> {
    let trimmed = output.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let value: Value = match serde_json::from_str(trimmed) {
        Ok(v) => v,
        Err(err) => trimmed
            .lines()
            .rev()
            .find_map(|line| {
                serde_json::from_str::<Value>(line.trim())
                    .ok()
                    .filter(|v| v.is_array() || v.is_object())
            })
            .ok_or(OcrError::from(err))?,
    };

    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .into_iter()
            .filter(|item| !item.is_null())
            .map(|item| serde_json::from_value(item).map_err(OcrError::from))
            .collect(),
        Value::Object(_) => Ok(vec![serde_json::from_value(value)?]),
        other => Err(OcrError::EngineOutput(format!(
            "expected a page or a list of pages, got {other}"
        ))),
    }
}

/// Maps a loose language hint to an engine model key.
///
/// The Latin-script `en` model covers Polish and most European languages.
pub fn engine_lang(hint: &str) -> String {
    let l = hint.trim().to_lowercase();
    if l.is_empty() {
        return "en".to_string();
    }
    let key = if l == "latin" || l.contains("pol") || l.contains("pl") || l.contains("eng") {
        "en"
    } else if l == "ch" || l.contains("chi") {
        "ch"
    } else if l == "fr" || l.contains("fra") {
        "fr"
    } else if l == "de" || l.contains("ger") {
        "german"
    } else if l == "ja" || l.contains("jap") {
        "japan"
    } else if l == "ko" || l.contains("kor") {
        "korean"
    } else {
        return l;
    };
    key.to_string()
}

/// An engine running as an external program.
///
/// Invoked as `<program> [args...] --lang <lang> [--use-textline-orientation]
/// <image>`; the program prints its pages as JSON on stdout. A process that
/// outlives its timeout is killed.
#[derive(Debug, Clone)]
pub struct CommandEngine {
    program: OsString,
    args: Vec<OsString>,
    lang: String,
    textline_orientation: bool,
    timeout: Duration,
}

impl CommandEngine {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            lang: "en".to_string(),
            textline_orientation: false,
            timeout: DEFAULT_ENGINE_TIMEOUT,
        }
    }

    /// Adds a leading argument passed before the standard ones.
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Sets the engine model language, already mapped by [`engine_lang`].
    pub fn lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    pub fn textline_orientation(mut self, enabled: bool) -> Self {
        self.textline_orientation = enabled;
        self
    }

    /// Sets how long one engine run may take. Clamped to
    /// [`MIN_ENGINE_TIMEOUT`].
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout.max(MIN_ENGINE_TIMEOUT);
        self
    }

    pub fn timeout_duration(&self) -> Duration {
        self.timeout
    }

    fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }

    fn command(&self, image: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).arg("--lang").arg(&self.lang);
        if self.textline_orientation {
            cmd.arg("--use-textline-orientation");
        }
        cmd.arg(image);
        cmd
    }
}

impl OcrEngine for CommandEngine {
    fn recognize(&mut self, image: &Path) -> Result<Vec<RawPage>> {
        debug!(program = ?self.program, image = %image.display(), "running OCR engine");
        let mut child = self
            .command(image)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| OcrError::Engine {
                message: format!("failed to start {}: {e}", self.program_name()),
                detail: None,
            })?;

        // Pipes are drained while the child runs.
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());
        let status = wait_with_deadline(&mut child, self.timeout)?;
        let stdout = collect(stdout);
        let stderr = collect(stderr);
        let detail = || Some(tail(stderr.trim(), ENGINE_DETAIL_LIMIT).to_string());

        let Some(status) = status else {
            return Err(OcrError::Engine {
                message: format!(
                    "{} timed out after {} ms",
                    self.program_name(),
                    self.timeout.as_millis()
                ),
                detail: detail(),
            });
        };
        if !status.success() {
            return Err(OcrError::Engine {
                message: format!("{} exited with {status}", self.program_name()),
                detail: detail(),
            });
        }

        let pages = parse_engine_output(&stdout)?;
        if pages.is_empty() {
            warn!(image = %image.display(), "OCR engine returned no pages");
        }
        Ok(pages)
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<Vec<u8>>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            // A read error leaves whatever was captured so far.
            let _ = pipe.read_to_end(&mut buf);
            buf
        })
    })
}

fn collect(handle: Option<JoinHandle<Vec<u8>>>) -> String {
    let bytes = handle.and_then(|h| h.join().ok()).unwrap_or_default();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Waits for `child` to exit. Returns `None` after killing it once `timeout`
/// has elapsed.
fn wait_with_deadline(child: &mut Child, timeout: Duration) -> Result<Option<ExitStatus>> {
    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if start.elapsed() >= timeout {
            warn!(timeout_ms = timeout.as_millis() as u64, "OCR engine timed out, killing it");
            let _ = child.kill();
            let _ = child.wait();
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Returns at most the last `limit` bytes of `s`, cut on a char boundary.
pub fn tail(s: &str, limit: usize) -> &str {
    if s.len() <= limit {
        return s;
    }
    let mut start = s.len() - limit;
    while !s.is_char_boundary(start) {
        start += 1;
    }
    &s[start..]
}
