//! ocr2txt - Reading-order text from an image via an OCR engine
//!
//! Reads one base64-encoded image (optionally a data URI) from stdin, runs it
//! through the configured OCR engine and prints a single JSON object:
//! `{"ok": true, "text": ..., "confidence": ...}` on success, or
//! `{"ok": false, "error": ...}` with exit status 1 on failure.
//!
//! Tall images are sliced when `OCR_SLICE_ENABLE=true`; see
//! `OCR_SLICE_MAX_H`, `OCR_SLICE_OVERLAP` and `OCR_SLICE_MIN_H`.

use std::error::Error as _;
use std::io::{self, Read, Write};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::{ArgAction, Parser};
use ocrlayout_core::engine::{ENGINE_DETAIL_LIMIT, tail};
use ocrlayout_core::input::decode_base64_payload;
use ocrlayout_core::{CommandEngine, OcrError, PageText, Recognizer, SliceConfig, engine_lang};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Rebuild reading-order text from OCR engine output.
#[derive(Parser, Debug)]
#[command(name = "ocr2txt")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Language hint, mapped to an engine model (pl, en, de, ja, ...)
    #[arg(long, default_value = "pl")]
    lang: String,

    /// Let the engine detect and correct rotated text lines
    #[arg(long, action = ArgAction::SetTrue)]
    angle: bool,

    /// OCR engine program; receives the tile image path as last argument
    #[arg(short = 'e', long, default_value = "paddleocr-json")]
    engine: String,

    /// Extra argument passed to the engine before the standard ones (repeatable)
    #[arg(long = "engine-arg", allow_hyphen_values = true)]
    engine_args: Vec<String>,

    /// Kill the engine if one image takes longer than this (min 2000)
    #[arg(long = "timeout-ms", default_value_t = 120_000)]
    timeout_ms: u64,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,
}

#[derive(Serialize)]
struct Success<'a> {
    ok: bool,
    text: &'a str,
    confidence: f64,
}

#[derive(Serialize)]
struct Failure {
    ok: bool,
    error: String,
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // stdout is reserved for the JSON response.
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .init();
}

fn build_engine(args: &Args) -> CommandEngine {
    let engine = args
        .engine_args
        .iter()
        .fold(CommandEngine::new(&args.engine), |engine, arg| engine.arg(arg));
    engine
        .lang(engine_lang(&args.lang))
        .textline_orientation(args.angle)
        .timeout(Duration::from_millis(args.timeout_ms))
}

/// Formats an error as `<Kind>: <message>`, followed by the bounded tail of
/// its diagnostic detail and of any source not already shown in the message.
fn describe_error(err: &OcrError) -> String {
    let head = format!("{}: {}", err.kind(), err);
    let mut trace = Vec::new();
    if let Some(detail) = err.detail() {
        trace.push(detail.to_string());
    }
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !head.contains(&cause_text) {
            trace.push(format!("caused by: {cause_text}"));
        }
        source = cause.source();
    }

    if trace.is_empty() {
        head
    } else {
        let trace = trace.join("\n");
        format!("{head}\n{}", tail(&trace, ENGINE_DETAIL_LIMIT))
    }
}

fn run(args: &Args) -> Result<PageText, OcrError> {
    let mut payload = Vec::new();
    io::stdin().lock().read_to_end(&mut payload)?;
    debug!(bytes = payload.len(), "read payload");

    let Some(image) = decode_base64_payload(&payload)? else {
        return Ok(PageText::default());
    };

    let slicing = SliceConfig::from_env()?;
    let mut recognizer = Recognizer::new(build_engine(args)).with_slicing(slicing);
    recognizer.recognize_bytes(&image)
}

fn render(outcome: &Result<PageText, OcrError>) -> serde_json::Result<String> {
    match outcome {
        Ok(page) => serde_json::to_string(&Success {
            ok: true,
            text: &page.text,
            confidence: page.confidence,
        }),
        Err(err) => serde_json::to_string(&Failure {
            ok: false,
            error: describe_error(err),
        }),
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    init_tracing(args.debug);

    let outcome = run(&args);
    let response = render(&outcome).context("failed to encode response")?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{response}").context("failed to write response")?;
    stdout.flush()?;

    Ok(if outcome.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_result_renders_ok() {
        let json = render(&Ok(PageText::default())).unwrap();
        assert_eq!(json, r#"{"ok":true,"text":"","confidence":0.0}"#);
    }

    #[test]
    fn non_ascii_text_is_not_escaped() {
        let json = render(&Ok(PageText::new("Zażółć gęślą jaźń", 0.5))).unwrap();
        assert_eq!(
            json,
            r#"{"ok":true,"text":"Zażółć gęślą jaźń","confidence":0.5}"#
        );
    }

    #[test]
    fn engine_error_carries_kind_and_detail() {
        let err = OcrError::Engine {
            message: "paddleocr-json exited with exit status: 1".to_string(),
            detail: Some("x".repeat(4000)),
        };
        let text = describe_error(&err);
        assert!(text.starts_with("EngineError: OCR engine failed: paddleocr-json exited"));
        let (_, trace) = text.split_once('\n').unwrap();
        assert_eq!(trace.len(), ENGINE_DETAIL_LIMIT);

        let json = render(&Err(err)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["ok"], false);
        assert!(value["error"].as_str().unwrap().starts_with("EngineError"));
    }

    #[test]
    fn io_error_is_not_repeated() {
        let err = OcrError::from(io::Error::other("pipe closed"));
        assert_eq!(
            describe_error(&err),
            "IoError: io error: pipe closed"
        );
    }

    #[test]
    fn engine_args_keep_order() {
        let args = Args::parse_from([
            "ocr2txt",
            "--lang",
            "de",
            "--angle",
            "--engine",
            "python3",
            "--engine-arg",
            "paddle_ocr.py",
            "--engine-arg",
            "--quiet",
            "--timeout-ms",
            "5000",
        ]);
        assert_eq!(args.engine_args, vec!["paddle_ocr.py", "--quiet"]);
        assert!(args.angle);
        let engine = build_engine(&args);
        assert_eq!(engine.timeout_duration(), Duration::from_millis(5000));
    }

    #[test]
    fn default_timeout_is_two_minutes() {
        let args = Args::parse_from(["ocr2txt"]);
        assert_eq!(build_engine(&args).timeout_duration(), Duration::from_secs(120));
    }
}
