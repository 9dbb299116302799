//! Error types for the ocrlayout library.

use thiserror::Error;

/// Primary error type for OCR post-processing operations.
///
/// Geometry that cannot be resolved is not an error; such fragments become
/// unlocated tokens instead.
#[derive(Error, Debug)]
pub enum OcrError {
    #[error("base64 decode failed: {0}")]
    Base64(String),

    #[error("invalid image: {0}")]
    InvalidImage(String),

    #[error("OCR engine failed: {message}")]
    Engine { message: String, detail: Option<String> },

    #[error("malformed OCR engine output: {0}")]
    EngineOutput(String),

    #[error("invalid value for {key}: {value:?}")]
    Config { key: &'static str, value: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl OcrError {
    /// Stable name of the error kind, used as the prefix of user-facing
    /// error strings.
    pub fn kind(&self) -> &'static str {
        match self {
            OcrError::Base64(_) => "Base64Error",
            OcrError::InvalidImage(_) => "ImageError",
            OcrError::Engine { .. } => "EngineError",
            OcrError::EngineOutput(_) => "EngineOutputError",
            OcrError::Config { .. } => "ConfigError",
            OcrError::Io(_) => "IoError",
        }
    }

    /// Extra diagnostic text attached to the error, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            OcrError::Engine { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

impl From<image::ImageError> for OcrError {
    fn from(err: image::ImageError) -> Self {
        OcrError::InvalidImage(err.to_string())
    }
}

impl From<serde_json::Error> for OcrError {
    fn from(err: serde_json::Error) -> Self {
        OcrError::EngineOutput(err.to_string())
    }
}

/// Convenience Result type alias for OcrError.
pub type Result<T> = std::result::Result<T, OcrError>;
