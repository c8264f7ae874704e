//! Error taxonomy
//!
//! Every failure of a run ends up as one of these variants and is reported
//! through the JSON failure result, never as a panic.

use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single recognition run
#[derive(Debug, Error)]
pub enum OcrError {
    /// No image path supplied, or the command line could not be parsed
    #[error("{0}")]
    Usage(String),

    /// The image path does not exist
    #[error("Image not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The Python interpreter or the PaddleOCR package is unavailable
    #[error("{0}")]
    Dependency(String),

    /// The engine failed while configuring itself or running inference
    #[error("{0}")]
    Engine(String),

    /// The configuration file exists but is unusable
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl OcrError {
    /// Error for a missing `paddleocr` package
    pub fn missing_package(detail: impl std::fmt::Display) -> Self {
        OcrError::Dependency(format!(
            "PaddleOCR not installed: {detail}. Run: pip3 install paddleocr paddlepaddle"
        ))
    }
}
