//! Run Coordinator
//!
//! Walks a single invocation through validation, recognition and reading
//! order. Every failure collapses into one failure outcome.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::OcrError;
use crate::result::OcrOutcome;
use crate::vision::{self, OcrEngine};

/// Check that a path was given and that it exists
pub fn validate_image(image: Option<&Path>) -> Result<PathBuf, OcrError> {
    let image = image.ok_or_else(|| OcrError::Usage("No image path provided".to_string()))?;
    if !image.exists() {
        return Err(OcrError::NotFound(image.to_path_buf()));
    }
    debug!("Validated image path {}", image.display());
    Ok(image.to_path_buf())
}

/// Run one recognition.
///
/// The engine is only built once the image path checks out, so a bad path
/// never pays for interpreter discovery.
pub fn run<E, F>(image: Option<&Path>, build_engine: F) -> OcrOutcome
where
    E: OcrEngine,
    F: FnOnce() -> Result<E, OcrError>,
{
    let result = validate_image(image).and_then(|image| {
        let engine = build_engine()?;
        vision::recognize_lines(&engine, &image)
    });

    if let Err(err) = &result {
        info!("Recognition failed: {}", err);
    }
    OcrOutcome::from(result)
}
