//! Vision/OCR Layer
//!
//! Runs the external OCR engine on an image and turns its raw output into
//! lines of text in reading order.
//! - `ocr`: engine capability and the raw page shapes it returns
//! - `paddle`: PaddleOCR driven through a child Python interpreter
//! - `layout`: reading-order reconstruction over detected regions

pub mod layout;
pub mod ocr;
pub mod paddle;

use std::path::Path;
use tracing::{debug, info};

use crate::error::OcrError;

pub use layout::{reading_order, LayoutEntry};
pub use ocr::{EnginePage, OcrEngine};
pub use paddle::{PaddleOcr, PaddleOptions};

/// A 2-D point in image pixel coordinates
pub type Point = [f64; 2];

/// Bounding polygon of a text region, in detector order
pub type Polygon = Vec<Point>;

/// Run `engine` on `image` and return every recognized line in reading order.
///
/// Each page is ordered on its own and pages are concatenated in the order
/// the engine returned them.
pub fn recognize_lines(engine: &dyn OcrEngine, image: &Path) -> Result<Vec<String>, OcrError> {
    info!("Running {} on {}", engine.name(), image.display());
    let pages = engine.recognize(image)?;

    let mut lines = Vec::new();
    for (index, page) in pages.into_iter().enumerate() {
        let (texts, polygons) = page.into_parts();
        debug!(
            "Page {}: {} texts, {} polygons",
            index,
            texts.len(),
            polygons.as_ref().map_or(0, Vec::len)
        );
        lines.extend(reading_order(texts, polygons.as_deref()));
    }

    info!("Recognized {} lines", lines.len());
    Ok(lines)
}
