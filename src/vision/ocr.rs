//! OCR engine capability
//!
//! The recognition engine is external; this module defines the single call
//! we make into it and the two page shapes it may hand back.

use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use tracing::warn;

use super::{Point, Polygon};
use crate::error::OcrError;

/// Trait implemented by OCR backends
pub trait OcrEngine {
    /// Short backend identifier used in logs
    fn name(&self) -> &'static str;

    /// Run recognition on one image, synchronously, to completion
    fn recognize(&self, image: &Path) -> Result<Vec<EnginePage>, OcrError>;
}

/// One page of raw engine output.
///
/// The shape is decided by inspecting the value itself: a map carrying
/// `rec_texts` is the structured form, a plain sequence is the legacy form.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum EnginePage {
    /// Parallel arrays of texts and detection polygons
    Structured {
        rec_texts: Vec<String>,
        #[serde(default)]
        dt_polys: Option<Vec<Polygon>>,
    },
    /// Line tuples of `[polygon, [text, score]]`, possibly with nulls
    Legacy(Vec<Value>),
}

impl EnginePage {
    /// Split the page into texts and, when every text has one, polygons.
    pub fn into_parts(self) -> (Vec<String>, Option<Vec<Polygon>>) {
        match self {
            EnginePage::Structured { rec_texts, dt_polys } => (rec_texts, dt_polys),
            EnginePage::Legacy(lines) => legacy_parts(lines),
        }
    }
}

fn legacy_parts(lines: Vec<Value>) -> (Vec<String>, Option<Vec<Polygon>>) {
    let mut texts = Vec::with_capacity(lines.len());
    let mut polygons = Some(Vec::with_capacity(lines.len()));

    for line in lines {
        let Some(parts) = line.as_array().filter(|parts| parts.len() >= 2) else {
            continue;
        };
        let Some(text) = parts[1]
            .as_array()
            .and_then(|info| info.first())
            .map(value_to_text)
        else {
            continue;
        };

        texts.push(text);
        match parse_polygon(&parts[0]) {
            Some(polygon) => {
                if let Some(list) = polygons.as_mut() {
                    list.push(polygon);
                }
            }
            None => {
                if polygons.take().is_some() {
                    warn!("Legacy line without a usable polygon, keeping engine order");
                }
            }
        }
    }

    (texts, polygons)
}

fn parse_polygon(value: &Value) -> Option<Polygon> {
    serde_json::from_value::<Vec<Point>>(value.clone())
        .ok()
        .filter(|points| !points.is_empty())
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
