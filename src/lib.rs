//! Run PaddleOCR on a single image and report the recognized text, in
//! reading order, as one JSON document.

pub mod app;
pub mod config;
pub mod error;
pub mod result;
pub mod vision;
