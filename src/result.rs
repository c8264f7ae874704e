//! Result serialization
//!
//! The JSON document printed on stdout is the only observable artifact of a
//! run, so it has exactly one shape for both outcomes.

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::process::ExitCode;

use crate::error::OcrError;

/// Outcome of one run, as printed on stdout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrOutcome {
    /// Whether recognition completed
    pub success: bool,
    /// Failure message, absent on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// All lines joined with `\n`
    pub text: String,
    /// Recognized lines in reading order
    pub lines: Vec<String>,
}

impl OcrOutcome {
    /// Successful outcome; `text` is derived from `lines`
    pub fn success(lines: Vec<String>) -> Self {
        Self {
            success: true,
            error: None,
            text: lines.join("\n"),
            lines,
        }
    }

    /// Failed outcome with empty text and lines
    pub fn failure(err: &OcrError) -> Self {
        Self {
            success: false,
            error: Some(err.to_string()),
            text: String::new(),
            lines: Vec::new(),
        }
    }

    /// Process exit code matching this outcome
    pub fn exit_code(&self) -> ExitCode {
        if self.success {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }

    /// Write the outcome as a single JSON line
    pub fn write_to<W: Write>(&self, mut out: W) -> std::io::Result<()> {
        serde_json::to_writer(&mut out, self)?;
        out.write_all(b"\n")?;
        out.flush()
    }
}

impl From<Result<Vec<String>, OcrError>> for OcrOutcome {
    fn from(result: Result<Vec<String>, OcrError>) -> Self {
        match result {
            Ok(lines) => OcrOutcome::success(lines),
            Err(err) => OcrOutcome::failure(&err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_success_text_matches_lines() {
        let outcome = OcrOutcome::success(vec!["first".to_string(), "second".to_string()]);
        assert!(outcome.success);
        assert_eq!(outcome.text, "first\nsecond");
        assert_eq!(outcome.text, outcome.lines.join("\n"));
    }

    #[test]
    fn test_success_json_shape() {
        let outcome = OcrOutcome::success(vec!["a".to_string(), "b".to_string()]);
        let mut buf = Vec::new();
        outcome.write_to(&mut buf).unwrap();

        let printed = String::from_utf8(buf).unwrap();
        assert_eq!(
            printed,
            "{\"success\":true,\"text\":\"a\\nb\",\"lines\":[\"a\",\"b\"]}\n"
        );
    }

    #[test]
    fn test_failure_json_shape() {
        let outcome = OcrOutcome::failure(&OcrError::NotFound(PathBuf::from("x.png")));
        let mut buf = Vec::new();
        outcome.write_to(&mut buf).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["error"], "Image not found: x.png");
        assert_eq!(value["text"], "");
        assert_eq!(value["lines"], serde_json::json!([]));
    }

    #[test]
    fn test_empty_success_has_no_error_field() {
        let outcome = OcrOutcome::success(Vec::new());
        let value = serde_json::to_value(&outcome).unwrap();
        assert!(value.get("error").is_none());
        assert_eq!(value["text"], "");
    }

    #[test]
    fn test_exit_codes() {
        let ok = OcrOutcome::success(vec![]);
        let failed = OcrOutcome::failure(&OcrError::Usage("No image path provided".into()));
        assert_eq!(ok.exit_code(), ExitCode::SUCCESS);
        assert_eq!(failed.exit_code(), ExitCode::FAILURE);
    }
}
