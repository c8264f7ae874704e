//! PaddleOCR backend
//!
//! PaddleOCR lives in Python, so each recognition runs a small bridge script
//! in a child interpreter. The bridge prints one JSON reply line on stdout,
//! possibly after whatever the engine itself printed; the child's stderr is
//! only replayed into our logs.

use serde::Deserialize;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info, warn};

use super::ocr::{EnginePage, OcrEngine};
use crate::error::OcrError;

const BRIDGE_SCRIPT: &str = include_str!("paddle_bridge.py");

/// Recognition model used unless configured otherwise
pub const DEFAULT_RECOGNITION_MODEL: &str = "PP-OCRv5_server_rec";

/// Recognition language passed to the engine
const LANGUAGE: &str = "en";

/// Interpreters tried, in order, before falling back to PATH
const PYTHON_CANDIDATES: [&str; 3] = [
    "/opt/homebrew/bin/python3",
    "/usr/local/bin/python3",
    "/usr/bin/python3",
];

/// Tool directories prepended to the child PATH
const TOOL_DIRS: [&str; 3] = ["/opt/homebrew/bin", "/usr/local/bin", "/opt/homebrew/sbin"];

/// User-level script directories, relative to the home directory
const HOME_TOOL_DIRS: [&str; 4] = [
    "Library/Python/3.11/bin",
    "Library/Python/3.12/bin",
    "Library/Python/3.13/bin",
    ".local/bin",
];

/// Silences glog output from the Paddle runtime
const LOG_LEVEL_VAR: (&str, &str) = ("GLOG_minloglevel", "2");

/// Skips the model hoster connectivity check on startup
const SOURCE_CHECK_VAR: (&str, &str) = ("PADDLE_PDX_DISABLE_MODEL_SOURCE_CHECK", "True");

/// Engine configuration handed to [`PaddleOcr::new`]
#[derive(Debug, Clone, PartialEq)]
pub struct PaddleOptions {
    /// Interpreter to use instead of discovery
    pub python: Option<PathBuf>,
    /// Name of the text recognition model
    pub text_recognition_model: String,
    /// Keep the Paddle runtime's own logging quiet
    pub suppress_engine_logs: bool,
    /// Extra directories searched before the defaults
    pub search_paths: Vec<PathBuf>,
}

impl Default for PaddleOptions {
    fn default() -> Self {
        Self {
            python: None,
            text_recognition_model: DEFAULT_RECOGNITION_MODEL.to_string(),
            suppress_engine_logs: true,
            search_paths: Vec::new(),
        }
    }
}

impl PaddleOptions {
    /// Keyword arguments for the `PaddleOCR` constructor
    fn predictor_args(&self) -> serde_json::Value {
        serde_json::json!({
            "text_recognition_model_name": self.text_recognition_model,
            "use_doc_orientation_classify": false,
            "use_doc_unwarping": false,
            "use_textline_orientation": false,
            "lang": LANGUAGE,
        })
    }

    /// Environment set on the child when not already inherited
    fn engine_env(&self) -> Vec<(&'static str, &'static str)> {
        let mut vars = vec![SOURCE_CHECK_VAR];
        if self.suppress_engine_logs {
            vars.push(LOG_LEVEL_VAR);
        }
        vars
    }
}

/// PaddleOCR driven through a child Python interpreter
#[derive(Debug)]
pub struct PaddleOcr {
    python: PathBuf,
    path_env: OsString,
    options: PaddleOptions,
}

impl PaddleOcr {
    /// Resolve the interpreter and prepare the child environment.
    pub fn new(options: PaddleOptions) -> Result<Self, OcrError> {
        let home = directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());
        let path_env = child_path(
            &options.search_paths,
            home.as_deref(),
            std::env::var_os("PATH"),
        )?;

        let python = locate_python(options.python.as_deref(), &PYTHON_CANDIDATES, &path_env)?;
        info!("Using Python interpreter {}", python.display());

        Ok(Self {
            python,
            path_env,
            options,
        })
    }

    fn command(&self, image: &Path) -> Command {
        let mut command = Command::new(&self.python);
        command
            .arg("-c")
            .arg(BRIDGE_SCRIPT)
            .arg(image)
            .arg(self.options.predictor_args().to_string())
            .env("PATH", &self.path_env)
            .stdin(Stdio::null());

        for (key, value) in self.options.engine_env() {
            if std::env::var_os(key).is_none() {
                command.env(key, value);
            }
        }
        command
    }
}

impl OcrEngine for PaddleOcr {
    fn name(&self) -> &'static str {
        "paddleocr"
    }

    fn recognize(&self, image: &Path) -> Result<Vec<EnginePage>, OcrError> {
        debug!("Spawning {} for {}", self.python.display(), image.display());

        let output = self.command(image).output().map_err(|e| match e.kind() {
            ErrorKind::NotFound | ErrorKind::PermissionDenied => OcrError::Dependency(format!(
                "Failed to start Python interpreter {}: {}",
                self.python.display(),
                e
            )),
            _ => OcrError::Engine(format!("Failed to run OCR engine: {}", e)),
        })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        for line in stderr.lines().filter(|l| !l.trim().is_empty()) {
            debug!(target: "paddleocr", "{}", line);
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        match parse_reply(&stdout) {
            Some(reply) => {
                if !output.status.success() {
                    warn!("OCR engine exited with {} after replying", output.status);
                }
                reply.into_pages()
            }
            None => Err(OcrError::Engine(format!(
                "OCR engine exited with {} without a result{}",
                output.status,
                last_line(&stderr)
                    .map(|line| format!(": {}", line))
                    .unwrap_or_default()
            ))),
        }
    }
}

/// Reply line printed by the bridge script
#[derive(Debug, Deserialize)]
struct BridgeReply {
    ok: bool,
    #[serde(default)]
    pages: Vec<EnginePage>,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl BridgeReply {
    fn into_pages(self) -> Result<Vec<EnginePage>, OcrError> {
        if self.ok {
            return Ok(self.pages);
        }

        let message = self
            .message
            .unwrap_or_else(|| "OCR engine reported an unknown error".to_string());
        match self.kind.as_deref() {
            Some("dependency") => Err(OcrError::missing_package(message)),
            _ => Err(OcrError::Engine(message)),
        }
    }
}

/// Find the bridge reply, scanning from the last line back past engine noise.
fn parse_reply(stdout: &str) -> Option<BridgeReply> {
    stdout
        .lines()
        .rev()
        .map(str::trim)
        .filter(|line| line.starts_with('{'))
        .find_map(|line| serde_json::from_str(line).ok())
}

fn last_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty()).last()
}

/// Build the child PATH: configured dirs, tool dirs, then the inherited PATH.
fn child_path(
    search_paths: &[PathBuf],
    home: Option<&Path>,
    inherited: Option<OsString>,
) -> Result<OsString, OcrError> {
    let mut dirs: Vec<PathBuf> = search_paths.to_vec();
    dirs.extend(TOOL_DIRS.iter().map(PathBuf::from));
    if let Some(home) = home {
        dirs.extend(HOME_TOOL_DIRS.iter().map(|rel| home.join(rel)));
    }
    match inherited {
        Some(path) => dirs.extend(std::env::split_paths(&path)),
        None => dirs.extend([PathBuf::from("/usr/bin"), PathBuf::from("/bin")]),
    }

    std::env::join_paths(dirs)
        .map_err(|e| OcrError::Config(format!("Invalid search path: {}", e)))
}

/// Pick the interpreter: configured, then well-known locations, then PATH.
fn locate_python(
    configured: Option<&Path>,
    candidates: &[&str],
    path_env: &OsString,
) -> Result<PathBuf, OcrError> {
    if let Some(configured) = configured {
        let found = if configured.components().count() > 1 {
            is_executable(configured).then(|| configured.to_path_buf())
        } else {
            search_path(configured, path_env)
        };
        return found.ok_or_else(|| {
            OcrError::Dependency(format!(
                "Configured Python interpreter not found: {}",
                configured.display()
            ))
        });
    }

    candidates
        .iter()
        .map(PathBuf::from)
        .find(|candidate| is_executable(candidate))
        .or_else(|| search_path(Path::new("python3"), path_env))
        .ok_or_else(|| OcrError::Dependency("python3 not found".to_string()))
}

fn search_path(program: &Path, path_env: &OsString) -> Option<PathBuf> {
    std::env::split_paths(path_env)
        .map(|dir| dir.join(program))
        .find(|candidate| is_executable(candidate))
}

fn is_executable(path: &Path) -> bool {
    let Ok(metadata) = std::fs::metadata(path) else {
        return false;
    };
    if !metadata.is_file() {
        return false;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        metadata.permissions().mode() & 0o111 != 0
    }
    #[cfg(not(unix))]
    {
        true
    }
}
