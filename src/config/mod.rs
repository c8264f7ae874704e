//! Application Configuration
//!
//! Engine and logging settings stored in TOML format.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::vision::paddle::DEFAULT_RECOGNITION_MODEL;
use crate::vision::PaddleOptions;

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// OCR engine settings
    pub engine: EngineConfig,
    /// Diagnostic logging settings
    pub logging: LoggingConfig,
}

/// OCR engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Python interpreter running PaddleOCR; discovered when unset
    pub python: Option<PathBuf>,
    /// Text recognition model name
    pub text_recognition_model: String,
    /// Quiet the Paddle runtime's own logging
    pub suppress_engine_logs: bool,
    /// Extra directories prepended to the engine's PATH
    pub search_paths: Vec<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            python: None,
            text_recognition_model: DEFAULT_RECOGNITION_MODEL.to_string(),
            suppress_engine_logs: true,
            search_paths: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Options for constructing the PaddleOCR engine
    pub fn paddle_options(&self) -> PaddleOptions {
        PaddleOptions {
            python: self.python.clone(),
            text_recognition_model: self.text_recognition_model.clone(),
            suppress_engine_logs: self.suppress_engine_logs,
            search_paths: self.search_paths.clone(),
        }
    }
}

/// Diagnostic logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Base level for stderr logging (error, warn, info, debug, trace)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "visualscanner", "scanner-ocr")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    Ok(proj_dirs.config_dir().to_path_buf())
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: AppConfig =
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(config)
}

/// Load the explicit config file, or the default one when it exists.
///
/// An explicit path must exist; a missing default file means defaults.
pub fn load_or_default(explicit: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = explicit {
        return load_config(path);
    }

    let Ok(config_dir) = get_config_dir() else {
        return Ok(AppConfig::default());
    };
    let config_path = config_dir.join("config.toml");
    if config_path.exists() {
        load_config(&config_path)
    } else {
        Ok(AppConfig::default())
    }
}
