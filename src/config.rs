// src/config.rs
// Persistent settings, stored as JSON in `<config_dir>/regionshot/config.json`.
// Every section is optional; anything missing falls back to its default.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::export::ExportFormat;

const APP_CONFIG_DIR_NAME: &str = "regionshot";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("No config directory available on this platform")]
    NoConfigDir,
}

/// RGBA color, 0-255 per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba(pub u8, pub u8, pub u8, pub u8);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayStyle {
    /// Dims everything outside the selection.
    pub mask: Rgba,
    /// Covers the whole screen before anything is selected.
    pub idle_mask: Rgba,
    /// Tint inside the selection.
    pub selection_fill: Rgba,
    pub border: Rgba,
    pub border_width: f64,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            mask: Rgba(0, 0, 0, 128),
            idle_mask: Rgba(0, 0, 0, 72),
            selection_fill: Rgba(128, 128, 255, 40),
            border: Rgba(0, 200, 0, 255),
            border_width: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveMode {
    /// Ask with a file dialog, pre-filled with a timestamp name.
    #[default]
    Dialog,
    /// Write straight to `directory` under a timestamp name.
    Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveSettings {
    pub mode: SaveMode,
    /// `None` means the user's pictures directory.
    pub directory: Option<PathBuf>,
    /// Used when the chosen file name has no known extension.
    pub default_format: ExportFormat,
}

impl Default for SaveSettings {
    fn default() -> Self {
        Self {
            mode: SaveMode::Dialog,
            directory: None,
            default_format: ExportFormat::Png,
        }
    }
}

impl SaveSettings {
    pub fn resolved_directory(&self) -> PathBuf {
        self.directory
            .clone()
            .or_else(dirs::picture_dir)
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherSettings {
    /// System-wide "show overlay" shortcut, e.g. "Ctrl+Shift+S".
    pub shortcut: String,
    pub tray_enabled: bool,
    /// Bring the launcher back after a capture or cancel.
    pub reshow_after_capture: bool,
    pub start_hidden: bool,
    pub capture_on_start: bool,
    /// Time given to the launcher to disappear before the screen is grabbed.
    pub capture_delay_ms: u64,
}

impl Default for LauncherSettings {
    fn default() -> Self {
        Self {
            shortcut: "Ctrl+Shift+S".to_string(),
            tray_enabled: true,
            reshow_after_capture: true,
            start_hidden: false,
            capture_on_start: false,
            capture_delay_ms: 200,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_filter(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub overlay: OverlayStyle,
    pub save: SaveSettings,
    pub launcher: LauncherSettings,
    pub log_level: LogLevel,
}

pub fn config_path() -> Result<PathBuf, ConfigError> {
    let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(dir.join(APP_CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Loads the user config. On first run the defaults are written out so
/// there is a file to edit.
pub fn load() -> Result<Config, ConfigError> {
    let path = config_path()?;
    if !path.exists() {
        let config = Config::default();
        save_to(&config, &path)?;
        return Ok(config);
    }
    load_from(&path)
}

/// A missing file yields the defaults.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(serde_json::from_str(&text)?),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Config::default()),
        Err(e) => Err(e.into()),
    }
}

pub fn save_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(config)?)?;
    Ok(())
}
