//! Sandbox configuration.
//!
//! Read from `<config dir>/obsidian/config.json` when present. Every field has a default, so a
//! partial file only overrides what it names and a missing file is not an error.

use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};

use obsidian_core::RendererConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Failed to read config: {}", e),
            ConfigError::Parse(e) => write!(f, "Failed to parse config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Obsidian".to_string(),
            width: 1000,
            height: 700,
            vsync: true,
        }
    }
}

/// Which demo scene the sandbox opens with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemoKind {
    #[default]
    Lights,
    Blocks,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    pub window: WindowConfig,
    /// Clear color and projection settings. The render mode is chosen by the demo.
    pub renderer: RendererConfig,
    pub demo: DemoKind,
    /// A `log` level filter such as `"info"` or `"debug"`. `OBSIDIAN_LOG` takes precedence.
    pub log_level: String,
    /// Edge length of the shadow maps allocated for lights, in pixels.
    pub shadow_map_size: u32,
    /// Directory the demos load their textures from.
    pub asset_dir: PathBuf,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            renderer: RendererConfig::default(),
            demo: DemoKind::default(),
            log_level: "info".to_string(),
            shadow_map_size: 1024,
            asset_dir: PathBuf::from("assets"),
        }
    }
}

impl SandboxConfig {
    /// The default config location, if the platform has a config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("obsidian").join("config.json"))
    }

    /// Loads the config from [`SandboxConfig::default_path`], falling back to defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load_from(path),
            None => Ok(Self::default()),
        }
    }

    /// Loads the config at `path`. A missing file yields the defaults.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let s = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(ConfigError::Io(e)),
        };
        Self::from_json(&s)
    }

    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Parse)
    }
}
