// SPDX-License-Identifier: GPL-3.0-only

use crate::backends::camera::FacingMode;
use crate::constants::{APP_NAME, capture, decode};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Application configuration directory (`$XDG_CONFIG_HOME/qrscan`)
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_NAME))
}

/// Application cache directory (`$XDG_CACHE_HOME/qrscan`), used for the log file
pub fn cache_dir() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join(APP_NAME))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which way the preferred camera faces
    pub facing_mode: FacingMode,
    /// Explicit capture device path (e.g. /dev/video2), overrides facing mode
    pub camera_path: Option<String>,
    /// Requested capture width
    pub capture_width: u32,
    /// Requested capture height
    pub capture_height: u32,
    /// Frames larger than this are downscaled before QR detection (0 = never)
    pub decode_max_dimension: u32,
    /// Where the save action writes; defaults to the downloads directory
    pub save_directory: Option<PathBuf>,
    /// Mirror camera preview horizontally
    pub mirror_preview: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            facing_mode: FacingMode::Environment, // Prefer the back camera
            camera_path: None,
            capture_width: capture::DEFAULT_WIDTH,
            capture_height: capture::DEFAULT_HEIGHT,
            decode_max_dimension: decode::DEFAULT_MAX_DIMENSION,
            save_directory: None,
            mirror_preview: false,
        }
    }
}

impl Config {
    /// Default config file location
    pub fn default_path() -> Option<PathBuf> {
        config_dir().map(|dir| dir.join("config.json"))
    }

    /// Load the config from the default location
    ///
    /// A missing file yields defaults silently; a malformed one is logged
    /// and replaced by defaults.
    pub fn load() -> Self {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => {
                warn!("No config directory available, using default configuration");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &std::path::Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %path.display(), error = %e, "Could not read config");
                }
                return Self::default();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(config) => {
                debug!(path = %path.display(), "Config loaded");
                config
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Malformed config, using defaults");
                Self::default()
            }
        }
    }

    /// Resolved save directory: configured, else downloads, else home, else cwd
    pub fn save_directory(&self) -> PathBuf {
        self.save_directory
            .clone()
            .or_else(dirs::download_dir)
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
