// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use std::time::Duration;

/// Application name, used for config/cache directories and the window title
pub const APP_NAME: &str = "qrscan";

/// File name used by the save action
pub const SAVE_FILE_NAME: &str = "qrcode_content.txt";

/// Prefixes that make decoded content a link
pub const URL_PREFIXES: [&str; 3] = ["http://", "https://", "www."];

/// Theme preference cookie
pub mod theme {
    /// Cookie name holding the theme preference
    pub const COOKIE_NAME: &str = "theme";
    /// Cookie lifetime in days
    pub const COOKIE_MAX_AGE_DAYS: i64 = 365;
    /// Cookie path attribute
    pub const COOKIE_PATH: &str = "/";
    /// Toggle icon shown while the light theme is active
    pub const ICON_LIGHT: &str = "🌙";
    /// Toggle icon shown while the dark theme is active
    pub const ICON_DARK: &str = "☀️";
}

/// Camera capture defaults
pub mod capture {
    use super::Duration;

    /// Requested capture width; the device may negotiate another size
    pub const DEFAULT_WIDTH: u32 = 1280;
    /// Requested capture height
    pub const DEFAULT_HEIGHT: u32 = 720;
    /// Number of memory-mapped V4L2 buffers
    pub const BUFFER_COUNT: u32 = 4;
    /// Frames queued between the capture thread and the UI thread
    pub const FRAME_CHANNEL_CAPACITY: usize = 4;
    /// How long `start` waits for the capture thread to open the device
    pub const OPEN_TIMEOUT: Duration = Duration::from_secs(5);
}

/// Decoder defaults
pub mod decode {
    /// Frames larger than this (in either dimension) are downscaled before detection
    pub const DEFAULT_MAX_DIMENSION: u32 = 1024;
}

/// Terminal UI timing
pub mod ui {
    use super::Duration;

    /// Event poll timeout, one display refresh
    pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);
    /// Label of the camera toggle while idle
    pub const OPEN_CAMERA_LABEL: &str = "Open Camera";
    /// Label of the camera toggle while scanning
    pub const STOP_CAMERA_LABEL: &str = "Stop Camera";
}

/// User-facing messages
pub mod messages {
    pub const CAMERA_ACCESS_FAILED: &str =
        "Could not access camera. Please ensure permissions are granted.";
    pub const CAMERA_LOST: &str = "The camera stopped unexpectedly.";
    pub const NO_QR_IN_IMAGE: &str = "No QR code found in the selected image.";
    pub const IMAGE_LOAD_FAILED: &str = "Could not load the selected image.";
    pub const COPY_SUCCEEDED: &str = "Content copied to clipboard!";
    pub const COPY_FAILED: &str = "Failed to copy content.";
    pub const SAVE_FAILED: &str = "Failed to save content.";
    pub const OPEN_LINK_FAILED: &str = "Failed to open the link.";
    pub const CONFIRM_BROWSE: &str = "Are you sure you want to browse this url?";
}
