// SPDX-License-Identifier: GPL-3.0-only
// Shared types for camera backend abstraction

//! Shared types for camera backends

use crate::errors::CameraError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, CameraError>;

/// Which way the requested camera should face
///
/// Mirrors the `facingMode` capture constraint: `Environment` is the rear
/// camera pointing away from the user, `User` the front camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    #[default]
    Environment,
    User,
}

/// Physical placement of a camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraLocation {
    Front,
    Back,
    External,
    #[default]
    Unknown,
}

impl CameraLocation {
    /// Guess the location from the V4L2 card name and bus info
    ///
    /// Sensor drivers on phones and tablets usually name the module after its
    /// placement; anything on a USB bus without such a hint is a webcam.
    pub fn from_device_info(card: &str, bus: &str) -> Self {
        let card = card.to_ascii_lowercase();
        if ["back", "rear", "world", "environment"]
            .iter()
            .any(|hint| card.contains(hint))
        {
            CameraLocation::Back
        } else if ["front", "user", "facetime", "integrated", "selfie"]
            .iter()
            .any(|hint| card.contains(hint))
        {
            CameraLocation::Front
        } else if bus.starts_with("usb") {
            CameraLocation::External
        } else {
            CameraLocation::Unknown
        }
    }

    /// Whether a camera at this location satisfies the facing constraint
    pub fn matches(&self, facing: FacingMode) -> bool {
        matches!(
            (self, facing),
            (CameraLocation::Back, FacingMode::Environment) | (CameraLocation::Front, FacingMode::User)
        )
    }
}

impl std::fmt::Display for CameraLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CameraLocation::Front => write!(f, "front"),
            CameraLocation::Back => write!(f, "back"),
            CameraLocation::External => write!(f, "external"),
            CameraLocation::Unknown => write!(f, "unknown"),
        }
    }
}

/// Device information from V4L2 capability
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceInfo {
    /// Name of the device (V4L2 card)
    pub card: String,
    /// Driver name (V4L2 driver)
    pub driver: String,
    /// Bus the device hangs off (e.g. usb-0000:00:14.0-1)
    pub bus: String,
}

/// Represents a camera device
#[derive(Debug, Clone, PartialEq)]
pub struct CameraDevice {
    pub name: String,
    pub path: String, // Path to capture device node
    pub location: CameraLocation,
    pub device_info: Option<DeviceInfo>,
    /// Pixel formats the device advertises (FourCC strings)
    pub pixel_formats: Vec<String>,
}

/// Constraints used when opening a capture stream
#[derive(Debug, Clone, PartialEq)]
pub struct StreamConstraints {
    pub facing_mode: FacingMode,
    /// Explicit device path, overrides the facing mode
    pub device_path: Option<String>,
    pub width: u32,
    pub height: u32,
}

impl StreamConstraints {
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self {
            facing_mode: config.facing_mode,
            device_path: config.camera_path.clone(),
            width: config.capture_width,
            height: config.capture_height,
        }
    }

    /// Pick the device these constraints ask for
    ///
    /// An explicit path must exist. Otherwise the first camera facing the
    /// requested way wins, falling back to the first camera at all.
    pub fn select_device<'a>(&self, cameras: &'a [CameraDevice]) -> BackendResult<&'a CameraDevice> {
        if let Some(path) = &self.device_path {
            return cameras
                .iter()
                .find(|c| &c.path == path)
                .ok_or_else(|| CameraError::InitializationFailed(format!("{} not found", path)));
        }

        cameras
            .iter()
            .find(|c| c.location.matches(self.facing_mode))
            .or_else(|| cameras.first())
            .ok_or(CameraError::NoCameraFound)
    }
}

/// How much of the stream is available, modelled after media ready states
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReadyState {
    /// Nothing negotiated yet
    HaveNothing,
    /// Format known, no frame delivered yet
    HaveMetadata,
    /// A complete frame is available
    HaveEnoughData,
}

/// A single RGBA camera frame
///
/// Rows may carry padding; `stride` is the length of one row in bytes.
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    pub stride: u32,
    pub data: Arc<[u8]>,
    pub captured_at: Instant,
}

impl CameraFrame {
    /// Frame from tightly packed RGBA pixels, `None` if `data` is the wrong length
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        if data.len() != (width as usize) * (height as usize) * 4 {
            return None;
        }
        Some(Self {
            width,
            height,
            stride: width * 4,
            data: Arc::from(data),
            captured_at: Instant::now(),
        })
    }

    /// RGB of the pixel at (x, y), clamped to the frame
    pub fn rgb_at(&self, x: u32, y: u32) -> (u8, u8, u8) {
        if self.width == 0 || self.height == 0 {
            return (0, 0, 0);
        }
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        let idx = (y * self.stride + x * 4) as usize;
        match self.data.get(idx..idx + 3) {
            Some(px) => (px[0], px[1], px[2]),
            None => (0, 0, 0),
        }
    }
}
