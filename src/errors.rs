// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the scanner application

use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Camera-related errors
    Camera(CameraError),
    /// Image loading and decoding errors
    Scan(ScanError),
    /// Clipboard could not be written
    Clipboard(String),
    /// A link could not be handed to the system browser
    Launch(String),
    /// Configuration errors
    Config(String),
    /// Storage/filesystem errors
    Storage(String),
    /// Generic error with message
    Other(String),
}

/// Camera-specific errors
#[derive(Debug, Clone, PartialEq)]
pub enum CameraError {
    /// No camera devices found
    NoCameraFound,
    /// Access to the device node was refused
    PermissionDenied(String),
    /// Camera initialization failed
    InitializationFailed(String),
    /// Camera disconnected during operation
    Disconnected,
    /// No usable capture format
    InvalidFormat(String),
    /// Backend error (e.g., V4L2 ioctl failure)
    BackendError(String),
    /// Camera is busy or in use
    Busy,
}

/// Errors raised while turning an image into something the decoder accepts
#[derive(Debug, Clone, PartialEq)]
pub enum ScanError {
    /// The image file could not be read or decoded
    ImageLoad(String),
    /// Pixel data does not match the declared dimensions
    InvalidBuffer { width: u32, height: u32, len: usize },
    /// The decoder found no QR code
    NoCodeFound,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Camera(e) => write!(f, "Camera error: {}", e),
            AppError::Scan(e) => write!(f, "Scan error: {}", e),
            AppError::Clipboard(msg) => write!(f, "Clipboard error: {}", msg),
            AppError::Launch(msg) => write!(f, "Could not open link: {}", msg),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::NoCameraFound => write!(f, "No camera devices found"),
            CameraError::PermissionDenied(path) => write!(f, "Permission denied: {}", path),
            CameraError::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            CameraError::Disconnected => write!(f, "Camera disconnected"),
            CameraError::InvalidFormat(msg) => write!(f, "Invalid format: {}", msg),
            CameraError::BackendError(msg) => write!(f, "Backend error: {}", msg),
            CameraError::Busy => write!(f, "Camera is busy"),
        }
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::ImageLoad(msg) => write!(f, "Failed to load image: {}", msg),
            ScanError::InvalidBuffer { width, height, len } => write!(
                f,
                "Pixel buffer of {} bytes does not fit {}x{} RGBA",
                len, width, height
            ),
            ScanError::NoCodeFound => write!(f, "No QR code found"),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for CameraError {}
impl std::error::Error for ScanError {}

// Conversions from sub-errors to AppError
impl From<CameraError> for AppError {
    fn from(err: CameraError) -> Self {
        AppError::Camera(err)
    }
}

impl From<ScanError> for AppError {
    fn from(err: ScanError) -> Self {
        AppError::Scan(err)
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Other(msg.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<image::ImageError> for ScanError {
    fn from(err: image::ImageError) -> Self {
        ScanError::ImageLoad(err.to_string())
    }
}

impl From<std::io::Error> for CameraError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => CameraError::PermissionDenied(err.to_string()),
            std::io::ErrorKind::NotFound => CameraError::NoCameraFound,
            _ if err.raw_os_error() == Some(16) => CameraError::Busy, // EBUSY
            _ => CameraError::BackendError(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_permission_maps_to_camera_permission() {
        let err = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
        assert!(matches!(
            CameraError::from(err),
            CameraError::PermissionDenied(_)
        ));
    }

    #[test]
    fn test_ebusy_maps_to_busy() {
        let err = std::io::Error::from_raw_os_error(16);
        assert_eq!(CameraError::from(err), CameraError::Busy);
    }

    #[test]
    fn test_display_wraps_sub_errors() {
        let err: AppError = CameraError::NoCameraFound.into();
        assert_eq!(err.to_string(), "Camera error: No camera devices found");

        let err: AppError = ScanError::NoCodeFound.into();
        assert_eq!(err.to_string(), "Scan error: No QR code found");
    }
}
