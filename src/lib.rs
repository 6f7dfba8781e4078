// SPDX-License-Identifier: MPL-2.0

//! qrscan - QR code scanner for camera feeds and image files
//!
//! This library provides the core functionality for the scanner, including
//! camera capture, QR decoding, result presentation and the theme preference.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`app`]: Application model, message handling and scanner components
//! - [`backends`]: Camera backend abstraction and the V4L2 backend
//! - [`terminal`]: Terminal frontend
//! - [`config`]: User configuration handling
//! - [`storage`]: Cookie jar and text file saving
//!
//! # Example
//!
//! ```ignore
//! // Interactive scanner:
//! // qrscan
//! // One-shot scan of an image:
//! // qrscan scan code.png --copy
//! ```

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod storage;
pub mod terminal;

// Re-export commonly used types
pub use app::{AppModel, AppServices, Message};
pub use config::Config;
pub use errors::{AppError, AppResult};
