// SPDX-License-Identifier: MPL-2.0

//! Main application module for the QR scanner
//!
//! This module contains the application state, message handling and the
//! components the scanner page is built from.
//!
//! # Architecture
//!
//! - `state`: Application state types (AppModel, Message, Dialog, Task)
//! - `camera_controller`: Capture stream ownership and the scanning flag
//! - `frame_processor`: Pixel buffers, the QR decoder and the scan task
//! - `presenter`: Result classification and copy/save/follow actions
//! - `theme`: Persisted light/dark preference
//! - `platform`: Clipboard and browser integration
//! - `update`: Message handling
//!
//! # Main Types
//!
//! - `AppModel`: Main application state
//! - `Message`: All possible user interactions and system events
//! - `Task`: Side effects the runtime performs on the model's behalf

pub mod camera_controller;
pub mod frame_processor;
mod handlers;
pub mod platform;
pub mod presenter;
mod state;
pub mod theme;
mod update;

pub use camera_controller::{CameraController, StartOutcome, TickOutcome};
pub use presenter::{ContentKind, ResultPresenter, ResultView, ScanResult};
pub use state::{AppModel, AppServices, Dialog, Message, Task};
pub use theme::{ThemeManager, ThemeMode};
