// SPDX-License-Identifier: MPL-2.0

//! Frame processor module for QR sampling
//!
//! This module copies camera frames and still images into pixel buffers and
//! runs them through the QR decoder. Sampling of the live feed is driven by a
//! cancellable [`ScanTask`] that the camera controller polls once per tick.

pub mod sampler;
pub mod tasks;
pub mod types;

pub use sampler::{FrameSample, FrameSampler};
pub use tasks::{QrDecoder, RqrrDecoder, ScanTask, qr_detector};
pub use types::PixelBuffer;
