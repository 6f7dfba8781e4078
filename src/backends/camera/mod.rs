// SPDX-License-Identifier: MPL-2.0

//! Camera backend abstraction
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────┐
//! │  CameraController   │  ← scanning flag, stream ownership
//! └──────────┬──────────┘
//!            │ open_stream()
//!            ▼
//! ┌─────────────────────┐
//! │  CameraBackend Trait│  ← enumeration, device selection
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │  CaptureStream Trait│  ← ready state, latest frame, stop
//! └──────────┬──────────┘
//!            │
//!            ▼
//!        ┌──────┐
//!        │ V4L2 │  ← capture thread + frame channel
//!        └──────┘
//! ```

pub mod format_converters;
pub mod frame_loop;
pub mod types;
pub mod v4l2;

pub use types::*;
pub use v4l2::V4l2Backend;

/// Camera backend trait
///
/// Backends know how to find cameras and how to open one as a stream.
pub trait CameraBackend {
    /// Enumerate available cameras on this backend
    fn enumerate_cameras(&self) -> Vec<CameraDevice>;

    /// Open the camera selected by `constraints`
    ///
    /// # Returns
    /// * `Ok(stream)` - The device is open and delivering frames (or about to)
    /// * `Err(CameraError)` - No matching device, permission denied, busy, ...
    fn open_stream(
        &mut self,
        constraints: &StreamConstraints,
    ) -> BackendResult<Box<dyn CaptureStream>>;
}

/// A live capture stream
///
/// The stream owns the device; dropping it or calling `stop_tracks` releases
/// the device.
pub trait CaptureStream {
    /// Device this stream reads from
    fn device(&self) -> &CameraDevice;

    /// Poll for new frames and report how much data is buffered
    fn ready_state(&mut self) -> ReadyState;

    /// Most recent frame, if any has arrived
    fn latest_frame(&self) -> Option<&CameraFrame>;

    /// Release the device. Idempotent.
    fn stop_tracks(&mut self);

    /// Whether the stream has ended, either released or lost
    fn is_stopped(&self) -> bool;
}
