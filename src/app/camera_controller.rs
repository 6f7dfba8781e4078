// SPDX-License-Identifier: GPL-3.0-only

//! Camera controller
//!
//! Owns the capture stream and the scanning flag. `start` and `stop` are the
//! only places either changes; `tick` drives the scan task while the camera
//! is open and stops the camera as soon as a code is decoded.

use crate::app::frame_processor::{FrameSample, FrameSampler, ScanTask};
use crate::backends::camera::{CameraBackend, CameraFrame, CaptureStream, StreamConstraints};
use crate::constants::ui;
use crate::errors::CameraError;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Result of a `start` request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    /// The camera was already open; nothing was reopened
    AlreadyScanning,
}

/// Result of one tick of the scan task
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Not scanning, or the task is not due yet
    Idle,
    /// The stream had no frame yet; rescheduled
    Skipped,
    /// A frame was sampled without a result; rescheduled
    Rescheduled,
    /// A code was decoded and the camera stopped
    Decoded(String),
    /// The stream ended on its own; the camera was stopped
    Lost(CameraError),
}

pub struct CameraController {
    backend: Box<dyn CameraBackend>,
    constraints: StreamConstraints,
    stream: Option<Box<dyn CaptureStream>>,
    scan_task: Option<ScanTask>,
    scan_interval: Duration,
    scanning: bool,
    video_visible: bool,
}

impl CameraController {
    pub fn new(backend: Box<dyn CameraBackend>, constraints: StreamConstraints) -> Self {
        Self {
            backend,
            constraints,
            stream: None,
            scan_task: None,
            scan_interval: ui::FRAME_INTERVAL,
            scanning: false,
            video_visible: false,
        }
    }

    /// Override the delay between samples (defaults to one display refresh)
    pub fn with_scan_interval(mut self, interval: Duration) -> Self {
        self.scan_interval = interval;
        self
    }

    pub fn is_scanning(&self) -> bool {
        self.scanning
    }

    pub fn is_video_visible(&self) -> bool {
        self.video_visible
    }

    /// Label of the camera toggle control
    pub fn toggle_label(&self) -> &'static str {
        if self.scanning {
            ui::STOP_CAMERA_LABEL
        } else {
            ui::OPEN_CAMERA_LABEL
        }
    }

    /// Name of the open device, if any
    pub fn device_name(&self) -> Option<&str> {
        self.stream.as_ref().map(|s| s.device().name.as_str())
    }

    /// Latest frame for the preview
    pub fn preview_frame(&self) -> Option<&CameraFrame> {
        if !self.video_visible {
            return None;
        }
        self.stream.as_ref().and_then(|s| s.latest_frame())
    }

    /// Open the camera and start sampling
    ///
    /// On failure the controller stays idle and the error is returned for the
    /// caller to surface.
    pub fn start(&mut self, now: Instant) -> Result<StartOutcome, CameraError> {
        if self.scanning {
            debug!("Camera already open, ignoring start");
            return Ok(StartOutcome::AlreadyScanning);
        }

        let stream = match self.backend.open_stream(&self.constraints) {
            Ok(stream) => stream,
            Err(e) => {
                warn!(error = %e, "Failed to open camera");
                return Err(e);
            }
        };

        info!(device = %stream.device().name, "Camera started");
        self.stream = Some(stream);
        self.scan_task = Some(ScanTask::new(self.scan_interval, now));
        self.scanning = true;
        self.video_visible = true;
        Ok(StartOutcome::Started)
    }

    /// Release the camera and cancel sampling
    pub fn stop(&mut self) {
        if let Some(task) = self.scan_task.take() {
            task.cancel();
            debug!(task = task.id(), ticks = task.ticks(), "Scan task cancelled");
        }
        if let Some(mut stream) = self.stream.take() {
            stream.stop_tracks();
            info!(device = %stream.device().name, "Camera stopped");
        }
        self.scanning = false;
        self.video_visible = false;
    }

    /// Run the scan task if it is due
    pub fn tick(&mut self, sampler: &FrameSampler, now: Instant) -> TickOutcome {
        if !self.scanning {
            return TickOutcome::Idle;
        }
        if self.stream.as_ref().is_some_and(|s| s.is_stopped()) {
            warn!("Capture stream ended unexpectedly");
            self.stop();
            return TickOutcome::Lost(CameraError::Disconnected);
        }
        let (Some(task), Some(stream)) = (self.scan_task.as_mut(), self.stream.as_mut()) else {
            return TickOutcome::Idle;
        };
        if !task.is_due(now) {
            return TickOutcome::Idle;
        }

        match sampler.sample_stream(stream.as_mut()) {
            FrameSample::NotReady => {
                task.reschedule(now);
                TickOutcome::Skipped
            }
            FrameSample::NoCode => {
                task.reschedule(now);
                TickOutcome::Rescheduled
            }
            FrameSample::Decoded(content) => {
                self.stop();
                TickOutcome::Decoded(content)
            }
        }
    }
}

impl Drop for CameraController {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for CameraController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraController")
            .field("constraints", &self.constraints)
            .field("scanning", &self.scanning)
            .field("video_visible", &self.video_visible)
            .field("device", &self.device_name())
            .finish_non_exhaustive()
    }
}
