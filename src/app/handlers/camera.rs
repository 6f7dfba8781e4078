// SPDX-License-Identifier: GPL-3.0-only

//! Camera control handlers
//!
//! Handles the camera toggle, start/stop and the per-frame scan loop.

use crate::app::camera_controller::{StartOutcome, TickOutcome};
use crate::app::state::{AppModel, Dialog, Task};
use crate::constants::messages;
use std::time::Instant;
use tracing::{debug, error, info};

impl AppModel {
    // =========================================================================
    // Camera Control Handlers
    // =========================================================================

    pub(crate) fn handle_toggle_camera(&mut self) -> Task {
        if self.camera.is_scanning() {
            self.handle_stop_camera()
        } else {
            self.handle_start_camera()
        }
    }

    pub(crate) fn handle_start_camera(&mut self) -> Task {
        match self.camera.start(Instant::now()) {
            Ok(StartOutcome::Started) => {
                info!(device = ?self.camera.device_name(), "Scanning started");
                self.status = None;
            }
            Ok(StartOutcome::AlreadyScanning) => {
                debug!("Start requested while scanning");
            }
            Err(e) => {
                error!(error = %e, "Could not access camera");
                self.show_dialog(Dialog::alert(messages::CAMERA_ACCESS_FAILED));
            }
        }
        Task::None
    }

    pub(crate) fn handle_stop_camera(&mut self) -> Task {
        self.camera.stop();
        Task::None
    }

    /// Run the scan task for this refresh
    pub(crate) fn handle_tick(&mut self, now: Instant) -> Task {
        match self.camera.tick(&self.sampler, now) {
            TickOutcome::Decoded(content) => {
                info!("QR code decoded from camera");
                self.presenter.show(content);
                self.status = None;
            }
            TickOutcome::Lost(e) => {
                error!(error = %e, "Camera stream lost");
                self.show_dialog(Dialog::alert(messages::CAMERA_LOST));
            }
            TickOutcome::Idle | TickOutcome::Skipped | TickOutcome::Rescheduled => {}
        }
        Task::None
    }
}
