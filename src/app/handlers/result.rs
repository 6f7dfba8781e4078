// SPDX-License-Identifier: GPL-3.0-only

//! Result handlers
//!
//! Handles still-image scans and the copy, save and follow-link actions.

use crate::app::state::{AppModel, Dialog, Task};
use crate::constants::messages;
use crate::errors::ScanError;
use std::path::PathBuf;
use tracing::{debug, info, warn};

impl AppModel {
    // =========================================================================
    // Image Input
    // =========================================================================

    /// Decode a chosen image once; failures only raise an alert
    pub(crate) fn handle_image_selected(&mut self, path: PathBuf) -> Task {
        match self.sampler.scan_image(&path) {
            Ok(content) => {
                info!(path = %path.display(), "QR code decoded from image");
                self.presenter.show(content);
                self.status = None;
            }
            Err(ScanError::NoCodeFound) => {
                debug!(path = %path.display(), "No QR code in image");
                self.show_dialog(Dialog::alert(messages::NO_QR_IN_IMAGE));
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not scan image");
                self.show_dialog(Dialog::alert(messages::IMAGE_LOAD_FAILED));
            }
        }
        Task::None
    }

    // =========================================================================
    // Result Actions
    // =========================================================================

    pub(crate) fn handle_copy_result(&mut self) -> Task {
        if let Some(message) = self.presenter.copy_to(self.clipboard.as_mut()) {
            self.show_dialog(Dialog::alert(message));
        }
        Task::None
    }

    pub(crate) fn handle_save_result(&mut self) -> Task {
        match self.presenter.save_to(&self.save_dir) {
            Some(Ok(path)) => {
                info!(path = %path.display(), "Result saved");
                self.status = Some(format!("Saved to {}", path.display()));
            }
            Some(Err(e)) => {
                warn!(error = %e, "Failed to save result");
                self.show_dialog(Dialog::alert(messages::SAVE_FAILED));
            }
            None => {}
        }
        Task::None
    }

    /// Ask before navigating to the result link
    pub(crate) fn handle_follow_link(&mut self) -> Task {
        if let Some((message, href)) = self.presenter.browse_prompt() {
            self.show_dialog(Dialog::Confirm { message, href });
        }
        Task::None
    }
}
