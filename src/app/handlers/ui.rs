// SPDX-License-Identifier: GPL-3.0-only

//! UI handlers
//!
//! Handles dialog answers and the theme toggle.

use crate::app::state::{AppModel, Dialog, Task};
use crate::constants::messages;
use tracing::{debug, error};

impl AppModel {
    // =========================================================================
    // Dialog Handlers
    // =========================================================================

    pub(crate) fn handle_dialog_accept(&mut self) -> Task {
        match self.dialog.take() {
            Some(Dialog::Confirm { href, .. }) => {
                if let Err(err) = self.opener.open(&href) {
                    error!(url = %href, error = %err, "Failed to open URL");
                    self.show_dialog(Dialog::alert(messages::OPEN_LINK_FAILED));
                }
            }
            Some(Dialog::Alert { .. }) | None => {}
        }
        Task::None
    }

    pub(crate) fn handle_dialog_dismiss(&mut self) -> Task {
        if let Some(dialog) = self.dialog.take() {
            debug!(message = %dialog.message(), "Dialog dismissed");
        }
        Task::None
    }

    // =========================================================================
    // Theme
    // =========================================================================

    pub(crate) fn handle_toggle_theme(&mut self) -> Task {
        self.theme.toggle();
        Task::None
    }
}
