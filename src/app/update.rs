// SPDX-License-Identifier: GPL-3.0-only

//! Message update handling
//!
//! This module handles all application messages by routing them to focused handler methods.
//! The main `update()` function acts as a dispatcher, while specific handlers are implemented
//! in the `handlers` submodules organized by functional domain.
//!
//! # Handler Modules
//!
//! - `handlers::camera`: Camera start/stop and the per-frame scan loop
//! - `handlers::result`: Image input, copy, save and link following
//! - `handlers::ui`: Dialogs and theme

use crate::app::state::{AppModel, Message, Task};
use tracing::trace;

impl AppModel {
    /// Main message handler - routes messages to appropriate handler methods.
    ///
    /// While a dialog is open everything except dialog answers and quit is
    /// dropped, which also pauses the scan loop.
    pub fn update(&mut self, message: Message) -> Task {
        if self.dialog.is_some()
            && !matches!(
                message,
                Message::DialogAccept | Message::DialogDismiss | Message::Quit
            )
        {
            trace!(?message, "Dialog open, dropping message");
            return Task::None;
        }

        match message {
            // ===== Frame Loop =====
            Message::Tick(now) => self.handle_tick(now),

            // ===== Camera Control =====
            Message::ToggleCamera => self.handle_toggle_camera(),
            Message::StartCamera => self.handle_start_camera(),
            Message::StopCamera => self.handle_stop_camera(),

            // ===== Image Input =====
            Message::PickImage => Task::PickImage,
            Message::ImageSelected(path) => self.handle_image_selected(path),

            // ===== Result Actions =====
            Message::CopyResult => self.handle_copy_result(),
            Message::SaveResult => self.handle_save_result(),
            Message::FollowLink => self.handle_follow_link(),

            // ===== Dialogs =====
            Message::DialogAccept => self.handle_dialog_accept(),
            Message::DialogDismiss => self.handle_dialog_dismiss(),

            // ===== UI =====
            Message::ToggleTheme => self.handle_toggle_theme(),
            Message::Quit => {
                self.camera.stop();
                Task::Quit
            }
        }
    }
}
