// SPDX-License-Identifier: GPL-3.0-only

//! Application state management

use crate::app::camera_controller::CameraController;
use crate::app::frame_processor::{FrameSampler, QrDecoder, RqrrDecoder};
use crate::app::platform::{ClipboardSink, LinkOpener, SystemBrowser, SystemClipboard};
use crate::app::presenter::ResultPresenter;
use crate::app::theme::ThemeManager;
use crate::backends::camera::{CameraBackend, StreamConstraints, V4l2Backend};
use crate::config::Config;
use crate::storage::{CookieJar, PreferenceStore};
use std::path::PathBuf;
use std::time::Instant;

/// Modal dialog
///
/// At most one is open. While it is, only dialog answers and quit are
/// processed and the scan loop is paused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialog {
    /// Informational message, dismissed with any answer
    Alert { message: String },
    /// Yes/no question guarding navigation to `href`
    Confirm { message: String, href: String },
}

impl Dialog {
    pub fn alert(message: impl Into<String>) -> Self {
        Dialog::Alert {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Dialog::Alert { message } | Dialog::Confirm { message, .. } => message,
        }
    }
}

/// Messages handled by [`AppModel::update`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // ===== Frame Loop =====
    /// One display refresh
    Tick(Instant),

    // ===== Camera Control =====
    /// Camera toggle control: start when idle, stop when scanning
    ToggleCamera,
    StartCamera,
    StopCamera,

    // ===== Image Input =====
    /// Ask the runtime for an image file
    PickImage,
    /// An image file was chosen
    ImageSelected(PathBuf),

    // ===== Result Actions =====
    CopyResult,
    SaveResult,
    /// Follow the result link (asks for confirmation first)
    FollowLink,

    // ===== Dialogs =====
    /// OK / yes
    DialogAccept,
    /// Cancel / no
    DialogDismiss,

    // ===== UI =====
    ToggleTheme,
    Quit,
}

/// Side effect the runtime performs after an update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Task {
    #[default]
    None,
    /// Show a file picker and answer with `Message::ImageSelected`
    PickImage,
    Quit,
}

/// Platform capabilities the model is wired to
pub struct AppServices {
    pub backend: Box<dyn CameraBackend>,
    pub decoder: Box<dyn QrDecoder>,
    pub preferences: Box<dyn PreferenceStore>,
    pub clipboard: Box<dyn ClipboardSink>,
    pub opener: Box<dyn LinkOpener>,
}

impl AppServices {
    /// Services backed by the real system
    pub fn system(config: &Config) -> Self {
        let preferences: Box<dyn PreferenceStore> = match CookieJar::default_path() {
            Some(path) => Box::new(CookieJar::open(path)),
            None => Box::new(CookieJar::in_memory()),
        };
        Self {
            backend: Box::new(V4l2Backend::new()),
            decoder: Box::new(RqrrDecoder::with_max_dimension(config.decode_max_dimension)),
            preferences,
            clipboard: Box::new(SystemClipboard::new()),
            opener: Box::new(SystemBrowser),
        }
    }
}

/// The main application model
pub struct AppModel {
    /// Configuration loaded at startup
    pub config: Config,
    pub theme: ThemeManager,
    pub camera: CameraController,
    pub sampler: FrameSampler,
    pub presenter: ResultPresenter,
    /// Open modal dialog, if any
    pub dialog: Option<Dialog>,
    /// One-line status shown under the result
    pub status: Option<String>,
    /// Where the save action writes
    pub save_dir: PathBuf,
    pub(crate) clipboard: Box<dyn ClipboardSink>,
    pub(crate) opener: Box<dyn LinkOpener>,
}

impl AppModel {
    pub fn new(config: Config, services: AppServices) -> Self {
        let constraints = StreamConstraints::from_config(&config);
        let save_dir = config.save_directory();
        Self {
            theme: ThemeManager::load(services.preferences),
            camera: CameraController::new(services.backend, constraints),
            sampler: FrameSampler::new(services.decoder),
            presenter: ResultPresenter::new(),
            dialog: None,
            status: None,
            save_dir,
            clipboard: services.clipboard,
            opener: services.opener,
            config,
        }
    }

    /// Open a dialog, replacing any open one
    pub(crate) fn show_dialog(&mut self, dialog: Dialog) {
        tracing::debug!(message = %dialog.message(), "Opening dialog");
        self.dialog = Some(dialog);
    }
}

impl std::fmt::Debug for AppModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppModel")
            .field("theme", &self.theme)
            .field("camera", &self.camera)
            .field("presenter", &self.presenter)
            .field("dialog", &self.dialog)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}
