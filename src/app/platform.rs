// SPDX-License-Identifier: GPL-3.0-only

//! Desktop integration: clipboard and browser

use crate::errors::{AppError, AppResult};
use tracing::{debug, info};

/// Destination of the copy action
pub trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> AppResult<()>;

    /// Block while serving `text` until another application owns the
    /// clipboard. For short-lived processes whose clipboard content would
    /// otherwise vanish on exit.
    fn serve_until_replaced(&mut self, _text: &str) -> AppResult<()> {
        Ok(())
    }
}

/// Opens links outside the application
pub trait LinkOpener {
    fn open(&mut self, href: &str) -> AppResult<()>;
}

/// System clipboard
///
/// The handle is kept for the life of the application: on X11 the copied
/// text is only served while the owning clipboard object is alive.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> AppResult<()> {
        let clipboard = match self.inner.take() {
            Some(clipboard) => clipboard,
            None => arboard::Clipboard::new().map_err(|e| AppError::Clipboard(e.to_string()))?,
        };
        self.inner
            .insert(clipboard)
            .set_text(text.to_string())
            .map_err(|e| AppError::Clipboard(e.to_string()))?;
        debug!(length = text.len(), "Copied to clipboard");
        Ok(())
    }

    #[cfg(target_os = "linux")]
    fn serve_until_replaced(&mut self, text: &str) -> AppResult<()> {
        use arboard::SetExtLinux;

        let mut clipboard = match self.inner.take() {
            Some(clipboard) => clipboard,
            None => arboard::Clipboard::new().map_err(|e| AppError::Clipboard(e.to_string()))?,
        };
        debug!("Serving clipboard until replaced");
        clipboard
            .set()
            .wait()
            .text(text.to_string())
            .map_err(|e| AppError::Clipboard(e.to_string()))
    }
}

/// Default browser via xdg-open and friends
#[derive(Debug, Default)]
pub struct SystemBrowser;

impl LinkOpener for SystemBrowser {
    fn open(&mut self, href: &str) -> AppResult<()> {
        info!(url = %href, "Opening URL");
        open::that_detached(href).map_err(|e| AppError::Launch(format!("{}: {}", href, e)))
    }
}
