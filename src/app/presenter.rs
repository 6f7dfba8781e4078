// SPDX-License-Identifier: GPL-3.0-only

//! Result presentation
//!
//! Decoded content is either a link or plain text. Links are content that
//! starts with `http://`, `https://` or `www.`; the last gets an `http://`
//! prefix for navigation only, the displayed and copied text is untouched.

use crate::app::platform::ClipboardSink;
use crate::constants::{SAVE_FILE_NAME, URL_PREFIXES, messages};
use crate::errors::AppResult;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Url,
    Text,
}

/// Classify decoded content
pub fn classify(content: &str) -> ContentKind {
    if URL_PREFIXES.iter().any(|prefix| content.starts_with(prefix)) {
        ContentKind::Url
    } else {
        ContentKind::Text
    }
}

/// Navigation target for URL content
pub fn link_href(content: &str) -> String {
    if content.starts_with("www.") {
        format!("http://{}", content)
    } else {
        content.to_string()
    }
}

/// A decoded result with its classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    pub content: String,
    pub kind: ContentKind,
}

impl ScanResult {
    pub fn new(content: impl Into<String>) -> Self {
        let content = content.into();
        let kind = classify(&content);
        Self { content, kind }
    }
}

/// What the result area shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultView {
    Hidden,
    /// Preformatted text
    Text(String),
    /// Clickable link
    Link { text: String, href: String },
}

impl ResultView {
    /// Content the copy and save actions act on
    pub fn content(&self) -> Option<&str> {
        match self {
            ResultView::Hidden => None,
            ResultView::Text(text) | ResultView::Link { text, .. } => Some(text),
        }
    }
}

/// Holds the current result until the next scan replaces it
#[derive(Debug, Default)]
pub struct ResultPresenter {
    current: Option<ScanResult>,
}

impl ResultPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current result
    pub fn show(&mut self, content: impl Into<String>) {
        let result = ScanResult::new(content);
        info!(kind = ?result.kind, length = result.content.len(), "Showing scan result");
        self.current = Some(result);
    }

    pub fn result(&self) -> Option<&ScanResult> {
        self.current.as_ref()
    }

    pub fn view(&self) -> ResultView {
        match &self.current {
            None => ResultView::Hidden,
            Some(ScanResult {
                content,
                kind: ContentKind::Url,
            }) => ResultView::Link {
                text: content.clone(),
                href: link_href(content),
            },
            Some(ScanResult {
                content,
                kind: ContentKind::Text,
            }) => ResultView::Text(content.clone()),
        }
    }

    /// Currently displayed content
    pub fn current_content(&self) -> Option<&str> {
        self.current.as_ref().map(|r| r.content.as_str())
    }

    /// Link target, when the result is a link
    pub fn current_href(&self) -> Option<String> {
        self.current
            .as_ref()
            .filter(|r| r.kind == ContentKind::Url)
            .map(|r| link_href(&r.content))
    }

    /// Copy the displayed content; `None` if nothing is shown
    ///
    /// Returns the message to report to the user.
    pub fn copy_to(&self, clipboard: &mut dyn ClipboardSink) -> Option<&'static str> {
        let content = self.current_content()?;
        Some(match clipboard.set_text(content) {
            Ok(()) => messages::COPY_SUCCEEDED,
            Err(e) => {
                warn!(error = %e, "Copy failed");
                messages::COPY_FAILED
            }
        })
    }

    /// Write the displayed content to `qrcode_content.txt` in `dir`
    pub fn save_to(&self, dir: &Path) -> Option<AppResult<PathBuf>> {
        let content = self.current_content()?;
        Some(crate::storage::save_text(dir, SAVE_FILE_NAME, content))
    }

    /// Confirmation prompt for following the link
    pub fn browse_prompt(&self) -> Option<(String, String)> {
        let href = self.current_href()?;
        Some((format!("{}\n\n{}", messages::CONFIRM_BROWSE, href), href))
    }
}
