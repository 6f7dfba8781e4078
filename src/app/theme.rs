// SPDX-License-Identifier: GPL-3.0-only

//! Theme preference
//!
//! The visual mode is a two-valued flag persisted as the `theme` cookie.
//! Anything other than `dark` reads as light.

use crate::constants::theme;
use crate::storage::PreferenceStore;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    /// Parse a stored preference value
    pub fn from_preference(value: Option<&str>) -> Self {
        match value {
            Some("dark") => ThemeMode::Dark,
            _ => ThemeMode::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    /// Icon on the toggle control: the mode a press switches to
    pub fn icon(&self) -> &'static str {
        match self {
            ThemeMode::Light => theme::ICON_LIGHT,
            ThemeMode::Dark => theme::ICON_DARK,
        }
    }
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reads and toggles the persisted theme
pub struct ThemeManager {
    mode: ThemeMode,
    store: Box<dyn PreferenceStore>,
}

impl ThemeManager {
    /// Read the stored preference, defaulting to light
    pub fn load(store: Box<dyn PreferenceStore>) -> Self {
        let mode = ThemeMode::from_preference(store.get(theme::COOKIE_NAME).as_deref());
        debug!(%mode, "Theme loaded");
        Self { mode, store }
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub fn is_dark(&self) -> bool {
        self.mode == ThemeMode::Dark
    }

    pub fn icon(&self) -> &'static str {
        self.mode.icon()
    }

    /// Flip the mode and persist it
    ///
    /// A storage failure is logged; the in-memory mode flips regardless.
    pub fn toggle(&mut self) -> ThemeMode {
        self.mode = self.mode.toggled();
        if let Err(e) = self.store.set(
            theme::COOKIE_NAME,
            self.mode.as_str(),
            theme::COOKIE_MAX_AGE_DAYS,
        ) {
            warn!(error = %e, "Failed to persist theme preference");
        }
        debug!(mode = %self.mode, "Theme toggled");
        self.mode
    }

    /// Stored preference value, if any
    pub fn stored_value(&self) -> Option<String> {
        self.store.get(theme::COOKIE_NAME)
    }
}

impl std::fmt::Debug for ThemeManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeManager")
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}
