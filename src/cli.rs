// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for the scanner
//!
//! This module provides command-line functionality for:
//! - Listing available cameras
//! - Scanning a single image file
//! - Showing and toggling the theme preference

use qrscan::app::frame_processor::{FrameSampler, RqrrDecoder};
use qrscan::app::platform::{ClipboardSink, SystemClipboard};
use qrscan::app::presenter::{ContentKind, ScanResult, link_href};
use qrscan::app::ThemeManager;
use qrscan::backends::camera::{CameraBackend, V4l2Backend};
use qrscan::config::Config;
use qrscan::constants::SAVE_FILE_NAME;
use qrscan::errors::ScanError;
use qrscan::storage::{CookieJar, PreferenceStore, save_text};
use std::path::{Path, PathBuf};

/// List all available cameras
pub fn list_cameras() -> Result<(), Box<dyn std::error::Error>> {
    let cameras = V4l2Backend::new().enumerate_cameras();

    if cameras.is_empty() {
        println!("No cameras found.");
        return Ok(());
    }

    println!("Available cameras:");
    println!();
    for camera in &cameras {
        println!("  {} ({})", camera.name, camera.path);
        println!("      Location: {}", camera.location);
        if let Some(info) = &camera.device_info {
            println!("      Driver:   {} on {}", info.driver, info.bus);
        }
        println!("      Formats:  {}", camera.pixel_formats.join(", "));
        println!();
    }

    Ok(())
}

/// Decode one image and print the result
///
/// Exits with an error if the image holds no QR code.
pub fn scan_image(
    config: &Config,
    path: &Path,
    copy: bool,
    save: Option<Option<PathBuf>>,
) -> Result<(), Box<dyn std::error::Error>> {
    let sampler = FrameSampler::new(Box::new(RqrrDecoder::with_max_dimension(
        config.decode_max_dimension,
    )));

    let content = match sampler.scan_image(path) {
        Ok(content) => content,
        Err(ScanError::NoCodeFound) => {
            return Err(qrscan::constants::messages::NO_QR_IN_IMAGE.into());
        }
        Err(e) => return Err(e.into()),
    };

    let result = ScanResult::new(content);
    println!("{}", result.content);
    if result.kind == ContentKind::Url {
        eprintln!("Link: {}", link_href(&result.content));
    }

    if let Some(dir) = save {
        let dir = dir.unwrap_or_else(|| config.save_directory());
        let saved = save_text(&dir, SAVE_FILE_NAME, &result.content)?;
        eprintln!("Saved to {}", saved.display());
    }

    if copy {
        copy_content(&mut SystemClipboard::new(), &result.content)?;
    }

    Ok(())
}

/// Copy, report, then keep the content available after this process exits
///
/// On X11 and Wayland the content lives in the owning process, so the
/// command waits until another application takes the clipboard.
fn copy_content(clipboard: &mut dyn ClipboardSink, text: &str) -> Result<(), Box<dyn std::error::Error>> {
    clipboard.set_text(text)?;
    eprintln!("{}", qrscan::constants::messages::COPY_SUCCEEDED);
    clipboard.serve_until_replaced(text)?;
    Ok(())
}

fn open_preferences() -> Box<dyn PreferenceStore> {
    match CookieJar::default_path() {
        Some(path) => Box::new(CookieJar::open(path)),
        None => Box::new(CookieJar::in_memory()),
    }
}

/// Print the current theme
pub fn theme_show() -> Result<(), Box<dyn std::error::Error>> {
    let theme = ThemeManager::load(open_preferences());
    println!("{} {}", theme.mode(), theme.icon());
    Ok(())
}

/// Flip the stored theme and print the new one
pub fn theme_toggle() -> Result<(), Box<dyn std::error::Error>> {
    let mut theme = ThemeManager::load(open_preferences());
    let mode = theme.toggle();
    if theme.stored_value().as_deref() != Some(mode.as_str()) {
        return Err("could not store the theme preference".into());
    }
    println!("{} {}", mode, mode.icon());
    Ok(())
}
