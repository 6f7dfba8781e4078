// SPDX-License-Identifier: MPL-2.0

//! Integration tests for constants module

use qrscan::constants::{self, messages, theme};

#[test]
fn test_user_facing_messages() {
    assert_eq!(
        messages::CAMERA_ACCESS_FAILED,
        "Could not access camera. Please ensure permissions are granted."
    );
    assert_eq!(
        messages::NO_QR_IN_IMAGE,
        "No QR code found in the selected image."
    );
    assert_eq!(messages::COPY_SUCCEEDED, "Content copied to clipboard!");
    assert_eq!(messages::COPY_FAILED, "Failed to copy content.");
}

#[test]
fn test_theme_cookie_settings() {
    assert_eq!(theme::COOKIE_NAME, "theme");
    assert_eq!(theme::COOKIE_MAX_AGE_DAYS, 365);
    assert_eq!(theme::COOKIE_PATH, "/");
    assert_ne!(theme::ICON_LIGHT, theme::ICON_DARK);
}

#[test]
fn test_save_file_name() {
    assert_eq!(constants::SAVE_FILE_NAME, "qrcode_content.txt");
}

#[test]
fn test_url_prefixes() {
    assert!(constants::URL_PREFIXES.contains(&"www."));
    assert!(
        constants::URL_PREFIXES
            .iter()
            .all(|p| p.starts_with("http") || *p == "www.")
    );
}
