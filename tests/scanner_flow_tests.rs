// SPDX-License-Identifier: GPL-3.0-only

//! End-to-end scanner flows driven through `AppModel::update`
//!
//! The camera, clipboard and browser are replaced by in-memory fakes; image
//! scans use the real rqrr decoder on codes rendered with the qrcode crate.

use qrscan::app::frame_processor::{PixelBuffer, QrDecoder, RqrrDecoder};
use qrscan::app::platform::{ClipboardSink, LinkOpener};
use qrscan::app::{AppModel, AppServices, Dialog, Message, ResultView, ThemeMode};
use qrscan::backends::camera::{
    BackendResult, CameraBackend, CameraDevice, CameraFrame, CameraLocation, CaptureStream,
    ReadyState, StreamConstraints,
};
use qrscan::config::Config;
use qrscan::constants::{SAVE_FILE_NAME, messages, theme};
use qrscan::errors::{AppError, AppResult, CameraError};
use qrscan::storage::{CookieJar, PreferenceStore};
use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

// ===== Fakes =====

/// Shared view of what the fake camera is doing
#[derive(Clone, Default)]
struct CameraCounters {
    opened: Rc<Cell<u32>>,
    released: Rc<Cell<u32>>,
    frame_ready: Rc<Cell<bool>>,
}

struct FakeStream {
    device: CameraDevice,
    counters: CameraCounters,
    frame: CameraFrame,
    stopped: bool,
}

impl CaptureStream for FakeStream {
    fn device(&self) -> &CameraDevice {
        &self.device
    }
    fn ready_state(&mut self) -> ReadyState {
        if self.counters.frame_ready.get() {
            ReadyState::HaveEnoughData
        } else {
            ReadyState::HaveMetadata
        }
    }
    fn latest_frame(&self) -> Option<&CameraFrame> {
        self.counters.frame_ready.get().then_some(&self.frame)
    }
    fn stop_tracks(&mut self) {
        if !self.stopped {
            self.stopped = true;
            self.counters.released.set(self.counters.released.get() + 1);
        }
    }
    fn is_stopped(&self) -> bool {
        self.stopped
    }
}

struct FakeBackend {
    counters: CameraCounters,
    error: Option<CameraError>,
}

impl CameraBackend for FakeBackend {
    fn enumerate_cameras(&self) -> Vec<CameraDevice> {
        vec![fake_device()]
    }

    fn open_stream(
        &mut self,
        _constraints: &StreamConstraints,
    ) -> BackendResult<Box<dyn CaptureStream>> {
        if let Some(e) = self.error.clone() {
            return Err(e);
        }
        self.counters.opened.set(self.counters.opened.get() + 1);
        Ok(Box::new(FakeStream {
            device: fake_device(),
            counters: self.counters.clone(),
            frame: CameraFrame::from_rgba(4, 4, vec![255; 4 * 4 * 4]).unwrap(),
            stopped: false,
        }))
    }
}

fn fake_device() -> CameraDevice {
    CameraDevice {
        name: "Fake Camera".to_string(),
        path: "/dev/video0".to_string(),
        location: CameraLocation::Back,
        device_info: None,
        pixel_formats: vec!["YUYV".to_string()],
    }
}

/// Decodes every frame to the same text
struct ScriptedDecoder(Option<String>);

impl QrDecoder for ScriptedDecoder {
    fn decode(&self, _buffer: &PixelBuffer) -> Option<String> {
        self.0.clone()
    }
}

#[derive(Clone, Default)]
struct FakeClipboard {
    text: Rc<RefCell<Option<String>>>,
    fail: Rc<Cell<bool>>,
}

impl ClipboardSink for FakeClipboard {
    fn set_text(&mut self, text: &str) -> AppResult<()> {
        if self.fail.get() {
            return Err(AppError::Clipboard("unavailable".to_string()));
        }
        *self.text.borrow_mut() = Some(text.to_string());
        Ok(())
    }
}

#[derive(Clone, Default)]
struct FakeBrowser {
    opened: Rc<RefCell<Vec<String>>>,
}

impl LinkOpener for FakeBrowser {
    fn open(&mut self, href: &str) -> AppResult<()> {
        self.opened.borrow_mut().push(href.to_string());
        Ok(())
    }
}

struct Harness {
    app: AppModel,
    camera: CameraCounters,
    clipboard: FakeClipboard,
    browser: FakeBrowser,
}

fn harness_with(decoder: Box<dyn QrDecoder>, camera_error: Option<CameraError>) -> Harness {
    let camera = CameraCounters::default();
    let clipboard = FakeClipboard::default();
    let browser = FakeBrowser::default();
    let app = AppModel::new(
        Config::default(),
        AppServices {
            backend: Box::new(FakeBackend {
                counters: camera.clone(),
                error: camera_error,
            }),
            decoder,
            preferences: Box::new(CookieJar::in_memory()),
            clipboard: Box::new(clipboard.clone()),
            opener: Box::new(browser.clone()),
        },
    );
    Harness {
        app,
        camera,
        clipboard,
        browser,
    }
}

fn harness(decoded: Option<&str>) -> Harness {
    harness_with(
        Box::new(ScriptedDecoder(decoded.map(str::to_string))),
        None,
    )
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("qrscan-flow-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Render `content` as a QR code PNG with a quiet zone
fn write_qr_png(path: &std::path::Path, content: &str) {
    let code = qrcode::QrCode::new(content.as_bytes()).unwrap();
    let modules = code.width() as u32;
    let colors = code.to_colors();
    let scale = 8;
    let quiet = 4;
    let size = (modules + quiet * 2) * scale;

    let img = image::GrayImage::from_fn(size, size, |x, y| {
        let mx = (x / scale) as i64 - quiet as i64;
        let my = (y / scale) as i64 - quiet as i64;
        let dark = mx >= 0
            && my >= 0
            && (mx as u32) < modules
            && (my as u32) < modules
            && colors[(my as u32 * modules + mx as u32) as usize] == qrcode::Color::Dark;
        image::Luma([if dark { 0 } else { 255 }])
    });
    img.save(path).unwrap();
}

// ===== Camera flows =====

#[test]
fn test_camera_decode_shows_link_and_stops() {
    let mut h = harness(Some("www.example.com"));

    h.app.update(Message::ToggleCamera);
    assert!(h.app.camera.is_scanning());
    assert!(h.app.camera.is_video_visible());

    // Nothing buffered yet: skipped, still scanning
    h.app.update(Message::Tick(Instant::now()));
    assert!(h.app.camera.is_scanning());
    assert_eq!(h.app.presenter.view(), ResultView::Hidden);

    // Next refresh, once the rescheduled task is due
    h.camera.frame_ready.set(true);
    h.app
        .update(Message::Tick(Instant::now() + Duration::from_secs(1)));

    assert!(!h.app.camera.is_scanning());
    assert!(!h.app.camera.is_video_visible());
    assert_eq!(h.camera.released.get(), 1);
    assert_eq!(
        h.app.presenter.view(),
        ResultView::Link {
            text: "www.example.com".to_string(),
            href: "http://www.example.com".to_string(),
        }
    );
}

#[test]
fn test_camera_decode_plain_text() {
    let mut h = harness(Some("hello world"));
    h.camera.frame_ready.set(true);

    h.app.update(Message::StartCamera);
    h.app.update(Message::Tick(Instant::now()));

    assert_eq!(
        h.app.presenter.view(),
        ResultView::Text("hello world".to_string())
    );
}

#[test]
fn test_camera_failure_alerts_and_stays_idle() {
    let mut h = harness_with(
        Box::new(ScriptedDecoder(None)),
        Some(CameraError::PermissionDenied("/dev/video0".to_string())),
    );

    h.app.update(Message::StartCamera);

    assert!(!h.app.camera.is_scanning());
    assert_eq!(
        h.app.dialog,
        Some(Dialog::alert(messages::CAMERA_ACCESS_FAILED))
    );
}

#[test]
fn test_start_while_scanning_is_noop() {
    let mut h = harness(None);

    h.app.update(Message::StartCamera);
    h.app.update(Message::StartCamera);

    assert_eq!(h.camera.opened.get(), 1);
    assert!(h.app.camera.is_scanning());
}

#[test]
fn test_stop_without_decode_clears_flags() {
    let mut h = harness(None);
    h.camera.frame_ready.set(true);

    h.app.update(Message::ToggleCamera);
    h.app.update(Message::Tick(Instant::now()));
    assert!(h.app.camera.is_scanning());

    h.app.update(Message::ToggleCamera);
    assert!(!h.app.camera.is_scanning());
    assert!(!h.app.camera.is_video_visible());
    assert_eq!(h.camera.released.get(), 1);
    assert_eq!(h.app.presenter.view(), ResultView::Hidden);
}

#[test]
fn test_open_dialog_pauses_scanning() {
    let mut h = harness(Some("paused"));
    h.camera.frame_ready.set(true);
    h.app.update(Message::StartCamera);

    h.app.dialog = Some(Dialog::alert("busy"));
    h.app.update(Message::Tick(Instant::now()));
    assert!(h.app.camera.is_scanning());
    assert_eq!(h.app.presenter.view(), ResultView::Hidden);

    h.app.update(Message::DialogAccept);
    h.app.update(Message::Tick(Instant::now()));
    assert_eq!(h.app.presenter.view(), ResultView::Text("paused".to_string()));
}

// ===== Image flows =====

#[test]
fn test_image_without_code_only_alerts() {
    let dir = scratch_dir("blank");
    let path = dir.join("blank.png");
    image::GrayImage::from_pixel(64, 64, image::Luma([255])).save(&path).unwrap();

    let mut h = harness_with(Box::new(RqrrDecoder::new()), None);
    h.app.presenter.show("previous");

    h.app.update(Message::ImageSelected(path));

    assert_eq!(h.app.presenter.view(), ResultView::Text("previous".to_string()));
    assert_eq!(h.app.dialog, Some(Dialog::alert(messages::NO_QR_IN_IMAGE)));
    assert!(!h.app.camera.is_scanning());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_unreadable_image_alerts() {
    let dir = scratch_dir("garbage");
    let path = dir.join("garbage.png");
    std::fs::write(&path, b"definitely not a png").unwrap();

    let mut h = harness_with(Box::new(RqrrDecoder::new()), None);
    h.app.update(Message::ImageSelected(path));

    assert_eq!(h.app.presenter.view(), ResultView::Hidden);
    assert_eq!(h.app.dialog, Some(Dialog::alert(messages::IMAGE_LOAD_FAILED)));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_image_with_code_is_decoded() {
    let dir = scratch_dir("qr");
    let path = dir.join("code.png");
    write_qr_png(&path, "https://example.com/scan");

    let mut h = harness_with(Box::new(RqrrDecoder::new()), None);
    h.app.update(Message::ImageSelected(path));

    assert_eq!(h.app.dialog, None);
    assert_eq!(
        h.app.presenter.view(),
        ResultView::Link {
            text: "https://example.com/scan".to_string(),
            href: "https://example.com/scan".to_string(),
        }
    );
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_large_image_is_downscaled_and_decoded() {
    let dir = scratch_dir("qr-large");
    let path = dir.join("code.png");
    write_qr_png(&path, "hello world");

    let buffer = PixelBuffer::load(&path).unwrap();
    let decoder = RqrrDecoder::with_max_dimension(buffer.width() / 2);
    assert_eq!(decoder.decode(&buffer).as_deref(), Some("hello world"));
    let _ = std::fs::remove_dir_all(&dir);
}

// ===== Result actions =====

#[test]
fn test_copy_reports_outcome() {
    let mut h = harness(None);
    h.app.presenter.show("www.example.com");

    h.app.update(Message::CopyResult);
    assert_eq!(h.clipboard.text.borrow().as_deref(), Some("www.example.com"));
    assert_eq!(h.app.dialog, Some(Dialog::alert(messages::COPY_SUCCEEDED)));
    h.app.update(Message::DialogDismiss);

    h.clipboard.fail.set(true);
    h.app.update(Message::CopyResult);
    assert_eq!(h.app.dialog, Some(Dialog::alert(messages::COPY_FAILED)));
}

#[test]
fn test_save_writes_fixed_file_name() {
    let dir = scratch_dir("save");
    let mut h = harness(None);
    h.app.save_dir = dir.clone();
    h.app.presenter.show("hello world");

    h.app.update(Message::SaveResult);

    let saved = dir.join(SAVE_FILE_NAME);
    assert_eq!(std::fs::read_to_string(&saved).unwrap(), "hello world");
    assert!(h.app.status.as_deref().unwrap_or_default().contains(SAVE_FILE_NAME));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_follow_link_confirmation() {
    let mut h = harness(None);
    h.app.presenter.show("www.example.com");

    h.app.update(Message::FollowLink);
    assert_eq!(
        h.app.dialog,
        Some(Dialog::Confirm {
            message: "Are you sure you want to browse this url?\n\nhttp://www.example.com"
                .to_string(),
            href: "http://www.example.com".to_string(),
        })
    );
    h.app.update(Message::DialogDismiss);
    assert!(h.browser.opened.borrow().is_empty());

    h.app.update(Message::FollowLink);
    h.app.update(Message::DialogAccept);
    assert_eq!(
        *h.browser.opened.borrow(),
        vec!["http://www.example.com".to_string()]
    );
}

// ===== Theme =====

#[test]
fn test_theme_toggle_twice_restores_persisted_value() {
    let dir = scratch_dir("theme");
    let jar_path = dir.join("cookies");
    let mut jar = CookieJar::open(&jar_path);
    jar.set(theme::COOKIE_NAME, "light", theme::COOKIE_MAX_AGE_DAYS)
        .unwrap();

    let mut app = AppModel::new(
        Config::default(),
        AppServices {
            backend: Box::new(FakeBackend {
                counters: CameraCounters::default(),
                error: None,
            }),
            decoder: Box::new(ScriptedDecoder(None)),
            preferences: Box::new(CookieJar::open(&jar_path)),
            clipboard: Box::new(FakeClipboard::default()),
            opener: Box::new(FakeBrowser::default()),
        },
    );
    assert_eq!(app.theme.mode(), ThemeMode::Light);

    app.update(Message::ToggleTheme);
    assert_eq!(app.theme.mode(), ThemeMode::Dark);
    assert_eq!(
        CookieJar::open(&jar_path).get(theme::COOKIE_NAME).as_deref(),
        Some("dark")
    );

    app.update(Message::ToggleTheme);
    assert_eq!(app.theme.mode(), ThemeMode::Light);
    assert_eq!(
        CookieJar::open(&jar_path).get(theme::COOKIE_NAME).as_deref(),
        Some("light")
    );

    let stored = std::fs::read_to_string(&jar_path).unwrap();
    assert!(stored.contains("theme=light"));
    assert!(stored.contains("path=/"));
    assert!(stored.contains("SameSite=Lax"));
    let _ = std::fs::remove_dir_all(&dir);
}
