// SPDX-License-Identifier: GPL-3.0-only

//! V4L2 camera backend
//!
//! Enumerates `/dev/video*` capture nodes and streams frames with
//! memory-mapped buffers. The device is opened on the capture thread; the
//! opening thread waits for the outcome so that permission and busy errors
//! surface synchronously from `open_stream`.

use super::format_converters::{SUPPORTED_FOURCCS, to_rgba};
use super::frame_loop::{CaptureLoopController, LoopAction};
use super::{
    BackendResult, CameraBackend, CameraDevice, CameraFrame, CameraLocation, CaptureStream,
    DeviceInfo, ReadyState, StreamConstraints,
};
use crate::constants::capture;
use crate::errors::CameraError;
use futures::channel::mpsc;
use std::path::{Path, PathBuf};
use std::sync::mpsc::RecvTimeoutError;
use tracing::{debug, info, warn};
use v4l::buffer::Type;
use v4l::capability::Flags;
use v4l::io::mmap::Stream;
use v4l::io::traits::CaptureStream as V4lCaptureStream;
use v4l::prelude::*;
use v4l::video::Capture;
use v4l::{Format, FourCC};

/// Consecutive read failures after which the capture thread gives up
const MAX_CONSECUTIVE_ERRORS: u32 = 30;

/// Backend over the kernel V4L2 interface
#[derive(Debug, Clone)]
pub struct V4l2Backend {
    dev_dir: PathBuf,
}

impl Default for V4l2Backend {
    fn default() -> Self {
        Self::new()
    }
}

impl V4l2Backend {
    pub fn new() -> Self {
        Self {
            dev_dir: PathBuf::from("/dev"),
        }
    }

    /// Probe all video nodes, remembering whether any was refused
    fn scan_devices(&self) -> (Vec<CameraDevice>, Option<CameraError>) {
        let mut nodes: Vec<(u32, PathBuf)> = std::fs::read_dir(&self.dev_dir)
            .into_iter()
            .flatten()
            .flatten()
            .filter_map(|entry| {
                let name = entry.file_name();
                let index = name.to_str()?.strip_prefix("video")?.parse::<u32>().ok()?;
                Some((index, entry.path()))
            })
            .collect();
        nodes.sort_by_key(|(index, _)| *index);

        let mut cameras = Vec::new();
        let mut refused = None;
        for (_, path) in nodes {
            match probe_device(&path) {
                Ok(Some(device)) => cameras.push(device),
                Ok(None) => {}
                Err(CameraError::PermissionDenied(msg)) => {
                    debug!(path = %path.display(), "Permission denied while probing");
                    refused = Some(CameraError::PermissionDenied(msg));
                }
                Err(e) => debug!(path = %path.display(), error = %e, "Skipping device"),
            }
        }

        (cameras, refused)
    }
}

/// Query a node; `Ok(None)` for nodes that are not usable capture devices
fn probe_device(path: &Path) -> BackendResult<Option<CameraDevice>> {
    let dev = Device::with_path(path)?;
    let caps = dev.query_caps()?;
    if !caps.capabilities.contains(Flags::VIDEO_CAPTURE) {
        return Ok(None);
    }

    // Metadata nodes advertise capture but list no pixel formats we can use
    let advertised = dev.enum_formats().unwrap_or_default();
    let pixel_formats: Vec<String> = SUPPORTED_FOURCCS
        .iter()
        .filter(|fourcc| advertised.iter().any(|d| d.fourcc == FourCC::new(fourcc)))
        .map(|fourcc| String::from_utf8_lossy(*fourcc).to_string())
        .collect();
    if pixel_formats.is_empty() {
        return Ok(None);
    }

    let location = CameraLocation::from_device_info(&caps.card, &caps.bus);
    Ok(Some(CameraDevice {
        name: caps.card.clone(),
        path: path.to_string_lossy().to_string(),
        location,
        device_info: Some(DeviceInfo {
            card: caps.card,
            driver: caps.driver,
            bus: caps.bus,
        }),
        pixel_formats,
    }))
}

impl CameraBackend for V4l2Backend {
    fn enumerate_cameras(&self) -> Vec<CameraDevice> {
        let (cameras, _) = self.scan_devices();
        info!(count = cameras.len(), "Enumerated V4L2 cameras");
        cameras
    }

    fn open_stream(
        &mut self,
        constraints: &StreamConstraints,
    ) -> BackendResult<Box<dyn CaptureStream>> {
        let (cameras, refused) = self.scan_devices();
        if cameras.is_empty()
            && let Some(err) = refused
        {
            return Err(err);
        }

        let device = constraints.select_device(&cameras)?.clone();
        info!(
            device = %device.name,
            path = %device.path,
            location = %device.location,
            "Opening camera"
        );

        let stream = V4l2Stream::open(device, constraints.width, constraints.height)?;
        Ok(Box::new(stream))
    }
}

/// Capture state living on the capture thread
struct CaptureSession {
    stream: Stream<'static>,
    fourcc: [u8; 4],
    width: u32,
    height: u32,
    /// Bytes per line as negotiated by the driver
    stride: u32,
    consecutive_errors: u32,
}

/// Open the device, pick the first supported format, map the buffers
fn open_capture(path: &str, width: u32, height: u32) -> BackendResult<CaptureSession> {
    let dev = Device::with_path(path)?;

    let advertised = dev.enum_formats()?;
    let fourcc = SUPPORTED_FOURCCS
        .iter()
        .find(|fourcc| advertised.iter().any(|d| d.fourcc == FourCC::new(fourcc)))
        .ok_or_else(|| CameraError::InvalidFormat("no supported pixel format".to_string()))?;

    let actual = dev.set_format(&Format::new(width, height, FourCC::new(fourcc)))?;
    if actual.fourcc != FourCC::new(fourcc) {
        return Err(CameraError::InvalidFormat(format!(
            "driver refused {}",
            String::from_utf8_lossy(*fourcc)
        )));
    }

    info!(
        width = actual.width,
        height = actual.height,
        stride = actual.stride,
        fourcc = %String::from_utf8_lossy(&actual.fourcc.repr),
        "V4L2 format configured"
    );

    let stream = Stream::with_buffers(&dev, Type::VideoCapture, capture::BUFFER_COUNT)?;

    Ok(CaptureSession {
        stream,
        fourcc: actual.fourcc.repr,
        width: actual.width,
        height: actual.height,
        stride: actual.stride,
        consecutive_errors: 0,
    })
}

/// One capture iteration: read, convert, forward
fn capture_one(session: &mut CaptureSession, sender: &mut mpsc::Sender<CameraFrame>) -> LoopAction {
    let (buf, meta) = match V4lCaptureStream::next(&mut session.stream) {
        Ok(frame) => frame,
        Err(e) => {
            session.consecutive_errors += 1;
            warn!(error = %e, "Failed to capture frame");
            if session.consecutive_errors >= MAX_CONSECUTIVE_ERRORS {
                warn!("Too many capture errors, giving up");
                return LoopAction::Stop;
            }
            return LoopAction::Continue;
        }
    };
    session.consecutive_errors = 0;

    // Drivers that leave bytesused at 0 fill the whole buffer
    let used = match meta.bytesused as usize {
        0 => buf.len(),
        n => n.min(buf.len()),
    };

    let Some(frame) = to_rgba(
        &session.fourcc,
        &buf[..used],
        session.width,
        session.height,
        session.stride,
    )
    .and_then(|rgba| CameraFrame::from_rgba(session.width, session.height, rgba)) else {
        return LoopAction::Continue;
    };

    match sender.try_send(frame) {
        Ok(()) => LoopAction::Continue,
        Err(e) if e.is_disconnected() => LoopAction::Stop,
        // UI is behind; drop this frame
        Err(_) => LoopAction::Continue,
    }
}

/// Stream over one V4L2 device
pub struct V4l2Stream {
    device: CameraDevice,
    controller: Option<CaptureLoopController>,
    receiver: mpsc::Receiver<CameraFrame>,
    latest: Option<CameraFrame>,
}

impl V4l2Stream {
    fn open(device: CameraDevice, width: u32, height: u32) -> BackendResult<Self> {
        let (mut sender, receiver) = mpsc::channel(capture::FRAME_CHANNEL_CAPACITY);
        let (ready_tx, ready_rx) = std::sync::mpsc::channel::<BackendResult<()>>();
        let path = device.path.clone();

        let controller = CaptureLoopController::start_with_init(
            "v4l2-capture",
            move || match open_capture(&path, width, height) {
                Ok(session) => {
                    let _ = ready_tx.send(Ok(()));
                    Ok(session)
                }
                Err(e) => {
                    let message = e.to_string();
                    let _ = ready_tx.send(Err(e));
                    Err(message)
                }
            },
            move |session: &mut CaptureSession| capture_one(session, &mut sender),
        );

        match ready_rx.recv_timeout(capture::OPEN_TIMEOUT) {
            Ok(Ok(())) => Ok(Self {
                device,
                controller: Some(controller),
                receiver,
                latest: None,
            }),
            Ok(Err(e)) => Err(e),
            Err(RecvTimeoutError::Timeout) => {
                // The open call may still be blocked in the driver
                controller.detach();
                Err(CameraError::InitializationFailed(
                    "timed out opening device".to_string(),
                ))
            }
            // Capture thread could not be spawned
            Err(RecvTimeoutError::Disconnected) => Err(CameraError::InitializationFailed(
                "capture thread did not start".to_string(),
            )),
        }
    }
}

impl CaptureStream for V4l2Stream {
    fn device(&self) -> &CameraDevice {
        &self.device
    }

    fn ready_state(&mut self) -> ReadyState {
        if self.controller.is_none() {
            return ReadyState::HaveNothing;
        }
        while let Ok(frame) = self.receiver.try_recv() {
            self.latest = Some(frame);
        }
        if self.latest.is_some() {
            ReadyState::HaveEnoughData
        } else {
            ReadyState::HaveMetadata
        }
    }

    fn latest_frame(&self) -> Option<&CameraFrame> {
        self.latest.as_ref()
    }

    fn stop_tracks(&mut self) {
        if let Some(mut controller) = self.controller.take() {
            info!(path = %self.device.path, "Releasing camera");
            controller.request_stop();
            self.receiver.close();
            controller.join();
        }
        self.latest = None;
    }

    fn is_stopped(&self) -> bool {
        // Released, or the capture thread exited after repeated read errors
        self.controller.as_ref().is_none_or(|c| !c.is_running())
    }
}

impl Drop for V4l2Stream {
    fn drop(&mut self) {
        self.stop_tracks();
    }
}
