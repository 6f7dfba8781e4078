// SPDX-License-Identifier: GPL-3.0-only

//! Frame sampler
//!
//! Copies the current camera frame or a still image into a [`PixelBuffer`]
//! and hands it to the decoder.

use super::tasks::QrDecoder;
use super::types::PixelBuffer;
use crate::backends::camera::{CaptureStream, ReadyState};
use crate::errors::ScanError;
use std::path::Path;
use tracing::{debug, info, warn};

/// Outcome of sampling the live stream once
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameSample {
    /// No frame buffered yet
    NotReady,
    /// A frame was decoded but held no readable code
    NoCode,
    Decoded(String),
}

pub struct FrameSampler {
    decoder: Box<dyn QrDecoder>,
}

impl FrameSampler {
    pub fn new(decoder: Box<dyn QrDecoder>) -> Self {
        Self { decoder }
    }

    /// Sample the stream's latest frame
    pub fn sample_stream(&self, stream: &mut dyn CaptureStream) -> FrameSample {
        if stream.ready_state() < ReadyState::HaveEnoughData {
            return FrameSample::NotReady;
        }
        let Some(frame) = stream.latest_frame() else {
            return FrameSample::NotReady;
        };

        let buffer = match PixelBuffer::from_frame(frame) {
            Ok(buffer) => buffer,
            Err(e) => {
                warn!(error = %e, "Dropping malformed camera frame");
                return FrameSample::NoCode;
            }
        };
        match self.decoder.decode(&buffer) {
            Some(content) => {
                info!(
                    width = buffer.width(),
                    height = buffer.height(),
                    "QR code found in camera frame"
                );
                FrameSample::Decoded(content)
            }
            None => FrameSample::NoCode,
        }
    }

    /// Decode a single still image
    pub fn scan_buffer(&self, buffer: &PixelBuffer) -> Result<String, ScanError> {
        self.decoder.decode(buffer).ok_or(ScanError::NoCodeFound)
    }

    /// Load an image file and decode it once
    pub fn scan_image(&self, path: &Path) -> Result<String, ScanError> {
        let buffer = PixelBuffer::load(path)?;
        debug!(
            path = %path.display(),
            width = buffer.width(),
            height = buffer.height(),
            "Loaded image for scanning"
        );
        self.scan_buffer(&buffer)
    }
}

impl std::fmt::Debug for FrameSampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameSampler").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::camera::{CameraDevice, CameraFrame, CameraLocation};

    /// Decoder that reports the buffer size it was handed
    struct SizeDecoder;

    impl QrDecoder for SizeDecoder {
        fn decode(&self, buffer: &PixelBuffer) -> Option<String> {
            (buffer.data().len() == (buffer.width() * buffer.height() * 4) as usize)
                .then(|| format!("{}x{}", buffer.width(), buffer.height()))
        }
    }

    struct NothingDecoder;

    impl QrDecoder for NothingDecoder {
        fn decode(&self, _buffer: &PixelBuffer) -> Option<String> {
            None
        }
    }

    struct StillStream {
        device: CameraDevice,
        frame: Option<CameraFrame>,
    }

    impl StillStream {
        fn new(frame: Option<CameraFrame>) -> Self {
            Self {
                device: CameraDevice {
                    name: "still".to_string(),
                    path: "/dev/null".to_string(),
                    location: CameraLocation::Unknown,
                    device_info: None,
                    pixel_formats: Vec::new(),
                },
                frame,
            }
        }
    }

    impl CaptureStream for StillStream {
        fn device(&self) -> &CameraDevice {
            &self.device
        }
        fn ready_state(&mut self) -> ReadyState {
            if self.frame.is_some() {
                ReadyState::HaveEnoughData
            } else {
                ReadyState::HaveMetadata
            }
        }
        fn latest_frame(&self) -> Option<&CameraFrame> {
            self.frame.as_ref()
        }
        fn stop_tracks(&mut self) {
            self.frame = None;
        }
        fn is_stopped(&self) -> bool {
            false
        }
    }

    #[test]
    fn test_not_ready_without_frame() {
        let sampler = FrameSampler::new(Box::new(SizeDecoder));
        let mut stream = StillStream::new(None);
        assert_eq!(sampler.sample_stream(&mut stream), FrameSample::NotReady);
    }

    #[test]
    fn test_buffer_matches_native_frame_size() {
        let sampler = FrameSampler::new(Box::new(SizeDecoder));
        let frame = CameraFrame::from_rgba(6, 3, vec![0; 6 * 3 * 4]).unwrap();
        let mut stream = StillStream::new(Some(frame));
        assert_eq!(
            sampler.sample_stream(&mut stream),
            FrameSample::Decoded("6x3".to_string())
        );
    }

    #[test]
    fn test_no_code() {
        let sampler = FrameSampler::new(Box::new(NothingDecoder));
        let frame = CameraFrame::from_rgba(2, 2, vec![0; 16]).unwrap();
        let mut stream = StillStream::new(Some(frame));
        assert_eq!(sampler.sample_stream(&mut stream), FrameSample::NoCode);

        let buffer = PixelBuffer::new(2, 2, vec![0; 16]).unwrap();
        assert_eq!(sampler.scan_buffer(&buffer), Err(ScanError::NoCodeFound));
    }

    #[test]
    fn test_short_frame_is_skipped() {
        use std::sync::Arc;

        let sampler = FrameSampler::new(Box::new(SizeDecoder));
        let frame = CameraFrame {
            width: 8,
            height: 8,
            stride: 32,
            data: Arc::from(vec![0u8; 32].as_slice()),
            captured_at: std::time::Instant::now(),
        };
        let mut stream = StillStream::new(Some(frame));
        assert_eq!(sampler.sample_stream(&mut stream), FrameSample::NoCode);
    }

    #[test]
    fn test_missing_image_file() {
        let sampler = FrameSampler::new(Box::new(SizeDecoder));
        let result = sampler.scan_image(Path::new("/nonexistent/qrscan/image.png"));
        assert!(matches!(result, Err(ScanError::ImageLoad(_))));
    }
}
