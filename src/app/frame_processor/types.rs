// SPDX-License-Identifier: MPL-2.0

//! Core types for frame processing
//!
//! A [`PixelBuffer`] is the offscreen copy of a frame or still image that is
//! handed to the decoder: tightly packed RGBA at the source's native size.

use crate::backends::camera::CameraFrame;
use crate::errors::ScanError;

/// Tightly packed RGBA pixels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw RGBA pixels, checking the length against the dimensions
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, ScanError> {
        if data.len() != (width as usize) * (height as usize) * 4 {
            return Err(ScanError::InvalidBuffer {
                width,
                height,
                len: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Copy a camera frame, dropping row padding
    ///
    /// Fails if the frame data is shorter than its dimensions claim.
    pub fn from_frame(frame: &CameraFrame) -> Result<Self, ScanError> {
        Self::new(frame.width, frame.height, copy_rgba_without_stride(frame))
    }

    /// Copy a decoded still image
    pub fn from_image(image: &image::DynamicImage) -> Self {
        let rgba = image.to_rgba8();
        Self {
            width: rgba.width(),
            height: rgba.height(),
            data: rgba.into_raw(),
        }
    }

    /// Load and decode an image file
    pub fn load(path: &std::path::Path) -> Result<Self, ScanError> {
        let image = image::ImageReader::open(path)
            .map_err(|e| ScanError::ImageLoad(format!("{}: {}", path.display(), e)))?
            .with_guessed_format()
            .map_err(|e| ScanError::ImageLoad(format!("{}: {}", path.display(), e)))?
            .decode()?;
        Ok(Self::from_image(&image))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Packed RGBA bytes, `width * height * 4` long
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Luma (BT.601) of every pixel, row-major
    pub fn to_luma(&self) -> Vec<u8> {
        self.data
            .chunks_exact(4)
            .map(|px| {
                let (r, g, b) = (px[0] as u32, px[1] as u32, px[2] as u32);
                ((r * 299 + g * 587 + b * 114) / 1000) as u8
            })
            .collect()
    }
}

/// Copy RGBA frame data without stride padding
fn copy_rgba_without_stride(frame: &CameraFrame) -> Vec<u8> {
    let width = frame.width as usize;
    let height = frame.height as usize;
    let stride = frame.stride as usize;

    let mut result = Vec::with_capacity(width * height * 4);

    for y in 0..height {
        let row_start = y * stride;
        let row_end = row_start + width * 4;
        if row_end <= frame.data.len() {
            result.extend_from_slice(&frame.data[row_start..row_end]);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_copy_rgba_without_stride() {
        let data: Vec<u8> = vec![
            255, 0, 0, 255, // Red pixel
            0, 255, 0, 255, // Green pixel
            0, 0, // stride padding
            0, 0, 255, 255, // Blue pixel
            255, 255, 255, 255, // White pixel
            0, 0, // stride padding
        ];

        let frame = CameraFrame {
            width: 2,
            height: 2,
            data: Arc::from(data.as_slice()),
            stride: 10,
            captured_at: std::time::Instant::now(),
        };

        let buffer = PixelBuffer::from_frame(&frame).unwrap();
        assert_eq!(buffer.width, 2);
        assert_eq!(buffer.height, 2);
        assert_eq!(buffer.data.len(), 16);
        assert_eq!(&buffer.data[0..4], &[255, 0, 0, 255]);
        assert_eq!(&buffer.data[8..12], &[0, 0, 255, 255]);
        assert_eq!(&buffer.data[12..16], &[255, 255, 255, 255]);
    }

    #[test]
    fn test_short_frame_is_rejected() {
        // Claims 8x8 but only carries a single row
        let frame = CameraFrame {
            width: 8,
            height: 8,
            data: Arc::from(vec![0u8; 32].as_slice()),
            stride: 32,
            captured_at: std::time::Instant::now(),
        };

        assert_eq!(
            PixelBuffer::from_frame(&frame),
            Err(ScanError::InvalidBuffer {
                width: 8,
                height: 8,
                len: 32
            })
        );
    }

    #[test]
    fn test_new_checks_length() {
        assert!(PixelBuffer::new(2, 2, vec![0; 16]).is_ok());
        assert_eq!(
            PixelBuffer::new(2, 2, vec![0; 15]),
            Err(ScanError::InvalidBuffer {
                width: 2,
                height: 2,
                len: 15
            })
        );
    }

    #[test]
    fn test_from_image_keeps_native_size() {
        let image = image::DynamicImage::new_rgb8(37, 21);
        let buffer = PixelBuffer::from_image(&image);
        assert_eq!((buffer.width, buffer.height), (37, 21));
        assert_eq!(buffer.data.len(), 37 * 21 * 4);
    }

    #[test]
    fn test_luma_extremes() {
        let buffer = PixelBuffer::new(2, 1, vec![0, 0, 0, 255, 255, 255, 255, 255]).unwrap();
        assert_eq!(buffer.to_luma(), vec![0, 255]);
    }
}
