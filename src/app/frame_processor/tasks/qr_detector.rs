// SPDX-License-Identifier: GPL-3.0-only

//! QR code decoding
//!
//! The decode step is a black box behind [`QrDecoder`]: pixel buffer in,
//! decoded text out. [`RqrrDecoder`] is the production implementation on top
//! of the rqrr crate; tests substitute their own.

use crate::app::frame_processor::types::PixelBuffer;
use tracing::{debug, trace};

/// Extracts text from a pixel buffer containing a QR code
pub trait QrDecoder {
    /// Decoded text of the first readable QR code, `None` if there is none
    fn decode(&self, buffer: &PixelBuffer) -> Option<String>;
}

/// QR decoder backed by rqrr
///
/// Converts the buffer to grayscale, downscales it if it is larger than
/// `max_dimension`, and returns the first grid that decodes.
#[derive(Debug, Clone)]
pub struct RqrrDecoder {
    /// Maximum dimension for processing (0 disables downscaling)
    max_dimension: u32,
}

impl Default for RqrrDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl RqrrDecoder {
    pub fn new() -> Self {
        Self::with_max_dimension(crate::constants::decode::DEFAULT_MAX_DIMENSION)
    }

    /// Create a decoder with custom max dimension
    pub fn with_max_dimension(max_dimension: u32) -> Self {
        Self { max_dimension }
    }
}

impl QrDecoder for RqrrDecoder {
    fn decode(&self, buffer: &PixelBuffer) -> Option<String> {
        if buffer.is_empty() {
            return None;
        }

        let start = std::time::Instant::now();
        let (src_width, src_height) = (buffer.width(), buffer.height());
        let luma = buffer.to_luma();
        if luma.len() != src_width as usize * src_height as usize {
            debug!(
                width = src_width,
                height = src_height,
                len = luma.len(),
                "Pixel data does not match buffer size"
            );
            return None;
        }

        let (luma, width, height) = match target_size(src_width, src_height, self.max_dimension) {
            Some((w, h)) => (downscale_luma(&luma, src_width, src_height, w, h), w, h),
            None => (luma, src_width, src_height),
        };

        let w = width as usize;
        let mut prepared =
            rqrr::PreparedImage::prepare_from_greyscale(w, height as usize, |x, y| luma[y * w + x]);
        let grids = prepared.detect_grids();

        trace!(
            width,
            height,
            grids = grids.len(),
            elapsed_ms = start.elapsed().as_millis(),
            "QR detection complete"
        );

        for grid in grids {
            match grid.decode() {
                Ok((_meta, content)) => {
                    debug!(length = content.len(), "Decoded QR code");
                    return Some(content);
                }
                Err(e) => debug!(error = %e, "Failed to decode QR grid"),
            }
        }

        None
    }
}

/// Downscaled size if the buffer exceeds `max_dimension`, keeping aspect
fn target_size(width: u32, height: u32, max_dimension: u32) -> Option<(u32, u32)> {
    if max_dimension == 0 || (width <= max_dimension && height <= max_dimension) {
        return None;
    }
    let scale = (width as f32 / max_dimension as f32).max(height as f32 / max_dimension as f32);
    Some((
        ((width as f32 / scale) as u32).max(1),
        ((height as f32 / scale) as u32).max(1),
    ))
}

/// Downscale a grayscale plane using bilinear interpolation
fn downscale_luma(src: &[u8], src_width: u32, src_height: u32, dst_width: u32, dst_height: u32) -> Vec<u8> {
    let src_width = src_width as usize;
    let src_height = src_height as usize;

    let mut result = Vec::with_capacity((dst_width * dst_height) as usize);

    let x_ratio = src_width as f32 / dst_width as f32;
    let y_ratio = src_height as f32 / dst_height as f32;

    let pixel = |px: usize, py: usize| -> f32 { src.get(py * src_width + px).copied().unwrap_or(0) as f32 };

    for y in 0..dst_height {
        for x in 0..dst_width {
            let src_x = x as f32 * x_ratio;
            let src_y = y as f32 * y_ratio;

            let x0 = (src_x as usize).min(src_width - 1);
            let y0 = (src_y as usize).min(src_height - 1);
            let x1 = (x0 + 1).min(src_width - 1);
            let y1 = (y0 + 1).min(src_height - 1);

            let x_frac = src_x - x0 as f32;
            let y_frac = src_y - y0 as f32;

            let value = pixel(x0, y0) * (1.0 - x_frac) * (1.0 - y_frac)
                + pixel(x1, y0) * x_frac * (1.0 - y_frac)
                + pixel(x0, y1) * (1.0 - x_frac) * y_frac
                + pixel(x1, y1) * x_frac * y_frac;

            result.push(value as u8);
        }
    }

    result
}
