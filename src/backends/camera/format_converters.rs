// SPDX-License-Identifier: GPL-3.0-only
//! Pixel format conversion for raw V4L2 capture buffers
//!
//! Every captured buffer is turned into tightly packed RGBA before it leaves
//! the capture thread, so the rest of the application only sees one layout.

use std::borrow::Cow;
use tracing::trace;

/// Capture formats the backend knows how to convert, in order of preference
pub const SUPPORTED_FOURCCS: [&[u8; 4]; 4] = [b"MJPG", b"YUYV", b"UYVY", b"GREY"];

/// Convert a raw buffer of the given FourCC to RGBA
///
/// `stride` is the driver's bytes per line (0 when rows are tightly packed);
/// row padding is stripped before conversion. Returns `None` for unknown
/// formats or buffers too short for the frame.
pub fn to_rgba(
    fourcc: &[u8; 4],
    data: &[u8],
    width: u32,
    height: u32,
    stride: u32,
) -> Option<Vec<u8>> {
    let (width_px, rows) = (width as usize, height as usize);
    match fourcc {
        b"MJPG" => mjpeg_to_rgba(data, width, height),
        b"YUYV" => packed_rows(data, width_px * 2, stride as usize, rows)
            .map(|d| yuyv_to_rgba(&d, width, height)),
        b"UYVY" => packed_rows(data, width_px * 2, stride as usize, rows)
            .map(|d| uyvy_to_rgba(&d, width, height)),
        b"GREY" => packed_rows(data, width_px, stride as usize, rows).map(|d| gray_to_rgba(&d)),
        _ => None,
    }
}

/// Drop per-row padding so rows are `row_bytes` apart
fn packed_rows(data: &[u8], row_bytes: usize, stride: usize, rows: usize) -> Option<Cow<'_, [u8]>> {
    let stride = stride.max(row_bytes);
    let needed = match rows {
        0 => 0,
        n => stride * (n - 1) + row_bytes,
    };
    if data.len() < needed {
        return None;
    }

    if stride == row_bytes {
        return Some(Cow::Borrowed(&data[..row_bytes * rows]));
    }

    trace!(row_bytes, stride, "Stripping row padding");
    Some(Cow::Owned(
        data.chunks(stride)
            .take(rows)
            .flat_map(|row| &row[..row_bytes])
            .copied()
            .collect(),
    ))
}

/// Convert YUV (BT.601) to RGB
fn yuv_to_rgb(y: u8, u: u8, v: u8) -> (u8, u8, u8) {
    let y = y as f32;
    let u = u as f32 - 128.0;
    let v = v as f32 - 128.0;

    let r = (y + 1.402 * v).clamp(0.0, 255.0) as u8;
    let g = (y - 0.344136 * u - 0.714136 * v).clamp(0.0, 255.0) as u8;
    let b = (y + 1.772 * u).clamp(0.0, 255.0) as u8;

    (r, g, b)
}

/// Convert YUYV (YUV 4:2:2) to RGBA
///
/// YUYV format: Y0 U0 Y1 V0 - each 4-byte group encodes 2 pixels.
pub fn yuyv_to_rgba(data: &[u8], width: u32, height: u32) -> Vec<u8> {
    packed_422_to_rgba(data, width, height, |c| (c[0], c[2], c[1], c[3]))
}

/// Convert UYVY (YUV 4:2:2) to RGBA
///
/// UYVY format: U0 Y0 V0 Y1 - each 4-byte group encodes 2 pixels.
pub fn uyvy_to_rgba(data: &[u8], width: u32, height: u32) -> Vec<u8> {
    packed_422_to_rgba(data, width, height, |c| (c[1], c[3], c[0], c[2]))
}

/// Shared 4:2:2 walker; `unpack` returns (y0, y1, u, v) for one 4-byte group
fn packed_422_to_rgba(
    data: &[u8],
    width: u32,
    height: u32,
    unpack: impl Fn(&[u8]) -> (u8, u8, u8, u8),
) -> Vec<u8> {
    let pixel_count = (width * height) as usize;
    let mut rgba = Vec::with_capacity(pixel_count * 4);

    for chunk in data.chunks_exact(4) {
        let (y0, y1, u, v) = unpack(chunk);
        for y in [y0, y1] {
            if rgba.len() >= pixel_count * 4 {
                return rgba;
            }
            let (r, g, b) = yuv_to_rgb(y, u, v);
            rgba.extend_from_slice(&[r, g, b, 255]);
        }
    }

    rgba
}

/// Expand 8-bit grayscale to RGBA
pub fn gray_to_rgba(data: &[u8]) -> Vec<u8> {
    data.iter().flat_map(|&v| [v, v, v, 255]).collect()
}

/// Decode an MJPEG frame to RGBA
///
/// Some webcams deliver a frame whose JPEG size differs from the negotiated
/// format; those are dropped.
pub fn mjpeg_to_rgba(data: &[u8], width: u32, height: u32) -> Option<Vec<u8>> {
    let img = image::load_from_memory_with_format(data, image::ImageFormat::Jpeg).ok()?;
    if img.width() != width || img.height() != height {
        trace!(
            got_width = img.width(),
            got_height = img.height(),
            width,
            height,
            "Dropping MJPEG frame with unexpected size"
        );
        return None;
    }
    Some(img.to_rgba8().into_raw())
}
