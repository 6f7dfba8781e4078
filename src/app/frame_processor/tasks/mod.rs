// SPDX-License-Identifier: GPL-3.0-only

//! Frame processing tasks
//!
//! This module contains the decoder abstraction and the recurring scan task
//! that drives sampling while the camera is open.

pub mod qr_detector;
pub mod scan_task;

pub use qr_detector::{QrDecoder, RqrrDecoder};
pub use scan_task::ScanTask;
