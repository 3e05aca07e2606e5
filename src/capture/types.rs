// SPDX-License-Identifier: GPL-3.0-only

//! Shared types for the capture session

use std::sync::Arc;
use std::time::Instant;

/// A single RGBA frame from the camera
///
/// `data` is shared by reference between the preview surface and the code
/// detector; neither mutates it.
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    /// RGBA pixel data, possibly with row padding (see `stride`)
    pub data: Arc<[u8]>,
    /// Bytes per row, may exceed `width * 4`
    pub stride: u32,
    /// Timestamp when the frame left the pipeline (for sampling cadence)
    pub captured_at: Instant,
}

impl CameraFrame {
    /// Copy the pixel data into a tightly packed RGBA buffer
    ///
    /// Rendering handles and the decoder both expect `width * 4` bytes per
    /// row, so stride padding is stripped here.
    pub fn to_tight_rgba(&self) -> Vec<u8> {
        let width = self.width as usize;
        let height = self.height as usize;
        let stride = self.stride as usize;
        let row_bytes = width * 4;

        if stride == row_bytes {
            return self.data.to_vec();
        }

        let mut result = Vec::with_capacity(row_bytes * height);
        for y in 0..height {
            let row_start = y * stride;
            let row_end = row_start + row_bytes;
            if row_end <= self.data.len() {
                result.extend_from_slice(&self.data[row_start..row_end]);
            }
        }
        result
    }
}

/// Frame sender type for preview streams
pub type FrameSender = cosmic::iced::futures::channel::mpsc::Sender<CameraFrame>;

/// Frame receiver type for preview streams
pub type FrameReceiver = cosmic::iced::futures::channel::mpsc::Receiver<CameraFrame>;

/// Result type for capture operations
pub type CaptureResult<T> = Result<T, CaptureError>;

/// Error types for capture operations
#[derive(Debug, Clone)]
pub enum CaptureError {
    /// Failed to construct or start the pipeline
    InitializationFailed(String),
    /// The running stream produced an error
    Stream(String),
}

impl std::fmt::Display for CaptureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaptureError::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            CaptureError::Stream(msg) => write!(f, "Stream error: {}", msg),
        }
    }
}

impl std::error::Error for CaptureError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(width: u32, height: u32, stride: u32, data: Vec<u8>) -> CameraFrame {
        CameraFrame {
            width,
            height,
            data: Arc::from(data.as_slice()),
            stride,
            captured_at: Instant::now(),
        }
    }

    #[test]
    fn tight_rgba_strips_stride_padding() {
        // 2x2 RGBA frame with 2 bytes of padding per row
        let data = vec![
            255, 0, 0, 255, 0, 255, 0, 255, 0, 0, // row 0 + padding
            0, 0, 255, 255, 255, 255, 255, 255, 0, 0, // row 1 + padding
        ];
        let frame = frame(2, 2, 10, data);

        let tight = frame.to_tight_rgba();
        assert_eq!(tight.len(), 16);
        assert_eq!(&tight[0..4], &[255, 0, 0, 255]);
        assert_eq!(&tight[4..8], &[0, 255, 0, 255]);
        assert_eq!(&tight[8..12], &[0, 0, 255, 255]);
        assert_eq!(&tight[12..16], &[255, 255, 255, 255]);
    }

    #[test]
    fn tight_rgba_passes_through_packed_frames() {
        let data = vec![7u8; 2 * 2 * 4];
        let frame = frame(2, 2, 8, data.clone());
        assert_eq!(frame.to_tight_rgba(), data);
    }
}
