// SPDX-License-Identifier: GPL-3.0-only

//! QR code detection
//!
//! Samples live camera frames, converts them to grayscale and decodes
//! machine-readable codes with rqrr. Results flow through the
//! [`CodeDetectionHandler`] seam so the detector stays independent of the
//! UI layer that registers it.

use std::sync::Arc;

use image::imageops::FilterType;
use tracing::{debug, trace, warn};

use crate::capture::CameraFrame;
use crate::constants::detection;

/// A decoded machine-readable code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedCode {
    /// Decoded payload
    pub content: String,
}

impl DetectedCode {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// Parse the payload into a user-facing action
    pub fn action(&self) -> CodeAction {
        CodeAction::parse(&self.content)
    }
}

/// Action derived from a decoded payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeAction {
    /// URL that can be opened in a browser
    Url(String),
    /// Plain text that can be copied to the clipboard
    Text(String),
}

impl CodeAction {
    /// Identify the payload type
    pub fn parse(content: &str) -> Self {
        let trimmed = content.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            return Self::Url(trimmed.to_string());
        }
        Self::Text(trimmed.to_string())
    }
}

/// Callback capability for delivering decoded codes
///
/// The scanner screen registers one of these against the detection loop;
/// input is the decoded content, there is no output.
pub trait CodeDetectionHandler {
    fn codes_detected(&mut self, codes: Vec<DetectedCode>);
}

impl<F: FnMut(Vec<DetectedCode>)> CodeDetectionHandler for F {
    fn codes_detected(&mut self, codes: Vec<DetectedCode>) {
        self(codes)
    }
}

/// QR code detector
///
/// Analyzes camera frames for QR codes, downscaling large frames for
/// real-time performance.
pub struct QrDetector {
    /// Maximum dimension for processing (frames are downscaled to this)
    max_dimension: u32,
}

impl Default for QrDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl QrDetector {
    /// Create a new detector with the default processing resolution
    pub fn new() -> Self {
        Self {
            max_dimension: detection::MAX_DIMENSION,
        }
    }

    /// Create a detector with a custom processing resolution
    pub fn with_max_dimension(max_dimension: u32) -> Self {
        Self { max_dimension }
    }

    /// Detect QR codes in a camera frame
    ///
    /// The grayscale conversion and grid search are CPU-bound, so they run
    /// in a blocking task off the UI executor.
    pub async fn detect(&self, frame: Arc<CameraFrame>) -> Vec<DetectedCode> {
        let max_dim = self.max_dimension;

        tokio::task::spawn_blocking(move || detect_sync(&frame, max_dim))
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "QR detection task panicked");
                Vec::new()
            })
    }

    /// Detect codes and deliver the pass result to the registered handler
    ///
    /// The handler always fires, with an empty list when nothing decoded, so
    /// the caller can pace its sampling off completed passes.
    pub async fn detect_into(
        &self,
        frame: Arc<CameraFrame>,
        handler: &mut dyn CodeDetectionHandler,
    ) {
        let codes = self.detect(frame).await;
        handler.codes_detected(codes);
    }
}

/// Synchronous detection (runs in a blocking task)
fn detect_sync(frame: &CameraFrame, max_dimension: u32) -> Vec<DetectedCode> {
    let start = std::time::Instant::now();

    let Some(luma) = frame_to_luma(frame, max_dimension) else {
        warn!(
            width = frame.width,
            height = frame.height,
            "Frame data did not match its dimensions"
        );
        return Vec::new();
    };

    let mut prepared = rqrr::PreparedImage::prepare(luma);
    let grids = prepared.detect_grids();
    trace!(
        grids = grids.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "Grid search complete"
    );

    let mut codes = Vec::with_capacity(grids.len());
    for grid in grids {
        match grid.decode() {
            Ok((_meta, content)) => {
                debug!(content = %content, "Decoded QR code");
                codes.push(DetectedCode::new(content));
            }
            Err(e) => {
                debug!(error = %e, "Failed to decode QR grid");
            }
        }
    }

    if !codes.is_empty() {
        debug!(
            count = codes.len(),
            total_ms = start.elapsed().as_millis(),
            "QR detection found codes"
        );
    }

    codes
}

/// Convert an RGBA frame to grayscale, downscaling if it exceeds `max_dimension`
fn frame_to_luma(frame: &CameraFrame, max_dimension: u32) -> Option<image::GrayImage> {
    let rgba =
        image::RgbaImage::from_raw(frame.width, frame.height, frame.to_tight_rgba())?;
    let luma = image::DynamicImage::ImageRgba8(rgba).to_luma8();

    if frame.width <= max_dimension && frame.height <= max_dimension {
        return Some(luma);
    }

    let scale = (frame.width as f32 / max_dimension as f32)
        .max(frame.height as f32 / max_dimension as f32);
    let new_width = (frame.width as f32 / scale) as u32;
    let new_height = (frame.height as f32 / scale) as u32;
    Some(image::imageops::resize(
        &luma,
        new_width,
        new_height,
        FilterType::Triangle,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn gray_frame(width: u32, height: u32, value: u8) -> CameraFrame {
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..width * height {
            data.extend_from_slice(&[value, value, value, 255]);
        }
        CameraFrame {
            width,
            height,
            data: Arc::from(data.as_slice()),
            stride: width * 4,
            captured_at: Instant::now(),
        }
    }

    #[test]
    fn luma_conversion_preserves_dimensions() {
        let frame = gray_frame(8, 6, 128);
        let luma = frame_to_luma(&frame, 640).expect("conversion should succeed");
        assert_eq!(luma.dimensions(), (8, 6));
        assert_eq!(luma.get_pixel(0, 0).0[0], 128);
    }

    #[test]
    fn oversized_frames_are_downscaled() {
        let frame = gray_frame(64, 32, 50);
        let luma = frame_to_luma(&frame, 16).expect("conversion should succeed");
        let (w, h) = luma.dimensions();
        assert_eq!((w, h), (16, 8));
    }

    #[test]
    fn blank_frame_yields_no_codes() {
        let frame = gray_frame(32, 32, 255);
        let codes = detect_sync(&frame, 640);
        assert!(codes.is_empty());
    }

    #[test]
    fn action_parsing_distinguishes_urls_from_text() {
        assert_eq!(
            CodeAction::parse("https://example.org/x"),
            CodeAction::Url("https://example.org/x".to_string())
        );
        assert_eq!(
            CodeAction::parse("  hello world "),
            CodeAction::Text("hello world".to_string())
        );
    }

    #[test]
    fn handler_receives_decoded_codes() {
        let mut received = Vec::new();
        {
            let mut handler = |codes: Vec<DetectedCode>| received = codes;
            handler.codes_detected(vec![DetectedCode::new("abc")]);
        }
        assert_eq!(received, vec![DetectedCode::new("abc")]);
    }
}
