// SPDX-License-Identifier: GPL-3.0-only

//! Camera capture session
//!
//! A thin GStreamer/PipeWire pipeline that feeds live RGBA frames to the
//! scanner screen. The screen owns the pipeline for as long as it is
//! visible; the preview surface and the code detector only ever read the
//! frames it produces.

mod pipeline;
mod types;

pub use pipeline::CapturePipeline;
pub use types::{CameraFrame, CaptureError, CaptureResult, FrameReceiver, FrameSender};
