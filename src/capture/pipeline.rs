// SPDX-License-Identifier: GPL-3.0-only

//! GStreamer pipeline for camera capture

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use gstreamer::prelude::*;
use gstreamer_app::AppSink;
use gstreamer_video::VideoInfo;
use tracing::{debug, error, info, warn};

use super::types::{CameraFrame, CaptureError, CaptureResult, FrameSender};
use crate::constants::pipeline;

static FRAME_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Camera capture pipeline
///
/// Native GStreamer pipeline using pipewiresrc, converting to RGBA for the
/// preview surface and the code detector. Dropping the pipeline stops the
/// camera.
pub struct CapturePipeline {
    pipeline: gstreamer::Pipeline,
    _appsink: AppSink,
}

impl CapturePipeline {
    /// Create and start a new capture pipeline feeding `frame_sender`
    pub fn new(frame_sender: FrameSender) -> CaptureResult<Self> {
        debug!("Initializing GStreamer");
        gstreamer::init().map_err(|e| CaptureError::InitializationFailed(e.to_string()))?;

        // The portal/PipeWire default camera node; videoconvert handles
        // whatever raw format the node negotiates.
        let description =
            "pipewiresrc ! videoconvert ! video/x-raw,format=RGBA ! appsink name=sink";
        info!(pipeline = description, "Creating capture pipeline");

        let pipeline = gstreamer::parse::launch(description)
            .map_err(|e| CaptureError::InitializationFailed(e.to_string()))?
            .downcast::<gstreamer::Pipeline>()
            .map_err(|_| {
                CaptureError::InitializationFailed("parsed element is not a pipeline".to_string())
            })?;

        let appsink = pipeline
            .by_name("sink")
            .ok_or_else(|| {
                CaptureError::InitializationFailed("failed to get appsink".to_string())
            })?
            .dynamic_cast::<AppSink>()
            .map_err(|_| {
                CaptureError::InitializationFailed("failed to cast appsink".to_string())
            })?;

        // Low-latency preview configuration: never sync to clock, drop old
        // frames when the UI falls behind.
        appsink.set_property("emit-signals", true);
        appsink.set_property("sync", false);
        appsink.set_property("max-buffers", pipeline::MAX_BUFFERS);
        appsink.set_property("drop", true);
        appsink.set_property("enable-last-sample", false);

        appsink.set_callbacks(
            gstreamer_app::AppSinkCallbacks::builder()
                .new_sample(move |appsink| {
                    let frame_start = Instant::now();
                    let frame_num = FRAME_COUNTER.fetch_add(1, Ordering::Relaxed);

                    let sample = appsink.pull_sample().map_err(|e| {
                        if frame_num % 30 == 0 {
                            error!(frame = frame_num, error = ?e, "Failed to pull sample");
                        }
                        gstreamer::FlowError::Eos
                    })?;

                    let buffer = sample.buffer().ok_or(gstreamer::FlowError::Error)?;
                    if buffer.flags().contains(gstreamer::BufferFlags::CORRUPTED) {
                        warn!(frame = frame_num, "Buffer marked as corrupted, skipping frame");
                        return Err(gstreamer::FlowError::Error);
                    }

                    let caps = sample.caps().ok_or(gstreamer::FlowError::Error)?;
                    let video_info =
                        VideoInfo::from_caps(caps).map_err(|_| gstreamer::FlowError::Error)?;

                    let map = buffer
                        .map_readable()
                        .map_err(|_| gstreamer::FlowError::Error)?;

                    let frame = CameraFrame {
                        width: video_info.width(),
                        height: video_info.height(),
                        data: Arc::from(map.as_slice()),
                        stride: video_info.stride()[0] as u32,
                        captured_at: frame_start,
                    };

                    if frame_num % pipeline::FRAME_LOG_INTERVAL == 0 {
                        debug!(
                            frame = frame_num,
                            width = frame.width,
                            height = frame.height,
                            stride = frame.stride,
                            "Frame from pipeline"
                        );
                    }

                    // Non-blocking send; dropping frames is fine for a live
                    // preview, the latest frame is the one that matters.
                    let mut sender = frame_sender.clone();
                    if let Err(e) = sender.try_send(frame)
                        && frame_num % 30 == 0
                    {
                        debug!(frame = frame_num, error = ?e, "Frame dropped (channel full)");
                    }

                    Ok(gstreamer::FlowSuccess::Ok)
                })
                .build(),
        );

        debug!("Setting pipeline to PLAYING state");
        pipeline.set_state(gstreamer::State::Playing).map_err(|e| {
            CaptureError::InitializationFailed(format!("failed to start pipeline: {}", e))
        })?;

        // Wait for the state change so failures surface here instead of as a
        // silent black preview.
        let (result, state, pending) = pipeline.state(gstreamer::ClockTime::from_seconds(
            pipeline::START_TIMEOUT_SECS,
        ));
        match result {
            Ok(_) => info!(?state, "Capture pipeline running"),
            Err(e) => {
                error!(?state, ?pending, error = %e, "Pipeline failed to start");
                let _ = pipeline.set_state(gstreamer::State::Null);
                return Err(CaptureError::InitializationFailed(format!(
                    "pipeline did not reach PLAYING: {}",
                    e
                )));
            }
        }

        Ok(Self {
            pipeline,
            _appsink: appsink,
        })
    }
}

impl Drop for CapturePipeline {
    fn drop(&mut self) {
        debug!("Stopping capture pipeline");
        if let Err(e) = self.pipeline.set_state(gstreamer::State::Null) {
            warn!(error = %e, "Failed to stop pipeline cleanly");
        }
    }
}
