// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

/// Scan frame overlay parameters
pub mod scan_frame {
    /// Start of the trimmed stroke, as a fraction of the rounded-rectangle
    /// perimeter. Together with [`TRIM_END`] this yields one "L" bracket;
    /// the widget repeats it at 0°/90°/180°/270° to mark all four corners.
    pub const TRIM_START: f32 = 0.61;
    /// End of the trimmed stroke, as a fraction of the perimeter.
    pub const TRIM_END: f32 = 0.64;
    /// Bracket stroke width in logical pixels.
    pub const STROKE_WIDTH: f32 = 5.0;
    /// Corner radius of the traced rounded rectangle.
    pub const CORNER_RADIUS: f32 = 2.0;
    /// Thickness of the animated scan line.
    pub const LINE_THICKNESS: f32 = 2.5;
    /// Maximum shadow offset of the scan line, reached at the bottom of the sweep.
    pub const LINE_SHADOW_MAX_OFFSET: f32 = 15.0;
    /// Blur radius of the scan line shadow.
    pub const LINE_SHADOW_BLUR: f32 = 8.0;
}

/// Scan line animation timing
pub mod animation {
    use std::time::Duration;

    /// Duration of one top-to-bottom (or bottom-to-top) sweep.
    pub const SWEEP: Duration = Duration::from_millis(850);
    /// Pause at each end before the sweep reverses.
    pub const DWELL: Duration = Duration::from_millis(100);
    /// Tick interval for the animation subscription (~60 fps).
    pub const TICK: Duration = Duration::from_millis(16);
}

/// Capture pipeline tuning
pub mod pipeline {
    /// Maximum buffers queued in the appsink before old frames are dropped.
    pub const MAX_BUFFERS: u32 = 2;
    /// Capacity of the frame channel between the pipeline and the UI.
    pub const FRAME_CHANNEL_CAPACITY: usize = 100;
    /// Seconds to wait for the pipeline to reach the Playing state.
    pub const START_TIMEOUT_SECS: u64 = 5;
    /// Log frame statistics every N frames.
    pub const FRAME_LOG_INTERVAL: u64 = 60;
}

/// Code detection cadence
pub mod detection {
    use std::time::Duration;

    /// Minimum interval between two detection passes over the live feed.
    pub const SAMPLE_INTERVAL: Duration = Duration::from_secs(1);
    /// Frames larger than this are downscaled before decoding.
    pub const MAX_DIMENSION: u32 = 640;
}

/// UI layout values not covered by the theme's spacing tokens
pub mod ui {
    /// Horizontal padding around the scan region.
    pub const SCAN_REGION_PADDING: f32 = 45.0;
    /// Outer padding of the scanner screen.
    pub const SCREEN_PADDING: f32 = 15.0;
}
