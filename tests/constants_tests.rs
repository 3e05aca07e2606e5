// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for constants module

use cosmic_codescan::constants::{animation, detection, scan_frame};

#[test]
fn test_trim_window_is_ordered_and_narrow() {
    assert!(scan_frame::TRIM_START < scan_frame::TRIM_END);
    // The bracket traces a small fraction of the perimeter, not a full edge
    assert!(scan_frame::TRIM_END - scan_frame::TRIM_START < 0.25);
}

#[test]
fn test_animation_sweep_outlasts_dwell() {
    assert!(animation::SWEEP > animation::DWELL);
    assert!(animation::TICK < animation::SWEEP);
}

#[test]
fn test_detection_cadence() {
    assert!(detection::SAMPLE_INTERVAL.as_millis() > 0);
    assert!(detection::MAX_DIMENSION >= 320);
}
