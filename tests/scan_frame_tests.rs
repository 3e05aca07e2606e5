// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for the scan frame overlay geometry

use cosmic_codescan::app::scan_frame::{ROTATIONS, corner_brackets, square_side};
use cosmic_codescan::constants::scan_frame::{TRIM_END, TRIM_START};

#[test]
fn test_brackets_cover_all_four_corners() {
    let brackets = corner_brackets(240.0);
    let rotations: Vec<u32> = brackets.iter().map(|b| b.rotation).collect();
    assert_eq!(rotations, ROTATIONS.to_vec());
}

#[test]
fn test_arc_fraction_constant_across_sizes() {
    // The bracket always traces the same fraction of the perimeter,
    // regardless of the region's absolute pixel dimensions.
    let expected = TRIM_END - TRIM_START;
    for side in [48.0, 240.0, 512.0, 1920.0] {
        for bracket in corner_brackets(side) {
            assert!((bracket.arc_fraction(side) - expected).abs() < 1e-5);
        }
    }
}

#[test]
fn test_scan_region_is_square_for_any_container() {
    for (w, h) in [(300.0, 700.0), (700.0, 300.0), (512.0, 512.0)] {
        let side = square_side(w, h);
        assert!(side <= w && side <= h);
        assert_eq!(side, w.min(h));
    }
}
