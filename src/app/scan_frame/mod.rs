// SPDX-License-Identifier: GPL-3.0-only

//! Scan frame overlay
//!
//! Draws the four corner brackets that mark the scan region and the
//! animated scan line. Each bracket is the visible part of a rounded
//! rectangle stroke trimmed to a fixed fraction of its perimeter, repeated
//! at 0°, 90°, 180° and 270° so an "L" lands on every corner. The traced
//! fraction is constant in the region's absolute size.

mod widget;

pub use widget::{ScanFrame, scan_frame};

use cosmic::iced::Rectangle;

use crate::constants::scan_frame::{STROKE_WIDTH, TRIM_END, TRIM_START};

/// Perimeter parameter at which the trim window straddles its corner.
/// `[TRIM_START, TRIM_END]` is centered on this point, splitting the stroke
/// into the two arms of the bracket.
const CORNER_PARAM: f32 = 0.625;

/// Bracket rotations, one per corner.
pub const ROTATIONS: [u32; 4] = [0, 90, 180, 270];

/// One corner bracket of the scan frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornerBracket {
    /// Rotation placing this bracket on its corner (degrees)
    pub rotation: u32,
    /// Arm length before the corner along the traced perimeter
    pub arm_before: f32,
    /// Arm length after the corner along the traced perimeter
    pub arm_after: f32,
}

impl CornerBracket {
    /// Fraction of the perimeter this bracket traces
    pub fn arc_fraction(&self, side: f32) -> f32 {
        (self.arm_before + self.arm_after) / (4.0 * side)
    }
}

/// Arm lengths of a single bracket for a square region of the given side
pub fn bracket_arms(side: f32) -> (f32, f32) {
    let perimeter = 4.0 * side;
    let before = (CORNER_PARAM - TRIM_START) * perimeter;
    let after = (TRIM_END - CORNER_PARAM) * perimeter;
    (before, after)
}

/// The four corner brackets for a square region of the given side
pub fn corner_brackets(side: f32) -> [CornerBracket; 4] {
    let (arm_before, arm_after) = bracket_arms(side);
    ROTATIONS.map(|rotation| CornerBracket {
        rotation,
        arm_before,
        arm_after,
    })
}

/// The two stroke rectangles of a bracket, placed on its corner
///
/// Rotation 0 marks the top-left corner; 90/180/270 continue clockwise.
pub fn bracket_rects(region: Rectangle, bracket: &CornerBracket) -> [Rectangle; 2] {
    let w = STROKE_WIDTH;
    let h_len = bracket.arm_after;
    let v_len = bracket.arm_before;

    let left = region.x;
    let top = region.y;
    let right = region.x + region.width;
    let bottom = region.y + region.height;

    match bracket.rotation {
        0 => [
            Rectangle {
                x: left,
                y: top,
                width: h_len,
                height: w,
            },
            Rectangle {
                x: left,
                y: top,
                width: w,
                height: v_len,
            },
        ],
        90 => [
            Rectangle {
                x: right - h_len,
                y: top,
                width: h_len,
                height: w,
            },
            Rectangle {
                x: right - w,
                y: top,
                width: w,
                height: v_len,
            },
        ],
        180 => [
            Rectangle {
                x: right - h_len,
                y: bottom - w,
                width: h_len,
                height: w,
            },
            Rectangle {
                x: right - w,
                y: bottom - v_len,
                width: w,
                height: v_len,
            },
        ],
        _ => [
            Rectangle {
                x: left,
                y: bottom - w,
                width: h_len,
                height: w,
            },
            Rectangle {
                x: left,
                y: bottom - v_len,
                width: w,
                height: v_len,
            },
        ],
    }
}

/// Side length of the square scan region within a container
pub fn square_side(max_width: f32, max_height: f32) -> f32 {
    let width = if max_width.is_finite() { max_width } else { 0.0 };
    let height = if max_height.is_finite() {
        max_height
    } else {
        width
    };
    if width == 0.0 {
        return height;
    }
    if height == 0.0 {
        return width;
    }
    width.min(height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::scan_frame::{TRIM_END, TRIM_START};

    #[test]
    fn four_brackets_with_exact_rotations() {
        let brackets = corner_brackets(300.0);
        assert_eq!(brackets.len(), 4);
        let rotations: Vec<u32> = brackets.iter().map(|b| b.rotation).collect();
        assert_eq!(rotations, vec![0, 90, 180, 270]);
    }

    #[test]
    fn arc_fraction_is_invariant_under_region_size() {
        let expected = TRIM_END - TRIM_START;
        for side in [50.0, 120.0, 300.0, 1024.0, 4096.0] {
            for bracket in corner_brackets(side) {
                let fraction = bracket.arc_fraction(side);
                assert!(
                    (fraction - expected).abs() < 1e-5,
                    "side {side}: fraction {fraction} != {expected}"
                );
            }
        }
    }

    #[test]
    fn arms_scale_linearly_with_side() {
        let (b1, a1) = bracket_arms(100.0);
        let (b2, a2) = bracket_arms(200.0);
        assert!((b2 - 2.0 * b1).abs() < 1e-4);
        assert!((a2 - 2.0 * a1).abs() < 1e-4);
    }

    #[test]
    fn bracket_rects_stay_inside_the_region() {
        let region = Rectangle {
            x: 10.0,
            y: 20.0,
            width: 240.0,
            height: 240.0,
        };
        for bracket in corner_brackets(region.width) {
            for rect in bracket_rects(region, &bracket) {
                assert!(rect.x >= region.x - 1e-3);
                assert!(rect.y >= region.y - 1e-3);
                assert!(rect.x + rect.width <= region.x + region.width + 1e-3);
                assert!(rect.y + rect.height <= region.y + region.height + 1e-3);
            }
        }
    }

    #[test]
    fn square_side_is_the_smaller_dimension() {
        assert_eq!(square_side(300.0, 500.0), 300.0);
        assert_eq!(square_side(500.0, 300.0), 300.0);
        assert_eq!(square_side(400.0, 400.0), 400.0);
    }

    #[test]
    fn square_side_tolerates_unbounded_axes() {
        assert_eq!(square_side(320.0, f32::INFINITY), 320.0);
        assert_eq!(square_side(f32::INFINITY, 240.0), 240.0);
    }
}
