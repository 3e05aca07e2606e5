// SPDX-License-Identifier: GPL-3.0-only

//! Application state management

use std::sync::Arc;
use std::time::{Duration, Instant};

use cosmic::widget::about::About;

use crate::capture::CameraFrame;
use crate::config::Config;
use crate::constants::animation;
use crate::detect::DetectedCode;
use crate::permission::{PermissionDecision, PermissionState};

/// Transient user-facing alert
///
/// Created when permission is denied, cleared when the dialog is dismissed.
#[derive(Debug, Clone, Default)]
pub struct ErrorState {
    /// Message shown in the dialog body
    pub message: String,
    /// Whether the dialog is currently shown
    pub visible: bool,
}

impl ErrorState {
    /// Surface an error message as a modal dialog
    pub fn present(&mut self, message: impl Into<String>) {
        self.message = message.into();
        self.visible = true;
    }

    /// Dismiss the dialog
    pub fn dismiss(&mut self) {
        self.visible = false;
    }
}

/// Scan line animation state machine
///
/// Either idle or sweeping; the sweep position is a pure function of the
/// time elapsed since activation.
#[derive(Debug, Clone, Copy, Default)]
pub enum ScanAnimation {
    /// Not animating (line parked at the top)
    #[default]
    Idle,
    /// Sweeping up and down the scan region
    Active {
        /// When the animation was activated
        started_at: Instant,
    },
}

impl ScanAnimation {
    /// Check if the animation is running
    pub fn is_active(&self) -> bool {
        matches!(self, ScanAnimation::Active { .. })
    }

    /// Start sweeping; a no-op if already active
    pub fn activate(&mut self) {
        if !self.is_active() {
            *self = ScanAnimation::Active {
                started_at: Instant::now(),
            };
        }
    }

    /// Stop sweeping (returns the line to the top)
    pub fn deactivate(&mut self) {
        *self = ScanAnimation::Idle;
    }

    /// Current sweep position in 0.0..=1.0 (0 = top of the scan region)
    pub fn position(&self, now: Instant) -> f32 {
        match self {
            ScanAnimation::Idle => 0.0,
            ScanAnimation::Active { started_at } => {
                Self::position_at(now.saturating_duration_since(*started_at))
            }
        }
    }

    /// Auto-reversing triangle wave with a dwell at each end
    ///
    /// One period is dwell, sweep down, dwell, sweep up.
    pub fn position_at(elapsed: Duration) -> f32 {
        let dwell = animation::DWELL.as_secs_f32();
        let sweep = animation::SWEEP.as_secs_f32();
        let period = 2.0 * (dwell + sweep);

        let phase = elapsed.as_secs_f32() % period;
        if phase < dwell {
            0.0
        } else if phase < dwell + sweep {
            (phase - dwell) / sweep
        } else if phase < 2.0 * dwell + sweep {
            1.0
        } else {
            1.0 - (phase - 2.0 * dwell - sweep) / sweep
        }
    }
}

/// The context page to display in the context drawer.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ContextPage {
    #[default]
    About,
}

/// The application model stores app-specific state used to describe its
/// interface and drive its logic.
pub struct AppModel {
    /// Application state which is managed by the COSMIC runtime.
    pub core: cosmic::Core,
    /// Display a context drawer with the designated page if defined.
    pub context_page: ContextPage,
    /// The about page for this app.
    pub about: About,
    /// Configuration data that persists between application runs.
    pub config: Config,

    /// Camera permission state; `Idle` until the portal check resolves
    pub permission: PermissionState,
    /// Generation counter for permission checks; resolutions carrying a
    /// stale generation are discarded (rescan/teardown safeguard)
    pub scan_generation: u64,
    /// Permission-denied alert state
    pub error: ErrorState,

    /// Scan line animation
    pub scanning: ScanAnimation,
    /// Last computed sweep position, refreshed by animation ticks
    pub scan_line_position: f32,

    /// Most recent camera frame (shared read-only with preview and detector)
    pub current_frame: Option<Arc<CameraFrame>>,
    /// Serial of the most recent frame, used to key detection passes
    pub frame_serial: u64,
    /// Last decoded code, if any
    pub last_detection: Option<DetectedCode>,
    /// When the last detection pass finished (throttles sampling)
    pub last_detection_time: Option<Instant>,
}

/// Messages emitted by the application and its widgets.
#[derive(Debug, Clone)]
pub enum Message {
    // ===== UI Navigation =====
    /// Open external URL (repository, etc.)
    LaunchUrl(String),
    /// Toggle context drawer page (About)
    ToggleContextPage(ContextPage),
    /// Close the scanner window (the dismiss control)
    Dismiss,

    // ===== Permission =====
    /// Permission check resolved for the given generation
    PermissionResolved {
        generation: u64,
        decision: PermissionDecision,
    },
    /// Open the system settings application (from the denial dialog)
    OpenSettings,
    /// Dismiss the permission-denied dialog
    DismissError,

    // ===== Scanning =====
    /// New camera frame received from the pipeline
    CameraFrame(Arc<CameraFrame>),
    /// A detection pass over the live feed completed
    CodesDetected(Vec<DetectedCode>),
    /// Animation frame for the scan line
    AnimationTick(Instant),
    /// Clear the last result and run a fresh scan (the rescan control)
    Rescan,

    // ===== Results =====
    /// Open the decoded URL in the browser
    OpenDetected(String),
    /// Copy the decoded text to the clipboard
    CopyDetected(String),

    // ===== Settings =====
    /// Configuration updated
    UpdateConfig(Config),

    Noop,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_state_presents_and_dismisses() {
        let mut error = ErrorState::default();
        assert!(!error.visible);

        error.present("no camera access");
        assert!(error.visible);
        assert_eq!(error.message, "no camera access");

        error.dismiss();
        assert!(!error.visible);
    }

    #[test]
    fn scan_position_dwells_then_sweeps() {
        // Inside the initial dwell the line stays parked at the top.
        assert_eq!(ScanAnimation::position_at(Duration::from_millis(0)), 0.0);
        assert_eq!(ScanAnimation::position_at(Duration::from_millis(50)), 0.0);

        // Halfway through the downward sweep.
        let mid = animation::DWELL + animation::SWEEP / 2;
        let pos = ScanAnimation::position_at(mid);
        assert!((pos - 0.5).abs() < 0.01, "expected ~0.5, got {pos}");

        // Dwell at the bottom.
        let bottom = animation::DWELL + animation::SWEEP + animation::DWELL / 2;
        assert_eq!(ScanAnimation::position_at(bottom), 1.0);
    }

    #[test]
    fn scan_position_reverses_and_repeats() {
        let period = 2 * (animation::DWELL + animation::SWEEP);

        // Halfway through the upward sweep.
        let up_mid = 2 * animation::DWELL + animation::SWEEP + animation::SWEEP / 2;
        let pos = ScanAnimation::position_at(up_mid);
        assert!((pos - 0.5).abs() < 0.01, "expected ~0.5, got {pos}");

        // One full period later the wave repeats.
        let a = ScanAnimation::position_at(Duration::from_millis(400));
        let b = ScanAnimation::position_at(Duration::from_millis(400) + period);
        assert!((a - b).abs() < 0.01);
    }

    #[test]
    fn scan_position_stays_in_bounds() {
        for ms in (0..5000).step_by(7) {
            let pos = ScanAnimation::position_at(Duration::from_millis(ms));
            assert!((0.0..=1.0).contains(&pos), "position {pos} out of bounds");
        }
    }

    #[test]
    fn idle_animation_parks_the_line_at_the_top() {
        let scanning = ScanAnimation::Idle;
        assert_eq!(scanning.position(Instant::now()), 0.0);
        assert!(!scanning.is_active());
    }

    #[test]
    fn activate_is_idempotent() {
        let mut scanning = ScanAnimation::default();
        scanning.activate();
        let ScanAnimation::Active { started_at } = scanning else {
            panic!("expected active animation");
        };
        scanning.activate();
        let ScanAnimation::Active { started_at: second } = scanning else {
            panic!("expected active animation");
        };
        assert_eq!(started_at, second);
    }
}
