// SPDX-License-Identifier: GPL-3.0-only

//! Camera permission handling via the XDG desktop portal
//!
//! Authorization goes through `org.freedesktop.portal.Camera` on the session
//! bus. The portal remembers earlier decisions, so `AccessCamera` only shows
//! the system prompt when no decision is on record; a portal that is
//! unreachable, or a host without a camera, resolves to a denial without
//! prompting.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::StreamExt;
use tracing::{debug, info, warn};
use zbus::zvariant::{OwnedObjectPath, OwnedValue, Value};

const PORTAL_BUS: &str = "org.freedesktop.portal.Desktop";
const PORTAL_PATH: &str = "/org/freedesktop/portal/desktop";
const CAMERA_INTERFACE: &str = "org.freedesktop.portal.Camera";
const REQUEST_INTERFACE: &str = "org.freedesktop.portal.Request";

/// Portal response code for a granted request.
const RESPONSE_GRANTED: u32 = 0;

/// Monotonic token suffix so concurrent checks never share a request path.
static REQUEST_SERIAL: AtomicU64 = AtomicU64::new(0);

/// Camera permission state of the scanner screen
///
/// Initialized to `Idle` when the screen is created; mutated only by the
/// permission check resolution. Once a decision lands there is no way back
/// to `Idle` within the same check; a rescan starts a fresh check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionState {
    /// Not yet requested
    #[default]
    Idle,
    /// Camera access granted
    Approved,
    /// Camera access denied or unavailable
    Denied,
}

impl PermissionState {
    /// Check whether scanning may proceed
    pub fn is_approved(&self) -> bool {
        matches!(self, PermissionState::Approved)
    }

    /// Check whether access was refused
    pub fn is_denied(&self) -> bool {
        matches!(self, PermissionState::Denied)
    }

    /// Fold a terminal decision into the state
    pub fn resolve(decision: PermissionDecision) -> Self {
        match decision {
            PermissionDecision::Approved => PermissionState::Approved,
            PermissionDecision::Denied => PermissionState::Denied,
        }
    }
}

/// Terminal outcome of a permission check
///
/// A check resolves exactly once, to one of these two variants; `Idle` is
/// never observable after resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionDecision {
    Approved,
    Denied,
}

impl PermissionDecision {
    /// Map an XDG portal response code to a decision
    ///
    /// 0 is granted; 1 (user cancelled) and 2 (other) both read as denied.
    pub fn from_response_code(code: u32) -> Self {
        if code == RESPONSE_GRANTED {
            PermissionDecision::Approved
        } else {
            PermissionDecision::Denied
        }
    }
}

/// Permission-specific errors
#[derive(Debug, Clone)]
pub enum PermissionError {
    /// The user (or an earlier recorded decision) refused camera access
    AccessDenied,
    /// No camera is present, or policy blocks camera use entirely
    Unavailable,
    /// The portal could not be reached or misbehaved
    Portal(String),
}

impl std::fmt::Display for PermissionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PermissionError::AccessDenied => write!(f, "Camera access denied"),
            PermissionError::Unavailable => write!(f, "No camera available"),
            PermissionError::Portal(msg) => write!(f, "Portal error: {}", msg),
        }
    }
}

impl std::error::Error for PermissionError {}

impl From<zbus::Error> for PermissionError {
    fn from(err: zbus::Error) -> Self {
        PermissionError::Portal(err.to_string())
    }
}

/// Check camera access, prompting the user if the decision is still open
///
/// Resolves to exactly one terminal decision. Any portal failure is treated
/// as a denial so the screen always leaves the `Idle` state; the underlying
/// error is logged, not surfaced.
pub async fn check_access() -> PermissionDecision {
    match access_camera().await {
        Ok(decision) => decision,
        Err(err) => {
            warn!(error = %err, "Camera permission check failed, treating as denied");
            PermissionDecision::Denied
        }
    }
}

async fn access_camera() -> Result<PermissionDecision, PermissionError> {
    let connection = zbus::Connection::session().await?;

    let camera = zbus::Proxy::new(&connection, PORTAL_BUS, PORTAL_PATH, CAMERA_INTERFACE).await?;

    // The restricted case: no camera behind the portal means the prompt would
    // be pointless, so resolve without asking.
    let present: bool = camera.get_property("IsCameraPresent").await.unwrap_or(false);
    if !present {
        info!("Portal reports no camera present");
        return Err(PermissionError::Unavailable);
    }

    // The portal replies through a Request object whose path is derived from
    // our unique bus name and the handle token. Subscribe to that path before
    // calling AccessCamera so the Response signal cannot be missed.
    let token = format!(
        "codescan_{}_{}",
        std::process::id(),
        REQUEST_SERIAL.fetch_add(1, Ordering::Relaxed)
    );
    let sender = connection
        .unique_name()
        .ok_or_else(|| PermissionError::Portal("no unique bus name".to_string()))?
        .as_str()
        .trim_start_matches(':')
        .replace('.', "_");
    let request_path = format!("/org/freedesktop/portal/desktop/request/{}/{}", sender, token);

    let request = zbus::Proxy::new(
        &connection,
        PORTAL_BUS,
        request_path.as_str(),
        REQUEST_INTERFACE,
    )
    .await?;
    let mut responses = request.receive_signal("Response").await?;

    let mut options: HashMap<&str, Value<'_>> = HashMap::new();
    options.insert("handle_token", Value::from(token.as_str()));

    debug!(request_path = %request_path, "Calling AccessCamera");
    let handle: OwnedObjectPath = camera.call("AccessCamera", &(options,)).await?;
    debug!(handle = %handle, "AccessCamera request pending");

    // Suspends until the user responds (or the portal answers from the
    // permission store); resumes exactly once.
    let message = responses
        .next()
        .await
        .ok_or_else(|| PermissionError::Portal("request closed without response".to_string()))?;

    let (code, _results): (u32, HashMap<String, OwnedValue>) = message
        .body()
        .deserialize()
        .map_err(|e| PermissionError::Portal(e.to_string()))?;

    let decision = PermissionDecision::from_response_code(code);
    info!(code, ?decision, "Camera permission resolved");
    Ok(decision)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn granted_response_code_approves() {
        assert_eq!(
            PermissionDecision::from_response_code(0),
            PermissionDecision::Approved
        );
    }

    #[test]
    fn cancelled_and_other_response_codes_deny() {
        assert_eq!(
            PermissionDecision::from_response_code(1),
            PermissionDecision::Denied
        );
        assert_eq!(
            PermissionDecision::from_response_code(2),
            PermissionDecision::Denied
        );
    }

    #[test]
    fn state_starts_idle_and_resolves_terminally() {
        assert_eq!(PermissionState::default(), PermissionState::Idle);

        let approved = PermissionState::resolve(PermissionDecision::Approved);
        assert!(approved.is_approved());
        assert!(!approved.is_denied());

        let denied = PermissionState::resolve(PermissionDecision::Denied);
        assert!(denied.is_denied());
        assert_ne!(denied, PermissionState::Idle);
    }
}
