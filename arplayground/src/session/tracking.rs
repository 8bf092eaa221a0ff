//! Tracking subsystem vocabulary.
//!
//! Types here describe what the external tracking subsystem reports to us
//! and the one reconfiguration call we make back into it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::surface::SurfaceEvent;

/// Why camera tracking quality is limited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitedReason {
    /// The device is moving too fast.
    ExcessiveMotion,
    /// The session has not gathered enough data yet.
    Initializing,
    /// The scene lacks visible texture.
    InsufficientFeatures,
    /// No reason reported.
    Unspecified,
}

impl fmt::Display for LimitedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            LimitedReason::ExcessiveMotion => "excessive motion",
            LimitedReason::Initializing => "initializing",
            LimitedReason::InsufficientFeatures => "insufficient features",
            LimitedReason::Unspecified => "unspecified",
        };
        f.write_str(text)
    }
}

/// Camera tracking quality as reported by the tracking subsystem.
///
/// Only observed and logged; nothing in this crate changes behavior on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingState {
    Normal,
    Limited(LimitedReason),
    #[default]
    Unavailable,
}

impl TrackingState {
    /// User-facing status text.
    pub fn display_status(&self) -> &'static str {
        match self {
            TrackingState::Normal => "Tracking",
            TrackingState::Limited(_) => "Limited",
            TrackingState::Unavailable => "Unavailable",
        }
    }

    pub fn is_normal(&self) -> bool {
        matches!(self, TrackingState::Normal)
    }
}

impl fmt::Display for TrackingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackingState::Normal => f.write_str("normal"),
            TrackingState::Limited(reason) => write!(f, "limited ({})", reason),
            TrackingState::Unavailable => f.write_str("unavailable"),
        }
    }
}

/// Everything the tracking session delivers, in arrival order.
///
/// Serialized externally tagged, e.g. `{"surface": {"event": "removed", "id": 3}}`,
/// `{"tracking": {"limited": "initializing"}}` or `"interrupted"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEvent {
    /// A surface was added, updated or removed.
    Surface(SurfaceEvent),
    /// Camera tracking quality changed.
    Tracking(TrackingState),
    /// The session failed with the given message.
    Failed(String),
    /// The session was interrupted (e.g. the app lost the camera).
    Interrupted,
    /// A previous interruption ended.
    InterruptionEnded,
}

impl From<SurfaceEvent> for SessionEvent {
    fn from(event: SurfaceEvent) -> Self {
        SessionEvent::Surface(event)
    }
}

impl From<TrackingState> for SessionEvent {
    fn from(state: TrackingState) -> Self {
        SessionEvent::Tracking(state)
    }
}

/// Plane detection mode of the tracking subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneDetection {
    /// Detect and report horizontal surfaces.
    Horizontal,
    /// Stop detecting surfaces; existing ones stay as they are.
    Disabled,
}

/// Reconfiguration interface into the tracking subsystem.
///
/// Implemented by the platform glue. Calls are fire-and-forget.
pub trait TrackingControl: Send + Sync {
    /// Switch plane detection on or off.
    fn set_plane_detection(&self, detection: PlaneDetection);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracking_state_display() {
        assert_eq!(TrackingState::Normal.to_string(), "normal");
        assert_eq!(
            TrackingState::Limited(LimitedReason::ExcessiveMotion).to_string(),
            "limited (excessive motion)"
        );
        assert_eq!(TrackingState::default(), TrackingState::Unavailable);
    }

    #[test]
    fn test_session_event_serde_shapes() {
        let event: SessionEvent =
            serde_json::from_str(r#"{"tracking":{"limited":"insufficient_features"}}"#).unwrap();
        assert_eq!(
            event,
            SessionEvent::Tracking(TrackingState::Limited(LimitedReason::InsufficientFeatures))
        );

        let event: SessionEvent = serde_json::from_str(r#""interruption_ended""#).unwrap();
        assert_eq!(event, SessionEvent::InterruptionEnded);

        let event: SessionEvent =
            serde_json::from_str(r#"{"surface":{"event":"removed","id":2}}"#).unwrap();
        assert_eq!(event, SessionEvent::Surface(SurfaceEvent::removed(2)));
    }

    #[test]
    fn test_display_status() {
        assert_eq!(TrackingState::Normal.display_status(), "Tracking");
        assert!(!TrackingState::Unavailable.is_normal());
    }
}
