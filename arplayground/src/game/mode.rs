//! Session phase state machine.
//!
//! # State Machine
//!
//! ```text
//! Exploring --[long press began]--> Placing
//! ```
//!
//! There is no way back: once the user starts placing objects, surface
//! detection stays frozen for the rest of the session.

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::session::{PlaneDetection, TrackingControl};

/// Session phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameModeState {
    /// Surfaces are being detected; taps do nothing.
    #[default]
    Exploring,
    /// Detection is frozen; taps spawn objects.
    Placing,
}

impl GameModeState {
    /// User-facing status text.
    pub fn display_status(&self) -> &'static str {
        match self {
            GameModeState::Exploring => "Scanning for surfaces",
            GameModeState::Placing => "Game mode",
        }
    }

    pub fn allows_spawning(&self) -> bool {
        matches!(self, GameModeState::Placing)
    }
}

/// Outcome of a request to enter [`GameModeState::Placing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeTransition {
    /// The session switched to placing; detection was disabled.
    Entered,
    /// The session was already placing; nothing changed.
    AlreadyPlacing,
}

/// Process-wide session phase.
///
/// Interior mutability via `Mutex` makes the transition and its tracking
/// reconfiguration happen exactly once, even if several gesture callbacks
/// race.
#[derive(Debug, Default)]
pub struct GameMode {
    state: Mutex<GameModeState>,
}

impl GameMode {
    /// Create a game mode in [`GameModeState::Exploring`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GameModeState {
        *self.state.lock()
    }

    pub fn is_placing(&self) -> bool {
        self.state() == GameModeState::Placing
    }

    /// Switch from exploring to placing.
    ///
    /// Disables plane detection on `tracking` before the new state becomes
    /// visible. Calling this while already placing does nothing.
    pub fn enter_placing(&self, tracking: &dyn TrackingControl) -> ModeTransition {
        let mut state = self.state.lock();
        match *state {
            GameModeState::Placing => {
                debug!("Already in game mode");
                ModeTransition::AlreadyPlacing
            }
            GameModeState::Exploring => {
                tracking.set_plane_detection(PlaneDetection::Disabled);
                *state = GameModeState::Placing;
                info!("Switched to game mode, surface detection frozen");
                ModeTransition::Entered
            }
        }
    }
}
