//! Game mode and gesture handling.
//!
//! A session starts in [`GameModeState::Exploring`]: the user walks around
//! while surfaces are detected, and taps do nothing. A long press switches
//! to [`GameModeState::Placing`] for good: surface detection is frozen and
//! taps drop spheres onto surfaces (or in front of the camera when the tap
//! hits nothing).

mod gesture;
mod mode;

pub use gesture::{
    Gesture, GestureAction, GesturePhase, GestureRouter, ObjectSpawner, PlacementConfig,
    SpawnPlacement, SphereSpawn,
};
pub use mode::{GameMode, GameModeState, ModeTransition};
