//! Gesture routing.
//!
//! Maps recognized gestures onto the session phase: taps spawn spheres while
//! placing, a long press switches from exploring to placing.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::mode::{GameMode, GameModeState, ModeTransition};
use crate::session::TrackingControl;
use crate::surface::Vec3;

/// Phase of a continuous gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GesturePhase {
    Began,
    Changed,
    Ended,
    Cancelled,
}

/// A recognized user gesture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gesture {
    /// Single-finger tap; `hit` is the world-space point on an existing
    /// surface under the finger, if the hit test found one.
    Tap {
        #[serde(default)]
        hit: Option<Vec3>,
    },
    /// Two-finger tap.
    TwoFingerTap,
    /// Long press.
    LongPress(GesturePhase),
}

/// Tunables for spawned spheres.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementConfig {
    /// Height above a tapped surface at which spheres appear (meters).
    pub insertion_offset: f32,
    /// Distance in front of the camera for spheres without a surface hit (meters).
    pub camera_distance: f32,
    /// Sphere radius (meters).
    pub sphere_radius: f32,
    /// Sphere mass (kilograms).
    pub sphere_mass: f32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            insertion_offset: 0.5,
            camera_distance: 0.5,
            sphere_radius: 0.05,
            sphere_mass: 2.0,
        }
    }
}

/// Where a sphere should appear.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnPlacement {
    /// At a world-space position.
    At(Vec3),
    /// Along the camera's view direction; resolved by the spawner, which
    /// owns the camera pose.
    InFrontOfCamera { distance: f32 },
}

impl fmt::Display for SpawnPlacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpawnPlacement::At(p) => write!(f, "at {}", p),
            SpawnPlacement::InFrontOfCamera { distance } => {
                write!(f, "{:.2}m in front of camera", distance)
            }
        }
    }
}

/// A request to add a dynamic sphere to the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereSpawn {
    pub placement: SpawnPlacement,
    pub radius: f32,
    pub mass: f32,
}

/// The scene/physics collaborator that creates spawned objects.
pub trait ObjectSpawner: Send + Sync {
    fn spawn(&self, sphere: SphereSpawn);
}

/// What a routed gesture did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureAction {
    /// The gesture has no effect in the current phase.
    Ignored,
    /// The session switched to placing.
    EnteredPlacing,
    /// A sphere was handed to the spawner.
    Spawned(SphereSpawn),
}

/// Routes gestures according to the current [`GameModeState`].
pub struct GestureRouter {
    mode: Arc<GameMode>,
    tracking: Arc<dyn TrackingControl>,
    spawner: Arc<dyn ObjectSpawner>,
    placement: PlacementConfig,
}

impl fmt::Debug for GestureRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GestureRouter")
            .field("mode", &self.mode)
            .field("placement", &self.placement)
            .finish_non_exhaustive()
    }
}

impl GestureRouter {
    pub fn new(
        mode: Arc<GameMode>,
        tracking: Arc<dyn TrackingControl>,
        spawner: Arc<dyn ObjectSpawner>,
        placement: PlacementConfig,
    ) -> Self {
        Self {
            mode,
            tracking,
            spawner,
            placement,
        }
    }

    pub fn mode(&self) -> &Arc<GameMode> {
        &self.mode
    }

    pub fn placement(&self) -> &PlacementConfig {
        &self.placement
    }

    /// Handle one gesture.
    pub fn route(&self, gesture: Gesture) -> GestureAction {
        match gesture {
            Gesture::LongPress(GesturePhase::Began) => {
                match self.mode.enter_placing(self.tracking.as_ref()) {
                    ModeTransition::Entered => GestureAction::EnteredPlacing,
                    ModeTransition::AlreadyPlacing => GestureAction::Ignored,
                }
            }
            Gesture::LongPress(_) => GestureAction::Ignored,
            Gesture::Tap { hit } => match self.mode.state() {
                GameModeState::Exploring => GestureAction::Ignored,
                GameModeState::Placing => {
                    let placement = match hit {
                        Some(point) => {
                            SpawnPlacement::At(point.raised(self.placement.insertion_offset))
                        }
                        None => {
                            debug!("Tap hit no surface, spawning in front of camera");
                            self.in_front_of_camera()
                        }
                    };
                    self.spawn(placement)
                }
            },
            Gesture::TwoFingerTap => match self.mode.state() {
                GameModeState::Exploring => GestureAction::Ignored,
                GameModeState::Placing => self.spawn(self.in_front_of_camera()),
            },
        }
    }

    fn in_front_of_camera(&self) -> SpawnPlacement {
        SpawnPlacement::InFrontOfCamera {
            distance: self.placement.camera_distance,
        }
    }

    fn spawn(&self, placement: SpawnPlacement) -> GestureAction {
        let sphere = SphereSpawn {
            placement,
            radius: self.placement.sphere_radius,
            mass: self.placement.sphere_mass,
        };
        info!(placement = %placement, "Spawning sphere");
        self.spawner.spawn(sphere);
        GestureAction::Spawned(sphere)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::PlaneDetection;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingSpawner {
        spawned: Mutex<Vec<SphereSpawn>>,
    }

    impl ObjectSpawner for RecordingSpawner {
        fn spawn(&self, sphere: SphereSpawn) {
            self.spawned.lock().push(sphere);
        }
    }

    #[derive(Default)]
    struct RecordingControl {
        calls: Mutex<Vec<PlaneDetection>>,
    }

    impl TrackingControl for RecordingControl {
        fn set_plane_detection(&self, detection: PlaneDetection) {
            self.calls.lock().push(detection);
        }
    }

    fn make_router() -> (GestureRouter, Arc<RecordingSpawner>, Arc<RecordingControl>) {
        let spawner = Arc::new(RecordingSpawner::default());
        let control = Arc::new(RecordingControl::default());
        let router = GestureRouter::new(
            Arc::new(GameMode::new()),
            control.clone(),
            spawner.clone(),
            PlacementConfig::default(),
        );
        (router, spawner, control)
    }

    #[test]
    fn test_taps_ignored_while_exploring() {
        let (router, spawner, _) = make_router();

        let hit = Some(Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(router.route(Gesture::Tap { hit }), GestureAction::Ignored);
        assert_eq!(router.route(Gesture::TwoFingerTap), GestureAction::Ignored);
        assert!(spawner.spawned.lock().is_empty());
    }

    #[test]
    fn test_long_press_began_enters_placing() {
        let (router, _, control) = make_router();

        assert_eq!(
            router.route(Gesture::LongPress(GesturePhase::Changed)),
            GestureAction::Ignored
        );
        assert_eq!(
            router.route(Gesture::LongPress(GesturePhase::Began)),
            GestureAction::EnteredPlacing
        );
        assert_eq!(
            router.route(Gesture::LongPress(GesturePhase::Began)),
            GestureAction::Ignored
        );

        assert!(router.mode().is_placing());
        assert_eq!(*control.calls.lock(), vec![PlaneDetection::Disabled]);
    }

    #[test]
    fn test_tap_with_hit_spawns_above_surface() {
        let (router, spawner, _) = make_router();
        router.route(Gesture::LongPress(GesturePhase::Began));

        let action = router.route(Gesture::Tap {
            hit: Some(Vec3::new(0.2, 0.25, -1.0)),
        });

        let expected = SphereSpawn {
            placement: SpawnPlacement::At(Vec3::new(0.2, 0.75, -1.0)),
            radius: 0.05,
            mass: 2.0,
        };
        assert_eq!(action, GestureAction::Spawned(expected));
        assert_eq!(*spawner.spawned.lock(), vec![expected]);
    }

    #[test]
    fn test_tap_without_hit_spawns_in_front_of_camera() {
        let (router, _, _) = make_router();
        router.route(Gesture::LongPress(GesturePhase::Began));

        let action = router.route(Gesture::Tap { hit: None });
        assert!(matches!(
            action,
            GestureAction::Spawned(SphereSpawn {
                placement: SpawnPlacement::InFrontOfCamera { distance },
                ..
            }) if distance == 0.5
        ));
    }

    #[test]
    fn test_two_finger_tap_spawns_in_front_of_camera() {
        let (router, spawner, _) = make_router();
        router.route(Gesture::LongPress(GesturePhase::Began));

        router.route(Gesture::TwoFingerTap);
        router.route(Gesture::TwoFingerTap);
        assert_eq!(spawner.spawned.lock().len(), 2);
    }

    #[test]
    fn test_gesture_serde_shapes() {
        let gesture: Gesture = serde_json::from_str(r#"{"long_press":"began"}"#).unwrap();
        assert_eq!(gesture, Gesture::LongPress(GesturePhase::Began));

        let gesture: Gesture = serde_json::from_str(r#"{"tap":{}}"#).unwrap();
        assert_eq!(gesture, Gesture::Tap { hit: None });

        let gesture: Gesture = serde_json::from_str(r#""two_finger_tap""#).unwrap();
        assert_eq!(gesture, Gesture::TwoFingerTap);
    }
}
