//! Replay command - drive a scripted tracking session through the library.
//!
//! A script is a JSON array of steps, each either a session event from the
//! tracking subsystem or a user gesture:
//!
//! ```json
//! [
//!   {"session": {"tracking": "normal"}},
//!   {"session": {"surface": {"event": "added", "id": 1,
//!                            "extent": {"width": 2.0, "height": 1.5},
//!                            "center": {"x": 0.0, "y": -1.2, "z": -1.0}}}},
//!   {"gesture": {"long_press": "began"}},
//!   {"gesture": {"tap": {"hit": {"x": 0.0, "y": -1.2, "z": -1.0}}}},
//!   {"gesture": "two_finger_tap"}
//! ]
//! ```
//!
//! Steps run in order on the calling thread. Platform collaborators are
//! replaced by stand-ins that log what the platform would have been asked
//! to do.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use arplayground::config::ConfigFile;
use arplayground::game::{
    GameMode, GameModeState, Gesture, GestureAction, GesturePhase, GestureRouter, ObjectSpawner,
    SphereSpawn,
};
use arplayground::session::{
    DefaultSurfaceTracker, LimitedReason, PlaneDetection, SessionEvent, SurfaceTracker,
    TrackingControl, TrackingState, TrackingStatus,
};
use arplayground::surface::{ProxySnapshot, SurfaceEvent};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::CliError;

/// One step of a session script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptStep {
    /// Something the tracking subsystem reported.
    Session(SessionEvent),
    /// Something the user did.
    Gesture(Gesture),
}

/// Logs plane detection changes instead of reconfiguring a real session.
struct LoggingTrackingControl;

impl TrackingControl for LoggingTrackingControl {
    fn set_plane_detection(&self, detection: PlaneDetection) {
        info!(detection = ?detection, "Plane detection reconfigured");
    }
}

/// Counts and logs spheres instead of adding them to a scene.
#[derive(Default)]
struct CountingSpawner {
    spawned: AtomicUsize,
}

impl ObjectSpawner for CountingSpawner {
    fn spawn(&self, sphere: SphereSpawn) {
        self.spawned.fetch_add(1, Ordering::Relaxed);
        info!(
            placement = %sphere.placement,
            radius = sphere.radius,
            mass = sphere.mass,
            "Sphere added to scene"
        );
    }
}

/// Result of replaying a script.
#[derive(Debug)]
pub struct ReplayReport {
    pub steps: usize,
    pub rejected_events: usize,
    pub spheres_spawned: usize,
    pub mode: GameModeState,
    pub tracking: TrackingStatus,
    pub surfaces: ProxySnapshot,
}

/// Run `steps` against a fresh tracker and game mode built from `config`.
pub fn replay(steps: &[ScriptStep], config: &ConfigFile) -> ReplayReport {
    let tracker = DefaultSurfaceTracker::new(config.tracker_config());
    let spawner = Arc::new(CountingSpawner::default());
    let router = GestureRouter::new(
        Arc::new(GameMode::new()),
        Arc::new(LoggingTrackingControl),
        spawner.clone(),
        config.placement.clone(),
    );

    let mut rejected_events = 0;
    for step in steps {
        match step {
            ScriptStep::Session(event) => {
                // Inconsistent events are logged by the tracker
                if tracker.process_event(event.clone()).is_err() {
                    rejected_events += 1;
                }
            }
            ScriptStep::Gesture(gesture) => {
                if router.route(*gesture) == GestureAction::Ignored {
                    info!(gesture = ?gesture, mode = ?router.mode().state(), "Gesture ignored");
                }
            }
        }
    }

    ReplayReport {
        steps: steps.len(),
        rejected_events,
        spheres_spawned: spawner.spawned.load(Ordering::Relaxed),
        mode: router.mode().state(),
        tracking: tracker.tracking_status(),
        surfaces: tracker.current_proxies(),
    }
}

/// Parse a JSON script.
pub fn parse_script(json: &str) -> Result<Vec<ScriptStep>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Run the replay command.
pub fn run_file(script: &Path, config: &ConfigFile) -> Result<(), CliError> {
    let json = fs::read_to_string(script).map_err(|source| CliError::ScriptRead {
        path: script.to_path_buf(),
        source,
    })?;
    let steps = parse_script(&json).map_err(|source| CliError::ScriptParse {
        path: script.to_path_buf(),
        source,
    })?;

    info!(script = %script.display(), steps = steps.len(), "Replaying session script");
    print!("{}", render_report(&replay(&steps, config)));
    Ok(())
}

/// Run the demo command.
pub fn run_demo(config: &ConfigFile) -> Result<(), CliError> {
    info!("Running built-in demo session");
    print!("{}", render_report(&replay(&demo_script(), config)));
    Ok(())
}

/// A typical session: the user scans a room, then long-presses and drops
/// a few spheres.
pub fn demo_script() -> Vec<ScriptStep> {
    use ScriptStep::{Gesture as G, Session as S};

    vec![
        S(TrackingState::Limited(LimitedReason::Initializing).into()),
        S(TrackingState::Normal.into()),
        // Taps while exploring do nothing
        G(Gesture::Tap { hit: None }),
        S(SurfaceEvent::added(1, (1.2, 0.8), (0.0, -1.2, -1.0)).into()),
        S(SurfaceEvent::added(2, (0.8, 0.6), (0.4, -0.5, -1.5)).into()),
        S(SurfaceEvent::updated(1, (2.5, 1.75), (0.2, -1.2, -1.1)).into()),
        S(TrackingState::Limited(LimitedReason::ExcessiveMotion).into()),
        S(TrackingState::Normal.into()),
        // A sliver of floor later merged into surface 1
        S(SurfaceEvent::added(3, (0.3, 0.25), (1.1, -1.2, -0.4)).into()),
        S(SurfaceEvent::updated(1, (3.0, 2.5), (0.4, -1.2, -0.9)).into()),
        S(SurfaceEvent::removed(3).into()),
        G(Gesture::LongPress(GesturePhase::Began)),
        G(Gesture::LongPress(GesturePhase::Ended)),
        G(Gesture::Tap {
            hit: Some((0.4, -0.5, -1.5).into()),
        }),
        G(Gesture::TwoFingerTap),
        G(Gesture::Tap { hit: None }),
        G(Gesture::LongPress(GesturePhase::Began)),
        S(SessionEvent::Interrupted),
        S(SessionEvent::InterruptionEnded),
    ]
}

fn render_report(report: &ReplayReport) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Replayed {} steps ({} inconsistent surface events skipped)\n\n",
        report.steps, report.rejected_events
    ));
    out.push_str(&format!(
        "Mode:     {} ({})\n",
        report.mode.display_status(),
        if report.mode.allows_spawning() {
            "placing"
        } else {
            "exploring"
        }
    ));
    out.push_str(&format!(
        "Tracking: {}{}\n",
        report.tracking.state,
        if report.tracking.interrupted {
            ", interrupted"
        } else {
            ""
        }
    ));
    if let Some(failure) = &report.tracking.last_failure {
        out.push_str(&format!("Failure:  {}\n", failure));
    }
    out.push_str(&format!("Spheres:  {}\n\n", report.spheres_spawned));

    if report.surfaces.is_empty() {
        out.push_str("No surfaces tracked.\n");
        return out;
    }

    out.push_str(&format!(
        "{:<14} {:>7} {:>7}  {:<26} {:>4}\n",
        "SURFACE", "WIDTH", "HEIGHT", "CENTER", "REV"
    ));
    for proxy in &report.surfaces {
        out.push_str(&format!(
            "{:<14} {:>7.2} {:>7.2}  {:<26} {:>4}\n",
            proxy.id().to_string(),
            proxy.width(),
            proxy.height(),
            proxy.center().to_string(),
            proxy.revision()
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use arplayground::surface::{SurfaceId, UnknownUpdatePolicy};

    #[test]
    fn test_parse_script() {
        let json = r#"[
            {"session": {"tracking": {"limited": "initializing"}}},
            {"session": {"surface": {"event": "added", "id": 1,
                "extent": {"width": 2.0, "height": 1.5},
                "center": {"x": 0.0, "y": -1.0, "z": -1.0}}}},
            {"session": {"surface": {"event": "removed", "id": 1}}},
            {"session": "interrupted"},
            {"session": {"failed": "camera unavailable"}},
            {"gesture": {"long_press": "began"}},
            {"gesture": {"tap": {}}},
            {"gesture": "two_finger_tap"}
        ]"#;

        let steps = parse_script(json).unwrap();
        assert_eq!(steps.len(), 8);
        assert_eq!(
            steps[0],
            ScriptStep::Session(TrackingState::Limited(LimitedReason::Initializing).into())
        );
        assert_eq!(
            steps[1],
            ScriptStep::Session(SurfaceEvent::added(1, (2.0, 1.5), (0.0, -1.0, -1.0)).into())
        );
        assert_eq!(steps[3], ScriptStep::Session(SessionEvent::Interrupted));
        assert_eq!(
            steps[5],
            ScriptStep::Gesture(Gesture::LongPress(GesturePhase::Began))
        );
        assert_eq!(steps[6], ScriptStep::Gesture(Gesture::Tap { hit: None }));
        assert_eq!(steps[7], ScriptStep::Gesture(Gesture::TwoFingerTap));
    }

    #[test]
    fn test_parse_script_rejects_unknown_step() {
        assert!(parse_script(r#"[{"teleport": {}}]"#).is_err());
        assert!(parse_script(r#"[{"session": {"surface": {"event": "moved", "id": 1}}}]"#).is_err());
    }

    #[test]
    fn test_demo_replay() {
        let report = replay(&demo_script(), &ConfigFile::default());

        assert_eq!(report.steps, demo_script().len());
        assert_eq!(report.rejected_events, 0);
        assert_eq!(report.mode, GameModeState::Placing);
        assert_eq!(report.spheres_spawned, 3);
        assert_eq!(report.tracking.state, TrackingState::Normal);
        assert!(!report.tracking.interrupted);

        assert_eq!(report.surfaces.ids(), vec![SurfaceId::new(1), SurfaceId::new(2)]);
        let floor = report.surfaces.get(SurfaceId::new(1)).unwrap();
        assert_eq!(floor.texture_scale(), (3.0, 2.5));
        assert_eq!(floor.revision(), 2);
    }

    #[test]
    fn test_replay_counts_inconsistent_events() {
        let steps = vec![
            ScriptStep::Session(SurfaceEvent::added(1, (1.0, 1.0), (0.0, 0.0, 0.0)).into()),
            ScriptStep::Session(SurfaceEvent::added(1, (1.0, 1.0), (0.0, 0.0, 0.0)).into()),
            ScriptStep::Session(SurfaceEvent::removed(5).into()),
            ScriptStep::Session(SurfaceEvent::updated(6, (1.0, 1.0), (0.0, 0.0, 0.0)).into()),
        ];

        let report = replay(&steps, &ConfigFile::default());
        assert_eq!(report.rejected_events, 2);
        assert_eq!(report.surfaces.len(), 2);

        let mut config = ConfigFile::default();
        config.tracking.unknown_update = UnknownUpdatePolicy::Reject;
        let report = replay(&steps, &config);
        assert_eq!(report.rejected_events, 3);
        assert_eq!(report.surfaces.len(), 1);
    }

    #[test]
    fn test_taps_ignored_until_placing() {
        let steps = vec![
            ScriptStep::Gesture(Gesture::TwoFingerTap),
            ScriptStep::Gesture(Gesture::Tap { hit: None }),
            ScriptStep::Gesture(Gesture::LongPress(GesturePhase::Changed)),
            ScriptStep::Gesture(Gesture::LongPress(GesturePhase::Began)),
            ScriptStep::Gesture(Gesture::TwoFingerTap),
        ];

        let report = replay(&steps, &ConfigFile::default());
        assert_eq!(report.mode, GameModeState::Placing);
        assert_eq!(report.spheres_spawned, 1);
    }

    #[test]
    fn test_render_report() {
        let report = replay(&demo_script(), &ConfigFile::default());
        let text = render_report(&report);

        assert!(text.contains("Replayed 19 steps"));
        assert!(text.contains("Mode:     Game mode (placing)"));
        assert!(text.contains("Tracking: normal\n"));
        assert!(text.contains("Spheres:  3"));
        assert!(text.contains("surface-0001"));
        assert!(text.contains("surface-0002"));
        assert!(!text.contains("surface-0003"));
    }

    #[test]
    fn test_render_empty_report() {
        let text = render_report(&replay(&[], &ConfigFile::default()));
        assert!(text.contains("No surfaces tracked."));
        assert!(text.contains("Tracking: unavailable"));
    }
}
