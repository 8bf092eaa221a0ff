//! The surface tracker service.
//!
//! Drains the session event channel, applies surface events to the
//! registry, records tracking quality, and broadcasts every applied change
//! to subscribers (typically the renderer).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::tracking::{SessionEvent, TrackingState};
use crate::surface::{
    ProxySnapshot, RegistryError, SurfaceChange, SurfaceId, SurfaceProxy, SurfaceRegistry,
    UnknownUpdatePolicy,
};

/// Default capacity of the change broadcast channel.
pub const DEFAULT_CHANGE_CHANNEL_CAPACITY: usize = 256;

/// Configuration for the surface tracker.
#[derive(Debug, Clone)]
pub struct SurfaceTrackerConfig {
    /// How the registry treats updates for surfaces it never saw added.
    pub unknown_update: UnknownUpdatePolicy,

    /// Capacity of the change broadcast channel.
    ///
    /// Subscribers that fall further behind than this miss changes and
    /// should resynchronize from [`SurfaceTracker::current_proxies`].
    pub change_channel_capacity: usize,
}

impl Default for SurfaceTrackerConfig {
    fn default() -> Self {
        Self {
            unknown_update: UnknownUpdatePolicy::default(),
            change_channel_capacity: DEFAULT_CHANGE_CHANNEL_CAPACITY,
        }
    }
}

/// Session health as last reported by the tracking subsystem.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackingStatus {
    /// Last reported camera tracking quality.
    pub state: TrackingState,
    /// Whether the session is currently interrupted.
    pub interrupted: bool,
    /// Message of the most recent session failure, if any.
    pub last_failure: Option<String>,
}

/// Read-only view of tracked surfaces and session health.
pub trait SurfaceTracker: Send + Sync {
    /// Snapshot every live surface proxy.
    fn current_proxies(&self) -> ProxySnapshot;

    /// Look up one surface proxy.
    fn lookup(&self, id: SurfaceId) -> Option<SurfaceProxy>;

    /// Number of tracked surfaces.
    fn surface_count(&self) -> usize;

    /// Last reported camera tracking quality.
    fn tracking_state(&self) -> TrackingState;

    /// Total session events processed.
    fn events_processed(&self) -> u64;
}

/// Default [`SurfaceTracker`] backed by a [`SurfaceRegistry`].
pub struct DefaultSurfaceTracker {
    registry: Arc<SurfaceRegistry>,
    status: RwLock<TrackingStatus>,
    change_tx: broadcast::Sender<SurfaceChange>,
    events_processed: AtomicU64,
}

impl std::fmt::Debug for DefaultSurfaceTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultSurfaceTracker")
            .field("registry", &self.registry)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

impl DefaultSurfaceTracker {
    /// Create a tracker with the given configuration.
    pub fn new(config: SurfaceTrackerConfig) -> Self {
        let (change_tx, _) = broadcast::channel(config.change_channel_capacity.max(1));
        Self {
            registry: Arc::new(SurfaceRegistry::with_policy(config.unknown_update)),
            status: RwLock::new(TrackingStatus::default()),
            change_tx,
            events_processed: AtomicU64::new(0),
        }
    }

    /// Create a tracker with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(SurfaceTrackerConfig::default())
    }

    /// The underlying registry, for readers that want it directly.
    pub fn registry(&self) -> &Arc<SurfaceRegistry> {
        &self.registry
    }

    /// Subscribe to applied surface changes.
    ///
    /// Only changes applied after subscribing are delivered.
    pub fn subscribe_changes(&self) -> broadcast::Receiver<SurfaceChange> {
        self.change_tx.subscribe()
    }

    /// Current session health.
    pub fn tracking_status(&self) -> TrackingStatus {
        self.status.read().clone()
    }

    /// Process one session event synchronously.
    ///
    /// Registry errors are logged and returned; they never stop the session.
    ///
    /// # Returns
    ///
    /// `Ok(Some(change))` for an applied surface event, `Ok(None)` for
    /// events that don't touch the registry.
    pub fn process_event(
        &self,
        event: SessionEvent,
    ) -> Result<Option<SurfaceChange>, RegistryError> {
        self.events_processed.fetch_add(1, Ordering::Relaxed);

        match event {
            SessionEvent::Surface(surface_event) => match self.registry.apply(surface_event) {
                Ok(change) => {
                    // No subscribers is fine
                    let _ = self.change_tx.send(change.clone());
                    Ok(Some(change))
                }
                Err(e) => {
                    warn!(
                        event = surface_event.kind(),
                        surface = %e.surface(),
                        error = %e,
                        "Ignoring inconsistent surface event"
                    );
                    Err(e)
                }
            },
            SessionEvent::Tracking(state) => {
                match state {
                    TrackingState::Normal => info!("Camera tracking normal"),
                    TrackingState::Limited(reason) => {
                        warn!(reason = %reason, "Camera tracking limited")
                    }
                    TrackingState::Unavailable => warn!("Camera tracking unavailable"),
                }
                self.status.write().state = state;
                Ok(None)
            }
            SessionEvent::Failed(message) => {
                error!(error = %message, "Tracking session failed");
                self.status.write().last_failure = Some(message);
                Ok(None)
            }
            SessionEvent::Interrupted => {
                warn!("Tracking session interrupted");
                self.status.write().interrupted = true;
                Ok(None)
            }
            SessionEvent::InterruptionEnded => {
                info!("Tracking session interruption ended");
                self.status.write().interrupted = false;
                Ok(None)
            }
        }
    }

    /// Start processing session events from `rx` on the Tokio runtime.
    ///
    /// The task ends when every sender is dropped.
    pub fn start(self: Arc<Self>, rx: mpsc::UnboundedReceiver<SessionEvent>) -> JoinHandle<()> {
        self.start_with_cancellation(rx, CancellationToken::new())
    }

    /// Like [`start`](Self::start), but also stops when `cancel` fires.
    ///
    /// Events still queued at cancellation are not processed.
    pub fn start_with_cancellation(
        self: Arc<Self>,
        mut rx: mpsc::UnboundedReceiver<SessionEvent>,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            debug!("Surface tracker started");

            loop {
                tokio::select! {
                    biased;

                    _ = cancel.cancelled() => {
                        debug!("Surface tracker cancelled");
                        break;
                    }
                    event = rx.recv() => match event {
                        Some(event) => {
                            // Errors are already logged
                            let _ = self.process_event(event);
                        }
                        None => {
                            debug!("Session event channel closed");
                            break;
                        }
                    }
                }
            }

            info!(
                events = self.events_processed(),
                surfaces = self.registry.len(),
                "Surface tracker stopped"
            );
        })
    }
}

impl SurfaceTracker for DefaultSurfaceTracker {
    fn current_proxies(&self) -> ProxySnapshot {
        self.registry.current_proxies()
    }

    fn lookup(&self, id: SurfaceId) -> Option<SurfaceProxy> {
        self.registry.lookup(id)
    }

    fn surface_count(&self) -> usize {
        self.registry.len()
    }

    fn tracking_state(&self) -> TrackingState {
        self.status.read().state
    }

    fn events_processed(&self) -> u64 {
        self.events_processed.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::LimitedReason;
    use crate::surface::SurfaceEvent;

    #[test]
    fn test_process_surface_event() {
        let tracker = DefaultSurfaceTracker::with_defaults();
        let change = tracker
            .process_event(SurfaceEvent::added(1, (1.0, 1.0), (0.0, 0.0, 0.0)).into())
            .unwrap();

        assert!(matches!(change, Some(SurfaceChange::Added(_))));
        assert_eq!(tracker.surface_count(), 1);
        assert_eq!(tracker.events_processed(), 1);
    }

    #[test]
    fn test_process_error_is_returned_not_fatal() {
        let tracker = DefaultSurfaceTracker::with_defaults();
        let result = tracker.process_event(SurfaceEvent::removed(4).into());
        assert_eq!(result, Err(RegistryError::UnknownSurface(SurfaceId::new(4))));

        tracker
            .process_event(SurfaceEvent::added(4, (1.0, 1.0), (0.0, 0.0, 0.0)).into())
            .unwrap();
        assert_eq!(tracker.surface_count(), 1);
    }

    #[test]
    fn test_tracking_status_updates() {
        let tracker = DefaultSurfaceTracker::with_defaults();
        assert_eq!(tracker.tracking_state(), TrackingState::Unavailable);

        let limited = TrackingState::Limited(LimitedReason::Initializing);
        tracker.process_event(limited.into()).unwrap();
        assert_eq!(tracker.tracking_state(), limited);

        tracker.process_event(SessionEvent::Interrupted).unwrap();
        assert!(tracker.tracking_status().interrupted);
        tracker.process_event(SessionEvent::InterruptionEnded).unwrap();
        assert!(!tracker.tracking_status().interrupted);

        tracker
            .process_event(SessionEvent::Failed("camera denied".to_string()))
            .unwrap();
        assert_eq!(
            tracker.tracking_status().last_failure.as_deref(),
            Some("camera denied")
        );
    }

    #[test]
    fn test_reject_policy_from_config() {
        let tracker = DefaultSurfaceTracker::new(SurfaceTrackerConfig {
            unknown_update: UnknownUpdatePolicy::Reject,
            ..Default::default()
        });
        assert!(tracker
            .process_event(SurfaceEvent::updated(1, (1.0, 1.0), (0.0, 0.0, 0.0)).into())
            .is_err());
        assert_eq!(tracker.surface_count(), 0);
    }

    #[test]
    fn test_subscriber_receives_changes() {
        let tracker = DefaultSurfaceTracker::with_defaults();
        let mut rx = tracker.subscribe_changes();

        tracker
            .process_event(SurfaceEvent::added(2, (1.0, 1.0), (0.0, 0.0, 0.0)).into())
            .unwrap();
        tracker
            .process_event(SurfaceEvent::removed(2).into())
            .unwrap();

        assert!(matches!(rx.try_recv(), Ok(SurfaceChange::Added(_))));
        assert!(matches!(rx.try_recv(), Ok(SurfaceChange::Removed(_))));
        assert!(rx.try_recv().is_err());
    }
}
