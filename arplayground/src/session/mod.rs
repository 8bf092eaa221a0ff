//! Tracking session plumbing.
//!
//! The platform's tracking subsystem delivers callbacks on its own thread.
//! Platform glue converts each callback into a [`SessionEvent`] and sends it
//! down an unbounded channel (fire-and-forget), and the
//! [`DefaultSurfaceTracker`] applies them to the surface registry in order.
//!
//! ```text
//! tracking callbacks ──► mpsc<SessionEvent> ──► DefaultSurfaceTracker ──► SurfaceRegistry
//!                                                      │
//!                                                      └──► broadcast<SurfaceChange> ──► renderer
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use arplayground::session::{DefaultSurfaceTracker, SessionEvent};
//!
//! let tracker = Arc::new(DefaultSurfaceTracker::with_defaults());
//! let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
//! let mut changes = tracker.subscribe_changes();
//! let handle = Arc::clone(&tracker).start(rx);
//!
//! tx.send(SessionEvent::Surface(event))?;
//! ```

mod tracker;
mod tracking;

pub use tracker::{
    DefaultSurfaceTracker, SurfaceTracker, SurfaceTrackerConfig, TrackingStatus,
    DEFAULT_CHANGE_CHANNEL_CAPACITY,
};
pub use tracking::{LimitedReason, PlaneDetection, SessionEvent, TrackingControl, TrackingState};
