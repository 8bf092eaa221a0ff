//! AR Playground - surface tracking and game mode for an AR sphere-dropping demo
//!
//! This library keeps a mirror of the horizontal surfaces an AR tracking
//! engine reports, so a renderer can draw a grid on each one, and decides
//! what the user's gestures do. Plane detection, rendering and physics stay
//! with the platform; they are reached through the traits in [`session`]
//! and [`game`].
//!
//! # Modules
//!
//! - [`surface`]: the surface registry and its data model
//! - [`session`]: tracking session events and the async tracker service
//! - [`game`]: exploring/placing state machine and gesture routing
//! - [`config`]: `config.ini` handling
//! - [`logging`]: tracing subscriber setup

pub mod config;
pub mod game;
pub mod logging;
pub mod session;
pub mod surface;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
