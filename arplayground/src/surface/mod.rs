//! Surface tracking registry.
//!
//! This module keeps a locally-owned proxy for every horizontal surface the
//! tracking subsystem reports, and keeps that set exactly in step with the
//! stream of add/update/remove notifications.
//!
//! # Design Philosophy
//!
//! **The tracking subsystem is the source of truth. The registry is a mirror.**
//!
//! - **Store**: one [`SurfaceProxy`] per live [`SurfaceId`], with the most
//!   recently reported extent and center
//! - **Derive**: grid material tiling, recomputed from the extent on every change
//! - **Never replace**: updates mutate the proxy in place so anything a renderer
//!   attached to it keeps its identity
//!
//! # Example
//!
//! ```
//! use arplayground::surface::{SurfaceEvent, SurfaceId, SurfaceRegistry};
//!
//! let registry = SurfaceRegistry::new();
//! registry.handle(SurfaceEvent::added(1, (1.0, 2.0), (0.0, 0.0, -1.0))).unwrap();
//! registry.handle(SurfaceEvent::updated(1, (2.0, 2.0), (0.0, 0.0, -1.0))).unwrap();
//!
//! let proxy = registry.lookup(SurfaceId::new(1)).unwrap();
//! assert_eq!(proxy.texture_scale(), (2.0, 2.0));
//!
//! for proxy in &registry.current_proxies() {
//!     println!("{}", proxy);
//! }
//! ```

mod error;
mod model;
mod registry;

pub use error::RegistryError;
pub use model::{
    Extent, GridMaterial, SurfaceEvent, SurfaceId, SurfaceProxy, TextureScale, TextureWrap, Vec3,
    SURFACE_ROTATION_X,
};
pub use registry::{
    ProxySnapshot, RegistryStats, SurfaceChange, SurfaceRegistry, UnknownUpdatePolicy,
};
