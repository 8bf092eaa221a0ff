//! Core data types for surface tracking.
//!
//! This module contains the data model shared by the registry, the session
//! loop and renderers: surface identifiers, the events the tracking subsystem
//! emits, and the locally-owned proxy records derived from them.

use std::f32::consts::FRAC_PI_2;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque, stable identifier for a physical surface.
///
/// Assigned by the tracking subsystem. Unique for the lifetime of a
/// tracking session and never reused after the surface is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurfaceId(u64);

impl SurfaceId {
    /// Create a surface identifier from its raw value.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw identifier value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl From<u64> for SurfaceId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface-{:04}", self.0)
    }
}

/// A position in world space (meters).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    /// Create a new vector.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Return this vector translated by `dy` along the vertical axis.
    pub fn raised(self, dy: f32) -> Self {
        Self {
            y: self.y + dy,
            ..self
        }
    }
}

impl From<(f32, f32, f32)> for Vec3 {
    fn from((x, y, z): (f32, f32, f32)) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}

/// Horizontal extent of a surface along its two in-plane axes (meters).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Extent {
    /// Extent along the surface's X axis.
    pub width: f32,
    /// Extent along the surface's Z axis.
    pub height: f32,
}

impl Extent {
    /// Create a new extent.
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl From<(f32, f32)> for Extent {
    fn from((width, height): (f32, f32)) -> Self {
        Self { width, height }
    }
}

/// One notification from the tracking subsystem.
///
/// Serialized with an `event` tag, e.g.
/// `{"event":"added","id":1,"extent":{"width":1.0,"height":2.0},"center":{"x":0.0,"y":0.0,"z":0.0}}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SurfaceEvent {
    /// A new surface was detected.
    Added {
        id: SurfaceId,
        extent: Extent,
        center: Vec3,
    },
    /// A known surface was resized or moved.
    Updated {
        id: SurfaceId,
        extent: Extent,
        center: Vec3,
    },
    /// A surface is no longer tracked.
    Removed { id: SurfaceId },
}

impl SurfaceEvent {
    /// Build an `Added` event from tuple geometry.
    pub fn added(id: impl Into<SurfaceId>, extent: (f32, f32), center: (f32, f32, f32)) -> Self {
        SurfaceEvent::Added {
            id: id.into(),
            extent: extent.into(),
            center: center.into(),
        }
    }

    /// Build an `Updated` event from tuple geometry.
    pub fn updated(id: impl Into<SurfaceId>, extent: (f32, f32), center: (f32, f32, f32)) -> Self {
        SurfaceEvent::Updated {
            id: id.into(),
            extent: extent.into(),
            center: center.into(),
        }
    }

    /// Build a `Removed` event.
    pub fn removed(id: impl Into<SurfaceId>) -> Self {
        SurfaceEvent::Removed { id: id.into() }
    }

    /// The surface this event refers to.
    pub fn id(&self) -> SurfaceId {
        match self {
            SurfaceEvent::Added { id, .. }
            | SurfaceEvent::Updated { id, .. }
            | SurfaceEvent::Removed { id } => *id,
        }
    }

    /// Short name of the event kind, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            SurfaceEvent::Added { .. } => "added",
            SurfaceEvent::Updated { .. } => "updated",
            SurfaceEvent::Removed { .. } => "removed",
        }
    }
}

/// Texture wrapping mode along one texture axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureWrap {
    /// Stretch the texture once across the surface.
    Clamp,
    /// Tile the texture.
    Repeat,
}

/// Texture coordinate scale for a repeating grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureScale {
    pub s: f32,
    pub t: f32,
}

impl From<TextureScale> for (f32, f32) {
    fn from(scale: TextureScale) -> Self {
        (scale.s, scale.t)
    }
}

/// Tiling parameters for the grid material drawn on a surface.
///
/// Derived purely from the surface extent so one grid cell always covers
/// one square meter, however the surface is resized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridMaterial {
    /// Texture coordinate scale; equals `(width, height)`.
    pub scale: TextureScale,
    /// Wrap mode along the S axis.
    pub wrap_s: TextureWrap,
    /// Wrap mode along the T axis.
    pub wrap_t: TextureWrap,
    /// Render both faces of the plane.
    pub double_sided: bool,
}

impl GridMaterial {
    /// Derive the material for a surface of the given extent.
    pub fn for_extent(width: f32, height: f32) -> Self {
        Self {
            scale: TextureScale {
                s: width,
                t: height,
            },
            wrap_s: TextureWrap::Repeat,
            wrap_t: TextureWrap::Repeat,
            double_sided: true,
        }
    }
}

/// Rotation about the X axis that lays a vertical plane primitive flat.
pub const SURFACE_ROTATION_X: f32 = -FRAC_PI_2;

/// The locally-owned renderable representation of one tracked surface.
///
/// Proxies are created by the registry on the first `Added` event and
/// mutated in place on each `Updated`; `revision` counts those updates so
/// renderers can tell a stale visual from a current one.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceProxy {
    id: SurfaceId,
    width: f32,
    height: f32,
    center: Vec3,
    material: GridMaterial,
    revision: u64,
}

impl SurfaceProxy {
    pub(crate) fn new(id: SurfaceId, extent: Extent, center: Vec3) -> Self {
        Self {
            id,
            width: extent.width,
            height: extent.height,
            center,
            material: GridMaterial::for_extent(extent.width, extent.height),
            revision: 0,
        }
    }

    /// Apply new geometry in place and rederive the material.
    pub(crate) fn update(&mut self, extent: Extent, center: Vec3) {
        self.width = extent.width;
        self.height = extent.height;
        self.center = center;
        self.material = GridMaterial::for_extent(self.width, self.height);
        self.revision += 1;
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn extent(&self) -> Extent {
        Extent::new(self.width, self.height)
    }

    /// Center of the surface in world space.
    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn material(&self) -> &GridMaterial {
        &self.material
    }

    /// Texture tiling scale; always `(width, height)`.
    pub fn texture_scale(&self) -> (f32, f32) {
        self.material.scale.into()
    }

    /// Number of in-place updates applied since creation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Rotation (radians about X) the renderer applies to the plane primitive.
    pub fn orientation(&self) -> f32 {
        SURFACE_ROTATION_X
    }
}

impl fmt::Display for SurfaceProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:.2}m x {:.2}m at {} (rev {})",
            self.id, self.width, self.height, self.center, self.revision
        )
    }
}
