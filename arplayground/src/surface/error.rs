//! Error types for the surface registry.

use thiserror::Error;

use super::model::SurfaceId;

/// Errors produced when an event does not fit the registry's current state.
///
/// Both variants come from an inconsistent or out-of-order tracking stream.
/// They are recoverable: callers log them and keep processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// An `Added` event arrived for a surface that is already tracked.
    #[error("Surface {0} is already tracked")]
    DuplicateSurface(SurfaceId),

    /// An `Updated` or `Removed` event arrived for a surface that is not tracked.
    #[error("Surface {0} is not tracked")]
    UnknownSurface(SurfaceId),
}

impl RegistryError {
    /// The surface the rejected event referred to.
    pub fn surface(&self) -> SurfaceId {
        match self {
            RegistryError::DuplicateSurface(id) | RegistryError::UnknownSurface(id) => *id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_error_display() {
        let err = RegistryError::DuplicateSurface(SurfaceId::new(12));
        assert_eq!(err.to_string(), "Surface surface-0012 is already tracked");

        let err = RegistryError::UnknownSurface(SurfaceId::new(3));
        assert!(err.to_string().contains("not tracked"));
    }

    #[test]
    fn test_registry_error_surface() {
        let err = RegistryError::UnknownSurface(SurfaceId::new(5));
        assert_eq!(err.surface(), SurfaceId::new(5));
    }
}
