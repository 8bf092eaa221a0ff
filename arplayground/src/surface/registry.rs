//! The surface registry.
//!
//! Keeps the set of surface proxies in step with the tracking event stream.
//! The registry is the only owner of proxy records; readers get clones taken
//! under a read lock, so a reader never observes a half-applied update.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use parking_lot::RwLock;
use tracing::{debug, warn};

use super::error::RegistryError;
use super::model::{Extent, SurfaceEvent, SurfaceId, SurfaceProxy, Vec3};

/// What to do with an `Updated` event for a surface that was never added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownUpdatePolicy {
    /// Treat the update as an `Added` event.
    #[default]
    Synthesize,
    /// Reject the update with [`RegistryError::UnknownSurface`].
    Reject,
}

impl UnknownUpdatePolicy {
    /// Config file spelling of the policy.
    pub fn as_str(&self) -> &'static str {
        match self {
            UnknownUpdatePolicy::Synthesize => "synthesize",
            UnknownUpdatePolicy::Reject => "reject",
        }
    }
}

impl fmt::Display for UnknownUpdatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnknownUpdatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "synthesize" => Ok(UnknownUpdatePolicy::Synthesize),
            "reject" => Ok(UnknownUpdatePolicy::Reject),
            other => Err(format!(
                "unknown update policy '{}' (expected 'synthesize' or 'reject')",
                other
            )),
        }
    }
}

/// The effect an applied event had on the registry.
///
/// Each variant carries a copy of the proxy as it stands after the change
/// (or, for `Removed`, as it stood before removal).
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceChange {
    Added(SurfaceProxy),
    Updated(SurfaceProxy),
    Removed(SurfaceProxy),
}

impl SurfaceChange {
    /// The proxy affected by this change.
    pub fn proxy(&self) -> &SurfaceProxy {
        match self {
            SurfaceChange::Added(p) | SurfaceChange::Updated(p) | SurfaceChange::Removed(p) => p,
        }
    }

    pub fn id(&self) -> SurfaceId {
        self.proxy().id()
    }
}

/// Counters of events processed by a registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryStats {
    /// Proxies created (including synthesized ones).
    pub added: u64,
    /// In-place updates applied.
    pub updated: u64,
    /// Proxies removed.
    pub removed: u64,
    /// `Updated` events for unknown surfaces turned into additions.
    pub synthesized: u64,
    /// Events rejected with a [`RegistryError`].
    pub rejected: u64,
}

/// A point-in-time copy of every live proxy, ordered by surface id.
///
/// The snapshot can be iterated any number of times; it does not change
/// when the registry does.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProxySnapshot {
    proxies: Vec<SurfaceProxy>,
}

impl ProxySnapshot {
    pub fn iter(&self) -> std::slice::Iter<'_, SurfaceProxy> {
        self.proxies.iter()
    }

    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }

    /// Find a proxy in the snapshot by id.
    pub fn get(&self, id: SurfaceId) -> Option<&SurfaceProxy> {
        self.proxies
            .binary_search_by_key(&id, SurfaceProxy::id)
            .ok()
            .map(|idx| &self.proxies[idx])
    }

    /// Ids of every proxy, in snapshot order.
    pub fn ids(&self) -> Vec<SurfaceId> {
        self.proxies.iter().map(SurfaceProxy::id).collect()
    }

    pub fn into_vec(self) -> Vec<SurfaceProxy> {
        self.proxies
    }
}

impl IntoIterator for ProxySnapshot {
    type Item = SurfaceProxy;
    type IntoIter = std::vec::IntoIter<SurfaceProxy>;

    fn into_iter(self) -> Self::IntoIter {
        self.proxies.into_iter()
    }
}

impl<'a> IntoIterator for &'a ProxySnapshot {
    type Item = &'a SurfaceProxy;
    type IntoIter = std::slice::Iter<'a, SurfaceProxy>;

    fn into_iter(self) -> Self::IntoIter {
        self.proxies.iter()
    }
}

#[derive(Debug, Default)]
struct RegistryInner {
    proxies: HashMap<SurfaceId, SurfaceProxy>,
    stats: RegistryStats,
}

/// Owns the mapping from tracked surfaces to their proxies.
///
/// # Thread Safety
///
/// All methods take `&self`. Each event is applied while holding the write
/// lock for its whole duration, and every read copies out under the read
/// lock, so `Arc<SurfaceRegistry>` can be shared between the tracking
/// callback thread and the render thread.
#[derive(Debug, Default)]
pub struct SurfaceRegistry {
    policy: UnknownUpdatePolicy,
    inner: RwLock<RegistryInner>,
}

impl SurfaceRegistry {
    /// Create an empty registry with the default unknown-update policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry with the given unknown-update policy.
    pub fn with_policy(policy: UnknownUpdatePolicy) -> Self {
        Self {
            policy,
            inner: RwLock::new(RegistryInner::default()),
        }
    }

    pub fn policy(&self) -> UnknownUpdatePolicy {
        self.policy
    }

    /// Apply one tracking event.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::DuplicateSurface`] for `Added` on a tracked surface;
    ///   the existing proxy is left untouched.
    /// - [`RegistryError::UnknownSurface`] for `Removed` on an untracked
    ///   surface, and for `Updated` on an untracked surface under
    ///   [`UnknownUpdatePolicy::Reject`].
    pub fn handle(&self, event: SurfaceEvent) -> Result<(), RegistryError> {
        self.apply(event).map(|_| ())
    }

    /// Apply one tracking event and report the resulting change.
    ///
    /// Same semantics as [`handle`](Self::handle).
    pub fn apply(&self, event: SurfaceEvent) -> Result<SurfaceChange, RegistryError> {
        let mut guard = self.inner.write();
        let inner = &mut *guard;

        let result = match event {
            SurfaceEvent::Added { id, extent, center } => {
                Self::insert(&mut inner.proxies, id, extent, center)
            }
            SurfaceEvent::Updated { id, extent, center } => match inner.proxies.get_mut(&id) {
                Some(proxy) => {
                    proxy.update(extent, center);
                    debug!(
                        surface = %id,
                        width = extent.width,
                        height = extent.height,
                        revision = proxy.revision(),
                        "Surface updated"
                    );
                    Ok(SurfaceChange::Updated(proxy.clone()))
                }
                None => match self.policy {
                    UnknownUpdatePolicy::Synthesize => {
                        warn!(surface = %id, "Update for untracked surface, treating as added");
                        inner.stats.synthesized += 1;
                        Self::insert(&mut inner.proxies, id, extent, center)
                    }
                    UnknownUpdatePolicy::Reject => Err(RegistryError::UnknownSurface(id)),
                },
            },
            SurfaceEvent::Removed { id } => match inner.proxies.remove(&id) {
                Some(proxy) => {
                    debug!(surface = %id, "Surface removed");
                    Ok(SurfaceChange::Removed(proxy))
                }
                None => Err(RegistryError::UnknownSurface(id)),
            },
        };

        match &result {
            Ok(SurfaceChange::Added(_)) => inner.stats.added += 1,
            Ok(SurfaceChange::Updated(_)) => inner.stats.updated += 1,
            Ok(SurfaceChange::Removed(_)) => inner.stats.removed += 1,
            Err(_) => inner.stats.rejected += 1,
        }

        result
    }

    fn insert(
        proxies: &mut HashMap<SurfaceId, SurfaceProxy>,
        id: SurfaceId,
        extent: Extent,
        center: Vec3,
    ) -> Result<SurfaceChange, RegistryError> {
        match proxies.entry(id) {
            Entry::Occupied(_) => Err(RegistryError::DuplicateSurface(id)),
            Entry::Vacant(slot) => {
                let proxy = slot.insert(SurfaceProxy::new(id, extent, center));
                debug!(
                    surface = %id,
                    width = extent.width,
                    height = extent.height,
                    center = %center,
                    "Surface added"
                );
                Ok(SurfaceChange::Added(proxy.clone()))
            }
        }
    }

    /// Snapshot every live proxy, ordered by id.
    pub fn current_proxies(&self) -> ProxySnapshot {
        let mut proxies: Vec<SurfaceProxy> = self.inner.read().proxies.values().cloned().collect();
        proxies.sort_by_key(SurfaceProxy::id);
        ProxySnapshot { proxies }
    }

    /// Look up the proxy for a surface.
    pub fn lookup(&self, id: SurfaceId) -> Option<SurfaceProxy> {
        self.inner.read().proxies.get(&id).cloned()
    }

    pub fn contains(&self, id: SurfaceId) -> bool {
        self.inner.read().proxies.contains_key(&id)
    }

    /// Number of tracked surfaces.
    pub fn len(&self) -> usize {
        self.inner.read().proxies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().proxies.is_empty()
    }

    /// Event counters since the registry was created.
    pub fn stats(&self) -> RegistryStats {
        self.inner.read().stats
    }
}
