use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use crate::foundation::core::BezPath;
use crate::palette::color::{ColorString, HslColor};
use crate::render::gradient::GradientHandle;
use crate::render::surface::{SurfaceChanged, SurfaceListener};

/// Counters for one memoizing cache.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct CacheStats {
    /// Lookups served from the cache.
    pub hits: u64,
    /// Successful factory invocations.
    pub constructions: u64,
    /// Number of `clear()` calls that dropped at least one entry.
    pub clears: u64,
}

/// Memoizing map from a canonical key to a constructed render object.
///
/// At most one successful construction happens per distinct key between two `clear()` calls.
/// Failed constructions are not stored.
pub struct RenderCache<K, V> {
    entries: HashMap<K, V>,
    stats: CacheStats,
}

impl<K, V> Default for RenderCache<K, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::default(),
        }
    }
}

impl<K, V> fmt::Debug for RenderCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderCache")
            .field("len", &self.entries.len())
            .field("stats", &self.stats)
            .finish()
    }
}

impl<K, V> RenderCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for `key`, constructing it with `factory` on a miss.
    pub fn get(&mut self, key: K, factory: impl FnOnce() -> V) -> V {
        match self.try_get(key, || Ok::<V, std::convert::Infallible>(factory())) {
            Ok(v) => v,
            Err(never) => match never {},
        }
    }

    /// Fallible variant of [`RenderCache::get`]. An `Err` from `factory` leaves the cache
    /// unchanged.
    pub fn try_get<E>(&mut self, key: K, factory: impl FnOnce() -> Result<V, E>) -> Result<V, E> {
        if let Some(v) = self.entries.get(&key) {
            self.stats.hits = self.stats.hits.saturating_add(1);
            return Ok(v.clone());
        }
        let v = factory()?;
        self.stats.constructions = self.stats.constructions.saturating_add(1);
        self.entries.insert(key, v.clone());
        Ok(v)
    }

    /// Return `true` when `key` has a stored entry.
    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            self.stats.clears = self.stats.clears.saturating_add(1);
        }
        self.entries.clear();
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` when no entry is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of the cache counters.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

/// Gradient cache key: `colorA-colorB-size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GradientKey {
    /// Gradient start color.
    pub a: HslColor,
    /// Gradient end color.
    pub b: HslColor,
    /// Square render size in off-screen pixels.
    pub size: u32,
}

impl fmt::Display for GradientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.a.css(), self.b.css(), self.size)
    }
}

/// Outline path cache, keyed by the raw SVG path data.
pub type PathCache = RenderCache<Arc<str>, Arc<BezPath>>;

/// Color-string cache, keyed by the integer `h,s,l` triple.
pub type ColorCache = RenderCache<HslColor, ColorString>;

/// Gradient cache bound to one generation of the off-screen surface.
#[derive(Debug, Default)]
pub struct GradientCache {
    inner: RenderCache<GradientKey, Arc<GradientHandle>>,
    bound_generation: u64,
}

impl GradientCache {
    /// Create an empty cache bound to surface generation `generation`.
    pub fn bound_to(generation: u64) -> Self {
        Self {
            inner: RenderCache::new(),
            bound_generation: generation,
        }
    }

    /// Surface generation the stored handles belong to.
    pub fn bound_generation(&self) -> u64 {
        self.bound_generation
    }

    /// Fetch or build the gradient for `key`. `factory` receives the bound surface generation.
    pub fn try_get<E>(
        &mut self,
        key: GradientKey,
        factory: impl FnOnce(u64) -> Result<GradientHandle, E>,
    ) -> Result<Arc<GradientHandle>, E> {
        let generation = self.bound_generation;
        let handle = self
            .inner
            .try_get(key, || factory(generation).map(Arc::new))?;
        debug_assert_eq!(handle.generation(), generation);
        Ok(handle)
    }

    /// Drop every handle and bind to a new surface generation.
    pub fn rebind(&mut self, generation: u64) {
        self.inner.clear();
        self.bound_generation = generation;
    }

    /// Drop every handle.
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Number of stored handles.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Return `true` when no handle is stored.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Snapshot of the cache counters.
    pub fn stats(&self) -> CacheStats {
        self.inner.stats()
    }
}

impl SurfaceListener for GradientCache {
    fn on_surface_changed(&mut self, event: &SurfaceChanged) {
        tracing::debug!(
            generation = event.generation,
            dropped = self.inner.len(),
            "rebinding gradient cache"
        );
        self.rebind(event.generation);
    }
}

/// The three instance-scoped caches owned by one engine.
#[derive(Debug, Default)]
pub struct RenderCaches {
    /// Outline paths.
    pub paths: PathCache,
    /// Gradient paints for the current off-screen surface.
    pub gradients: GradientCache,
    /// Formatted color strings.
    pub colors: ColorCache,
}

impl RenderCaches {
    /// Empty caches with gradients bound to surface generation `generation`.
    pub fn new(generation: u64) -> Self {
        Self {
            paths: PathCache::new(),
            gradients: GradientCache::bound_to(generation),
            colors: ColorCache::new(),
        }
    }

    /// Release every cached object.
    pub fn clear(&mut self) {
        self.paths.clear();
        self.gradients.clear();
        self.colors.clear();
    }

    /// Return `true` when all three caches are empty.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty() && self.gradients.is_empty() && self.colors.is_empty()
    }
}

impl SurfaceListener for RenderCaches {
    fn on_surface_changed(&mut self, event: &SurfaceChanged) {
        self.gradients.on_surface_changed(event);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cache.rs"]
mod tests;
