//! Resolution of detents to concrete heights, memoized per container size.

use rustc_hash::FxHashMap;
use sheetkit_ui_graphics::{EdgeInsets, Size};

use crate::detent::{Detent, DetentId, ResolverContext};

/// Height of [`Detent::Hidden`]. Non-zero so the sheet stays hit-testable.
pub const HIDDEN_DETENT_HEIGHT: f32 = 1.0;

/// Geometry of the container, queried from the host on demand.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ContainerMetrics {
    pub size: Size,
    pub safe_area: EdgeInsets,
}

impl ContainerMetrics {
    pub fn new(size: Size, safe_area: EdgeInsets) -> Self {
        Self { size, safe_area }
    }

    pub fn resolver_context(&self) -> ResolverContext {
        ResolverContext {
            content_size: self.size,
            safe_area: self.safe_area,
        }
    }
}

/// Uncached height of `detent` inside `metrics`.
pub fn resolve_height(detent: &Detent, metrics: &ContainerMetrics) -> f32 {
    match detent {
        Detent::Medium => metrics.size.height / 2.0,
        Detent::Large => metrics.size.height - metrics.safe_area.top,
        Detent::Hidden => HIDDEN_DETENT_HEIGHT,
        Detent::Custom { resolver, .. } => resolver(&metrics.resolver_context()),
    }
}

/// Resolved heights for one container size.
///
/// Seeing any other size drops every entry: detents are assumed to depend on
/// the size collectively.
#[derive(Debug, Default)]
pub struct HeightCache {
    size: Size,
    heights: FxHashMap<DetentId, f32>,
}

impl HeightCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The container size the cached heights belong to.
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn len(&self) -> usize {
        self.heights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Records `size` as current, clearing the cache if it changed.
    pub fn observe_size(&mut self, size: Size) {
        if self.size != size {
            log::trace!("container size {:?} -> {:?}, dropping cached heights", self.size, size);
            self.size = size;
            self.invalidate();
        }
    }

    pub fn get(&mut self, id: &DetentId, size: Size) -> Option<f32> {
        self.observe_size(size);
        self.heights.get(id).copied()
    }

    pub fn insert(&mut self, id: DetentId, height: f32, size: Size) {
        self.observe_size(size);
        self.heights.insert(id, height);
    }

    pub fn invalidate(&mut self) {
        self.heights.clear();
    }

    /// Cached height of `detent`, resolving and storing it on a miss.
    pub fn resolve(&mut self, detent: &Detent, metrics: &ContainerMetrics) -> f32 {
        if let Some(height) = self.get(detent.id(), metrics.size) {
            return height;
        }
        let height = resolve_height(detent, metrics);
        self.insert(detent.id().clone(), height, metrics.size);
        height
    }
}

#[cfg(test)]
#[path = "tests/height_cache_tests.rs"]
mod tests;
