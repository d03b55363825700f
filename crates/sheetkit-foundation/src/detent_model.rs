//! The ordered detent set, the current detent and the height cache behind it.

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use sheetkit_ui_graphics::Size;
use smallvec::SmallVec;

use crate::detent::{Detent, DetentId};
use crate::gesture::{DetentLayout, LayoutEntry};
use crate::height_cache::{ContainerMetrics, HeightCache};

type DetentMap = IndexMap<DetentId, Detent, FxBuildHasher>;

fn collect_detents(detents: impl IntoIterator<Item = Detent>) -> DetentMap {
    let mut map = DetentMap::default();
    for detent in detents {
        let id = detent.id().clone();
        if map.insert(id.clone(), detent).is_some() {
            log::warn!("duplicate detent id {id}, keeping the last definition");
        }
    }
    map
}

/// Detent set ordered by resolved height (shortest first), plus the detent the
/// sheet currently rests at.
///
/// The current detent is stored by value so it survives replacement of the
/// set; it is re-found by id whenever the set changes.
pub struct DetentModel {
    detents: DetentMap,
    current: Detent,
    initial: Option<DetentId>,
    cache: HeightCache,
}

impl DetentModel {
    /// `initial_id` is remembered only if it names one of `detents`. The
    /// current detent starts there, else at the first detent, else at
    /// [`Detent::Medium`].
    pub fn new(detents: impl IntoIterator<Item = Detent>, initial_id: Option<&DetentId>) -> Self {
        let detents = collect_detents(detents);
        let initial = initial_id.filter(|id| detents.contains_key(*id)).cloned();
        let current = initial
            .as_ref()
            .and_then(|id| detents.get(id))
            .or_else(|| detents.first().map(|(_, detent)| detent))
            .cloned()
            .unwrap_or_default();
        Self {
            detents,
            current,
            initial,
            cache: HeightCache::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.detents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detents.is_empty()
    }

    pub fn detents(&self) -> impl Iterator<Item = &Detent> + '_ {
        self.detents.values()
    }

    /// A copy of the set in its current order.
    pub fn to_vec(&self) -> Vec<Detent> {
        self.detents.values().cloned().collect()
    }

    pub fn detent(&self, id: &DetentId) -> Option<&Detent> {
        self.detents.get(id)
    }

    pub fn index_of(&self, id: &DetentId) -> Option<usize> {
        self.detents.get_index_of(id)
    }

    pub fn first(&self) -> Option<&Detent> {
        self.detents.first().map(|(_, detent)| detent)
    }

    pub fn current(&self) -> &Detent {
        &self.current
    }

    pub fn current_id(&self) -> &DetentId {
        self.current.id()
    }

    /// Tallest detent, or the default detent for an empty set.
    pub fn max_detent(&self) -> Detent {
        self.detents
            .last()
            .map(|(_, detent)| detent.clone())
            .unwrap_or_default()
    }

    /// Moves to `detent`. Returns the new id when it differs from the old one.
    pub fn set_current(&mut self, detent: Detent) -> Option<DetentId> {
        let changed = detent.id() != self.current.id();
        if changed {
            log::debug!("detent {} -> {}", self.current.id(), detent.id());
        }
        self.current = detent;
        changed.then(|| self.current.id().clone())
    }

    pub fn reached_max_detent(&self) -> bool {
        self.detents
            .last()
            .is_some_and(|(id, _)| id == self.current.id())
    }

    /// Height of `detent` in the container, or 0 without one.
    pub fn height_for(&mut self, detent: &Detent, metrics: Option<&ContainerMetrics>) -> f32 {
        match metrics {
            Some(metrics) => self.cache.resolve(detent, metrics),
            None => 0.0,
        }
    }

    /// Stable ascending sort by resolved height. Sets of one or zero detents
    /// come back untouched without resolving anything.
    pub fn sort_by_height(
        &mut self,
        detents: Vec<Detent>,
        metrics: Option<&ContainerMetrics>,
    ) -> Vec<Detent> {
        if detents.len() <= 1 {
            return detents;
        }
        let mut keyed: Vec<(f32, Detent)> = detents
            .into_iter()
            .map(|detent| (self.height_for(&detent, metrics), detent))
            .collect();
        keyed.sort_by(|(a, _), (b, _)| a.total_cmp(b));
        keyed.into_iter().map(|(_, detent)| detent).collect()
    }

    /// Replaces the set with `sorted` and records `container_size`.
    ///
    /// The current detent becomes the initially requested one if the new set
    /// still has it, else the first of the new set, else stays as it was.
    /// Returns the new current id when it changed.
    pub fn set_resorted_detents(
        &mut self,
        sorted: Vec<Detent>,
        container_size: Size,
    ) -> Option<DetentId> {
        self.cache.observe_size(container_size);
        self.detents = collect_detents(sorted);
        let next = self
            .initial
            .as_ref()
            .and_then(|id| self.detents.get(id))
            .or_else(|| self.detents.first().map(|(_, detent)| detent))
            .cloned();
        match next {
            Some(next) => self.set_current(next),
            None => None,
        }
    }

    pub fn invalidate_height_cache(&mut self) {
        self.cache.invalidate();
    }

    pub fn height_cache(&self) -> &HeightCache {
        &self.cache
    }

    /// Snapshot of the set's resolved heights for the gesture engine.
    pub fn layout(&mut self, metrics: Option<&ContainerMetrics>) -> DetentLayout {
        let detents: SmallVec<[Detent; 4]> = self.detents.values().cloned().collect();
        let entries = detents
            .iter()
            .map(|detent| LayoutEntry {
                id: detent.id().clone(),
                height: self.height_for(detent, metrics),
                hidden: detent.is_hidden(),
            })
            .collect();
        let current = self.current.clone();
        let current_height = self.height_for(&current, metrics);
        let max = self.max_detent();
        let max = LayoutEntry {
            id: max.id().clone(),
            height: self.height_for(&max, metrics),
            hidden: max.is_hidden(),
        };
        DetentLayout {
            entries,
            current: current.id().clone(),
            current_height,
            max,
            container_height: metrics.map(|metrics| metrics.size.height),
        }
    }
}

#[cfg(test)]
#[path = "tests/detent_model_tests.rs"]
mod tests;
