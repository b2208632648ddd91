//! `ViewSyncer` and the marker set it maintains.
//!
//! Duplicate ids in a fetched list resolve to the last occurrence. An id
//! that is kept but whose point of interest changed is refreshed in place
//! through `RenderSurface::update`, so its handle survives.

use crate::model::bounds::Bounds;
use crate::model::poi::{PoiId, PointOfInterest};
use crate::surface::RenderSurface;
use log::debug;
use std::collections::HashMap;

/// One displayed marker and the point of interest it currently shows.
#[derive(Debug)]
pub struct MarkerEntry<H> {
    pub handle: H,
    pub poi: PointOfInterest,
}

/// Displayed markers keyed by point-of-interest id.
///
/// Mutated only by `ViewSyncer`; callers read it between reconciliations.
#[derive(Debug)]
pub struct MarkerSet<H> {
    entries: HashMap<PoiId, MarkerEntry<H>>,
}

impl<H> Default for MarkerSet<H> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<H> MarkerSet<H> {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&MarkerEntry<H>> {
        self.entries.get(id)
    }

    pub fn handle(&self, id: &str) -> Option<&H> {
        self.get(id).map(|entry| &entry.handle)
    }

    pub fn poi(&self, id: &str) -> Option<&PointOfInterest> {
        self.get(id).map(|entry| &entry.poi)
    }

    /// Displayed ids in ascending order.
    pub fn sorted_ids(&self) -> Vec<&PoiId> {
        let mut ids = self.entries.keys().collect::<Vec<_>>();
        ids.sort();
        ids
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PoiId, &MarkerEntry<H>)> {
        self.entries.iter()
    }

    /// Bounds over every displayed position.
    pub fn bounds(&self) -> Bounds {
        self.entries
            .values()
            .map(|entry| entry.poi.position)
            .collect()
    }
}

/// Per-call counters, mostly for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    pub created: usize,
    pub updated: usize,
    pub kept: usize,
    pub destroyed: usize,
    /// Fetched entries shadowed by a later entry with the same id.
    pub duplicates: usize,
}

/// Result of one reconciliation.
#[derive(Debug)]
pub struct Reconciliation<H> {
    pub markers: MarkerSet<H>,
    /// Empty when nothing is displayed; callers must then leave the viewport alone.
    pub bounds: Bounds,
    pub stats: ReconcileStats,
}

/// Reconciles displayed markers against freshly fetched points of interest.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewSyncer;

impl ViewSyncer {
    pub fn new() -> Self {
        Self
    }

    /// Makes `surface` display exactly `fetched`, reusing handles from `current`.
    ///
    /// # Contract
    /// - Runs in O(|current| + |fetched|).
    /// - Calls `destroy` once per id absent from `fetched`.
    /// - Calls `create` + `add_click_listener` once per new distinct id, in
    ///   first-occurrence order.
    /// - Calls `update` once per kept id whose point of interest changed.
    pub fn reconcile<S: RenderSurface>(
        &self,
        surface: &mut S,
        current: MarkerSet<S::Handle>,
        fetched: Vec<PointOfInterest>,
    ) -> Reconciliation<S::Handle> {
        let mut stats = ReconcileStats::default();
        let mut order: Vec<PoiId> = Vec::with_capacity(fetched.len());
        let mut pending: HashMap<PoiId, PointOfInterest> = HashMap::with_capacity(fetched.len());
        for poi in fetched {
            let id = poi.id.clone();
            match pending.insert(id.clone(), poi) {
                Some(_) => stats.duplicates += 1,
                None => order.push(id),
            }
        }

        let mut markers = MarkerSet::with_capacity(pending.len());
        let mut bounds = Bounds::empty();

        for (id, mut entry) in current.entries {
            match pending.remove(&id) {
                Some(poi) => {
                    if entry.poi != poi {
                        surface.update(&mut entry.handle, &poi);
                        entry.poi = poi;
                        stats.updated += 1;
                    } else {
                        stats.kept += 1;
                    }
                    bounds.extend(entry.poi.position);
                    markers.entries.insert(id, entry);
                }
                None => {
                    surface.destroy(entry.handle);
                    stats.destroyed += 1;
                }
            }
        }

        // Ids claimed above are gone from `pending`, so each lookup hits once at most.
        for id in order {
            let Some(poi) = pending.remove(&id) else {
                continue;
            };
            let handle = surface.create(&poi);
            surface.add_click_listener(&handle, &id);
            bounds.extend(poi.position);
            markers.entries.insert(id, MarkerEntry { handle, poi });
            stats.created += 1;
        }

        debug!(
            "event=markers_reconciled module=sync status=ok created={} updated={} kept={} destroyed={} duplicates={} displayed={}",
            stats.created,
            stats.updated,
            stats.kept,
            stats.destroyed,
            stats.duplicates,
            markers.len()
        );

        Reconciliation {
            markers,
            bounds,
            stats,
        }
    }
}
