//! Rendering-surface seam.
//!
//! # Responsibility
//! - Define the primitives the map widget must expose to sync and view code.
//! - Ship an in-memory recording surface for replay tooling and tests.
//!
//! # Invariants
//! - Handles are owned by the surface; callers only pass them back.
//! - A destroyed handle is never passed to the surface again.

pub mod recording;

use crate::model::bounds::GeoRect;
use crate::model::poi::{PoiId, PointOfInterest};

/// Map widget primitives consumed by `ViewSyncer` and `SearchView`.
pub trait RenderSurface {
    /// Opaque marker handle.
    type Handle;

    /// Places a new marker for `poi` and returns its handle.
    fn create(&mut self, poi: &PointOfInterest) -> Self::Handle;
    /// Refreshes an existing marker with new position/attributes in place.
    fn update(&mut self, handle: &mut Self::Handle, poi: &PointOfInterest);
    /// Removes a marker from the map.
    fn destroy(&mut self, handle: Self::Handle);
    /// Binds marker clicks to `id`; the surface reports clicks back by id.
    fn add_click_listener(&mut self, handle: &Self::Handle, id: &PoiId);
    /// Currently visible region, if the map has been laid out.
    fn viewport(&self) -> Option<GeoRect>;
    /// Moves the viewport to cover `rect`.
    fn fit_bounds(&mut self, rect: GeoRect);
}
