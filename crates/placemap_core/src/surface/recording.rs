//! In-memory surface that records every call it receives.

use crate::model::bounds::GeoRect;
use crate::model::poi::{PoiId, PointOfInterest};
use crate::surface::RenderSurface;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Marker handle issued by `RecordingSurface`.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct MarkerHandle(Uuid);

impl MarkerHandle {
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    Create { id: PoiId, marker: Uuid },
    Update { id: PoiId, marker: Uuid },
    Destroy { marker: Uuid },
    ClickListener { id: PoiId, marker: Uuid },
    FitBounds(GeoRect),
}

impl Display for SurfaceOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Create { id, marker } => write!(f, "create id={id} marker={marker}"),
            Self::Update { id, marker } => write!(f, "update id={id} marker={marker}"),
            Self::Destroy { marker } => write!(f, "destroy marker={marker}"),
            Self::ClickListener { id, marker } => {
                write!(f, "listen id={id} marker={marker}")
            }
            Self::FitBounds(rect) => write!(
                f,
                "fit_bounds south={} west={} north={} east={}",
                rect.south, rect.west, rect.north, rect.east
            ),
        }
    }
}

/// Surface double that tracks live markers and the call log.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    viewport: Option<GeoRect>,
    live: BTreeMap<Uuid, PointOfInterest>,
    listeners: BTreeMap<Uuid, PoiId>,
    ops: Vec<SurfaceOp>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_viewport(viewport: GeoRect) -> Self {
        Self {
            viewport: Some(viewport),
            ..Self::default()
        }
    }

    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Drains the call log, leaving live marker state intact.
    pub fn take_ops(&mut self) -> Vec<SurfaceOp> {
        std::mem::take(&mut self.ops)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Point of interest currently drawn by `handle`.
    pub fn displayed(&self, handle: &MarkerHandle) -> Option<&PointOfInterest> {
        self.live.get(&handle.0)
    }

    /// Id bound to `handle`'s click listener.
    pub fn click_target(&self, handle: &MarkerHandle) -> Option<&PoiId> {
        self.listeners.get(&handle.0)
    }

    pub fn count_creates(&self) -> usize {
        self.count(|op| matches!(op, SurfaceOp::Create { .. }))
    }

    pub fn count_updates(&self) -> usize {
        self.count(|op| matches!(op, SurfaceOp::Update { .. }))
    }

    pub fn count_destroys(&self) -> usize {
        self.count(|op| matches!(op, SurfaceOp::Destroy { .. }))
    }

    fn count(&self, predicate: impl Fn(&SurfaceOp) -> bool) -> usize {
        self.ops.iter().filter(|op| predicate(op)).count()
    }
}

impl RenderSurface for RecordingSurface {
    type Handle = MarkerHandle;

    fn create(&mut self, poi: &PointOfInterest) -> MarkerHandle {
        let marker = Uuid::new_v4();
        self.live.insert(marker, poi.clone());
        self.ops.push(SurfaceOp::Create {
            id: poi.id.clone(),
            marker,
        });
        MarkerHandle(marker)
    }

    fn update(&mut self, handle: &mut MarkerHandle, poi: &PointOfInterest) {
        self.live.insert(handle.0, poi.clone());
        self.ops.push(SurfaceOp::Update {
            id: poi.id.clone(),
            marker: handle.0,
        });
    }

    fn destroy(&mut self, handle: MarkerHandle) {
        self.live.remove(&handle.0);
        self.listeners.remove(&handle.0);
        self.ops.push(SurfaceOp::Destroy { marker: handle.0 });
    }

    fn add_click_listener(&mut self, handle: &MarkerHandle, id: &PoiId) {
        self.listeners.insert(handle.0, id.clone());
        self.ops.push(SurfaceOp::ClickListener {
            id: id.clone(),
            marker: handle.0,
        });
    }

    fn viewport(&self) -> Option<GeoRect> {
        self.viewport
    }

    fn fit_bounds(&mut self, rect: GeoRect) {
        self.viewport = Some(rect);
        self.ops.push(SurfaceOp::FitBounds(rect));
    }
}
