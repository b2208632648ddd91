//! Core logic for the placemap search widget.
//! This crate is the single source of truth for marker and session invariants.

pub mod config;
pub mod logging;
pub mod model;
pub mod search;
pub mod service;
pub mod session;
pub mod surface;
pub mod sync;

pub use config::{ConfigError, MapConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::bounds::{Bounds, GeoRect};
pub use model::poi::{Attributes, GeoPoint, ModelError, PoiId, PointOfInterest};
pub use search::failure::RequestFailure;
pub use search::request::{SearchRequest, SearchScope};
pub use search::response::{HitError, SearchHit, SearchResponse};
pub use search::SearchTransport;
pub use service::search_view::{PoiDetail, SearchView, ViewAction};
pub use session::{
    Credentials, MemorySessionStore, Session, SessionError, SessionStore, LOGIN_LABEL,
    LOGOUT_LABEL,
};
pub use surface::recording::{MarkerHandle, RecordingSurface, SurfaceOp};
pub use surface::RenderSurface;
pub use sync::view_syncer::{MarkerEntry, MarkerSet, ReconcileStats, Reconciliation, ViewSyncer};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
