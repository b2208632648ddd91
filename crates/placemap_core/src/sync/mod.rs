//! Marker reconciliation between fetched results and the rendering surface.
//!
//! # Responsibility
//! - Own the displayed marker set and its per-id handles.
//! - Turn a fresh result list into the minimal create/update/destroy calls.
//!
//! # Invariants
//! - After reconciliation the marker set's ids equal the fetched ids exactly.
//! - Handles for ids present before and after are never recreated.
//! - No id is created twice within one reconciliation.

pub mod view_syncer;
