//! Domain model for map search results.
//!
//! # Responsibility
//! - Define the point-of-interest record shared by search, sync and view code.
//! - Provide the bounds accumulator used to frame a displayed marker set.
//!
//! # Invariants
//! - Every point of interest is identified by a stable, non-blank `PoiId`.
//! - Positions are finite WGS84 coordinates inside their valid ranges.

pub mod bounds;
pub mod poi;
