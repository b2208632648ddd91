//! Bounding rectangles over geographic positions.
//!
//! Rectangles never wrap the antimeridian: `west <= east` always holds.

use crate::model::poi::GeoPoint;
use serde::{Deserialize, Serialize};

/// Axis-aligned latitude/longitude rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoRect {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl GeoRect {
    /// Degenerate rectangle covering exactly one point.
    pub fn from_point(point: GeoPoint) -> Self {
        Self {
            south: point.lat,
            west: point.lon,
            north: point.lat,
            east: point.lon,
        }
    }

    pub fn contains(&self, point: GeoPoint) -> bool {
        point.lat >= self.south
            && point.lat <= self.north
            && point.lon >= self.west
            && point.lon <= self.east
    }

    pub fn north_east(&self) -> GeoPoint {
        GeoPoint {
            lat: self.north,
            lon: self.east,
        }
    }

    pub fn south_west(&self) -> GeoPoint {
        GeoPoint {
            lat: self.south,
            lon: self.west,
        }
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint {
            lat: (self.south + self.north) / 2.0,
            lon: (self.west + self.east) / 2.0,
        }
    }
}

/// Minimal-rectangle accumulator.
///
/// Starts empty. An empty accumulator means "do not move the viewport".
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    rect: Option<GeoRect>,
}

impl Bounds {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Grows the rectangle just enough to cover `point`.
    pub fn extend(&mut self, point: GeoPoint) {
        self.rect = Some(match self.rect {
            None => GeoRect::from_point(point),
            Some(rect) => GeoRect {
                south: rect.south.min(point.lat),
                west: rect.west.min(point.lon),
                north: rect.north.max(point.lat),
                east: rect.east.max(point.lon),
            },
        });
    }

    pub fn is_empty(&self) -> bool {
        self.rect.is_none()
    }

    pub fn rect(&self) -> Option<GeoRect> {
        self.rect
    }

    pub fn contains(&self, point: GeoPoint) -> bool {
        self.rect.is_some_and(|rect| rect.contains(point))
    }
}

impl FromIterator<GeoPoint> for Bounds {
    fn from_iter<T: IntoIterator<Item = GeoPoint>>(iter: T) -> Self {
        let mut bounds = Self::empty();
        for point in iter {
            bounds.extend(point);
        }
        bounds
    }
}
