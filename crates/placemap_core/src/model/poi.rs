//! Point-of-interest domain model.
//!
//! # Responsibility
//! - Define the canonical record produced by search and consumed by sync.
//! - Reject malformed identities and coordinates at construction time.
//!
//! # Invariants
//! - `id` is non-blank and never reused for another point of interest.
//! - `position` is finite, with `lat` in [-90, 90] and `lon` in [-180, 180].
//! - A point of interest is immutable once fetched.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Display attributes keyed by field name. `None` mirrors a JSON `null`.
pub type Attributes = BTreeMap<String, Option<String>>;

/// Stable identifier assigned by the search backend.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PoiId(String);

impl PoiId {
    /// Creates an id, trimming surrounding whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ModelError::BlankId);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PoiId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for PoiId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PoiId {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for PoiId {
    type Error = ModelError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PoiId> for String {
    fn from(value: PoiId) -> Self {
        value.0
    }
}

/// Geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    /// Creates a validated position.
    pub fn new(lat: f64, lon: f64) -> Result<Self, ModelError> {
        let point = Self { lat, lon };
        point.validate()?;
        Ok(point)
    }

    /// Checks finiteness and coordinate ranges.
    pub fn validate(&self) -> Result<(), ModelError> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(ModelError::LatitudeOutOfRange(self.lat));
        }
        if !self.lon.is_finite() || !(-180.0..=180.0).contains(&self.lon) {
            return Err(ModelError::LongitudeOutOfRange(self.lon));
        }
        Ok(())
    }
}

/// Model validation failures.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    BlankId,
    LatitudeOutOfRange(f64),
    LongitudeOutOfRange(f64),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankId => write!(f, "point of interest id cannot be blank"),
            Self::LatitudeOutOfRange(value) => {
                write!(f, "latitude {value} is outside [-90, 90]")
            }
            Self::LongitudeOutOfRange(value) => {
                write!(f, "longitude {value} is outside [-180, 180]")
            }
        }
    }
}

impl Error for ModelError {}

/// Canonical point-of-interest record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPointOfInterest")]
pub struct PointOfInterest {
    pub id: PoiId,
    pub position: GeoPoint,
    #[serde(default)]
    pub attributes: Attributes,
}

impl PointOfInterest {
    /// Creates a point of interest without display attributes.
    pub fn new(id: PoiId, position: GeoPoint) -> Self {
        Self {
            id,
            position,
            attributes: Attributes::new(),
        }
    }

    /// Builder-style attribute setter. `None` records an explicit null.
    pub fn with_attribute(mut self, key: impl Into<String>, value: Option<&str>) -> Self {
        self.attributes
            .insert(key.into(), value.map(ToString::to_string));
        self
    }

    /// Returns a non-null attribute value.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(|value| value.as_deref())
    }
}

#[derive(Deserialize)]
struct RawPointOfInterest {
    id: PoiId,
    position: GeoPoint,
    #[serde(default)]
    attributes: Attributes,
}

impl TryFrom<RawPointOfInterest> for PointOfInterest {
    type Error = ModelError;

    fn try_from(raw: RawPointOfInterest) -> Result<Self, Self::Error> {
        raw.position.validate()?;
        Ok(Self {
            id: raw.id,
            position: raw.position,
            attributes: raw.attributes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{GeoPoint, ModelError, PoiId, PointOfInterest};

    #[test]
    fn poi_id_trims_and_rejects_blank() {
        assert_eq!(PoiId::new("  abc ").unwrap().as_str(), "abc");
        assert_eq!(PoiId::new("   ").unwrap_err(), ModelError::BlankId);
    }

    #[test]
    fn geo_point_rejects_out_of_range_and_nan() {
        assert!(GeoPoint::new(48.85, 2.35).is_ok());
        assert_eq!(
            GeoPoint::new(91.0, 0.0).unwrap_err(),
            ModelError::LatitudeOutOfRange(91.0)
        );
        assert!(matches!(
            GeoPoint::new(0.0, f64::NAN),
            Err(ModelError::LongitudeOutOfRange(_))
        ));
    }

    #[test]
    fn attribute_skips_explicit_null() {
        let id = PoiId::new("a").unwrap();
        let poi = PointOfInterest::new(id, GeoPoint::new(0.0, 0.0).unwrap())
            .with_attribute("name", Some("Chez Paul"))
            .with_attribute("url", None);

        assert_eq!(poi.attribute("name"), Some("Chez Paul"));
        assert_eq!(poi.attribute("url"), None);
        assert!(poi.attributes.contains_key("url"));
    }
}
