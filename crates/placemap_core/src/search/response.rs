//! Search response decoding.

use crate::model::poi::{Attributes, GeoPoint, ModelError, PoiId, PointOfInterest};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Attribute name filled from the first rubric label.
pub const CATEGORY_ATTRIBUTE: &str = "category";

/// Search endpoint body: `{ total, took, results }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub total: u64,
    /// Server-side search time in milliseconds.
    #[serde(default)]
    pub took: u64,
    #[serde(default)]
    pub results: Vec<SearchHit>,
}

/// One raw search hit.
///
/// `meta` and `where` are kept as raw JSON so a single malformed hit never
/// fails the whole page; their shape is checked in `to_poi`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub meta: Map<String, Value>,
    #[serde(rename = "where", default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Value>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Why a hit could not become a point of interest.
#[derive(Debug, Clone, PartialEq)]
pub enum HitError {
    /// `meta.id` is absent or neither a string nor a number.
    MissingId,
    MissingPosition(String),
    /// `where` is present but lacks numeric `lat` and `lon`.
    MalformedPosition(String),
    Model(ModelError),
}

impl Display for HitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingId => write!(f, "search hit has no usable meta.id"),
            Self::MissingPosition(id) => write!(f, "search hit `{id}` has no position"),
            Self::MalformedPosition(id) => {
                write!(f, "search hit `{id}` position needs numeric lat and lon")
            }
            Self::Model(err) => write!(f, "{err}"),
        }
    }
}

impl Error for HitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Model(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ModelError> for HitError {
    fn from(value: ModelError) -> Self {
        Self::Model(value)
    }
}

impl SearchHit {
    /// Raw `meta.id`; numeric ids are taken in their decimal string form.
    pub fn raw_id(&self) -> Option<String> {
        match self.meta.get("id")? {
            Value::String(text) => Some(text.clone()),
            Value::Number(number) => Some(number.to_string()),
            _ => None,
        }
    }

    /// Converts the hit into a validated point of interest.
    ///
    /// Scalar top-level fields become attributes (`null` stays `None`,
    /// numbers and booleans are stringified). The first `rubrics[].rubricLabel`
    /// becomes `category` unless the hit already carries one.
    pub fn to_poi(&self) -> Result<PointOfInterest, HitError> {
        let raw_id = self.raw_id().ok_or(HitError::MissingId)?;
        let id = PoiId::new(raw_id.as_str())?;
        let location = self
            .location
            .as_ref()
            .ok_or_else(|| HitError::MissingPosition(raw_id.clone()))?;
        let (Some(lat), Some(lon)) = (
            location.get("lat").and_then(Value::as_f64),
            location.get("lon").and_then(Value::as_f64),
        ) else {
            return Err(HitError::MalformedPosition(raw_id));
        };
        let position = GeoPoint::new(lat, lon)?;

        let mut attributes = Attributes::new();
        for (key, value) in &self.fields {
            let scalar = match value {
                Value::Null => None,
                Value::String(text) => Some(text.clone()),
                Value::Number(number) => Some(number.to_string()),
                Value::Bool(flag) => Some(flag.to_string()),
                Value::Array(_) | Value::Object(_) => continue,
            };
            attributes.insert(key.clone(), scalar);
        }
        if !attributes.contains_key(CATEGORY_ATTRIBUTE) {
            if let Some(label) = self.first_rubric_label() {
                attributes.insert(CATEGORY_ATTRIBUTE.to_string(), Some(label.to_string()));
            }
        }

        Ok(PointOfInterest {
            id,
            position,
            attributes,
        })
    }

    fn first_rubric_label(&self) -> Option<&str> {
        self.fields
            .get("rubrics")?
            .as_array()?
            .first()?
            .get("rubricLabel")?
            .as_str()
    }
}

impl SearchResponse {
    /// Decodes a raw JSON body.
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Valid points of interest in result order; malformed hits are skipped.
    pub fn points_of_interest(&self) -> Vec<PointOfInterest> {
        self.results
            .iter()
            .filter_map(|hit| match hit.to_poi() {
                Ok(poi) => Some(poi),
                Err(err) => {
                    warn!(
                        "event=search_hit_skipped module=search status=error reason={}",
                        err
                    );
                    None
                }
            })
            .collect()
    }
}
