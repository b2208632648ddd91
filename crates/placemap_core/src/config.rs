//! Map view configuration.
//!
//! # Responsibility
//! - Provide defaults for the initial viewport, zoom limits and search backend.
//! - Load and validate overrides from JSON.
//!
//! # Invariants
//! - `min_zoom <= zoom <= max_zoom`.
//! - `page_size` is in `1..=MAX_PAGE_SIZE`.
//! - `backend_id` matches the session backend id pattern.

use crate::model::poi::GeoPoint;
use crate::session::is_valid_backend_id;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DEFAULT_CENTER: GeoPoint = GeoPoint {
    lat: 48.85341,
    lon: 2.3488,
};
pub const DEFAULT_ZOOM: u8 = 11;
pub const DEFAULT_MIN_ZOOM: u8 = 10;
pub const DEFAULT_MAX_ZOOM: u8 = 16;
pub const DEFAULT_PAGE_SIZE: u32 = 100;
pub const MAX_PAGE_SIZE: u32 = 1000;
pub const DEFAULT_BACKEND_ID: &str = "examples";
pub const DEFAULT_API_DOMAIN: &str = "spacedog.io";
pub const DEFAULT_SEARCH_TYPE: &str = "resto";

/// Configuration load/validation errors.
#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config json: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Map search view settings. Every field is optional in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub center: GeoPoint,
    pub zoom: u8,
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub page_size: u32,
    pub backend_id: String,
    pub api_domain: String,
    pub search_type: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            page_size: DEFAULT_PAGE_SIZE,
            backend_id: DEFAULT_BACKEND_ID.to_string(),
            api_domain: DEFAULT_API_DOMAIN.to_string(),
            search_type: DEFAULT_SEARCH_TYPE.to_string(),
        }
    }
}

impl MapConfig {
    /// Parses and validates a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.center
            .validate()
            .map_err(|err| ConfigError::Invalid(format!("center: {err}")))?;
        if self.min_zoom > self.max_zoom {
            return Err(ConfigError::Invalid(format!(
                "min_zoom ({}) must be <= max_zoom ({})",
                self.min_zoom, self.max_zoom
            )));
        }
        if !(self.min_zoom..=self.max_zoom).contains(&self.zoom) {
            return Err(ConfigError::Invalid(format!(
                "zoom ({}) must be within [{}, {}]",
                self.zoom, self.min_zoom, self.max_zoom
            )));
        }
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::Invalid(format!(
                "page_size ({}) must be within [1, {MAX_PAGE_SIZE}]",
                self.page_size
            )));
        }
        if !is_valid_backend_id(&self.backend_id) {
            return Err(ConfigError::Invalid(format!(
                "backend_id `{}` is invalid",
                self.backend_id
            )));
        }
        if self.api_domain.trim().is_empty() {
            return Err(ConfigError::Invalid("api_domain cannot be empty".to_string()));
        }
        if self.search_type.trim().is_empty() {
            return Err(ConfigError::Invalid("search_type cannot be empty".to_string()));
        }
        Ok(())
    }

    /// `https://{backend_id}.{api_domain}`.
    pub fn backend_base_url(&self) -> String {
        format!("https://{}.{}", self.backend_id, self.api_domain.trim())
    }
}
