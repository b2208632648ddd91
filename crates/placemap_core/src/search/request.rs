//! Search request construction.

use crate::model::bounds::GeoRect;
use serde_json::{json, Value};

/// Query text used when the search box is blank.
pub const WILDCARD_QUERY: &str = "*";
/// Sort key that floats illustrated places first in viewport searches.
pub const VIEWPORT_SORT_FIELD: &str = "illustration";

/// Which search strategy produced a request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchScope {
    /// Restricted to the visible viewport.
    Within(GeoRect),
    /// No geographic filter.
    Anywhere,
}

/// One POST request against the search endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub path: String,
    pub scope: SearchScope,
    pub body: Value,
}

impl SearchRequest {
    pub const METHOD: &'static str = "POST";

    /// Viewport-bound search sorted by illustration presence.
    pub fn within(search_type: &str, query: &str, viewport: GeoRect, page_size: u32) -> Self {
        let body = json!({
            "from": 0,
            "size": page_size,
            "sort": [VIEWPORT_SORT_FIELD],
            "query": {
                "bool": {
                    "must": {
                        "query_string": { "query": normalize_query(query) }
                    },
                    "filter": {
                        "geo_bounding_box": {
                            "where": {
                                "top_left": { "lat": viewport.north, "lon": viewport.west },
                                "bottom_right": { "lat": viewport.south, "lon": viewport.east }
                            }
                        }
                    }
                }
            }
        });
        Self {
            path: search_path(search_type),
            scope: SearchScope::Within(viewport),
            body,
        }
    }

    /// Unbounded search over the whole index.
    pub fn anywhere(search_type: &str, query: &str, page_size: u32) -> Self {
        let body = json!({
            "from": 0,
            "size": page_size,
            "query": {
                "query_string": { "query": normalize_query(query) }
            }
        });
        Self {
            path: search_path(search_type),
            scope: SearchScope::Anywhere,
            body,
        }
    }

    /// Absolute URL against `base_url` (no trailing slash expected).
    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.path)
    }

    /// Effective query string carried by the body.
    pub fn query_text(&self) -> Option<&str> {
        let query = &self.body["query"];
        query["query_string"]["query"]
            .as_str()
            .or_else(|| query["bool"]["must"]["query_string"]["query"].as_str())
    }
}

/// Trims query text and substitutes the wildcard for blank input.
pub fn normalize_query(query: &str) -> String {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        WILDCARD_QUERY.to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn search_path(search_type: &str) -> String {
    format!("/1/search/{}", search_type.trim())
}
