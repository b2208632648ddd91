//! Geo-search request/response shapes and the HTTP client seam.
//!
//! # Responsibility
//! - Build search request bodies for viewport-bound and unbounded searches.
//! - Decode search responses into validated points of interest.
//! - Format request failures for display.
//!
//! # Invariants
//! - Blank query text is always sent as the wildcard `*`.
//! - Hits without a usable id or position never reach the sync layer.

pub mod failure;
pub mod request;
pub mod response;

use failure::RequestFailure;
use request::SearchRequest;
use response::SearchResponse;

/// HTTP client collaborator.
///
/// Implementations issue `request` against the backend and return the decoded
/// body or a failure carrying status, status text and any error body. At most
/// one request is outstanding per caller; results are applied in order.
pub trait SearchTransport {
    fn send(&mut self, request: &SearchRequest) -> Result<SearchResponse, RequestFailure>;
}
