//! Map search view controller.
//!
//! # Responsibility
//! - Own the surface, the displayed marker set, the query text and popup state.
//! - Build search requests and apply their completions in arrival order.
//!
//! # Invariants
//! - Every handler takes `&mut self`; completions are applied one at a time.
//! - An open popup always refers to a displayed marker.
//! - The viewport only moves after a non-empty unbounded search.

use crate::config::MapConfig;
use crate::model::bounds::Bounds;
use crate::model::poi::{PoiId, PointOfInterest};
use crate::search::failure::RequestFailure;
use crate::search::request::{SearchRequest, SearchScope};
use crate::search::response::{SearchResponse, CATEGORY_ATTRIBUTE};
use crate::search::SearchTransport;
use crate::surface::RenderSurface;
use crate::sync::view_syncer::{MarkerSet, ViewSyncer};
use log::{error, info};

/// Popup content for one point of interest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoiDetail {
    pub id: PoiId,
    /// `name` attribute, falling back to the id.
    pub title: String,
    pub category: Option<String>,
    /// `way zipcode town`, skipping missing parts.
    pub address: String,
    pub url: Option<String>,
    pub illustration: Option<String>,
}

impl PoiDetail {
    pub fn from_poi(poi: &PointOfInterest) -> Self {
        let address = ["way", "zipcode", "town"]
            .iter()
            .filter_map(|key| poi.attribute(key))
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        Self {
            id: poi.id.clone(),
            title: poi
                .attribute("name")
                .map(ToString::to_string)
                .unwrap_or_else(|| poi.id.to_string()),
            category: poi.attribute(CATEGORY_ATTRIBUTE).map(ToString::to_string),
            address,
            url: poi.attribute("url").map(ToString::to_string),
            illustration: poi.attribute("illustration").map(ToString::to_string),
        }
    }
}

/// What the caller should do after a completion handler returns.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewAction {
    /// The bounded search came back empty; issue this unbounded one next.
    SearchAnywhere(SearchRequest),
    /// Markers were reconciled. `detail` is set when the page held exactly
    /// one hit, it was shown, and its popup was opened.
    Displayed {
        shown: usize,
        detail: Option<PoiDetail>,
    },
}

/// Owner of all map-search page state.
pub struct SearchView<S: RenderSurface> {
    config: MapConfig,
    surface: S,
    markers: MarkerSet<S::Handle>,
    syncer: ViewSyncer,
    query: String,
    open_popup: Option<PoiId>,
}

impl<S: RenderSurface> SearchView<S> {
    pub fn new(config: MapConfig, surface: S) -> Self {
        Self {
            config,
            surface,
            markers: MarkerSet::new(),
            syncer: ViewSyncer::new(),
            query: String::new(),
            open_popup: None,
        }
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn markers(&self) -> &MarkerSet<S::Handle> {
        &self.markers
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn open_popup(&self) -> Option<&PoiId> {
        self.open_popup.as_ref()
    }

    /// Viewport-bound request, or an unbounded one before the map has a viewport.
    pub fn search_within_request(&self) -> SearchRequest {
        match self.surface.viewport() {
            Some(viewport) => SearchRequest::within(
                &self.config.search_type,
                &self.query,
                viewport,
                self.config.page_size,
            ),
            None => self.search_anywhere_request(),
        }
    }

    pub fn search_anywhere_request(&self) -> SearchRequest {
        SearchRequest::anywhere(&self.config.search_type, &self.query, self.config.page_size)
    }

    /// Completion handler for a viewport-bound search.
    ///
    /// An empty result page asks for an unbounded search and leaves markers
    /// untouched. A page whose hits are all malformed is not empty: it
    /// reconciles to no markers.
    pub fn on_search_within_ok(&mut self, response: SearchResponse) -> ViewAction {
        let pois = response.points_of_interest();
        log_completion("within", &response, pois.len());
        if response.is_empty() {
            return ViewAction::SearchAnywhere(self.search_anywhere_request());
        }

        self.apply(pois);
        self.displayed_action(response.results.len())
    }

    /// Completion handler for an unbounded search.
    ///
    /// Non-empty results move the viewport to cover every marker.
    pub fn on_search_anywhere_ok(&mut self, response: SearchResponse) -> ViewAction {
        let pois = response.points_of_interest();
        log_completion("anywhere", &response, pois.len());

        let bounds = self.apply(pois);
        if let Some(rect) = bounds.rect() {
            self.surface.fit_bounds(rect);
        }
        self.displayed_action(response.results.len())
    }

    /// Failure handler. Logs and returns the message to show; nothing is retried.
    pub fn on_search_failed(&mut self, failure: &RequestFailure) -> String {
        let message = failure.user_message();
        error!(
            "event=search_failed module=service status=error http_status={} code={}",
            failure.status,
            failure.server_code().unwrap_or("none")
        );
        message
    }

    /// Click handler bound through `RenderSurface::add_click_listener`.
    ///
    /// Closes any open popup, then opens the clicked one if it is displayed.
    pub fn on_marker_click(&mut self, id: &str) -> Option<PoiDetail> {
        self.open_popup = None;
        let poi = self.markers.poi(id)?;
        let detail = PoiDetail::from_poi(poi);
        self.open_popup = Some(poi.id.clone());
        Some(detail)
    }

    pub fn close_popup(&mut self) {
        self.open_popup = None;
    }

    /// Detail for the open popup, read from the currently displayed record.
    pub fn open_detail(&self) -> Option<PoiDetail> {
        let id = self.open_popup.as_ref()?;
        self.markers.poi(id.as_str()).map(PoiDetail::from_poi)
    }

    /// Runs one search to completion: bounded first, unbounded on empty.
    ///
    /// Returns the user-facing message on failure.
    pub fn run_search<T: SearchTransport>(
        &mut self,
        transport: &mut T,
    ) -> Result<ViewAction, String> {
        let request = self.search_within_request();
        let response = self.send(transport, &request)?;
        let action = match request.scope {
            SearchScope::Within(_) => self.on_search_within_ok(response),
            SearchScope::Anywhere => self.on_search_anywhere_ok(response),
        };

        match action {
            ViewAction::SearchAnywhere(next) => {
                let response = self.send(transport, &next)?;
                Ok(self.on_search_anywhere_ok(response))
            }
            displayed => Ok(displayed),
        }
    }

    fn send<T: SearchTransport>(
        &mut self,
        transport: &mut T,
        request: &SearchRequest,
    ) -> Result<SearchResponse, String> {
        transport
            .send(request)
            .map_err(|failure| self.on_search_failed(&failure))
    }

    fn apply(&mut self, pois: Vec<PointOfInterest>) -> Bounds {
        let current = std::mem::take(&mut self.markers);
        let reconciliation = self.syncer.reconcile(&mut self.surface, current, pois);
        self.markers = reconciliation.markers;

        let popup_is_stale = self
            .open_popup
            .as_ref()
            .is_some_and(|open| !self.markers.contains(open.as_str()));
        if popup_is_stale {
            self.open_popup = None;
        }
        reconciliation.bounds
    }

    /// Auto-opens only when the page held exactly one hit and it was shown.
    fn displayed_action(&mut self, hit_count: usize) -> ViewAction {
        let shown = self.markers.len();
        let detail = if hit_count == 1 && shown == 1 {
            let only = self.markers.sorted_ids()[0].as_str().to_string();
            self.on_marker_click(&only)
        } else {
            None
        };
        ViewAction::Displayed { shown, detail }
    }
}

fn log_completion(scope: &str, response: &SearchResponse, shown: usize) {
    info!(
        "event=search_completed module=service status=ok scope={} total={} took_ms={} hits={} shown={}",
        scope,
        response.total,
        response.took,
        response.results.len(),
        shown
    );
}
