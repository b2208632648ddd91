use placemap_core::{
    GeoRect, MapConfig, RecordingSurface, RequestFailure, SearchRequest, SearchResponse,
    SearchScope, SearchTransport, SearchView, SurfaceOp, ViewAction,
};
use serde_json::json;
use std::collections::VecDeque;

fn viewport() -> GeoRect {
    GeoRect {
        south: 48.80,
        west: 2.25,
        north: 48.90,
        east: 2.42,
    }
}

fn hit(id: &str, lat: f64, lon: f64) -> serde_json::Value {
    json!({
        "meta": { "id": id },
        "where": { "lat": lat, "lon": lon },
        "name": format!("Place {id}"),
        "way": "1 rue de Rivoli",
        "zipcode": "75001",
        "town": "Paris",
        "rubrics": [ { "rubricLabel": "Cafe" } ]
    })
}

fn response(hits: Vec<serde_json::Value>) -> SearchResponse {
    serde_json::from_value(json!({
        "total": hits.len(),
        "took": 3,
        "results": hits
    }))
    .unwrap()
}

fn view() -> SearchView<RecordingSurface> {
    SearchView::new(
        MapConfig::default(),
        RecordingSurface::with_viewport(viewport()),
    )
}

/// Transport that replays canned replies and records requests.
struct ScriptedTransport {
    replies: VecDeque<Result<SearchResponse, RequestFailure>>,
    sent: Vec<SearchRequest>,
}

impl ScriptedTransport {
    fn new(replies: Vec<Result<SearchResponse, RequestFailure>>) -> Self {
        Self {
            replies: replies.into(),
            sent: Vec::new(),
        }
    }
}

impl SearchTransport for ScriptedTransport {
    fn send(&mut self, request: &SearchRequest) -> Result<SearchResponse, RequestFailure> {
        self.sent.push(request.clone());
        self.replies
            .pop_front()
            .unwrap_or_else(|| Err(RequestFailure::new(0, "no scripted reply")))
    }
}

#[test]
fn within_request_uses_viewport_and_query() {
    let mut view = view();
    view.set_query("  pizza ");

    let request = view.search_within_request();
    assert_eq!(request.scope, SearchScope::Within(viewport()));
    assert_eq!(request.query_text(), Some("pizza"));
    assert_eq!(request.path, "/1/search/resto");
}

#[test]
fn within_request_without_viewport_falls_back_to_anywhere() {
    let view = SearchView::new(MapConfig::default(), RecordingSurface::new());
    assert_eq!(view.search_within_request().scope, SearchScope::Anywhere);
}

#[test]
fn empty_within_result_requests_anywhere_and_keeps_markers() {
    let mut view = view();
    view.on_search_within_ok(response(vec![hit("a", 48.85, 2.35), hit("b", 48.86, 2.36)]));
    view.surface_mut().take_ops();

    let action = view.on_search_within_ok(response(vec![]));

    match action {
        ViewAction::SearchAnywhere(request) => {
            assert_eq!(request.scope, SearchScope::Anywhere);
            assert_eq!(request.query_text(), Some("*"));
        }
        other => panic!("unexpected action: {other:?}"),
    }
    assert_eq!(view.markers().len(), 2);
    assert!(view.surface().ops().is_empty());
}

#[test]
fn within_result_does_not_move_viewport() {
    let mut view = view();
    let action = view.on_search_within_ok(response(vec![
        hit("a", 48.85, 2.35),
        hit("b", 48.86, 2.36),
    ]));

    assert_eq!(
        action,
        ViewAction::Displayed {
            shown: 2,
            detail: None
        }
    );
    assert!(!view
        .surface()
        .ops()
        .iter()
        .any(|op| matches!(op, SurfaceOp::FitBounds(_))));
    assert_eq!(view.open_popup(), None);
}

#[test]
fn anywhere_result_fits_bounds_to_markers() {
    let mut view = view();
    view.on_search_anywhere_ok(response(vec![
        hit("a", 43.30, 5.37),
        hit("b", 45.76, 4.83),
    ]));

    let fit = view
        .surface()
        .ops()
        .iter()
        .find_map(|op| match op {
            SurfaceOp::FitBounds(rect) => Some(*rect),
            _ => None,
        })
        .expect("viewport should move");
    assert_eq!(fit.south, 43.30);
    assert_eq!(fit.north, 45.76);
    assert_eq!(fit.west, 4.83);
    assert_eq!(fit.east, 5.37);
}

#[test]
fn empty_anywhere_result_clears_markers_without_moving_viewport() {
    let mut view = view();
    view.on_search_anywhere_ok(response(vec![hit("a", 48.85, 2.35)]));
    view.surface_mut().take_ops();

    let action = view.on_search_anywhere_ok(response(vec![]));

    assert_eq!(
        action,
        ViewAction::Displayed {
            shown: 0,
            detail: None
        }
    );
    assert!(view.markers().is_empty());
    assert_eq!(view.open_popup(), None);
    assert_eq!(view.surface().count_destroys(), 1);
    assert!(!view
        .surface()
        .ops()
        .iter()
        .any(|op| matches!(op, SurfaceOp::FitBounds(_))));
}

#[test]
fn single_result_opens_its_detail() {
    let mut view = view();
    let action = view.on_search_within_ok(response(vec![hit("solo", 48.85, 2.35)]));

    let ViewAction::Displayed { shown, detail } = action else {
        panic!("expected displayed action");
    };
    assert_eq!(shown, 1);
    let detail = detail.expect("single result should open");
    assert_eq!(detail.id.as_str(), "solo");
    assert_eq!(detail.title, "Place solo");
    assert_eq!(detail.category.as_deref(), Some("Cafe"));
    assert_eq!(detail.address, "1 rue de Rivoli 75001 Paris");
    assert_eq!(detail.url, None);
    assert_eq!(view.open_popup().map(|id| id.as_str()), Some("solo"));
}

#[test]
fn within_page_of_malformed_hits_clears_markers_without_fallback() {
    let mut view = view();
    view.on_search_within_ok(response(vec![hit("a", 48.85, 2.35)]));
    view.surface_mut().take_ops();

    let action = view.on_search_within_ok(response(vec![
        json!({ "meta": {}, "where": { "lat": 48.85, "lon": 2.35 } }),
        json!({ "meta": { "id": "half" }, "where": { "lat": 48.85 } }),
    ]));

    assert_eq!(
        action,
        ViewAction::Displayed {
            shown: 0,
            detail: None
        }
    );
    assert!(view.markers().is_empty());
    assert_eq!(view.open_popup(), None);
    assert_eq!(view.surface().count_destroys(), 1);
}

#[test]
fn single_survivor_of_larger_page_does_not_auto_open() {
    let mut view = view();
    let action = view.on_search_anywhere_ok(response(vec![
        hit("kept", 48.85, 2.35),
        json!({ "meta": { "id": "broken" }, "where": { "lat": "north", "lon": 2.0 } }),
    ]));

    assert_eq!(
        action,
        ViewAction::Displayed {
            shown: 1,
            detail: None
        }
    );
    assert!(view.markers().contains("kept"));
    assert_eq!(view.open_popup(), None);
}

#[test]
fn marker_click_switches_popup_and_reads_current_record() {
    let mut view = view();
    view.on_search_within_ok(response(vec![hit("a", 48.85, 2.35), hit("b", 48.86, 2.36)]));

    assert_eq!(view.on_marker_click("a").unwrap().title, "Place a");
    let detail = view.on_marker_click("b").unwrap();
    assert_eq!(detail.title, "Place b");
    assert_eq!(view.open_popup().map(|id| id.as_str()), Some("b"));

    let mut renamed = hit("b", 48.86, 2.36);
    renamed["name"] = json!("Renamed b");
    view.on_search_within_ok(response(vec![hit("a", 48.85, 2.35), renamed]));
    assert_eq!(view.open_detail().unwrap().title, "Renamed b");

    assert_eq!(view.on_marker_click("missing"), None);
    assert_eq!(view.open_popup(), None);
}

#[test]
fn popup_closes_when_its_marker_disappears() {
    let mut view = view();
    view.on_search_within_ok(response(vec![hit("a", 48.85, 2.35), hit("b", 48.86, 2.36)]));
    view.on_marker_click("a");

    view.on_search_within_ok(response(vec![hit("b", 48.86, 2.36), hit("c", 48.87, 2.37)]));

    assert_eq!(view.open_popup(), None);
    assert_eq!(view.open_detail(), None);
}

#[test]
fn run_search_falls_back_to_anywhere_on_empty_viewport() {
    let mut view = view();
    view.set_query("louvre");
    let mut transport = ScriptedTransport::new(vec![
        Ok(response(vec![])),
        Ok(response(vec![hit("louvre", 48.8606, 2.3376)])),
    ]);

    let action = view.run_search(&mut transport).unwrap();

    assert_eq!(transport.sent.len(), 2);
    assert!(matches!(transport.sent[0].scope, SearchScope::Within(_)));
    assert_eq!(transport.sent[1].scope, SearchScope::Anywhere);
    assert_eq!(transport.sent[1].query_text(), Some("louvre"));
    let ViewAction::Displayed { shown, detail } = action else {
        panic!("expected displayed action");
    };
    assert_eq!(shown, 1);
    assert_eq!(detail.unwrap().id.as_str(), "louvre");
    assert!(view
        .surface()
        .ops()
        .iter()
        .any(|op| matches!(op, SurfaceOp::FitBounds(_))));
}

#[test]
fn run_search_reports_failure_message_without_retry() {
    let mut view = view();
    let failure = RequestFailure::new(403, "Forbidden")
        .with_body(json!({ "error": { "message": "backend is locked" } }));
    let mut transport = ScriptedTransport::new(vec![Err(failure)]);

    let message = view.run_search(&mut transport).unwrap_err();

    assert_eq!(message, "=> Error: 403 Forbidden: backend is locked");
    assert_eq!(transport.sent.len(), 1);
    assert!(view.markers().is_empty());
}
