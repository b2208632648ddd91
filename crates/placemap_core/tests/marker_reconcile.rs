use placemap_core::{
    GeoPoint, MarkerSet, PoiId, PointOfInterest, RecordingSurface, SurfaceOp, ViewSyncer,
};
use std::collections::BTreeSet;
use uuid::Uuid;

fn poi(id: &str, lat: f64, lon: f64) -> PointOfInterest {
    PointOfInterest::new(PoiId::new(id).unwrap(), GeoPoint::new(lat, lon).unwrap())
        .with_attribute("name", Some(id))
}

fn marker_uuid(markers: &MarkerSet<placemap_core::MarkerHandle>, id: &str) -> Uuid {
    markers.handle(id).expect("marker should exist").uuid()
}

fn ids(markers: &MarkerSet<placemap_core::MarkerHandle>) -> BTreeSet<String> {
    markers
        .sorted_ids()
        .into_iter()
        .map(|id| id.to_string())
        .collect()
}

fn display(
    surface: &mut RecordingSurface,
    fetched: Vec<PointOfInterest>,
) -> MarkerSet<placemap_core::MarkerHandle> {
    let markers = ViewSyncer::new()
        .reconcile(surface, MarkerSet::new(), fetched)
        .markers;
    surface.take_ops();
    markers
}

#[test]
fn replaces_absent_ids_and_keeps_shared_handles() {
    let mut surface = RecordingSurface::new();
    let current = display(
        &mut surface,
        vec![poi("A", 48.85, 2.35), poi("B", 48.86, 2.30)],
    );
    let handle_a = marker_uuid(&current, "A");
    let handle_b = marker_uuid(&current, "B");

    let result = ViewSyncer::new().reconcile(
        &mut surface,
        current,
        vec![poi("A", 48.85, 2.35), poi("C", 48.80, 2.40)],
    );

    assert_eq!(ids(&result.markers), BTreeSet::from(["A".to_string(), "C".to_string()]));
    assert_eq!(marker_uuid(&result.markers, "A"), handle_a);
    assert_eq!(surface.count_destroys(), 1);
    assert_eq!(surface.count_creates(), 1);
    assert_eq!(surface.count_updates(), 0);
    assert!(surface
        .ops()
        .contains(&SurfaceOp::Destroy { marker: handle_b }));
    assert_eq!(result.stats.kept, 1);
    assert_eq!(result.stats.created, 1);
    assert_eq!(result.stats.destroyed, 1);
    assert_eq!(surface.live_count(), 2);
}

#[test]
fn empty_to_empty_makes_no_calls() {
    let mut surface = RecordingSurface::new();
    let result = ViewSyncer::new().reconcile(&mut surface, MarkerSet::new(), Vec::new());

    assert!(result.markers.is_empty());
    assert!(result.bounds.is_empty());
    assert!(surface.ops().is_empty());
}

#[test]
fn empty_fetch_destroys_everything_and_has_no_bounds() {
    let mut surface = RecordingSurface::new();
    let current = display(
        &mut surface,
        vec![poi("A", 1.0, 1.0), poi("B", 2.0, 2.0), poi("C", 3.0, 3.0)],
    );

    let result = ViewSyncer::new().reconcile(&mut surface, current, Vec::new());

    assert!(result.markers.is_empty());
    assert!(result.bounds.is_empty());
    assert_eq!(result.bounds.rect(), None);
    assert_eq!(surface.count_destroys(), 3);
    assert_eq!(surface.count_creates(), 0);
    assert_eq!(surface.live_count(), 0);
}

#[test]
fn initial_load_creates_every_entry_with_click_listener() {
    let mut surface = RecordingSurface::new();
    let result = ViewSyncer::new().reconcile(
        &mut surface,
        MarkerSet::new(),
        vec![poi("A", 1.0, 1.0), poi("B", 2.0, 2.0)],
    );

    assert_eq!(surface.count_creates(), 2);
    assert_eq!(result.stats.created, 2);
    for id in ["A", "B"] {
        let handle = result.markers.handle(id).unwrap();
        assert_eq!(surface.click_target(handle).map(PoiId::as_str), Some(id));
    }
}

#[test]
fn creates_follow_first_occurrence_order() {
    let mut surface = RecordingSurface::new();
    ViewSyncer::new().reconcile(
        &mut surface,
        MarkerSet::new(),
        vec![poi("Z", 1.0, 1.0), poi("A", 2.0, 2.0), poi("Z", 1.5, 1.5)],
    );

    let created = surface
        .ops()
        .iter()
        .filter_map(|op| match op {
            SurfaceOp::Create { id, .. } => Some(id.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>();
    assert_eq!(created, vec!["Z", "A"]);
}

#[test]
fn reconcile_is_idempotent_for_same_fetch() {
    let fetched = vec![poi("A", 1.0, 1.0), poi("B", 2.0, 2.0), poi("C", 3.0, 3.0)];
    let mut surface = RecordingSurface::new();
    let first = display(&mut surface, fetched.clone());
    let before = ["A", "B", "C"].map(|id| marker_uuid(&first, id));

    let second = ViewSyncer::new().reconcile(&mut surface, first, fetched);

    assert!(surface.ops().is_empty());
    assert_eq!(second.stats.kept, 3);
    let after = ["A", "B", "C"].map(|id| marker_uuid(&second.markers, id));
    assert_eq!(before, after);
}

#[test]
fn result_ids_always_equal_fetched_ids() {
    let mut surface = RecordingSurface::new();
    let rounds: Vec<Vec<&str>> = vec![
        vec!["A", "B", "C"],
        vec!["C", "D"],
        vec![],
        vec!["E"],
        vec!["E", "A", "B", "A"],
    ];

    let mut markers = MarkerSet::new();
    for (round, fetch_ids) in rounds.into_iter().enumerate() {
        let fetched = fetch_ids
            .iter()
            .map(|id| poi(id, round as f64, round as f64))
            .collect::<Vec<_>>();
        let expected = fetch_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<BTreeSet<_>>();

        markers = ViewSyncer::new()
            .reconcile(&mut surface, markers, fetched)
            .markers;

        assert_eq!(ids(&markers), expected, "round {round}");
        assert_eq!(surface.live_count(), expected.len(), "round {round}");
    }
}

#[test]
fn duplicate_ids_create_one_marker_with_last_attributes() {
    let mut surface = RecordingSurface::new();
    let first = poi("A", 1.0, 1.0).with_attribute("name", Some("first"));
    let last = poi("A", 1.0, 1.0).with_attribute("name", Some("last"));

    let result = ViewSyncer::new().reconcile(
        &mut surface,
        MarkerSet::new(),
        vec![first, poi("B", 2.0, 2.0), last],
    );

    assert_eq!(surface.count_creates(), 2);
    assert_eq!(result.stats.duplicates, 1);
    let handle = result.markers.handle("A").unwrap();
    assert_eq!(
        surface.displayed(handle).unwrap().attribute("name"),
        Some("last")
    );
}

#[test]
fn changed_attributes_update_in_place() {
    let mut surface = RecordingSurface::new();
    let current = display(&mut surface, vec![poi("A", 1.0, 1.0)]);
    let handle_a = marker_uuid(&current, "A");

    let changed = poi("A", 1.0, 1.0).with_attribute("name", Some("renamed"));
    let result = ViewSyncer::new().reconcile(
        &mut surface,
        current,
        vec![poi("A", 1.0, 1.0), changed],
    );

    assert_eq!(result.markers.len(), 1);
    assert_eq!(marker_uuid(&result.markers, "A"), handle_a);
    assert_eq!(surface.count_creates(), 0);
    assert_eq!(surface.count_destroys(), 0);
    assert_eq!(surface.count_updates(), 1);
    assert_eq!(result.stats.updated, 1);
    assert_eq!(
        result.markers.poi("A").unwrap().attribute("name"),
        Some("renamed")
    );
    let handle = result.markers.handle("A").unwrap();
    assert_eq!(
        surface.displayed(handle).unwrap().attribute("name"),
        Some("renamed")
    );
}

#[test]
fn moved_marker_updates_and_bounds_use_new_position() {
    let mut surface = RecordingSurface::new();
    let current = display(&mut surface, vec![poi("A", 1.0, 1.0), poi("B", 2.0, 2.0)]);

    let result = ViewSyncer::new().reconcile(
        &mut surface,
        current,
        vec![poi("A", 5.0, 5.0), poi("B", 2.0, 2.0)],
    );

    let rect = result.bounds.rect().unwrap();
    assert_eq!(rect.north, 5.0);
    assert_eq!(rect.east, 5.0);
    assert_eq!(rect.south, 2.0);
    assert_eq!(rect.west, 2.0);
    assert_eq!(surface.count_updates(), 1);
}

#[test]
fn bounds_are_minimal_cover_of_result() {
    let mut surface = RecordingSurface::new();
    let current = display(&mut surface, vec![poi("far", -40.0, -70.0)]);

    let fetched = vec![
        poi("A", 48.80, 2.30),
        poi("B", 48.90, 2.25),
        poi("C", 48.85, 2.42),
    ];
    let result = ViewSyncer::new().reconcile(&mut surface, current, fetched.clone());

    let rect = result.bounds.rect().unwrap();
    for entry in &fetched {
        assert!(rect.contains(entry.position));
    }
    assert_eq!(rect.south, 48.80);
    assert_eq!(rect.north, 48.90);
    assert_eq!(rect.west, 2.25);
    assert_eq!(rect.east, 2.42);
    assert!(!result.bounds.contains(GeoPoint::new(-40.0, -70.0).unwrap()));
    assert_eq!(result.markers.bounds(), result.bounds);
}
