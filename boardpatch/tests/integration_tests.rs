//! End-to-end tests: snapshot -> engine -> patch -> store

use boardpatch::geometry::schema::*;
use boardpatch::geometry::{analyze_net, GeometryIndex};
use boardpatch::prelude::*;
use boardpatch::SuggestionCache;

fn pad(number: &str, x: f64, y: f64, net: Option<u32>) -> Pad {
    Pad {
        number: number.to_string(),
        position: Point::new(x, y),
        size: Size {
            width: 1.0,
            height: 1.0,
        },
        drill: None,
        net,
    }
}

fn terminal(id: &str, x: f64, y: f64, net: u32) -> Footprint {
    Footprint {
        id: id.to_string(),
        reference: id.to_uppercase(),
        value: String::new(),
        layer: "F.Cu".to_string(),
        position: Point::new(x, y),
        rotation: 0.0,
        pads: vec![pad("1", x, y, Some(net))],
    }
}

/// Board with net N1 split across two terminals and a blocking footprint
/// between them (unconnected pads 1.7mm from center, so the exclusion
/// radius is 2mm).
fn routable_board() -> GeometrySnapshot {
    let blocker = Footprint {
        id: "fp-u2".to_string(),
        reference: "U2".to_string(),
        value: String::new(),
        layer: "F.Cu".to_string(),
        position: Point::new(5.0, 0.0),
        rotation: 0.0,
        pads: vec![pad("1", 5.0, 1.7, None), pad("2", 5.0, -1.7, None)],
    };
    GeometrySnapshot {
        artifact_id: "board-1".to_string(),
        version: 1,
        outline: vec![
            Point::new(-15.0, -15.0),
            Point::new(25.0, -15.0),
            Point::new(25.0, 15.0),
            Point::new(-15.0, 15.0),
        ],
        layers: vec![Layer {
            name: "F.Cu".to_string(),
            kind: LayerKind::Signal,
        }],
        setup: BoardSetup::default(),
        nets: vec![
            Net {
                id: 1,
                name: "N1".to_string(),
            },
            Net {
                id: 2,
                name: "N2".to_string(),
            },
        ],
        footprints: vec![
            terminal("fp-a", 0.0, 0.0, 1),
            terminal("fp-b", 10.0, 0.0, 1),
            blocker,
        ],
        tracks: vec![],
        vias: vec![],
    }
}

#[test]
fn test_route_and_apply_connects_net() {
    let board = routable_board();
    let mut store = InMemoryStore::new();
    store.insert(board.clone());

    let options = EngineOptions::default();
    let report = BoardPatchCore::route_unconnected_nets(&board, &options, None).unwrap();
    assert_eq!(report.stats.routed, 1);
    assert_eq!(report.stats.degraded, 0);
    assert_eq!(report.patches.len(), 1);

    let patch = &report.patches[0];
    assert_eq!(patch.from_version, 1);
    assert_eq!(patch.to_version, 2);
    assert!(patch
        .ops
        .iter()
        .all(|op| matches!(op, PatchOp::AddTrackSegment { .. })));

    let outcome = store.apply(patch).unwrap();
    assert_eq!(outcome, ApplyOutcome::Applied { new_version: 2 });

    let updated = store.read("board-1").unwrap();
    assert_eq!(updated.version, 2);
    assert!(!updated.tracks.is_empty());

    let index = GeometryIndex::build(&updated);
    assert!(analyze_net(&index, 1).is_fully_connected());
}

#[test]
fn test_routed_tracks_avoid_blocker() {
    let board = routable_board();
    let options = EngineOptions::default();
    let patch = BoardPatchCore::route_net(&board, 1, &options)
        .unwrap()
        .expect("net should route");

    let blocker = Point::new(5.0, 0.0);
    for op in &patch.ops {
        if let PatchOp::AddTrackSegment { track } = op {
            // Segment endpoints stay clear of the 2mm exclusion disc.
            assert!(track.start.distance_to(&blocker) >= 2.0);
            assert!(track.end.distance_to(&blocker) >= 2.0);
        }
    }
}

#[test]
fn test_stale_patch_conflicts_and_regeneration_succeeds() {
    let board = routable_board();
    let mut store = InMemoryStore::new();
    store.insert(board.clone());

    let options = EngineOptions::default();
    let patch = BoardPatchCore::route_net(&board, 1, &options)
        .unwrap()
        .expect("net should route");

    assert!(matches!(
        store.apply(&patch).unwrap(),
        ApplyOutcome::Applied { new_version: 2 }
    ));

    // The same patch is now stale.
    assert_eq!(
        store.apply(&patch).unwrap(),
        ApplyOutcome::Conflict { current_version: 2 }
    );

    // Regenerating from a fresh read yields a patch against version 2.
    let fresh = store.read("board-1").unwrap();
    let again = BoardPatchCore::route_net(&fresh, 1, &options).unwrap();
    // Net is connected now, so there is nothing left to route.
    assert!(again.is_none());
}

#[test]
fn test_placement_patch_restores_spacing() {
    let mut board = routable_board();
    board.footprints = vec![terminal("fp-a", 0.0, 0.0, 1), terminal("fp-b", 2.0, 0.0, 1)];
    let mut store = InMemoryStore::new();
    store.insert(board.clone());

    let options = EngineOptions::default();
    let patch = BoardPatchCore::optimize_placement(&board, &options)
        .unwrap()
        .expect("spacing violation should produce a patch");
    assert_eq!(patch.op_count(), 1);

    store.apply(&patch).unwrap();
    let updated = store.read("board-1").unwrap();
    let a = updated.footprints[0].position;
    let b = updated.footprints[1].position;
    assert!(a.distance_to(&b) >= options.min_spacing);
    // Moved directly away along +x: approximately (5.5, 0).
    assert!((b.x - 5.5).abs() < 1e-9);
    assert!(b.y.abs() < 1e-9);
}

#[test]
fn test_board_without_outline_yields_no_suggestions() {
    let mut board = routable_board();
    board.outline.clear();

    let options = EngineOptions::default();
    let report = BoardPatchCore::route_unconnected_nets(&board, &options, None).unwrap();
    assert!(report.patches.is_empty());
    assert_eq!(report.stats.nets_considered, 0);

    let placement = BoardPatchCore::optimize_placement(&board, &options).unwrap();
    assert!(placement.is_none());
}

#[test]
fn test_degraded_routes_dropped_by_default() {
    let mut board = routable_board();
    // Bury terminal B's pad inside a foreign exclusion zone.
    board.vias.push(Via {
        id: "v-block".to_string(),
        position: Point::new(10.0, 0.0),
        size: 8.0,
        drill: 7.0,
        layers: ("F.Cu".to_string(), "B.Cu".to_string()),
        net: Some(2),
    });

    let options = EngineOptions::default();
    let report = BoardPatchCore::route_unconnected_nets(&board, &options, None).unwrap();
    assert!(report.patches.is_empty());
    assert_eq!(report.stats.skipped, 1);

    let permissive = EngineOptions {
        include_degraded: true,
        ..EngineOptions::default()
    };
    let report = BoardPatchCore::route_unconnected_nets(&board, &permissive, None).unwrap();
    assert_eq!(report.patches.len(), 1);
    assert_eq!(report.stats.degraded, 1);
    // Degraded fallback is exactly the direct segment.
    assert_eq!(report.patches[0].op_count(), 1);
}

#[test]
fn test_net_cap_bounds_work_per_pass() {
    let mut board = routable_board();
    board.nets = (1..=4)
        .map(|id| Net {
            id,
            name: format!("N{}", id),
        })
        .collect();
    board.footprints = (1..=4)
        .flat_map(|id| {
            vec![
                terminal(&format!("fp-a{}", id), 0.0, id as f64 * 3.0, id),
                terminal(&format!("fp-b{}", id), 10.0, id as f64 * 3.0, id),
            ]
        })
        .collect();

    let options = EngineOptions {
        max_nets: 2,
        ..EngineOptions::default()
    };
    let report = BoardPatchCore::route_unconnected_nets(&board, &options, None).unwrap();
    assert_eq!(report.stats.nets_considered, 2);
    assert_eq!(report.patches.len(), 2);
    // One patch per net, never merged.
    let nets: Vec<_> = report
        .patches
        .iter()
        .flat_map(|p| p.ops.iter())
        .filter_map(|op| match op {
            PatchOp::AddTrackSegment { track } => track.net,
            _ => None,
        })
        .collect();
    assert!(nets.contains(&1));
    assert!(nets.contains(&2));
}

#[test]
fn test_suggestion_cache_reuses_patches() {
    let board = routable_board();
    let options = EngineOptions::default();
    let mut cache = SuggestionCache::new();

    let first =
        BoardPatchCore::route_unconnected_nets(&board, &options, Some(&mut cache)).unwrap();
    assert_eq!(cache.len(), 1);

    let second =
        BoardPatchCore::route_unconnected_nets(&board, &options, Some(&mut cache)).unwrap();
    // A fresh run would mint new track ids; identical patches prove the
    // cache answered.
    assert_eq!(first.patches, second.patches);
}

#[test]
fn test_engine_never_mutates_snapshot() {
    let board = routable_board();
    let before = serde_json::to_string(&board).unwrap();

    let options = EngineOptions::default();
    let _ = BoardPatchCore::route_unconnected_nets(&board, &options, None).unwrap();
    let _ = BoardPatchCore::optimize_placement(&board, &options).unwrap();

    let after = serde_json::to_string(&board).unwrap();
    assert_eq!(before, after);
}
