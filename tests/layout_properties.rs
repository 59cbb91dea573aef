//! Structural properties of layouts built through the public API
//!
//! Each test builds a layout with fills and splits, then checks the
//! invariants that every operation must preserve across the whole registry.

use tilegraph::{
    fill, is_divided, next_tile, next_undivided_tile, split, validate_edge, validate_window, Axis,
    CardinalDirection, DiagonalDirection, GraphError, Region, Settings, StateProblem, TileId,
    TileKind, TileRegistry, Vector, VertexRef,
};
use CardinalDirection::*;

/// A canvas spanning (100, 100) to (400, 400) holding one window
fn canvas_with_window() -> (TileRegistry, TileId, TileId) {
    let mut registry = TileRegistry::new();
    let canvas = registry
        .create_tile_at(
            TileKind::Canvas,
            Vector::new(100, 100),
            Vector::new(300, 300),
            None,
        )
        .unwrap();
    let window = fill(&mut registry, canvas).unwrap();
    (registry, canvas, window)
}

/// Two by two grid of windows separated by `margin`.
///
/// Returns `(registry, [top_left, top_right, bottom_left, bottom_right])`.
fn grid(margin: u32) -> (TileRegistry, [TileId; 4]) {
    let settings = Settings::with_margin(margin);
    let (mut registry, _, top_left) = canvas_with_window();
    let (top_right, _) = split(&mut registry, top_left, East, &settings).unwrap();
    let (bottom_left, _) = split(&mut registry, top_left, South, &settings).unwrap();
    let (bottom_right, _) = split(&mut registry, top_right, South, &settings).unwrap();
    (registry, [top_left, top_right, bottom_left, bottom_right])
}

/// Three columns: an unmargined split followed by a margined one
fn columns() -> (TileRegistry, [TileId; 3]) {
    let (mut registry, _, first) = canvas_with_window();
    let (second, _) = split(&mut registry, first, East, &Settings::default()).unwrap();
    let (third, _) = split(&mut registry, second, East, &Settings::with_margin(30)).unwrap();
    (registry, [first, second, third])
}

/// A full-width top window above two bottom windows
fn top_and_bottom_pair() -> TileRegistry {
    let settings = Settings::default();
    let (mut registry, _, top) = canvas_with_window();
    let (bottom, _) = split(&mut registry, top, South, &settings).unwrap();
    split(&mut registry, bottom, East, &settings).unwrap();
    registry
}

fn all_vertices(registry: &TileRegistry) -> Vec<VertexRef> {
    registry
        .tiles()
        .flat_map(|tile| DiagonalDirection::ALL.map(|role| VertexRef::new(tile.id, role)))
        .collect()
}

fn span(registry: &TileRegistry, tile: TileId, axis: Axis) -> i32 {
    let region = Region::of_tile(tile);
    registry.location(region.corner(DiagonalDirection::SouthEast)).get(axis)
        - registry.location(region.corner(DiagonalDirection::NorthWest)).get(axis)
}

/// Every single-neighbour link is answered by a link back. Two-entry lists
/// bracket a T-junction and are answered by only one of their entries.
fn assert_links_symmetric(registry: &TileRegistry) {
    for vertex in all_vertices(registry) {
        for direction in CardinalDirection::ALL {
            if let [neighbour] = registry.neighbours(vertex, direction) {
                assert!(
                    registry
                        .neighbours(*neighbour, direction.opposite())
                        .contains(&vertex),
                    "{} links {} to {} without a link back",
                    vertex,
                    direction,
                    neighbour
                );
            }
        }
    }
}

fn assert_degree_bound(registry: &TileRegistry) {
    for vertex in all_vertices(registry) {
        for direction in CardinalDirection::ALL {
            let count = registry.neighbours(vertex, direction).len();
            assert!(count <= 2, "{} has {} neighbours to the {}", vertex, count, direction);
            if count == 0 {
                assert!(
                    registry.is_sentinel(vertex),
                    "{} has no neighbour to the {}",
                    vertex,
                    direction
                );
            }
        }
    }
}

fn assert_sides_validate(registry: &TileRegistry) {
    for tile in registry.tiles() {
        for (direction, edge) in tile.region().sides() {
            let problems = validate_edge(registry, &edge);
            assert!(
                problems.is_empty(),
                "{} side {} has problems: {:?}",
                tile.id,
                direction,
                problems
            );
        }
    }
}

/// Every window validates and can be navigated from in every direction
fn assert_navigable(
    registry: &TileRegistry,
    settings: &Settings,
    history: &[(TileId, CardinalDirection)],
) {
    for window in registry.windows() {
        let problems = validate_window(registry, window.id);
        assert!(problems.is_empty(), "{} after {:?}: {:?}", window.id, history, problems);

        for direction in CardinalDirection::ALL {
            let next = next_tile(registry, window.id, direction, settings);
            assert!(
                matches!(next, Ok(Some(_))),
                "{} towards {} after {:?}: {:?}",
                window.id,
                direction,
                history,
                next
            );
            let undivided = next_undivided_tile(registry, window.id, direction, settings);
            assert!(
                undivided.is_ok(),
                "{} towards {} after {:?}: {:?}",
                window.id,
                direction,
                history,
                undivided
            );
        }
    }
}

/// Deterministic choice of split targets and directions
struct SplitPlan(u64);

impl SplitPlan {
    fn pick(&mut self, bound: usize) -> usize {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (self.0 >> 33) as usize % bound
    }
}

#[test]
fn test_links_stay_symmetric() {
    assert_links_symmetric(&canvas_with_window().0);
    assert_links_symmetric(&grid(0).0);
    assert_links_symmetric(&grid(10).0);
    assert_links_symmetric(&columns().0);
    assert_links_symmetric(&top_and_bottom_pair());
}

#[test]
fn test_neighbour_lists_stay_within_degree_bound() {
    assert_degree_bound(&canvas_with_window().0);
    assert_degree_bound(&grid(0).0);
    assert_degree_bound(&grid(10).0);
    assert_degree_bound(&columns().0);
    assert_degree_bound(&top_and_bottom_pair());
}

#[test]
fn test_every_side_validates_after_splits() {
    assert_sides_validate(&canvas_with_window().0);
    assert_sides_validate(&grid(0).0);
    assert_sides_validate(&grid(10).0);
    assert_sides_validate(&columns().0);
    assert_sides_validate(&top_and_bottom_pair());
}

#[test]
fn test_fill_keeps_shape() {
    let mut registry = TileRegistry::new();
    let canvas = registry
        .create_tile_at(TileKind::Canvas, Vector::new(-40, 15), Vector::new(640, 480), None)
        .unwrap();
    let window = fill(&mut registry, canvas).unwrap();

    for role in DiagonalDirection::ALL {
        assert_eq!(
            registry.location(VertexRef::new(window, role)),
            registry.location(VertexRef::new(canvas, role))
        );
    }
}

#[test]
fn test_divided_after_fill() {
    let mut registry = TileRegistry::new();
    let canvas = registry
        .create_tile_at(TileKind::Canvas, Vector::new(0, 0), Vector::new(50, 50), None)
        .unwrap();

    assert!(!is_divided(&registry, canvas));
    let window = fill(&mut registry, canvas).unwrap();
    assert!(is_divided(&registry, canvas));
    assert!(!is_divided(&registry, window));
    assert_eq!(fill(&mut registry, canvas), Err(GraphError::AlreadyDivided(canvas)));

    split(&mut registry, window, North, &Settings::default()).unwrap();
    assert!(is_divided(&registry, canvas));
}

#[test]
fn test_split_conserves_span() {
    for (width, margin) in [(300, 0), (300, 20), (301, 0), (301, 7), (12, 10)] {
        for direction in [East, West] {
            let mut registry = TileRegistry::new();
            let canvas = registry
                .create_tile_at(TileKind::Canvas, Vector::new(0, 0), Vector::new(width, 90), None)
                .unwrap();
            let old = fill(&mut registry, canvas).unwrap();
            let (new, problems) =
                split(&mut registry, old, direction, &Settings::with_margin(margin)).unwrap();

            assert!(problems.is_empty());
            let old_span = span(&registry, old, Axis::Horizontal);
            let new_span = span(&registry, new, Axis::Horizontal);
            let base = (width - margin as i32) / 2;
            assert_eq!(old_span + new_span, width - margin as i32);
            assert!((old_span - base).abs() <= 1);
            assert_eq!(span(&registry, new, Axis::Vertical), 90);
        }
    }
}

#[test]
fn test_reference_splitting_scenario() {
    let (registry, [first, second, third]) = columns();
    let canvas = TileId(0);
    let x = |tile: TileId, role| registry.location(VertexRef::new(tile, role)).horizontal;

    assert!(is_divided(&registry, canvas));
    assert_eq!((x(first, DiagonalDirection::NorthWest), x(first, DiagonalDirection::NorthEast)), (100, 250));
    assert_eq!((x(second, DiagonalDirection::NorthWest), x(second, DiagonalDirection::NorthEast)), (250, 310));
    assert_eq!((x(third, DiagonalDirection::NorthWest), x(third, DiagonalDirection::NorthEast)), (340, 400));
    for window in [first, second, third] {
        assert_eq!(span(&registry, window, Axis::Vertical), 300);
    }
}

#[test]
fn test_one_unit_split_is_degenerate() {
    let mut registry = TileRegistry::new();
    let canvas = registry
        .create_tile_at(TileKind::Canvas, Vector::new(5, 0), Vector::new(1, 20), None)
        .unwrap();
    let old = fill(&mut registry, canvas).unwrap();
    let (new, problems) = split(&mut registry, old, East, &Settings::default()).unwrap();

    assert_eq!(problems.len(), 1);
    assert!(matches!(problems[0], StateProblem::BoxTooSmallForMargins { .. }));
    for window in [old, new] {
        let region = Region::of_tile(window);
        assert_eq!(registry.location(region.corner(DiagonalDirection::NorthWest)).horizontal, 5);
        assert_eq!(registry.location(region.corner(DiagonalDirection::SouthEast)).horizontal, 6);
    }
}

#[test]
fn test_grid_navigation() {
    let settings = Settings::default();
    let (registry, [top_left, top_right, bottom_left, bottom_right]) = grid(10);

    assert_eq!(next_tile(&registry, top_left, East, &settings).unwrap(), Some(top_right));
    assert_eq!(next_tile(&registry, bottom_left, North, &settings).unwrap(), Some(top_left));
    assert_eq!(next_tile(&registry, bottom_right, West, &settings).unwrap(), Some(bottom_left));
    assert_eq!(next_tile(&registry, top_right, South, &settings).unwrap(), Some(bottom_right));
}

#[test]
fn test_mixed_split_sequences_keep_every_window_navigable() {
    for margin in [0, 10] {
        let settings = Settings::with_margin(margin);
        for seed in 0..40 {
            let mut plan = SplitPlan(seed);
            let mut registry = TileRegistry::new();
            let canvas = registry
                .create_tile_at(TileKind::Canvas, Vector::new(0, 0), Vector::new(1000, 1000), None)
                .unwrap();
            let mut windows = vec![fill(&mut registry, canvas).unwrap()];
            let mut history = Vec::new();

            while history.len() < 6 {
                let target = windows[plan.pick(windows.len())];
                let direction = CardinalDirection::ALL[plan.pick(4)];
                if span(&registry, target, direction.axis()) < 40 {
                    continue;
                }
                history.push((target, direction));

                let (window, problems) = split(&mut registry, target, direction, &settings)
                    .unwrap_or_else(|error| panic!("margin {} after {:?}: {}", margin, history, error));
                assert!(problems.is_empty(), "margin {} after {:?}: {:?}", margin, history, problems);
                windows.push(window);
                assert_navigable(&registry, &settings, &history);
            }
            assert_links_symmetric(&registry);
            assert_degree_bound(&registry);
        }
    }
}
