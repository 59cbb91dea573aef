//! Structural checks over the layout graph
//!
//! Validation never fails: every detected constraint violation is reported as
//! a [`StateProblem`] value.

use crate::models::geometry::{Axis, CardinalDirection, DiagonalDirection};
use crate::models::graph::{Edge, Element, Region, TileId, TileKind, VertexRef};
use crate::models::problem::StateProblem;
use crate::models::registry::TileRegistry;
use crate::services::neighbourhood::{exterior, NeighbourhoodVariant};
use crate::GraphError;

/// True when something has been placed against or within one of the tile's
/// sides, i.e. some side's corners are no longer each other's sole neighbours.
pub fn is_divided(registry: &TileRegistry, tile: TileId) -> bool {
    Region::of_tile(tile)
        .sides()
        .any(|(side, edge)| !is_clean_side(registry, side, edge))
}

fn is_clean_side(registry: &TileRegistry, side: CardinalDirection, edge: Edge) -> bool {
    let [backward, forward] = side.axis().perpendicular().directions();
    registry.neighbours(edge.a, forward) == [edge.b] && registry.neighbours(edge.b, backward) == [edge.a]
}

/// Whether two vertices share the same coordinate on `axis`
pub fn are_aligned(registry: &TileRegistry, a: VertexRef, b: VertexRef, axis: Axis) -> bool {
    registry.location(a).get(axis) == registry.location(b).get(axis)
}

/// Problems for any addressable element
pub fn validate(registry: &TileRegistry, element: &Element) -> Vec<StateProblem> {
    match element {
        Element::Tile {
            id,
            kind: TileKind::Window,
        } => validate_window(registry, *id),
        Element::Tile { id, .. } => validate_region(registry, &Region::of_tile(*id)),
        Element::Vertex(vertex) => validate_vertex(registry, *vertex),
        Element::Edge(edge) => validate_edge(registry, edge),
        Element::Box(region) => validate_region(registry, region),
    }
}

/// An edge must be axis aligned, ordered, and its endpoints must be joined by
/// an unambiguous chain of single neighbours lying on the edge.
pub fn validate_edge(registry: &TileRegistry, edge: &Edge) -> Vec<StateProblem> {
    let mut problems = Vec::new();
    let a = registry.location(edge.a);
    let b = registry.location(edge.b);

    if a.horizontal != b.horizontal && a.vertical != b.vertical {
        problems.push(StateProblem::NotAxisAligned { edge: *edge });
    }
    for axis in Axis::ALL {
        if a.get(axis) > b.get(axis) {
            problems.push(StateProblem::OutOfOrder { edge: *edge, axis });
        }
    }
    if !problems.is_empty() {
        return problems;
    }

    let Some(axis) = edge.axis(registry) else {
        problems.push(StateProblem::NotAxisAligned { edge: *edge });
        return problems;
    };
    let forward = axis.positive();
    let step_limit = 4 * registry.len();

    let mut current = edge.a;
    let mut steps = 0;
    while current != edge.b {
        let options = registry.neighbours(current, forward);
        if options.len() != 1 || steps > step_limit {
            problems.push(StateProblem::BrokenEdge { edge: *edge });
            break;
        }
        current = options[0];
        steps += 1;
    }
    problems
}

pub fn validate_region(registry: &TileRegistry, region: &Region) -> Vec<StateProblem> {
    region
        .sides()
        .flat_map(|(_, edge)| validate_edge(registry, &edge))
        .collect()
}

/// Windows additionally need clean sides and a neighbour in every direction
/// at every corner.
pub fn validate_window(registry: &TileRegistry, window: TileId) -> Vec<StateProblem> {
    let region = Region::of_tile(window);
    let mut problems = validate_region(registry, &region);

    for (side, edge) in region.sides() {
        if !is_clean_side(registry, side, edge) {
            problems.push(StateProblem::BrokenEdge { edge });
        }
    }
    for role in DiagonalDirection::ALL {
        problems.extend(validate_vertex(registry, region.corner(role)));
    }
    problems
}

/// Non-sentinel vertices need at least one neighbour in every direction
pub fn validate_vertex(registry: &TileRegistry, vertex: VertexRef) -> Vec<StateProblem> {
    if registry.is_sentinel(vertex) {
        return Vec::new();
    }
    CardinalDirection::ALL
        .into_iter()
        .filter(|direction| registry.neighbours(vertex, *direction).is_empty())
        .map(|direction| StateProblem::NeighbourAbsence { vertex, direction })
        .collect()
}

/// True when the region is a true bounding rectangle of whatever it contains:
/// it validates cleanly and each corner plays the same role in its owning tile.
pub fn covers_contents(registry: &TileRegistry, region: &Region) -> bool {
    validate_region(registry, region).is_empty()
        && region.corners.iter().all(|(role, vertex)| vertex.role == role)
}

/// Reports neighbouring windows whose facing side is closer than `margin`
pub fn check_spacing(
    registry: &TileRegistry,
    tile: TileId,
    margin: i32,
) -> Result<Vec<StateProblem>, GraphError> {
    let region = Region::of_tile(tile);
    let mut problems = Vec::new();

    for (side, edge) in region.sides() {
        let axis = side.axis();
        for neighbour in exterior(registry, tile, side, NeighbourhoodVariant::Narrow)? {
            if registry.kind(neighbour) != TileKind::Window {
                continue;
            }
            let facing = Region::of_tile(neighbour).side(side.opposite());
            let actual = if side.is_positive() {
                registry.location(facing.a).get(axis) - registry.location(edge.a).get(axis)
            } else {
                registry.location(edge.a).get(axis) - registry.location(facing.a).get(axis)
            };
            if actual < margin {
                problems.push(StateProblem::InsufficientDistance {
                    vertex: edge.a,
                    other: facing.a,
                    axis,
                    expected: margin,
                    actual,
                });
            }
        }
    }
    Ok(problems)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::models::geometry::Vector;
    use crate::services::manipulation::{fill, split};
    use crate::services::test_support::filled_canvas;

    #[test]
    fn test_fill_divides_canvas() {
        let mut registry = TileRegistry::new();
        let canvas = registry
            .create_tile_at(TileKind::Canvas, Vector::new(0, 0), Vector::new(100, 100), None)
            .unwrap();
        assert!(!is_divided(&registry, canvas));

        let window = fill(&mut registry, canvas).unwrap();
        assert!(is_divided(&registry, canvas));
        assert!(!is_divided(&registry, window));
    }

    #[test]
    fn test_fresh_window_validates() {
        let (registry, canvas, window) = filled_canvas();

        assert!(validate_window(&registry, window).is_empty());
        assert!(validate(&registry, &Element::Tile { id: window, kind: TileKind::Window }).is_empty());
        assert!(validate_vertex(&registry, VertexRef::new(canvas, DiagonalDirection::NorthWest)).is_empty());
        assert!(covers_contents(&registry, &Region::of_tile(window)));
    }

    #[test]
    fn test_edge_problems() {
        let (registry, _, window) = filled_canvas();
        let nw = VertexRef::new(window, DiagonalDirection::NorthWest);
        let ne = VertexRef::new(window, DiagonalDirection::NorthEast);
        let se = VertexRef::new(window, DiagonalDirection::SouthEast);

        assert!(validate_edge(&registry, &Edge::new(nw, ne)).is_empty());
        assert_eq!(
            validate_edge(&registry, &Edge::new(ne, nw)),
            vec![StateProblem::OutOfOrder {
                edge: Edge::new(ne, nw),
                axis: Axis::Horizontal
            }]
        );
        assert!(validate_edge(&registry, &Edge::new(nw, se))
            .contains(&StateProblem::NotAxisAligned { edge: Edge::new(nw, se) }));
    }

    #[test]
    fn test_edge_between_unconnected_canvases_is_broken() {
        let mut registry = TileRegistry::new();
        let first = registry
            .create_tile_at(TileKind::Canvas, Vector::new(0, 0), Vector::new(100, 100), None)
            .unwrap();
        let second = registry
            .create_tile_at(TileKind::Canvas, Vector::new(200, 0), Vector::new(100, 100), None)
            .unwrap();

        let edge = Edge::new(
            VertexRef::new(first, DiagonalDirection::NorthEast),
            VertexRef::new(second, DiagonalDirection::NorthWest),
        );
        assert_eq!(validate_edge(&registry, &edge), vec![StateProblem::BrokenEdge { edge }]);
    }

    #[test]
    fn test_virtual_edge_across_split_windows() {
        let (mut registry, _, left) = filled_canvas();
        let (right, _) =
            split(&mut registry, left, CardinalDirection::East, &Settings::with_margin(10)).unwrap();

        let edge = Edge::new(
            VertexRef::new(left, DiagonalDirection::NorthWest),
            VertexRef::new(right, DiagonalDirection::NorthEast),
        );
        assert_eq!(edge.axis(&registry), Some(Axis::Horizontal));
        assert!(validate_edge(&registry, &edge).is_empty());
    }

    #[test]
    fn test_covers_contents_rejects_partial_regions() {
        let (mut registry, _, left) = filled_canvas();
        let (right, _) = split(&mut registry, left, CardinalDirection::East, &Settings::default()).unwrap();

        let pair = Region::new(crate::models::geometry::DiagonalMap {
            north_west: VertexRef::new(left, DiagonalDirection::NorthWest),
            north_east: VertexRef::new(right, DiagonalDirection::NorthEast),
            south_east: VertexRef::new(right, DiagonalDirection::SouthEast),
            south_west: VertexRef::new(left, DiagonalDirection::SouthWest),
        });
        assert!(covers_contents(&registry, &pair));

        let half = Region::new(crate::models::geometry::DiagonalMap {
            north_west: VertexRef::new(left, DiagonalDirection::NorthWest),
            north_east: VertexRef::new(left, DiagonalDirection::NorthEast),
            south_east: VertexRef::new(right, DiagonalDirection::SouthWest),
            south_west: VertexRef::new(left, DiagonalDirection::SouthWest),
        });
        assert!(!covers_contents(&registry, &half));
    }

    #[test]
    fn test_spacing_of_window_beside_a_t_junction() {
        let (mut registry, _, left) = filled_canvas();
        let settings = Settings::default();
        let (top, _) = split(&mut registry, left, CardinalDirection::East, &settings).unwrap();
        let (middle, _) = split(&mut registry, top, CardinalDirection::South, &settings).unwrap();
        let (bottom, _) = split(&mut registry, middle, CardinalDirection::South, &settings).unwrap();

        assert_eq!(check_spacing(&registry, bottom, 0), Ok(Vec::new()));
        let problems = check_spacing(&registry, bottom, 5).unwrap();
        assert_eq!(problems.len(), 2);
        assert!(problems
            .iter()
            .all(|problem| matches!(problem, StateProblem::InsufficientDistance { actual: 0, .. })));
    }

    #[test]
    fn test_spacing_reports_close_neighbours() {
        let (mut registry, _, left) = filled_canvas();
        let (right, _) = split(&mut registry, left, CardinalDirection::East, &Settings::with_margin(10)).unwrap();

        assert!(check_spacing(&registry, left, 10).unwrap().is_empty());

        let problems = check_spacing(&registry, left, 30).unwrap();
        assert_eq!(
            problems,
            vec![StateProblem::InsufficientDistance {
                vertex: VertexRef::new(left, DiagonalDirection::NorthEast),
                other: VertexRef::new(right, DiagonalDirection::NorthWest),
                axis: Axis::Horizontal,
                expected: 30,
                actual: 10,
            }]
        );
    }
}
