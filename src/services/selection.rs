//! Selection helpers for growing a selection across tiles

use crate::models::geometry::CardinalDirection;
use crate::models::graph::{Edge, VertexRef};
use crate::models::registry::TileRegistry;
use crate::services::examination::{are_aligned, validate_edge};
use tracing::trace;

/// Farthest edge parallel to `edge` reachable by moving its endpoints towards
/// `direction`.
///
/// Each endpoint follows its straight line of single, non-sentinel neighbours
/// as far as it goes. The two lines are then unwound from the far end until
/// their heads line up and form a structurally valid edge. `None` means the
/// search fell back to the tiles the endpoints started on.
pub fn find_parallel_end(
    registry: &TileRegistry,
    edge: Edge,
    direction: CardinalDirection,
) -> Option<Edge> {
    let axis = direction.axis();
    let mut stack_a = straight_line(registry, edge.a, direction);
    let mut stack_b = straight_line(registry, edge.b, direction);

    while stack_a.len() > 2 && stack_b.len() > 2 {
        let (a, b) = (*stack_a.last()?, *stack_b.last()?);

        if are_aligned(registry, a, b, axis) {
            let candidate = Edge::new(a, b);
            if validate_edge(registry, &candidate).is_empty() {
                trace!(edge = %edge, direction = %direction, found = %candidate, "found parallel end");
                return Some(candidate);
            }
            stack_a.pop();
            stack_b.pop();
        } else if direction.is_positive()
            == (registry.location(a).get(axis) > registry.location(b).get(axis))
        {
            stack_a.pop();
        } else {
            stack_b.pop();
        }
    }
    None
}

fn straight_line(
    registry: &TileRegistry,
    start: VertexRef,
    direction: CardinalDirection,
) -> Vec<VertexRef> {
    let mut line = vec![start];
    let mut current = start;
    while let [next] = registry.neighbours(current, direction) {
        if registry.is_sentinel(*next) || line.contains(next) {
            break;
        }
        current = *next;
        line.push(current);
    }
    line
}
