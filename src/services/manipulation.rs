//! Structural edits: fill, split and the local neighbour repairs they need
//!
//! Every edit mutates vertices in place and repairs only the neighbour lists
//! it touches. Contract violations come back as `Err(GraphError)`; size
//! constraints that could not be met are returned as [`StateProblem`] values
//! next to the completed result.

use crate::config::Settings;
use crate::models::geometry::{Axis, CardinalDirection, DiagonalDirection, DiagonalMap, Vector};
use crate::models::graph::{Edge, Region, TileId, TileKind, VertexRef};
use crate::models::problem::StateProblem;
use crate::models::registry::TileRegistry;
use crate::services::examination::{are_aligned, is_divided};
use crate::GraphError;
use tracing::{debug, trace, warn};

/// Every window needs at least one unit of span after a split
const MINIMUM_SPAN: i32 = 2;

/// Neighbour lists captured at the two corners of one side, ordered like the
/// side's edge endpoints
pub type SideNeighbours = [Vec<VertexRef>; 2];

/// Fill an empty tile with a new window of exactly the same shape.
///
/// Fails with [`GraphError::AlreadyDivided`] when the target already has
/// contents.
pub fn fill(registry: &mut TileRegistry, target: TileId) -> Result<TileId, GraphError> {
    let tile = registry
        .get(target)
        .ok_or_else(|| GraphError::UnknownTile(target.to_string()))?;
    if is_divided(registry, target) {
        return Err(GraphError::AlreadyDivided(target));
    }

    let locations = tile.corners.map(|_, vertex| vertex.location);
    let window = registry.create_tile(TileKind::Window, locations, None)?;

    for role in DiagonalDirection::ALL {
        let inner = VertexRef::new(window, role);
        let outer = VertexRef::new(target, role);
        for direction in role.components() {
            registry.set_neighbours(inner, direction, vec![outer]);
            registry.set_neighbours(outer, direction.opposite(), vec![inner]);
        }
    }

    debug!(target = %target, window = %window, "filled tile");
    Ok(window)
}

/// Split a window, placing a new window on its `direction` side.
///
/// The span along `direction`'s axis is shared out after reserving the
/// configured margin; the positive side of the axis receives any odd unit.
/// Spans too small for the margin are reported as
/// [`StateProblem::BoxTooSmallForMargins`] and handled degenerately.
pub fn split(
    registry: &mut TileRegistry,
    target: TileId,
    direction: CardinalDirection,
    settings: &Settings,
) -> Result<(TileId, Vec<StateProblem>), GraphError> {
    let tile = registry
        .get(target)
        .ok_or_else(|| GraphError::UnknownTile(target.to_string()))?;
    if tile.kind != TileKind::Window {
        return Err(GraphError::WrongKind {
            tile: target,
            expected: TileKind::Window,
            found: tile.kind,
        });
    }
    debug!(target = %target, direction = %direction, "splitting window");

    let region = Region::of_tile(target);
    let split_axis = direction.axis();
    let cross_axis = split_axis.perpendicular();
    let target_edge = region.side(direction);
    let opposite_edge = region.side(direction.opposite());

    // Lists on either side of the injection point, before anything moves
    let own: SideNeighbours = [vec![target_edge.a], vec![target_edge.b]];
    let outside: SideNeighbours = [
        registry.neighbours(target_edge.a, direction).to_vec(),
        registry.neighbours(target_edge.b, direction).to_vec(),
    ];
    let (negative, positive) = if direction.is_positive() {
        (own, outside)
    } else {
        (outside, own)
    };

    let [negative_side, positive_side] = cross_axis.directions();
    let exterior = [
        exterior_edge(registry, &region, negative_side)?,
        exterior_edge(registry, &region, positive_side)?,
    ];

    let [start_side, end_side] = split_axis.directions();
    let available_space =
        Edge::new(region.side(start_side).a, region.side(end_side).a).distance(registry);
    let margin = settings.margin();
    let unit = direction.unit_vector();
    let mut problems = Vec::new();

    // (new window size, old window size) along the split axis
    let required = MINIMUM_SPAN.saturating_add(margin);
    let sizes = if available_space < MINIMUM_SPAN {
        None
    } else if available_space < required {
        Some((unit, unit))
    } else {
        let usable = available_space - margin;
        let base = usable / 2;
        let remainder = usable % 2;
        if direction.is_positive() {
            Some((unit * (base + remainder), unit * base))
        } else {
            Some((unit * base, unit * (base + remainder)))
        }
    };
    if available_space < required {
        let problem = StateProblem::BoxTooSmallForMargins { region };
        warn!(%problem, available_space, margin, "split constraint not met");
        problems.push(problem);
    }

    let corners = match sizes {
        None => registry[target].corners.map(|_, vertex| vertex.location),
        Some((new_size, old_size)) => {
            let target_locations = [
                registry.location(target_edge.a),
                registry.location(target_edge.b),
            ];
            let opposite_locations = [
                registry.location(opposite_edge.a),
                registry.location(opposite_edge.b),
            ];

            let mut corners: DiagonalMap<Vector> = DiagonalMap::default();
            corners[target_edge.a.role] = target_locations[0];
            corners[target_edge.b.role] = target_locations[1];
            corners[opposite_edge.a.role] = target_locations[0] - new_size;
            corners[opposite_edge.b.role] = target_locations[1] - new_size;

            registry.set_location(target_edge.a, opposite_locations[0] + old_size);
            registry.set_location(target_edge.b, opposite_locations[1] + old_size);
            corners
        }
    };
    let window = registry.create_tile(TileKind::Window, corners, None)?;
    let new_region = Region::of_tile(window);

    establish_connections_along_injection_axis(registry, window, split_axis, &negative, &positive)?;
    retarget_far_side(registry, window, target_edge, direction);

    let interior = [negative_side, positive_side].map(|side| {
        if direction.is_positive() {
            Edge::new(region.side(side).a, new_region.side(side).b)
        } else {
            Edge::new(new_region.side(side).a, region.side(side).b)
        }
    });
    repair_connections_along_perpendicular_axis(registry, cross_axis, exterior, interior)?;

    debug!(
        target = %target,
        window = %window,
        problems = problems.len(),
        "split window"
    );
    Ok((window, problems))
}

/// Edge spanning the outermost neighbours just beyond one side of a region
fn exterior_edge(
    registry: &TileRegistry,
    region: &Region,
    side: CardinalDirection,
) -> Result<Edge, GraphError> {
    let edge = region.side(side);
    let a = registry
        .neighbours(edge.a, side)
        .first()
        .copied()
        .ok_or(GraphError::MissingNeighbour {
            vertex: edge.a,
            direction: side,
        })?;
    let b = registry
        .neighbours(edge.b, side)
        .last()
        .copied()
        .ok_or(GraphError::MissingNeighbour {
            vertex: edge.b,
            direction: side,
        })?;
    Ok(Edge::new(a, b))
}

/// Connect a freshly injected window to its neighbours along the axis it was
/// injected on.
///
/// `negative` and `positive` hold, per corner of the window's negative and
/// positive side, the neighbour list that corner should receive. Each old
/// neighbour is then pointed back at the new corner: wholesale when it had no
/// entry or is aligned with the new corner, otherwise only in the slot that
/// still refers to the vertex on the far side of the window, which leaves an
/// untouched T-junction partner in place.
pub fn establish_connections_along_injection_axis(
    registry: &mut TileRegistry,
    window: TileId,
    split_axis: Axis,
    negative: &SideNeighbours,
    positive: &SideNeighbours,
) -> Result<(), GraphError> {
    let region = Region::of_tile(window);
    let [negative_direction, positive_direction] = split_axis.directions();
    let alignment_axis = split_axis.perpendicular();

    for (direction, towards, away) in [
        (negative_direction, negative, positive),
        (positive_direction, positive, negative),
    ] {
        let side = region.side(direction);
        for ((vertex, intended), opposite) in side.endpoints().into_iter().zip(towards).zip(away) {
            let (first, last) = match (intended.first(), intended.last()) {
                (Some(first), Some(last)) => (*first, *last),
                _ => return Err(GraphError::MissingNeighbour { vertex, direction }),
            };
            let stale = opposite.first().copied();

            registry.set_neighbours(vertex, direction, intended.clone());
            point_back(registry, vertex, first, direction, alignment_axis, stale, Slot::Last);
            if intended.len() > 1 {
                point_back(registry, vertex, last, direction, alignment_axis, stale, Slot::First);
            }
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    First,
    Last,
}

fn point_back(
    registry: &mut TileRegistry,
    vertex: VertexRef,
    neighbour: VertexRef,
    direction: CardinalDirection,
    alignment_axis: Axis,
    stale: Option<VertexRef>,
    slot: Slot,
) {
    let aligned = are_aligned(registry, vertex, neighbour, alignment_axis);
    let back = registry.neighbours_mut(neighbour, direction.opposite());

    if back.is_empty() || aligned {
        *back = vec![vertex];
    } else {
        let index = match slot {
            Slot::First => 0,
            Slot::Last => back.len() - 1,
        };
        if Some(back[index]) == stale {
            back[index] = vertex;
        }
    }
    trace!(vertex = %neighbour, direction = %direction.opposite(), "pointed back at {}", vertex);
}

/// Hands every remaining reference to the moved corners of `target_edge` over
/// to the new window's corners, which now sit where the old ones were.
///
/// Only lists pointing back against `direction` can refer to the far side of
/// the old window; T-junction partners beyond it keep their other entry.
fn retarget_far_side(
    registry: &mut TileRegistry,
    window: TileId,
    target_edge: Edge,
    direction: CardinalDirection,
) {
    let backward = direction.opposite();
    let others: Vec<TileId> = registry
        .tiles()
        .map(|tile| tile.id)
        .filter(|id| *id != window)
        .collect();

    for id in others {
        for role in DiagonalDirection::ALL {
            let vertex = VertexRef::new(id, role);
            for slot in registry.neighbours_mut(vertex, backward).iter_mut() {
                let moved = target_edge.endpoints().into_iter().find(|moved| *moved == *slot);
                if let Some(moved) = moved {
                    *slot = VertexRef::new(window, moved.role);
                    trace!(vertex = %vertex, direction = %backward, "retargeted at {}", *slot);
                }
            }
        }
    }
}

/// Repair neighbours across the axis perpendicular to an injection.
///
/// `exterior` and `interior` are ordered (negative, positive) along
/// `perpendicular_axis`. Each exterior edge is the unchanged boundary just
/// outside the modified region; each interior edge spans the outer corners of
/// the region itself.
pub fn repair_connections_along_perpendicular_axis(
    registry: &mut TileRegistry,
    perpendicular_axis: Axis,
    exterior: [Edge; 2],
    interior: [Edge; 2],
) -> Result<(), GraphError> {
    let parallel_axis = perpendicular_axis.perpendicular();
    let forward = parallel_axis.positive();

    for ((outward, exterior), interior) in perpendicular_axis
        .directions()
        .into_iter()
        .zip(exterior)
        .zip(interior)
    {
        let interior_parts = chain(registry, interior, forward)?;

        let a_sentinel = registry.is_sentinel(exterior.a);
        if a_sentinel != registry.is_sentinel(exterior.b) {
            return Err(GraphError::SentinelMismatch(exterior));
        }

        if a_sentinel {
            repair_against_sentinels(registry, outward, exterior, &interior_parts);
        } else {
            repair_against_tiles(
                registry,
                outward,
                parallel_axis,
                exterior,
                interior,
                &interior_parts,
            )?;
        }
    }
    Ok(())
}

/// Vertices from `edge.a` to `edge.b` following single forward neighbours
fn chain(
    registry: &TileRegistry,
    edge: Edge,
    forward: CardinalDirection,
) -> Result<Vec<VertexRef>, GraphError> {
    let step_limit = 4 * registry.len();
    let mut parts = vec![edge.a];
    let mut current = edge.a;

    while current != edge.b {
        if parts.len() > step_limit {
            return Err(GraphError::UnreachableEnd {
                start: edge.a,
                end: edge.b,
            });
        }
        let next = registry.neighbours(current, forward);
        if next.len() != 1 {
            return Err(GraphError::BrokenChain {
                vertex: current,
                direction: forward,
                count: next.len(),
            });
        }
        current = next[0];
        parts.push(current);
    }
    Ok(parts)
}

/// Canvas corners carry no finer geometry, so interior vertices either link
/// one-to-one with a coincident corner or point at both corners.
fn repair_against_sentinels(
    registry: &mut TileRegistry,
    outward: CardinalDirection,
    exterior: Edge,
    interior_parts: &[VertexRef],
) {
    let mut inner = interior_parts;

    if let Some((&first, rest)) = inner.split_first() {
        if registry.location(first) == registry.location(exterior.a) {
            link(registry, first, exterior.a, outward);
            inner = rest;
        }
    }
    if let Some((&last, rest)) = inner.split_last() {
        if registry.location(last) == registry.location(exterior.b) {
            link(registry, last, exterior.b, outward);
            inner = rest;
        }
    }

    let both = if exterior.a == exterior.b {
        vec![exterior.a]
    } else {
        vec![exterior.a, exterior.b]
    };
    for vertex in inner {
        registry.set_neighbours(*vertex, outward, both.clone());
    }
}

fn link(registry: &mut TileRegistry, vertex: VertexRef, other: VertexRef, direction: CardinalDirection) {
    registry.set_neighbours(vertex, direction, vec![other]);
    registry.set_neighbours(other, direction.opposite(), vec![vertex]);
}

fn repair_against_tiles(
    registry: &mut TileRegistry,
    outward: CardinalDirection,
    parallel_axis: Axis,
    exterior: Edge,
    interior: Edge,
    interior_parts: &[VertexRef],
) -> Result<(), GraphError> {
    let inward = outward.opposite();
    let position =
        |registry: &TileRegistry, vertex: VertexRef| registry.location(vertex).get(parallel_axis);

    // Exterior endpoints follow the interior endpoints when aligned with
    // them or when they are now nearer than the recorded neighbour
    if are_aligned(registry, exterior.a, interior.a, parallel_axis) {
        registry.set_neighbours(exterior.a, inward, vec![interior.a]);
    } else if let Some(&nearest) = registry.neighbours(exterior.a, inward).last() {
        if position(registry, interior.a) < position(registry, nearest) {
            if let Some(slot) = registry.neighbours_mut(exterior.a, inward).last_mut() {
                *slot = interior.a;
            }
        }
    }
    if are_aligned(registry, exterior.b, interior.b, parallel_axis) {
        registry.set_neighbours(exterior.b, inward, vec![interior.b]);
    } else if let Some(&nearest) = registry.neighbours(exterior.b, inward).first() {
        if position(registry, interior.b) > position(registry, nearest) {
            if let Some(slot) = registry.neighbours_mut(exterior.b, inward).first_mut() {
                *slot = interior.b;
            }
        }
    }

    let exterior_parts = chain(registry, exterior, parallel_axis.positive())?;

    if exterior_parts.len() > 2 {
        for vertex in &exterior_parts[1..exterior_parts.len() - 1] {
            let neighbours = bracket(registry, *vertex, inward, interior_parts, parallel_axis)?;
            trace!(vertex = %vertex, direction = %inward, count = neighbours.len(), "repaired exterior vertex");
            registry.set_neighbours(*vertex, inward, neighbours);
        }
    }
    for vertex in interior_parts {
        let neighbours = bracket(registry, *vertex, outward, &exterior_parts, parallel_axis)?;
        trace!(vertex = %vertex, direction = %outward, count = neighbours.len(), "repaired interior vertex");
        registry.set_neighbours(*vertex, outward, neighbours);
    }
    Ok(())
}

/// Neighbours of `vertex` among `line`, a run of vertices ordered along
/// `axis`: the single aligned vertex if there is one (preferring a corner
/// with the same role along `axis` among coincident ones), otherwise the last
/// vertex before and the first vertex after. A missing side is taken from the
/// vertex's previous two-entry list when it had one.
pub(crate) fn bracket(
    registry: &TileRegistry,
    vertex: VertexRef,
    direction: CardinalDirection,
    line: &[VertexRef],
    axis: Axis,
) -> Result<Vec<VertexRef>, GraphError> {
    let position = registry.location(vertex).get(axis);

    // Where several corners coincide, the one on the same side of the
    // crossing as `vertex` answers it
    let aligned: Vec<VertexRef> = line
        .iter()
        .copied()
        .filter(|other| registry.location(*other).get(axis) == position)
        .collect();
    if let Some(&first) = aligned.first() {
        let facing = aligned
            .iter()
            .copied()
            .find(|other| other.role.get(axis) == vertex.role.get(axis))
            .unwrap_or(first);
        return Ok(vec![facing]);
    }

    let mut before = None;
    let mut after = None;
    for (index, &other) in line.iter().enumerate() {
        let other_position = registry.location(other).get(axis);
        let next_position = line
            .get(index + 1)
            .map(|next| registry.location(*next).get(axis));
        if position > other_position && next_position.map_or(true, |next| position < next) {
            before = Some(other);
        } else if position < other_position {
            after = Some(other);
            break;
        }
    }

    if let [old_before, old_after] = registry.neighbours(vertex, direction) {
        before = before.or(Some(*old_before));
        after = after.or(Some(*old_after));
    }

    let result: Vec<VertexRef> = [before, after].into_iter().flatten().collect();
    if result.is_empty() {
        return Err(GraphError::MissingNeighbour { vertex, direction });
    }
    Ok(result)
}

/// Link two canvases placed side by side so navigation can cross between
/// them.
///
/// Each corner on `from`'s `direction` side is linked to the facing corners of
/// `to` (and vice versa) using the same bracketing as the perpendicular
/// repair: an aligned corner gets a single neighbour, a corner lying between
/// the facing corners gets both.
pub fn connect_canvases(
    registry: &mut TileRegistry,
    from: TileId,
    to: TileId,
    direction: CardinalDirection,
) -> Result<(), GraphError> {
    for id in [from, to] {
        let kind = registry
            .get(id)
            .map(|tile| tile.kind)
            .ok_or_else(|| GraphError::UnknownTile(id.to_string()))?;
        if kind != TileKind::Canvas {
            return Err(GraphError::WrongKind {
                tile: id,
                expected: TileKind::Canvas,
                found: kind,
            });
        }
    }

    let from_side = Region::of_tile(from).side(direction);
    let to_side = Region::of_tile(to).side(direction.opposite());
    let side_axis = direction.axis().perpendicular();

    for (vertices, facing, towards) in [
        (from_side, to_side, direction),
        (to_side, from_side, direction.opposite()),
    ] {
        let line = facing.endpoints();
        for vertex in vertices.endpoints() {
            registry.set_neighbours(vertex, towards, Vec::new());
            let neighbours = bracket(registry, vertex, towards, &line, side_axis)?;
            registry.set_neighbours(vertex, towards, neighbours);
        }
    }

    debug!(from = %from, to = %to, direction = %direction, "connected canvases");
    Ok(())
}
