//! Tile-level neighbourhood views computed from vertex adjacency
//!
//! Every view walks the line of vertices just outside (or, for canvases, just
//! inside) one side of a tile and collects the distinct tiles owning them.

use crate::models::geometry::{Axis, CardinalDirection, DiagonalDirection};
use crate::models::graph::{Region, TileId, TileKind, VertexRef};
use crate::models::registry::TileRegistry;
use crate::services::examination::is_divided;
use crate::GraphError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::trace;

/// How far along a side the exterior neighbourhood reaches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeighbourhoodVariant {
    /// Only tiles overlapping the owner's span. Used for traversal.
    #[default]
    Narrow,
    /// Also tiles that merely touch the owner's corners. Used for planning
    /// manipulations.
    Wide,
}

impl NeighbourhoodVariant {
    /// Tiles bordering `owner` on `side`, ordered along the side
    pub fn exterior(
        self,
        registry: &TileRegistry,
        owner: TileId,
        side: CardinalDirection,
    ) -> Result<Vec<TileId>, GraphError> {
        exterior(registry, owner, side, self)
    }

    fn overlaps(self, (lo, hi): (i32, i32), (start, end): (i32, i32)) -> bool {
        match self {
            NeighbourhoodVariant::Narrow => start < hi && end > lo,
            NeighbourhoodVariant::Wide => start <= hi && end >= lo,
        }
    }
}

impl fmt::Display for NeighbourhoodVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NeighbourhoodVariant::Narrow => write!(f, "narrow"),
            NeighbourhoodVariant::Wide => write!(f, "wide"),
        }
    }
}

impl FromStr for NeighbourhoodVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "narrow" => Ok(NeighbourhoodVariant::Narrow),
            "wide" => Ok(NeighbourhoodVariant::Wide),
            _ => Err(format!("Invalid neighbourhood: {}", s)),
        }
    }
}

/// Exterior neighbourhood of `owner` on `side`.
///
/// The walk starts at the first neighbour of the side's leading corner and
/// follows the facing line until it passes the side's trailing corner. Only
/// tiles lying beyond the side and overlapping its span are kept.
///
/// Returns an empty list when the side faces outwards from a canvas that is
/// not connected to anything.
pub fn exterior(
    registry: &TileRegistry,
    owner: TileId,
    side: CardinalDirection,
    variant: NeighbourhoodVariant,
) -> Result<Vec<TileId>, GraphError> {
    let tile = registry
        .get(owner)
        .ok_or_else(|| GraphError::UnknownTile(owner.to_string()))?;
    let edge = tile.region().side(side);
    let along = side.axis().perpendicular();
    let span = (
        registry.location(edge.a).get(along),
        registry.location(edge.b).get(along),
    );
    let boundary = registry.location(edge.a).get(side.axis());

    let Some(&first) = registry.neighbours(edge.a, side).first() else {
        return Ok(Vec::new());
    };
    let start = match variant {
        NeighbourhoodVariant::Narrow => first,
        NeighbourhoodVariant::Wide => touching_predecessor(registry, first, along).unwrap_or(first),
    };
    let inclusive = variant == NeighbourhoodVariant::Wide;

    let visited = walk(registry, owner, start, side, span.1, inclusive)?;
    Ok(visited
        .into_iter()
        .filter(|candidate| {
            let beyond = registry.kind(*candidate) == TileKind::Canvas || {
                let (near, far) = extent(registry, *candidate, side.axis());
                if side.is_positive() {
                    near >= boundary
                } else {
                    far <= boundary
                }
            };
            beyond && variant.overlaps(span, extent(registry, *candidate, along))
        })
        .collect())
}

/// A window corner coincident with `vertex` one step back along the line,
/// belonging to a tile that ends where `vertex`'s tile begins
fn touching_predecessor(
    registry: &TileRegistry,
    vertex: VertexRef,
    along: Axis,
) -> Option<VertexRef> {
    let backward = along.negative();
    let line = registry.location(vertex).get(along.perpendicular());
    let previous = step(registry, vertex, backward, along.perpendicular(), line).ok()?;
    (!registry.is_sentinel(previous) && registry.location(previous) == registry.location(vertex))
        .then_some(previous)
}

/// Tiles inside `canvas` that touch its `side`, ordered along the side.
///
/// An undivided canvas has no contents and yields an empty list.
pub fn interior_canvas(
    registry: &TileRegistry,
    canvas: TileId,
    side: CardinalDirection,
) -> Result<Vec<TileId>, GraphError> {
    let tile = registry
        .get(canvas)
        .ok_or_else(|| GraphError::UnknownTile(canvas.to_string()))?;
    if tile.kind != TileKind::Canvas {
        return Err(GraphError::WrongKind {
            tile: canvas,
            expected: TileKind::Canvas,
            found: tile.kind,
        });
    }
    if !is_divided(registry, canvas) {
        return Ok(Vec::new());
    }

    let edge = Region::of_tile(canvas).side(side);
    let inward = side.opposite();
    let start = registry
        .neighbours(edge.a, inward)
        .first()
        .copied()
        .ok_or(GraphError::MissingNeighbour {
            vertex: edge.a,
            direction: inward,
        })?;
    let end = registry.location(edge.b).get(side.axis().perpendicular());
    walk(registry, canvas, start, side, end, false)
}

/// Start and end coordinate of a tile on one axis
fn extent(registry: &TileRegistry, tile: TileId, axis: Axis) -> (i32, i32) {
    let region = Region::of_tile(tile);
    (
        registry.location(region.corner(DiagonalDirection::NorthWest)).get(axis),
        registry.location(region.corner(DiagonalDirection::SouthEast)).get(axis),
    )
}

/// Walks from `start` along the line parallel to `side` until reaching `end`
/// on that line, collecting each owning tile once (excluding `owner`).
///
/// An inclusive walk carries on through window corners coincident with a
/// vertex sitting exactly at `end`.
fn walk(
    registry: &TileRegistry,
    owner: TileId,
    start: VertexRef,
    side: CardinalDirection,
    end: i32,
    inclusive: bool,
) -> Result<Vec<TileId>, GraphError> {
    let along = side.axis().perpendicular();
    let forward = along.positive();
    let line = registry.location(start).get(side.axis());
    let step_limit = 4 * registry.len() + 4;

    let mut result = Vec::new();
    let mut current = start;
    push_distinct(&mut result, owner, current.tile);

    for _ in 0..step_limit {
        let position = registry.location(current).get(along);
        if position > end || (position == end && !inclusive) {
            trace!(owner = %owner, side = %side, tiles = result.len(), "walked neighbourhood");
            return Ok(result);
        }
        let next = step(registry, current, forward, side.axis(), line);
        if position == end {
            // Only a coincident window corner continues past the end
            match next {
                Ok(next)
                    if !registry.is_sentinel(next)
                        && registry.location(next) == registry.location(current) =>
                {
                    current = next
                }
                _ => return Ok(result),
            }
        } else {
            current = next?;
        }
        push_distinct(&mut result, owner, current.tile);
    }

    Err(GraphError::UnreachableEnd { start, end: current })
}

fn push_distinct(result: &mut Vec<TileId>, owner: TileId, tile: TileId) {
    if tile != owner && !result.contains(&tile) {
        result.push(tile);
    }
}

/// Next vertex along a walk line.
///
/// Canvas corners carry no finer geometry along their own sides, so a walk
/// running along a canvas side jumps straight to the side's other corner.
/// Otherwise the forward neighbour nearest the walk line is taken.
fn step(
    registry: &TileRegistry,
    current: VertexRef,
    forward: CardinalDirection,
    line_axis: Axis,
    line: i32,
) -> Result<VertexRef, GraphError> {
    if registry.is_sentinel(current) && current.role.get(forward.axis()) == forward.opposite() {
        let partner = DiagonalDirection::from_components(forward, current.role.get(line_axis));
        return Ok(VertexRef::new(current.tile, partner));
    }

    registry
        .neighbours(current, forward)
        .iter()
        .copied()
        .min_by_key(|candidate| (registry.location(*candidate).get(line_axis) - line).abs())
        .ok_or(GraphError::MissingNeighbour {
            vertex: current,
            direction: forward,
        })
}
