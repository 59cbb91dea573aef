//! Tile/vertex/edge graph model
//!
//! Tiles own exactly four corner vertices. A vertex is addressed by its owning
//! tile and its corner role, so references between vertices are plain `Copy`
//! values into the registry arena rather than pointers.

use crate::models::geometry::{
    Axis, CardinalDirection, CardinalMap, DiagonalDirection, DiagonalMap, Vector,
};
use crate::models::registry::TileRegistry;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Internally generated tile identifier, rendered as `<N>` so it can never be
/// mistaken for a user-assigned name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileId(pub u32);

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

/// Concrete tile variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    /// Leaf tile holding managed content
    Window,
    /// Boundary tile; its vertices are sentinels
    Canvas,
}

impl TileKind {
    pub fn name(self) -> &'static str {
        match self {
            TileKind::Window => "Window",
            TileKind::Canvas => "Canvas",
        }
    }
}

impl fmt::Display for TileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Reference to one corner vertex of one tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VertexRef {
    pub tile: TileId,
    pub role: DiagonalDirection,
}

impl VertexRef {
    pub fn new(tile: TileId, role: DiagonalDirection) -> Self {
        Self { tile, role }
    }
}

impl fmt::Display for VertexRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.tile, self.role)
    }
}

/// Graph node at one corner of a tile.
///
/// Each direction holds an ordered list of 0-2 neighbours:
/// - 0 only on the outward sides of a canvas
/// - 2 only when the vertex lies strictly between two corners of a larger
///   neighbouring tile (a T-junction); the entries are ordered along the
///   perpendicular axis
/// - 1 otherwise
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vertex {
    pub location: Vector,
    pub neighbours: CardinalMap<Vec<VertexRef>>,
}

impl Vertex {
    pub fn new(location: Vector) -> Self {
        Self {
            location,
            neighbours: CardinalMap::default(),
        }
    }
}

/// Axis-aligned pair of vertices with `a` at the lower coordinate.
///
/// Edges may be tile sides or virtual spans across a chain of vertices; they are
/// computed on demand and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub a: VertexRef,
    pub b: VertexRef,
}

impl Edge {
    pub fn new(a: VertexRef, b: VertexRef) -> Self {
        Self { a, b }
    }

    /// True when both endpoints belong to the same tile
    pub fn is_side(&self) -> bool {
        self.a.tile == self.b.tile
    }

    pub fn endpoints(&self) -> [VertexRef; 2] {
        [self.a, self.b]
    }

    /// Axis the edge runs along.
    ///
    /// Sides are classified by corner roles; virtual edges by the coordinate the
    /// endpoints share, falling back to roles when they coincide. Returns `None`
    /// when the endpoints share no coordinate.
    pub fn axis(&self, registry: &TileRegistry) -> Option<Axis> {
        let by_roles = if self.a.role.vertical() == self.b.role.vertical() {
            Some(Axis::Horizontal)
        } else if self.a.role.horizontal() == self.b.role.horizontal() {
            Some(Axis::Vertical)
        } else {
            None
        };
        if self.is_side() {
            return by_roles;
        }

        let a = registry[self.a].location;
        let b = registry[self.b].location;
        match (a.horizontal == b.horizontal, a.vertical == b.vertical) {
            (true, true) => by_roles.or(Some(Axis::Horizontal)),
            (false, true) => Some(Axis::Horizontal),
            (true, false) => Some(Axis::Vertical),
            (false, false) => None,
        }
    }

    /// Coordinate delta along the edge's axis (zero for unaligned edges)
    pub fn distance(&self, registry: &TileRegistry) -> i32 {
        match self.axis(registry) {
            Some(axis) => registry[self.b]
                .location
                .get(axis)
                .saturating_sub(registry[self.a].location.get(axis)),
            None => 0,
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Edge({},{})", self.a, self.b)
    }
}

/// Abstract four-corner region.
///
/// Regions may describe a tile, or span several tiles (and partial tiles), e.g.
/// when inspecting a candidate selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    pub corners: DiagonalMap<VertexRef>,
}

impl Region {
    pub fn new(corners: DiagonalMap<VertexRef>) -> Self {
        Self { corners }
    }

    /// The region bounded exactly by a tile's own corners
    pub fn of_tile(tile: TileId) -> Self {
        Self::new(DiagonalMap::from_fn(|role| VertexRef::new(tile, role)))
    }

    pub fn corner(&self, role: DiagonalDirection) -> VertexRef {
        self.corners[role]
    }

    /// Edge along the given side, ordered along the perpendicular axis
    pub fn side(&self, direction: CardinalDirection) -> Edge {
        let [first, second] = direction.diagonals();
        Edge::new(self.corners[first], self.corners[second])
    }

    pub fn sides(&self) -> impl Iterator<Item = (CardinalDirection, Edge)> + '_ {
        CardinalDirection::ALL
            .into_iter()
            .map(move |direction| (direction, self.side(direction)))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Box({},{},{},{})",
            self.corners.north_west,
            self.corners.north_east,
            self.corners.south_east,
            self.corners.south_west
        )
    }
}

/// Concrete region that creates and exclusively owns its corner vertices
#[derive(Debug, Clone)]
pub struct Tile {
    pub id: TileId,
    pub kind: TileKind,
    pub(crate) name: Option<String>,
    pub corners: DiagonalMap<Vertex>,
}

impl Tile {
    /// Creates the tile in its empty baseline state: the two corners of every
    /// side are each other's sole neighbour along that side.
    pub(crate) fn new(id: TileId, kind: TileKind, locations: DiagonalMap<Vector>) -> Self {
        let mut tile = Self {
            id,
            kind,
            name: None,
            corners: locations.map(|_, location| Vertex::new(*location)),
        };

        for direction in CardinalDirection::ALL {
            let [backward, forward] = direction.axis().perpendicular().directions();
            let [first, second] = direction.diagonals();
            tile.corners[first].neighbours[forward] = vec![VertexRef::new(id, second)];
            tile.corners[second].neighbours[backward] = vec![VertexRef::new(id, first)];
        }

        tile
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Canvases are the boundary of the managed space
    pub fn is_sentinel(&self) -> bool {
        self.kind == TileKind::Canvas
    }

    pub fn region(&self) -> Region {
        Region::of_tile(self.id)
    }

    pub fn vertex_ref(&self, role: DiagonalDirection) -> VertexRef {
        VertexRef::new(self.id, role)
    }

    /// Width and height
    pub fn size(&self) -> Vector {
        self.corners.south_east.location - self.corners.north_west.location
    }

    /// Name if assigned, otherwise the numeric id form
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => self.id.to_string(),
        }
    }
}

/// Closed union over every addressable graph element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "element", rename_all = "snake_case")]
pub enum Element {
    Tile { id: TileId, kind: TileKind },
    Vertex(VertexRef),
    Edge(Edge),
    Box(Region),
}
