//! Tile registry: arena storage, id assignment and name lookup
//!
//! The registry is a factory and lookup layer only. It never rewires
//! neighbours; graph surgery lives in `services::manipulation`.

use crate::models::geometry::{CardinalDirection, DiagonalDirection, DiagonalMap, Vector};
use crate::models::graph::{Edge, Element, Region, Tile, TileId, TileKind, Vertex, VertexRef};
use crate::models::tag::{BoxTag, EdgeTag, Tag, TileKey, TileTag, VertexTag};
use crate::GraphError;
use regex::Regex;
use std::collections::HashMap;
use std::ops::Index;
use std::sync::OnceLock;
use tracing::{debug, warn};

fn tile_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^<\s*\d+\s*>$").expect("valid tile id regex"))
}

fn reserved_character_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[(),.\s]").expect("valid reserved character regex"))
}

/// Id for the tile stored at arena slot `slot`
fn next_id(slot: usize) -> Result<TileId, GraphError> {
    u32::try_from(slot)
        .map(TileId)
        .map_err(|_| GraphError::RegistryFull(slot))
}

/// Owns every tile, and through them every vertex
#[derive(Debug, Default, Clone)]
pub struct TileRegistry {
    tiles: Vec<Option<Tile>>,
    by_name: HashMap<String, TileId>,
}

impl TileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tile from explicit corner locations
    pub fn create_tile(
        &mut self,
        kind: TileKind,
        corners: DiagonalMap<Vector>,
        name: Option<&str>,
    ) -> Result<TileId, GraphError> {
        if let Some(name) = name {
            Self::validate_name(name)?;
        }

        let id = next_id(self.tiles.len())?;
        self.tiles.push(Some(Tile::new(id, kind, corners)));
        debug!(tile = %id, kind = %kind, "created tile");

        if let Some(name) = name {
            self.name_tile(id, name)?;
        }
        Ok(id)
    }

    /// Create a tile from its north-west position and size
    pub fn create_tile_at(
        &mut self,
        kind: TileKind,
        position: Vector,
        size: Vector,
        name: Option<&str>,
    ) -> Result<TileId, GraphError> {
        let out_of_range = || GraphError::OutOfRange { position, size };
        let east = position.horizontal.checked_add(size.horizontal).ok_or_else(out_of_range)?;
        let south = position.vertical.checked_add(size.vertical).ok_or_else(out_of_range)?;
        let corners = DiagonalMap {
            north_west: position,
            north_east: Vector::new(east, position.vertical),
            south_east: Vector::new(east, south),
            south_west: Vector::new(position.horizontal, south),
        };
        self.create_tile(kind, corners, name)
    }

    /// Register a name for a tile.
    ///
    /// A name already in use moves to the new tile and the previous owner is
    /// left unnamed.
    pub fn name_tile(&mut self, id: TileId, name: &str) -> Result<(), GraphError> {
        Self::validate_name(name)?;
        self.get(id)
            .ok_or_else(|| GraphError::UnknownTile(id.to_string()))?;

        if let Some(&previous) = self.by_name.get(name) {
            if previous != id {
                warn!(
                    name,
                    previous = %previous,
                    tile = %id,
                    "Name already in use; previous owner will be unnamed"
                );
                self.unname_tile(previous);
            }
        }

        let old = self
            .get_mut(id)
            .and_then(|tile| tile.name.replace(name.to_string()));
        if let Some(old) = old {
            self.by_name.remove(&old);
        }
        self.by_name.insert(name.to_string(), id);
        Ok(())
    }

    /// Remove a tile's name, returning it
    pub fn unname_tile(&mut self, id: TileId) -> Option<String> {
        let name = self.get_mut(id)?.name.take()?;
        self.by_name.remove(&name);
        Some(name)
    }

    /// Drop a tile from the registry.
    ///
    /// Only bookkeeping is performed: vertices of other tiles that still refer
    /// to the removed corners must be rewired by the caller first.
    pub fn remove_tile(&mut self, id: TileId) -> Result<Tile, GraphError> {
        let tile = self
            .tiles
            .get_mut(id.0 as usize)
            .and_then(Option::take)
            .ok_or_else(|| GraphError::UnknownTile(id.to_string()))?;
        if let Some(name) = &tile.name {
            self.by_name.remove(name);
        }
        debug!(tile = %id, "removed tile");
        Ok(tile)
    }

    pub fn get(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id.0 as usize).and_then(Option::as_ref)
    }

    fn get_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.tiles.get_mut(id.0 as usize).and_then(Option::as_mut)
    }

    pub fn by_name(&self, name: &str) -> Option<TileId> {
        self.by_name.get(name).copied()
    }

    pub fn contains(&self, id: TileId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.tiles.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All live tiles in creation order
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().flatten()
    }

    pub fn tiles_of_kind(&self, kind: TileKind) -> impl Iterator<Item = &Tile> {
        self.tiles().filter(move |tile| tile.kind == kind)
    }

    pub fn windows(&self) -> impl Iterator<Item = &Tile> {
        self.tiles_of_kind(TileKind::Window)
    }

    pub fn canvases(&self) -> impl Iterator<Item = &Tile> {
        self.tiles_of_kind(TileKind::Canvas)
    }

    pub fn kind(&self, id: TileId) -> TileKind {
        self[id].kind
    }

    pub fn is_sentinel(&self, vertex: VertexRef) -> bool {
        self[vertex.tile].is_sentinel()
    }

    pub fn location(&self, vertex: VertexRef) -> Vector {
        self[vertex].location
    }

    pub fn neighbours(&self, vertex: VertexRef, direction: CardinalDirection) -> &[VertexRef] {
        &self[vertex].neighbours[direction]
    }

    pub fn vertex_mut(&mut self, vertex: VertexRef) -> &mut Vertex {
        match self.get_mut(vertex.tile) {
            Some(tile) => &mut tile.corners[vertex.role],
            None => panic!("vertex {} belongs to an unknown tile", vertex),
        }
    }

    pub fn set_location(&mut self, vertex: VertexRef, location: Vector) {
        self.vertex_mut(vertex).location = location;
    }

    pub fn set_neighbours(
        &mut self,
        vertex: VertexRef,
        direction: CardinalDirection,
        neighbours: Vec<VertexRef>,
    ) {
        self.vertex_mut(vertex).neighbours[direction] = neighbours;
    }

    pub fn neighbours_mut(
        &mut self,
        vertex: VertexRef,
        direction: CardinalDirection,
    ) -> &mut Vec<VertexRef> {
        &mut self.vertex_mut(vertex).neighbours[direction]
    }

    /// Tag for a tile, preferring its registered name
    pub fn tile_tag(&self, id: TileId) -> TileTag {
        let tile = &self[id];
        let key = match &tile.name {
            Some(name) => TileKey::Name(name.clone()),
            None => TileKey::Id(id),
        };
        TileTag {
            kind: Some(tile.kind),
            key,
        }
    }

    pub fn vertex_tag(&self, vertex: VertexRef) -> VertexTag {
        let mut owner = self.tile_tag(vertex.tile);
        owner.kind = None;
        VertexTag {
            owner,
            role: vertex.role,
        }
    }

    pub fn tag_for(&self, element: &Element) -> Tag {
        match element {
            Element::Tile { id, .. } => Tag::Tile(self.tile_tag(*id)),
            Element::Vertex(vertex) => Tag::Vertex(self.vertex_tag(*vertex)),
            Element::Edge(edge) => Tag::Edge(EdgeTag {
                a: self.vertex_tag(edge.a),
                b: self.vertex_tag(edge.b),
            }),
            Element::Box(region) => Tag::Box(BoxTag {
                corners: region.corners.map(|_, vertex| self.vertex_tag(*vertex)),
            }),
        }
    }

    /// Resolve a tag to the element it names
    pub fn lookup(&self, tag: &Tag) -> Result<Element, GraphError> {
        match tag {
            Tag::Tile(tile_tag) => {
                let id = self.resolve_tile(tile_tag)?;
                Ok(Element::Tile {
                    id,
                    kind: self[id].kind,
                })
            }
            Tag::Vertex(vertex_tag) => Ok(Element::Vertex(self.resolve_vertex(vertex_tag)?)),
            Tag::Edge(edge_tag) => Ok(Element::Edge(Edge::new(
                self.resolve_vertex(&edge_tag.a)?,
                self.resolve_vertex(&edge_tag.b)?,
            ))),
            Tag::Box(box_tag) => {
                let mut corners = DiagonalMap::from_fn(|role| VertexRef::new(TileId(0), role));
                for role in DiagonalDirection::ALL {
                    corners[role] = self.resolve_vertex(&box_tag.corners[role])?;
                }
                Ok(Element::Box(Region::new(corners)))
            }
        }
    }

    /// Resolve a tile tag, checking the tile kind when the tag names one
    pub fn resolve_tile(&self, tag: &TileTag) -> Result<TileId, GraphError> {
        let id = match &tag.key {
            TileKey::Id(id) => self
                .get(*id)
                .map(|tile| tile.id)
                .ok_or_else(|| GraphError::UnknownTile(tag.to_string()))?,
            TileKey::Name(name) => self
                .by_name(name)
                .ok_or_else(|| GraphError::UnknownName(name.clone()))?,
        };

        if let Some(expected) = tag.kind {
            let found = self[id].kind;
            if expected != found {
                return Err(GraphError::WrongKind {
                    tile: id,
                    expected,
                    found,
                });
            }
        }
        Ok(id)
    }

    fn resolve_vertex(&self, tag: &VertexTag) -> Result<VertexRef, GraphError> {
        Ok(VertexRef::new(self.resolve_tile(&tag.owner)?, tag.role))
    }

    fn validate_name(name: &str) -> Result<(), GraphError> {
        if name.is_empty()
            || tile_id_pattern().is_match(name)
            || reserved_character_pattern().is_match(name)
        {
            return Err(GraphError::InvalidName(name.to_string()));
        }
        Ok(())
    }
}

impl Index<TileId> for TileRegistry {
    type Output = Tile;

    fn index(&self, id: TileId) -> &Tile {
        match self.get(id) {
            Some(tile) => tile,
            None => panic!("unknown tile {}", id),
        }
    }
}

impl Index<VertexRef> for TileRegistry {
    type Output = Vertex;

    fn index(&self, vertex: VertexRef) -> &Vertex {
        &self[vertex.tile].corners[vertex.role]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with_window() -> (TileRegistry, TileId) {
        let mut registry = TileRegistry::new();
        let id = registry
            .create_tile_at(
                TileKind::Window,
                Vector::new(100, 100),
                Vector::new(200, 100),
                None,
            )
            .unwrap();
        (registry, id)
    }

    #[test]
    fn test_create_tile_at_places_corners() {
        let (registry, id) = registry_with_window();
        let tile = &registry[id];

        assert_eq!(tile.corners.north_west.location, Vector::new(100, 100));
        assert_eq!(tile.corners.north_east.location, Vector::new(300, 100));
        assert_eq!(tile.corners.south_east.location, Vector::new(300, 200));
        assert_eq!(tile.corners.south_west.location, Vector::new(100, 200));
    }

    #[test]
    fn test_create_tile_at_rejects_corners_past_coordinate_range() {
        let mut registry = TileRegistry::new();
        let result = registry.create_tile_at(
            TileKind::Canvas,
            Vector::new(i32::MAX - 5, 0),
            Vector::new(10, 10),
            None,
        );

        assert!(matches!(result, Err(GraphError::OutOfRange { .. })));
        assert!(registry.is_empty());
        assert!(registry
            .create_tile_at(TileKind::Canvas, Vector::new(0, i32::MIN), Vector::new(10, -1), None)
            .is_err());
    }

    #[test]
    fn test_id_allocation_stops_at_u32_range() {
        assert_eq!(next_id(7), Ok(TileId(7)));
        assert_eq!(next_id(u32::MAX as usize), Ok(TileId(u32::MAX)));
        #[cfg(target_pointer_width = "64")]
        assert_eq!(
            next_id(u32::MAX as usize + 1),
            Err(GraphError::RegistryFull(u32::MAX as usize + 1))
        );
    }

    #[test]
    fn test_ids_are_monotonic_across_kinds() {
        let (mut registry, first) = registry_with_window();
        let second = registry
            .create_tile_at(TileKind::Canvas, Vector::new(0, 0), Vector::new(10, 10), None)
            .unwrap();

        assert_eq!(first, TileId(0));
        assert_eq!(second, TileId(1));
        assert_eq!(registry.windows().count(), 1);
        assert_eq!(registry.canvases().count(), 1);
        assert!(registry.is_sentinel(VertexRef::new(second, DiagonalDirection::NorthWest)));
    }

    #[test]
    fn test_name_reassignment_unnames_previous_owner() {
        let (mut registry, first) = registry_with_window();
        let second = registry
            .create_tile_at(TileKind::Window, Vector::new(0, 0), Vector::new(10, 10), None)
            .unwrap();

        registry.name_tile(first, "heya").unwrap();
        registry.name_tile(second, "heya").unwrap();

        assert_eq!(registry.by_name("heya"), Some(second));
        assert_eq!(registry[first].name(), None);
        assert_eq!(registry[second].name(), Some("heya"));
    }

    #[test]
    fn test_renaming_releases_old_name() {
        let (mut registry, id) = registry_with_window();
        registry.name_tile(id, "left").unwrap();
        registry.name_tile(id, "right").unwrap();

        assert_eq!(registry.by_name("left"), None);
        assert_eq!(registry.by_name("right"), Some(id));
        assert_eq!(registry.unname_tile(id), Some("right".to_string()));
        assert_eq!(registry.by_name("right"), None);
    }

    #[test]
    fn test_invalid_names_are_rejected() {
        let (mut registry, id) = registry_with_window();

        for name in ["", "<4>", "a.b", "a,b", "x(1)", "two words"] {
            assert!(
                matches!(registry.name_tile(id, name), Err(GraphError::InvalidName(_))),
                "{:?} should be rejected",
                name
            );
        }
        assert!(registry.name_tile(id, "4").is_ok());
    }

    #[test]
    fn test_lookup_by_tag() {
        let (mut registry, id) = registry_with_window();
        registry.name_tile(id, "main").unwrap();

        let tag: Tag = "Window(main)".parse().unwrap();
        assert_eq!(
            registry.lookup(&tag).unwrap(),
            Element::Tile {
                id,
                kind: TileKind::Window
            }
        );

        let tag: Tag = "Vertex(<0>.south_east)".parse().unwrap();
        assert_eq!(
            registry.lookup(&tag).unwrap(),
            Element::Vertex(VertexRef::new(id, DiagonalDirection::SouthEast))
        );

        let tag: Tag = "Canvas(<0>)".parse().unwrap();
        assert!(matches!(
            registry.lookup(&tag),
            Err(GraphError::WrongKind { .. })
        ));

        let tag: Tag = "Tile(missing)".parse().unwrap();
        assert!(matches!(registry.lookup(&tag), Err(GraphError::UnknownName(_))));
    }

    #[test]
    fn test_generated_tags_round_trip_through_lookup() {
        let (registry, id) = registry_with_window();
        let element = Element::Edge(Region::of_tile(id).side(CardinalDirection::North));

        let tag = registry.tag_for(&element);
        assert_eq!(tag.to_string(), "Edge(<0>.north_west,<0>.north_east)");
        assert_eq!(registry.lookup(&tag).unwrap(), element);
    }

    #[test]
    fn test_remove_tile_releases_name() {
        let (mut registry, id) = registry_with_window();
        registry.name_tile(id, "gone").unwrap();

        let removed = registry.remove_tile(id).unwrap();
        assert_eq!(removed.id, id);
        assert!(!registry.contains(id));
        assert_eq!(registry.by_name("gone"), None);
        assert!(registry.is_empty());
        assert!(registry.remove_tile(id).is_err());
    }
}
