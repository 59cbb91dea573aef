//! Textual tags naming graph elements for external callers (CLI, IPC)
//!
//! Grammar: `TypeName(inner)` where
//! - tiles use `Window(<3>)`, `Canvas(main)` or the kind-agnostic `Tile(..)`;
//!   the inner part is either the `<N>` id form or a registered name
//! - vertices use `Vertex(tile.role)`
//! - edges use `Edge(vertex,vertex)`
//! - boxes use `Box(nw,ne,se,sw)`

use crate::models::geometry::{DiagonalDirection, DiagonalMap};
use crate::models::graph::{TileId, TileKind};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TagParseError {
    #[error("Malformed tag: {0}")]
    Malformed(String),
    #[error("Unknown tag type: {0}")]
    UnknownType(String),
    #[error("Invalid corner role: {0}")]
    InvalidRole(String),
    #[error("Expected {expected} vertices in {text}, found {found}")]
    WrongArity {
        text: String,
        expected: usize,
        found: usize,
    },
}

fn outer_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\s*([A-Za-z]+)\((.*)\)\s*$").expect("valid tag regex"))
}

fn tile_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^<\s*(\d+)\s*>$").expect("valid tile id regex"))
}

/// How a tile is identified: by generated id or by registered name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TileKey {
    Id(TileId),
    Name(String),
}

impl fmt::Display for TileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileKey::Id(id) => write!(f, "{}", id),
            TileKey::Name(name) => f.write_str(name),
        }
    }
}

impl FromStr for TileKey {
    type Err = TagParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();
        if let Some(captures) = tile_id_pattern().captures(text) {
            let number = captures[1]
                .parse::<u32>()
                .map_err(|_| TagParseError::Malformed(text.to_string()))?;
            return Ok(TileKey::Id(TileId(number)));
        }
        if text.is_empty() {
            return Err(TagParseError::Malformed(text.to_string()));
        }
        Ok(TileKey::Name(text.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TileTag {
    /// `None` matches a tile of any kind
    pub kind: Option<TileKind>,
    pub key: TileKey,
}

impl TileTag {
    pub fn id(id: TileId) -> Self {
        Self {
            kind: None,
            key: TileKey::Id(id),
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            kind: None,
            key: TileKey::Name(name.into()),
        }
    }
}

impl fmt::Display for TileTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let type_name = self.kind.map(TileKind::name).unwrap_or("Tile");
        write!(f, "{}({})", type_name, self.key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VertexTag {
    pub owner: TileTag,
    pub role: DiagonalDirection,
}

impl VertexTag {
    fn inner(&self) -> String {
        format!("{}.{}", self.owner.key, self.role)
    }

    fn parse_inner(text: &str) -> Result<Self, TagParseError> {
        let (owner, role) = text
            .trim()
            .rsplit_once('.')
            .ok_or_else(|| TagParseError::Malformed(text.to_string()))?;
        let role = DiagonalDirection::from_str(role)
            .map_err(|_| TagParseError::InvalidRole(role.to_string()))?;
        Ok(Self {
            owner: TileTag {
                kind: None,
                key: owner.parse()?,
            },
            role,
        })
    }
}

impl fmt::Display for VertexTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vertex({})", self.inner())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EdgeTag {
    pub a: VertexTag,
    pub b: VertexTag,
}

impl fmt::Display for EdgeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Edge({},{})", self.a.inner(), self.b.inner())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoxTag {
    pub corners: DiagonalMap<VertexTag>,
}

impl fmt::Display for BoxTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner: Vec<String> = DiagonalDirection::ALL
            .iter()
            .map(|role| self.corners[*role].inner())
            .collect();
        write!(f, "Box({})", inner.join(","))
    }
}

/// Any parseable tag
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tag {
    Tile(TileTag),
    Vertex(VertexTag),
    Edge(EdgeTag),
    Box(BoxTag),
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::Tile(tag) => tag.fmt(f),
            Tag::Vertex(tag) => tag.fmt(f),
            Tag::Edge(tag) => tag.fmt(f),
            Tag::Box(tag) => tag.fmt(f),
        }
    }
}

fn parse_vertex_list(text: &str, expected: usize) -> Result<Vec<VertexTag>, TagParseError> {
    let parts: Vec<&str> = text.split(',').collect();
    if parts.len() != expected {
        return Err(TagParseError::WrongArity {
            text: text.to_string(),
            expected,
            found: parts.len(),
        });
    }
    parts.into_iter().map(VertexTag::parse_inner).collect()
}

impl FromStr for Tag {
    type Err = TagParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let captures = outer_pattern()
            .captures(text)
            .ok_or_else(|| TagParseError::Malformed(text.to_string()))?;
        let type_name = &captures[1];
        let inner = &captures[2];

        let tile = |kind: Option<TileKind>| -> Result<Tag, TagParseError> {
            Ok(Tag::Tile(TileTag {
                kind,
                key: inner.parse()?,
            }))
        };

        match type_name {
            "Tile" => tile(None),
            "Window" => tile(Some(TileKind::Window)),
            "Canvas" => tile(Some(TileKind::Canvas)),
            "Vertex" => Ok(Tag::Vertex(VertexTag::parse_inner(inner)?)),
            "Edge" => {
                let mut vertices = parse_vertex_list(inner, 2)?.into_iter();
                match (vertices.next(), vertices.next()) {
                    (Some(a), Some(b)) => Ok(Tag::Edge(EdgeTag { a, b })),
                    _ => Err(TagParseError::Malformed(text.to_string())),
                }
            }
            "Box" => {
                let vertices = parse_vertex_list(inner, 4)?;
                match <[VertexTag; 4]>::try_from(vertices) {
                    Ok([north_west, north_east, south_east, south_west]) => Ok(Tag::Box(BoxTag {
                        corners: DiagonalMap {
                            north_west,
                            north_east,
                            south_east,
                            south_west,
                        },
                    })),
                    Err(_) => Err(TagParseError::Malformed(text.to_string())),
                }
            }
            other => Err(TagParseError::UnknownType(other.to_string())),
        }
    }
}
