//! tilegraph - corner-adjacency layout graph for tiling window managers
//!
//! Windows and the canvases that bound them are tiles whose corner vertices
//! link to the corners of adjacent tiles. Splits and fills repair those links
//! locally, so navigation and selection are plain walks over the graph.
//!
//! All operations are synchronous and assume a single writer: mutation goes
//! through `&mut TileRegistry` (or `&mut TileManager`), so the borrow checker
//! enforces the discipline.

pub mod cli;
pub mod config;
pub mod logging;
pub mod models;
pub mod services;

pub use config::Settings;
pub use models::*;
pub use services::*;

/// Result type alias for application-level operations
pub type Result<T> = anyhow::Result<T>;

/// Invariant violations raised by graph operations
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Tile {0} is already divided")]
    AlreadyDivided(TileId),

    #[error("Vertex {vertex} has {count} neighbours to the {direction}, expected exactly one")]
    BrokenChain {
        vertex: VertexRef,
        direction: CardinalDirection,
        count: usize,
    },

    #[error("Vertex {vertex} has no neighbour to the {direction}")]
    MissingNeighbour {
        vertex: VertexRef,
        direction: CardinalDirection,
    },

    #[error("Only one endpoint of {0} is a sentinel")]
    SentinelMismatch(Edge),

    #[error("Walk from {start} never reached {end}")]
    UnreachableEnd { start: VertexRef, end: VertexRef },

    #[error("Tile not found: {0}")]
    UnknownTile(String),

    #[error("No tile is named {0}")]
    UnknownName(String),

    #[error("Tile {tile} is a {found}, expected a {expected}")]
    WrongKind {
        tile: TileId,
        expected: TileKind,
        found: TileKind,
    },

    #[error("Invalid tile name: {0:?}")]
    InvalidName(String),

    #[error("Tile at {position} with size {size} leaves the coordinate range")]
    OutOfRange { position: Vector, size: Vector },

    #[error("Registry already holds the maximum of {0} tiles")]
    RegistryFull(usize),

    #[error(transparent)]
    Tag(#[from] TagParseError),
}
