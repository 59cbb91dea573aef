//! Shared fixtures for service tests

use crate::models::geometry::{Axis, Vector};
use crate::models::graph::{TileId, TileKind};
use crate::models::registry::TileRegistry;
use crate::services::manipulation::fill;

/// A 300x300 canvas at (100, 100) holding a single window.
///
/// Returns `(registry, canvas, window)`.
pub(crate) fn filled_canvas() -> (TileRegistry, TileId, TileId) {
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

/// Start and end coordinate of a tile on one axis
pub(crate) fn span(registry: &TileRegistry, tile: TileId, axis: Axis) -> (i32, i32) {
    let corners = &registry[tile].corners;
    (
        corners.north_west.location.get(axis),
        corners.south_east.location.get(axis),
    )
}
