//! Directional focus movement between tiles

use crate::config::Settings;
use crate::models::geometry::CardinalDirection;
use crate::models::graph::{TileId, TileKind};
use crate::models::registry::TileRegistry;
use crate::services::examination::is_divided;
use crate::services::neighbourhood::interior_canvas;
use crate::GraphError;
use tracing::trace;

/// The tile reached by moving from `tile` towards `direction`.
///
/// Candidates come from the configured exterior neighbourhood and the
/// configured tiebreaker chooses among several. `None` means nothing lies in
/// that direction.
pub fn next_tile(
    registry: &TileRegistry,
    tile: TileId,
    direction: CardinalDirection,
    settings: &Settings,
) -> Result<Option<TileId>, GraphError> {
    let navigation = &settings.navigation;
    let candidates = navigation.neighbourhood.exterior(registry, tile, direction)?;
    let next = navigation.tiebreaker.pick(direction, &candidates);
    trace!(
        tile = %tile,
        direction = %direction,
        candidates = candidates.len(),
        next = ?next,
        "navigated"
    );
    Ok(next)
}

/// Like [`next_tile`], but only ever lands on focusable tiles: windows and
/// empty canvases.
///
/// Leaving a window into its enclosing canvas continues on to whatever lies
/// beyond that canvas. Arriving at a divided canvas picks one of the tiles it
/// contains along its `direction` side.
pub fn next_undivided_tile(
    registry: &TileRegistry,
    tile: TileId,
    direction: CardinalDirection,
    settings: &Settings,
) -> Result<Option<TileId>, GraphError> {
    let Some(mut result) = next_tile(registry, tile, direction, settings)? else {
        return Ok(None);
    };

    if !registry[tile].is_sentinel() && registry[result].is_sentinel() {
        match next_tile(registry, result, direction, settings)? {
            Some(beyond) => result = beyond,
            None => return Ok(None),
        }
    }

    if registry.kind(result) == TileKind::Canvas && is_divided(registry, result) {
        let candidates = interior_canvas(registry, result, direction)?;
        return Ok(settings.navigation.tiebreaker.pick(direction, &candidates));
    }
    Ok(Some(result))
}
