//! Session object tying a registry to its settings
//!
//! `TileManager` is the entry point for callers that drive the graph from
//! outside (the CLI, an event loop). Every mutation takes `&mut self`, so a
//! manager has exactly one writer at a time.

use crate::config::Settings;
use crate::models::geometry::{CardinalDirection, Vector};
use crate::models::graph::{Edge, Element, TileId, TileKind};
use crate::models::problem::StateProblem;
use crate::models::registry::TileRegistry;
use crate::models::tag::{Tag, TileTag};
use crate::services::{examination, manipulation, navigation, selection};
use crate::GraphError;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

/// Counters for operations performed through a manager
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ManagerMetrics {
    pub fills: u64,
    pub splits: u64,
    pub navigations: u64,
    pub problems_reported: u64,
}

/// Read-only view of one tile for display and JSON output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TileSnapshot {
    pub id: TileId,
    pub tag: String,
    pub kind: TileKind,
    pub name: Option<String>,
    pub position: Vector,
    pub size: Vector,
    pub divided: bool,
}

/// Read-only view of a whole layout. Snapshots are never loaded back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutSnapshot {
    pub window_margin: u32,
    pub tiles: Vec<TileSnapshot>,
}

#[derive(Debug, Default)]
pub struct TileManager {
    registry: TileRegistry,
    settings: Settings,
    metrics: ManagerMetrics,
}

impl TileManager {
    pub fn new(settings: Settings) -> Self {
        Self {
            registry: TileRegistry::new(),
            settings,
            metrics: ManagerMetrics::default(),
        }
    }

    pub fn registry(&self) -> &TileRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    pub fn metrics(&self) -> ManagerMetrics {
        self.metrics
    }

    /// Create an empty canvas bounding a managed area
    #[instrument(skip(self))]
    pub fn create_canvas(
        &mut self,
        position: Vector,
        size: Vector,
        name: Option<&str>,
    ) -> Result<TileId, GraphError> {
        let canvas = self
            .registry
            .create_tile_at(TileKind::Canvas, position, size, name)?;
        info!(canvas = %canvas, "created canvas");
        Ok(canvas)
    }

    #[instrument(skip(self))]
    pub fn fill(&mut self, target: TileId) -> Result<TileId, GraphError> {
        let window = manipulation::fill(&mut self.registry, target)?;
        self.metrics.fills += 1;
        Ok(window)
    }

    /// Split a window, logging any constraint problem before handing it back
    #[instrument(skip(self))]
    pub fn split(
        &mut self,
        target: TileId,
        direction: CardinalDirection,
    ) -> Result<(TileId, Vec<StateProblem>), GraphError> {
        let registry = &mut self.registry;
        let settings = &self.settings;
        let (window, problems) = crate::trace_performance!("split", {
            manipulation::split(registry, target, direction, settings)
        })?;

        for problem in &problems {
            warn!(%problem, "split completed with a constraint problem");
        }
        self.metrics.splits += 1;
        self.metrics.problems_reported += problems.len() as u64;
        Ok((window, problems))
    }

    #[instrument(skip(self))]
    pub fn connect_canvases(
        &mut self,
        from: TileId,
        to: TileId,
        direction: CardinalDirection,
    ) -> Result<(), GraphError> {
        manipulation::connect_canvases(&mut self.registry, from, to, direction)
    }

    #[instrument(skip(self))]
    pub fn next_tile(
        &mut self,
        tile: TileId,
        direction: CardinalDirection,
    ) -> Result<Option<TileId>, GraphError> {
        self.metrics.navigations += 1;
        navigation::next_tile(&self.registry, tile, direction, &self.settings)
    }

    #[instrument(skip(self))]
    pub fn next_undivided_tile(
        &mut self,
        tile: TileId,
        direction: CardinalDirection,
    ) -> Result<Option<TileId>, GraphError> {
        self.metrics.navigations += 1;
        navigation::next_undivided_tile(&self.registry, tile, direction, &self.settings)
    }

    pub fn find_parallel_end(&self, edge: Edge, direction: CardinalDirection) -> Option<Edge> {
        selection::find_parallel_end(&self.registry, edge, direction)
    }

    pub fn validate(&self, element: &Element) -> Vec<StateProblem> {
        examination::validate(&self.registry, element)
    }

    /// Spacing problems around a tile using the configured margin
    pub fn check_spacing(&self, tile: TileId) -> Result<Vec<StateProblem>, GraphError> {
        examination::check_spacing(&self.registry, tile, self.settings.margin())
    }

    pub fn name(&mut self, tile: TileId, name: &str) -> Result<(), GraphError> {
        self.registry.name_tile(tile, name)
    }

    pub fn unname(&mut self, tile: TileId) -> Option<String> {
        self.registry.unname_tile(tile)
    }

    /// Resolve textual tag to a graph element
    pub fn lookup(&self, text: &str) -> Result<Element, GraphError> {
        let tag: Tag = text.parse()?;
        self.registry.lookup(&tag)
    }

    /// Resolve a tile from a full tag (`Window(<3>)`) or a bare key (`<3>`,
    /// `main`)
    pub fn resolve_tile(&self, text: &str) -> Result<TileId, GraphError> {
        let tag = match text.parse::<Tag>() {
            Ok(Tag::Tile(tag)) => tag,
            Ok(other) => {
                debug!(tag = %other, "tag does not name a tile");
                return Err(GraphError::UnknownTile(text.to_string()));
            }
            Err(_) => TileTag {
                kind: None,
                key: text.parse()?,
            },
        };
        self.registry.resolve_tile(&tag)
    }

    /// Tag text for a tile, preferring its name
    pub fn tag(&self, tile: TileId) -> String {
        self.registry.tile_tag(tile).to_string()
    }

    pub fn snapshot(&self) -> LayoutSnapshot {
        let tiles = self
            .registry
            .tiles()
            .map(|tile| TileSnapshot {
                id: tile.id,
                tag: self.tag(tile.id),
                kind: tile.kind,
                name: tile.name().map(str::to_string),
                position: tile.corners.north_west.location,
                size: tile.size(),
                divided: examination::is_divided(&self.registry, tile.id),
            })
            .collect();
        LayoutSnapshot {
            window_margin: self.settings.constraints.window_margin,
            tiles,
        }
    }
}
