//! Graph services: examination, manipulation, navigation and selection

pub mod examination;
pub mod manager;
pub mod manipulation;
pub mod navigation;
pub mod neighbourhood;
pub mod selection;

#[cfg(test)]
pub(crate) mod test_support;

pub use examination::{
    are_aligned, check_spacing, covers_contents, is_divided, validate, validate_edge,
    validate_region, validate_vertex, validate_window,
};
pub use manager::{LayoutSnapshot, ManagerMetrics, TileManager, TileSnapshot};
pub use manipulation::{
    connect_canvases, establish_connections_along_injection_axis, fill,
    repair_connections_along_perpendicular_axis, split, SideNeighbours,
};
pub use navigation::{next_tile, next_undivided_tile};
pub use neighbourhood::{interior_canvas, NeighbourhoodVariant};
pub use selection::find_parallel_end;
