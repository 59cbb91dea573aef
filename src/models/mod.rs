//! Data models for the tile layout graph

pub mod geometry;
pub mod graph;
pub mod problem;
pub mod registry;
pub mod tag;

pub use geometry::*;
pub use graph::*;
pub use problem::*;
pub use registry::*;
pub use tag::*;
