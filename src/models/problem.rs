//! Recoverable constraint problems
//!
//! Problems are returned as values alongside a completed operation. They never
//! abort the operation that detected them.

use crate::models::geometry::{Axis, CardinalDirection};
use crate::models::graph::{Edge, Region, VertexRef};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "problem", rename_all = "snake_case")]
pub enum StateProblem {
    /// The region cannot hold two windows separated by the configured margin
    BoxTooSmallForMargins { region: Region },
    /// Edge endpoints share neither coordinate
    NotAxisAligned { edge: Edge },
    /// Edge endpoint `a` lies after `b` on the given axis
    OutOfOrder { edge: Edge, axis: Axis },
    /// The single-neighbour chain from `a` does not reach `b`
    BrokenEdge { edge: Edge },
    NeighbourAbsence {
        vertex: VertexRef,
        direction: CardinalDirection,
    },
    InsufficientDistance {
        vertex: VertexRef,
        other: VertexRef,
        axis: Axis,
        expected: i32,
        actual: i32,
    },
}

impl StateProblem {
    /// Short machine-friendly identifier
    pub fn kind(&self) -> &'static str {
        match self {
            StateProblem::BoxTooSmallForMargins { .. } => "box_too_small_for_margins",
            StateProblem::NotAxisAligned { .. } => "not_axis_aligned",
            StateProblem::OutOfOrder { .. } => "out_of_order",
            StateProblem::BrokenEdge { .. } => "broken_edge",
            StateProblem::NeighbourAbsence { .. } => "neighbour_absence",
            StateProblem::InsufficientDistance { .. } => "insufficient_distance",
        }
    }
}

impl fmt::Display for StateProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateProblem::BoxTooSmallForMargins { region } => {
                write!(f, "{} is too small to fit the configured margins", region)
            }
            StateProblem::NotAxisAligned { edge } => {
                write!(f, "{} endpoints are not axis aligned", edge)
            }
            StateProblem::OutOfOrder { edge, axis } => {
                write!(f, "{} endpoints are out of order on the {} axis", edge, axis)
            }
            StateProblem::BrokenEdge { edge } => {
                write!(f, "{} is not a continuous chain of single neighbours", edge)
            }
            StateProblem::NeighbourAbsence { vertex, direction } => {
                write!(f, "{} has no neighbour to the {}", vertex, direction)
            }
            StateProblem::InsufficientDistance {
                vertex,
                other,
                axis,
                expected,
                actual,
            } => write!(
                f,
                "{} and {} are {} apart on the {} axis, expected at least {}",
                vertex, other, actual, axis, expected
            ),
        }
    }
}
