//! Policy knobs consumed by manipulation and navigation

use crate::config::parser::MAX_WINDOW_MARGIN;
use crate::models::geometry::CardinalDirection;
use crate::models::graph::TileId;
use crate::services::neighbourhood::NeighbourhoodVariant;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Complete settings passed explicitly into graph operations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub constraints: Constraints,
    pub navigation: NavigationSettings,
}

impl Settings {
    /// Settings with the given window margin and every other value defaulted
    pub fn with_margin(window_margin: u32) -> Self {
        Self {
            constraints: Constraints { window_margin },
            ..Self::default()
        }
    }

    /// Margin as a signed coordinate delta, capped at [`MAX_WINDOW_MARGIN`]
    pub fn margin(&self) -> i32 {
        let margin = self.constraints.window_margin.min(MAX_WINDOW_MARGIN);
        i32::try_from(margin).unwrap_or(i32::MAX)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Constraints {
    /// Gap left between two windows created by a split
    pub window_margin: u32,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavigationSettings {
    pub neighbourhood: NeighbourhoodVariant,
    pub tiebreaker: Tiebreaker,
}

/// Signature of a caller-supplied tie-break. `candidates` is never empty.
pub type TiebreakFn = fn(CardinalDirection, &[TileId]) -> TileId;

/// Picks one tile when navigation finds several candidates
#[derive(Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tiebreaker {
    /// First candidate for negative directions, last for positive ones, so
    /// that navigating back tends to return to the origin
    #[default]
    ExtremeSymmetrical,
    First,
    Last,
    #[serde(skip)]
    Custom(TiebreakFn),
}

impl Tiebreaker {
    pub fn pick(&self, direction: CardinalDirection, candidates: &[TileId]) -> Option<TileId> {
        let (first, last) = (candidates.first()?, candidates.last()?);
        match self {
            Tiebreaker::ExtremeSymmetrical if direction.is_positive() => Some(*last),
            Tiebreaker::ExtremeSymmetrical => Some(*first),
            Tiebreaker::First => Some(*first),
            Tiebreaker::Last => Some(*last),
            Tiebreaker::Custom(choose) => Some(choose(direction, candidates)),
        }
    }
}

impl fmt::Debug for Tiebreaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tiebreaker::ExtremeSymmetrical => f.write_str("ExtremeSymmetrical"),
            Tiebreaker::First => f.write_str("First"),
            Tiebreaker::Last => f.write_str("Last"),
            Tiebreaker::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extreme_symmetrical_picks_by_direction_sign() {
        let candidates = [TileId(1), TileId(2), TileId(3)];
        let tiebreaker = Tiebreaker::default();

        assert_eq!(tiebreaker.pick(CardinalDirection::North, &candidates), Some(TileId(1)));
        assert_eq!(tiebreaker.pick(CardinalDirection::West, &candidates), Some(TileId(1)));
        assert_eq!(tiebreaker.pick(CardinalDirection::South, &candidates), Some(TileId(3)));
        assert_eq!(tiebreaker.pick(CardinalDirection::East, &candidates), Some(TileId(3)));
        assert_eq!(tiebreaker.pick(CardinalDirection::East, &[]), None);
    }

    #[test]
    fn test_custom_tiebreaker() {
        fn middle(_: CardinalDirection, candidates: &[TileId]) -> TileId {
            candidates[candidates.len() / 2]
        }

        let tiebreaker = Tiebreaker::Custom(middle);
        let candidates = [TileId(4), TileId(5), TileId(6)];
        assert_eq!(tiebreaker.pick(CardinalDirection::West, &candidates), Some(TileId(5)));
        assert_eq!(format!("{:?}", tiebreaker), "Custom(..)");
    }

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.margin(), 0);
        assert_eq!(settings.navigation.neighbourhood, NeighbourhoodVariant::Narrow);
        assert!(matches!(
            settings.navigation.tiebreaker,
            Tiebreaker::ExtremeSymmetrical
        ));
        assert_eq!(Settings::with_margin(30).margin(), 30);
    }

    #[test]
    fn test_margin_is_capped() {
        assert_eq!(Settings::with_margin(MAX_WINDOW_MARGIN).margin(), 10_000);
        assert_eq!(Settings::with_margin(u32::MAX).margin(), 10_000);
    }
}
