//! Geometry primitives for the layout graph
//!
//! Integer vectors, the two axes, and the cardinal/diagonal directions used to
//! address tile sides and corners. All types here are plain `Copy` values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Index, IndexMut, Mul, Sub};

/// Immutable 2D integer point or direction vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Vector {
    pub horizontal: i32,
    pub vertical: i32,
}

impl Vector {
    pub const fn new(horizontal: i32, vertical: i32) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// Component along the given axis
    pub fn get(self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.horizontal,
            Axis::Vertical => self.vertical,
        }
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.horizontal, self.vertical)
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, other: Vector) -> Vector {
        Vector::new(self.horizontal + other.horizontal, self.vertical + other.vertical)
    }
}

impl Sub for Vector {
    type Output = Vector;

    fn sub(self, other: Vector) -> Vector {
        Vector::new(self.horizontal - other.horizontal, self.vertical - other.vertical)
    }
}

impl Mul<i32> for Vector {
    type Output = Vector;

    fn mul(self, scale: i32) -> Vector {
        Vector::new(self.horizontal * scale, self.vertical * scale)
    }
}

/// One of the two screen axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub const ALL: [Axis; 2] = [Axis::Horizontal, Axis::Vertical];

    pub fn perpendicular(self) -> Axis {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }

    /// The (negative, positive) directions along this axis
    pub fn directions(self) -> [CardinalDirection; 2] {
        match self {
            Axis::Horizontal => [CardinalDirection::West, CardinalDirection::East],
            Axis::Vertical => [CardinalDirection::North, CardinalDirection::South],
        }
    }

    pub fn negative(self) -> CardinalDirection {
        self.directions()[0]
    }

    pub fn positive(self) -> CardinalDirection {
        self.directions()[1]
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Horizontal => write!(f, "horizontal"),
            Axis::Vertical => write!(f, "vertical"),
        }
    }
}

/// Side of a tile, or a step direction through the graph.
///
/// North and west are the negative directions (towards smaller coordinates),
/// south and east the positive ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardinalDirection {
    North,
    East,
    South,
    West,
}

impl CardinalDirection {
    pub const ALL: [CardinalDirection; 4] = [
        CardinalDirection::North,
        CardinalDirection::East,
        CardinalDirection::South,
        CardinalDirection::West,
    ];

    pub fn axis(self) -> Axis {
        match self {
            CardinalDirection::North | CardinalDirection::South => Axis::Vertical,
            CardinalDirection::East | CardinalDirection::West => Axis::Horizontal,
        }
    }

    pub fn is_positive(self) -> bool {
        matches!(self, CardinalDirection::East | CardinalDirection::South)
    }

    pub fn opposite(self) -> CardinalDirection {
        match self {
            CardinalDirection::North => CardinalDirection::South,
            CardinalDirection::East => CardinalDirection::West,
            CardinalDirection::South => CardinalDirection::North,
            CardinalDirection::West => CardinalDirection::East,
        }
    }

    pub fn unit_vector(self) -> Vector {
        match self {
            CardinalDirection::North => Vector::new(0, -1),
            CardinalDirection::East => Vector::new(1, 0),
            CardinalDirection::South => Vector::new(0, 1),
            CardinalDirection::West => Vector::new(-1, 0),
        }
    }

    /// The two corners touching this side, ordered along the perpendicular axis
    /// (negative first). These are the endpoints of the side's edge.
    pub fn diagonals(self) -> [DiagonalDirection; 2] {
        let [first, second] = self.axis().perpendicular().directions();
        [
            DiagonalDirection::from_components(self, first),
            DiagonalDirection::from_components(self, second),
        ]
    }

    pub fn name(self) -> &'static str {
        match self {
            CardinalDirection::North => "north",
            CardinalDirection::East => "east",
            CardinalDirection::South => "south",
            CardinalDirection::West => "west",
        }
    }
}

impl fmt::Display for CardinalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for CardinalDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "north" | "n" => Ok(CardinalDirection::North),
            "east" | "e" => Ok(CardinalDirection::East),
            "south" | "s" => Ok(CardinalDirection::South),
            "west" | "w" => Ok(CardinalDirection::West),
            _ => Err(format!("Invalid direction: {}", s)),
        }
    }
}

/// Corner identity: one cardinal direction per axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagonalDirection {
    NorthWest,
    NorthEast,
    SouthEast,
    SouthWest,
}

impl DiagonalDirection {
    pub const ALL: [DiagonalDirection; 4] = [
        DiagonalDirection::NorthWest,
        DiagonalDirection::NorthEast,
        DiagonalDirection::SouthEast,
        DiagonalDirection::SouthWest,
    ];

    /// Builds the corner from one direction per axis, in either order.
    ///
    /// Panics if both directions lie on the same axis.
    pub fn from_components(a: CardinalDirection, b: CardinalDirection) -> Self {
        use CardinalDirection::*;
        match (a, b) {
            (North, West) | (West, North) => DiagonalDirection::NorthWest,
            (North, East) | (East, North) => DiagonalDirection::NorthEast,
            (South, East) | (East, South) => DiagonalDirection::SouthEast,
            (South, West) | (West, South) => DiagonalDirection::SouthWest,
            _ => panic!("{} and {} do not form a corner", a, b),
        }
    }

    pub fn horizontal(self) -> CardinalDirection {
        match self {
            DiagonalDirection::NorthWest | DiagonalDirection::SouthWest => CardinalDirection::West,
            DiagonalDirection::NorthEast | DiagonalDirection::SouthEast => CardinalDirection::East,
        }
    }

    pub fn vertical(self) -> CardinalDirection {
        match self {
            DiagonalDirection::NorthWest | DiagonalDirection::NorthEast => CardinalDirection::North,
            DiagonalDirection::SouthWest | DiagonalDirection::SouthEast => CardinalDirection::South,
        }
    }

    /// Component of the corner along the given axis
    pub fn get(self, axis: Axis) -> CardinalDirection {
        match axis {
            Axis::Horizontal => self.horizontal(),
            Axis::Vertical => self.vertical(),
        }
    }

    /// The (horizontal, vertical) directions that meet at this corner
    pub fn components(self) -> [CardinalDirection; 2] {
        [self.horizontal(), self.vertical()]
    }

    pub fn opposite(self) -> Self {
        DiagonalDirection::from_components(self.horizontal().opposite(), self.vertical().opposite())
    }

    pub fn name(self) -> &'static str {
        match self {
            DiagonalDirection::NorthWest => "north_west",
            DiagonalDirection::NorthEast => "north_east",
            DiagonalDirection::SouthEast => "south_east",
            DiagonalDirection::SouthWest => "south_west",
        }
    }
}

impl fmt::Display for DiagonalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for DiagonalDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "north_west" | "nw" => Ok(DiagonalDirection::NorthWest),
            "north_east" | "ne" => Ok(DiagonalDirection::NorthEast),
            "south_east" | "se" => Ok(DiagonalDirection::SouthEast),
            "south_west" | "sw" => Ok(DiagonalDirection::SouthWest),
            _ => Err(format!("Invalid corner: {}", s)),
        }
    }
}

/// One value per cardinal direction
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CardinalMap<T> {
    pub north: T,
    pub east: T,
    pub south: T,
    pub west: T,
}

impl<T> CardinalMap<T> {
    pub fn from_fn(mut f: impl FnMut(CardinalDirection) -> T) -> Self {
        Self {
            north: f(CardinalDirection::North),
            east: f(CardinalDirection::East),
            south: f(CardinalDirection::South),
            west: f(CardinalDirection::West),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (CardinalDirection, &T)> {
        CardinalDirection::ALL.into_iter().map(move |dir| (dir, &self[dir]))
    }
}

impl<T> Index<CardinalDirection> for CardinalMap<T> {
    type Output = T;

    fn index(&self, direction: CardinalDirection) -> &T {
        match direction {
            CardinalDirection::North => &self.north,
            CardinalDirection::East => &self.east,
            CardinalDirection::South => &self.south,
            CardinalDirection::West => &self.west,
        }
    }
}

impl<T> IndexMut<CardinalDirection> for CardinalMap<T> {
    fn index_mut(&mut self, direction: CardinalDirection) -> &mut T {
        match direction {
            CardinalDirection::North => &mut self.north,
            CardinalDirection::East => &mut self.east,
            CardinalDirection::South => &mut self.south,
            CardinalDirection::West => &mut self.west,
        }
    }
}

/// One value per corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DiagonalMap<T> {
    pub north_west: T,
    pub north_east: T,
    pub south_east: T,
    pub south_west: T,
}

impl<T> DiagonalMap<T> {
    pub fn from_fn(mut f: impl FnMut(DiagonalDirection) -> T) -> Self {
        Self {
            north_west: f(DiagonalDirection::NorthWest),
            north_east: f(DiagonalDirection::NorthEast),
            south_east: f(DiagonalDirection::SouthEast),
            south_west: f(DiagonalDirection::SouthWest),
        }
    }

    pub fn map<U>(&self, mut f: impl FnMut(DiagonalDirection, &T) -> U) -> DiagonalMap<U> {
        DiagonalMap::from_fn(|role| f(role, &self[role]))
    }

    pub fn iter(&self) -> impl Iterator<Item = (DiagonalDirection, &T)> {
        DiagonalDirection::ALL.into_iter().map(move |role| (role, &self[role]))
    }
}

impl<T> Index<DiagonalDirection> for DiagonalMap<T> {
    type Output = T;

    fn index(&self, role: DiagonalDirection) -> &T {
        match role {
            DiagonalDirection::NorthWest => &self.north_west,
            DiagonalDirection::NorthEast => &self.north_east,
            DiagonalDirection::SouthEast => &self.south_east,
            DiagonalDirection::SouthWest => &self.south_west,
        }
    }
}

impl<T> IndexMut<DiagonalDirection> for DiagonalMap<T> {
    fn index_mut(&mut self, role: DiagonalDirection) -> &mut T {
        match role {
            DiagonalDirection::NorthWest => &mut self.north_west,
            DiagonalDirection::NorthEast => &mut self.north_east,
            DiagonalDirection::SouthEast => &mut self.south_east,
            DiagonalDirection::SouthWest => &mut self.south_west,
        }
    }
}
