//! Board geometry: positions, directions and rotations

use std::fmt;

/// Cardinal direction, in clockwise order starting north
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    N,
    E,
    S,
    W,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::N, Direction::E, Direction::S, Direction::W];

    pub fn index(self) -> usize {
        self as usize
    }

    fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    /// Direction obtained by applying the rotation to this one
    pub fn rotated(self, rotation: Rotation) -> Self {
        Self::from_index(self.index() + rotation.quarter_turns_cw())
    }

    pub fn opposite(self) -> Self {
        self.rotated(Rotation::HalfTurn)
    }
}

/// Clockwise rotation of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Rotation {
    #[default]
    None,
    Right,
    HalfTurn,
    Left,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::None,
        Rotation::Right,
        Rotation::HalfTurn,
        Rotation::Left,
    ];

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    pub fn quarter_turns_cw(self) -> usize {
        self as usize
    }

    pub fn degrees_cw(self) -> u32 {
        self.quarter_turns_cw() as u32 * 90
    }

    /// Sum of two rotations
    pub fn add(self, other: Rotation) -> Self {
        Self::from_index(self.quarter_turns_cw() + other.quarter_turns_cw())
    }

    /// Rotation that cancels this one
    pub fn negated(self) -> Self {
        Self::from_index(Self::ALL.len() - self.quarter_turns_cw())
    }
}

/// Position of a tile on the board
///
/// The ordering compares `x` first, then `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub const ORIGIN: Pos = Pos { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn translated(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Neighbouring position in the given direction (north is negative y)
    pub fn neighbor(self, direction: Direction) -> Self {
        match direction {
            Direction::N => self.translated(0, -1),
            Direction::E => self.translated(1, 0),
            Direction::S => self.translated(0, 1),
            Direction::W => self.translated(-1, 0),
        }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
