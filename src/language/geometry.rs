use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// Axial hex coordinate. The implied third cube coordinate is `-q - r`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    pub q: i64,
    pub r: i64,
}

impl Point {
    pub const ORIGIN: Point = Point { q: 0, r: 0 };

    pub const fn new(q: i64, r: i64) -> Self {
        Self { q, r }
    }

    /// The implied cube coordinate `y = -q - r`.
    pub fn y(self) -> i64 {
        -self.q - self.r
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, other: Point) -> Point {
        Point::new(self.q + other.q, self.r + other.r)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, other: Point) -> Point {
        Point::new(self.q - other.q, self.r - other.r)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, other: Point) {
        *self = *self + other;
    }
}

impl SubAssign for Point {
    fn sub_assign(&mut self, other: Point) {
        *self = *self - other;
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(Q: {:>3}, R: {:>3})", self.q, self.r)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    #[default]
    East,
    SouthEast,
    SouthWest,
    West,
    NorthWest,
    NorthEast,
}

use Direction::*;

/// Mirror and branch characters. `LessThan` and `GreaterThan` pick between two
/// tables depending on the sign of the current memory edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mirror {
    Slash,
    Backslash,
    Underscore,
    Pipe,
    LessThan,
    GreaterThan,
}

const REFLECT_SLASH: [Direction; 6] = [NorthWest, West, SouthWest, SouthEast, East, NorthEast];
const REFLECT_BACKSLASH: [Direction; 6] = [SouthWest, SouthEast, East, NorthEast, NorthWest, West];
const REFLECT_UNDERSCORE: [Direction; 6] = [East, NorthEast, NorthWest, West, SouthWest, SouthEast];
const REFLECT_PIPE: [Direction; 6] = [West, SouthWest, SouthEast, East, NorthEast, NorthWest];
const REFLECT_LESS_POSITIVE: [Direction; 6] = [SouthEast, NorthWest, West, East, West, SouthWest];
const REFLECT_LESS_NON_POSITIVE: [Direction; 6] = [NorthEast, NorthWest, West, East, West, SouthWest];
const REFLECT_GREATER_POSITIVE: [Direction; 6] = [West, East, NorthEast, NorthWest, SouthEast, East];
const REFLECT_GREATER_NON_POSITIVE: [Direction; 6] =
    [West, East, NorthEast, SouthWest, SouthEast, East];

const UNIT_VECTORS: [Point; 6] = [
    Point::new(1, 0),
    Point::new(0, 1),
    Point::new(-1, 1),
    Point::new(-1, 0),
    Point::new(0, -1),
    Point::new(1, -1),
];

impl Direction {
    pub const ALL: [Direction; 6] = [East, SouthEast, SouthWest, West, NorthWest, NorthEast];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn vector(self) -> Point {
        UNIT_VECTORS[self.index()]
    }

    /// Reflects off `mirror`. `positive` only matters for the two branch mirrors.
    pub fn reflect(self, mirror: Mirror, positive: bool) -> Direction {
        let table = match mirror {
            Mirror::Slash => &REFLECT_SLASH,
            Mirror::Backslash => &REFLECT_BACKSLASH,
            Mirror::Underscore => &REFLECT_UNDERSCORE,
            Mirror::Pipe => &REFLECT_PIPE,
            Mirror::LessThan if positive => &REFLECT_LESS_POSITIVE,
            Mirror::LessThan => &REFLECT_LESS_NON_POSITIVE,
            Mirror::GreaterThan if positive => &REFLECT_GREATER_POSITIVE,
            Mirror::GreaterThan => &REFLECT_GREATER_NON_POSITIVE,
        };
        table[self.index()]
    }

    pub fn short_name(self) -> &'static str {
        match self {
            East => "E",
            SouthEast => "SE",
            SouthWest => "SW",
            West => "W",
            NorthWest => "NW",
            NorthEast => "NE",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.short_name())
    }
}

impl Mirror {
    pub fn from_char(ch: char) -> Option<Mirror> {
        match ch {
            '/' => Some(Mirror::Slash),
            '\\' => Some(Mirror::Backslash),
            '_' => Some(Mirror::Underscore),
            '|' => Some(Mirror::Pipe),
            '<' => Some(Mirror::LessThan),
            '>' => Some(Mirror::GreaterThan),
            _ => None,
        }
    }

    pub fn is_sign_dependent(self) -> bool {
        matches!(self, Mirror::LessThan | Mirror::GreaterThan)
    }
}
