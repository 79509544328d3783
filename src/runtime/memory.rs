//! Memory lives on the edges of an unbounded hexagonal lattice. Every edge is
//! named by the cell to its west plus one of the East, NorthEast and SouthEast
//! directions; the other three directions are the same edges seen from a
//! neighbouring cell.

use crate::language::geometry::{Direction, Point};
use std::collections::HashMap;
use std::fmt;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Memory {
    edges: HashMap<(Point, Direction), i64>,
    mp: Point,
    dir: Direction,
    clockwise: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cursor {
    pub point: Point,
    pub dir: Direction,
    pub clockwise: bool,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> Cursor {
        Cursor {
            point: self.mp,
            dir: self.dir,
            clockwise: self.clockwise,
        }
    }

    pub fn get(&self) -> i64 {
        self.read(self.mp, self.dir)
    }

    pub fn set(&mut self, value: i64) {
        self.edges.insert((self.mp, self.dir), value);
    }

    pub fn is_positive(&self) -> bool {
        self.get() > 0
    }

    pub fn get_left(&self) -> i64 {
        let left = self.left_index();
        self.read(left.point, left.dir)
    }

    pub fn get_right(&self) -> i64 {
        let right = self.right_index();
        self.read(right.point, right.dir)
    }

    pub fn move_left(&mut self) {
        self.goto(self.left_index());
    }

    pub fn move_right(&mut self) {
        self.goto(self.right_index());
    }

    pub fn reverse(&mut self) {
        self.clockwise = !self.clockwise;
    }

    /// Number of edges that have been written at least once.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    fn read(&self, point: Point, dir: Direction) -> i64 {
        self.edges.get(&(point, dir)).copied().unwrap_or(0)
    }

    fn goto(&mut self, cursor: Cursor) {
        self.mp = cursor.point;
        self.dir = cursor.dir;
        self.clockwise = cursor.clockwise;
    }

    fn left_index(&self) -> Cursor {
        let Cursor {
            mut point,
            mut dir,
            mut clockwise,
        } = self.cursor();
        match dir {
            Direction::NorthEast => {
                point += if clockwise {
                    Point::new(1, -1)
                } else {
                    Point::new(0, -1)
                };
                dir = Direction::SouthEast;
                clockwise = !clockwise;
            }
            Direction::East => {
                if clockwise {
                    point += Point::new(0, 1);
                }
                dir = Direction::NorthEast;
            }
            Direction::SouthEast => {
                if clockwise {
                    point += Point::new(-1, 1);
                }
                dir = Direction::East;
            }
            _ => {}
        }
        Cursor {
            point,
            dir,
            clockwise,
        }
    }

    fn right_index(&self) -> Cursor {
        let Cursor {
            mut point,
            mut dir,
            mut clockwise,
        } = self.cursor();
        match dir {
            Direction::NorthEast => {
                if !clockwise {
                    point += Point::new(0, -1);
                }
                dir = Direction::East;
            }
            Direction::East => {
                if !clockwise {
                    point += Point::new(1, -1);
                }
                dir = Direction::SouthEast;
            }
            Direction::SouthEast => {
                point += if clockwise {
                    Point::new(-1, 1)
                } else {
                    Point::new(0, 1)
                };
                dir = Direction::NorthEast;
                clockwise = !clockwise;
            }
            _ => {}
        }
        Cursor {
            point,
            dir,
            clockwise,
        }
    }
}

impl fmt::Display for Memory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Memory (values are stored on the E, NE, and SE edges of the hexagons indicated by the coordinates):"
        )?;
        let mut edges: Vec<_> = self.edges.iter().collect();
        edges.sort_by_key(|((point, dir), _)| (point.q, point.r, -dir.vector().r));
        for ((point, dir), value) in edges {
            let active = if *point == self.mp && *dir == self.dir {
                " (active)"
            } else {
                ""
            };
            writeln!(f, "{point} {dir:>2}: {value:>6}{active}")?;
        }
        writeln!(f, "Pointer:")?;
        writeln!(f, "{} {:>2}", self.mp, self.dir)?;
        write!(f, "Clockwise: {}", self.clockwise)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(point: Point, dir: Direction, clockwise: bool) -> Memory {
        Memory {
            edges: HashMap::new(),
            mp: point,
            dir,
            clockwise,
        }
    }

    fn all_positions() -> Vec<Memory> {
        let mut out = Vec::new();
        for dir in [Direction::East, Direction::NorthEast, Direction::SouthEast] {
            for clockwise in [false, true] {
                out.push(at(Point::new(2, -1), dir, clockwise));
            }
        }
        out
    }

    #[test]
    fn unset_edges_read_zero() {
        let mut memory = Memory::new();
        assert_eq!(memory.get(), 0);
        assert_eq!(memory.get_left(), 0);
        memory.set(42);
        assert_eq!(memory.get(), 42);
        assert_eq!(memory.len(), 1);
    }

    #[test]
    fn left_and_right_follow_the_lattice_table() {
        let origin = Point::ORIGIN;
        let cases = [
            (Direction::NorthEast, true, Point::new(1, -1), Direction::SouthEast, false),
            (Direction::NorthEast, false, Point::new(0, -1), Direction::SouthEast, true),
            (Direction::East, true, Point::new(0, 1), Direction::NorthEast, true),
            (Direction::East, false, origin, Direction::NorthEast, false),
            (Direction::SouthEast, true, Point::new(-1, 1), Direction::East, true),
            (Direction::SouthEast, false, origin, Direction::East, false),
        ];
        for (dir, cw, point, new_dir, new_cw) in cases {
            let mut memory = at(origin, dir, cw);
            memory.move_left();
            assert_eq!(
                memory.cursor(),
                Cursor {
                    point,
                    dir: new_dir,
                    clockwise: new_cw
                },
                "left from {dir} cw={cw}"
            );
        }

        let cases = [
            (Direction::NorthEast, true, origin, Direction::East, true),
            (Direction::NorthEast, false, Point::new(0, -1), Direction::East, false),
            (Direction::East, true, origin, Direction::SouthEast, true),
            (Direction::East, false, Point::new(1, -1), Direction::SouthEast, false),
            (Direction::SouthEast, true, Point::new(-1, 1), Direction::NorthEast, false),
            (Direction::SouthEast, false, Point::new(0, 1), Direction::NorthEast, true),
        ];
        for (dir, cw, point, new_dir, new_cw) in cases {
            let mut memory = at(origin, dir, cw);
            memory.move_right();
            assert_eq!(
                memory.cursor(),
                Cursor {
                    point,
                    dir: new_dir,
                    clockwise: new_cw
                },
                "right from {dir} cw={cw}"
            );
        }
    }

    #[test]
    fn backward_moves_undo_forward_moves() {
        for start in all_positions() {
            let mut memory = start.clone();
            memory.move_left();
            memory.reverse();
            memory.move_right();
            memory.reverse();
            assert_eq!(memory.cursor(), start.cursor());

            let mut memory = start.clone();
            memory.move_right();
            memory.reverse();
            memory.move_left();
            memory.reverse();
            assert_eq!(memory.cursor(), start.cursor());
        }
    }

    #[test]
    fn neighbour_reads_do_not_move() {
        let mut memory = Memory::new();
        memory.move_left();
        memory.set(3);
        memory.move_right();
        memory.move_right();
        memory.set(4);
        let mut memory = Memory {
            mp: Point::ORIGIN,
            dir: Direction::East,
            clockwise: false,
            ..memory
        };
        let before = memory.cursor();
        assert_eq!(memory.get_left(), 3);
        assert_eq!(memory.cursor(), before);
        memory.set(0);
        assert_eq!(memory.get(), 0);
    }

    #[test]
    fn clones_are_independent() {
        let mut original = Memory::new();
        original.set(5);
        let mut copy = original.clone();
        copy.set(9);
        copy.move_left();
        assert_eq!(original.get(), 5);
        assert_eq!(original.cursor().dir, Direction::East);
    }

    #[test]
    fn dump_marks_active_edge() {
        let mut memory = Memory::new();
        memory.set(12);
        let dump = memory.to_string();
        assert!(dump.contains("12 (active)"));
        assert!(dump.ends_with("Clockwise: false"));
    }
}
