use crate::language::geometry::{Direction, Point};
use std::fmt;

/// Filler for cells the source text did not reach.
pub const FILLER: char = '.';

/// Characters dropped before the source is laid out.
pub const IGNORED: [char; 7] = [' ', '\t', '\n', '\u{0B}', '\u{0C}', '\r', '`'];

/// A hexagon of side `size`, stored row-major with precomputed row offsets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<char>,
    row_offsets: Vec<usize>,
}

/// Where a step off the perimeter lands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wrap {
    /// Inside the hexagon already, or wrapped across a single edge.
    Fixed(Point),
    /// Two axes left the hexagon at once; the landing cell depends on whether
    /// the current memory edge is positive.
    Corner { positive: Point, non_positive: Point },
}

impl Wrap {
    pub fn resolve(self, positive: bool) -> Point {
        match self {
            Wrap::Fixed(point) => point,
            Wrap::Corner {
                positive: p,
                non_positive: n,
            } => {
                if positive {
                    p
                } else {
                    n
                }
            }
        }
    }
}

/// Number of cells in a hexagon of side `size`.
pub fn cell_count(size: usize) -> usize {
    3 * size * (size.saturating_sub(1)) + 1
}

impl Grid {
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        let rows = 2 * size - 1;
        let mut row_offsets = Vec::with_capacity(rows + 1);
        let mut offset = 0;
        for row in 0..rows {
            row_offsets.push(offset);
            offset += row_len(size, row);
        }
        row_offsets.push(offset);
        Self {
            size,
            cells: vec![FILLER; offset],
            row_offsets,
        }
    }

    pub fn parse(source: &str) -> Self {
        let chars: Vec<char> = source.chars().filter(|ch| !IGNORED.contains(ch)).collect();
        let mut size = 1;
        while cell_count(size) < chars.len() {
            size += 1;
        }
        let mut grid = Grid::new(size);
        grid.replace_characters(&chars);
        grid
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[char] {
        &self.cells
    }

    fn radius(&self) -> i64 {
        self.size as i64
    }

    pub fn contains(&self, point: Point) -> bool {
        let size = self.radius();
        point.q.abs() < size && point.r.abs() < size && point.y().abs() < size
    }

    /// Row-major index of an in-range point.
    pub fn index_of(&self, point: Point) -> Option<usize> {
        if !self.contains(point) {
            return None;
        }
        let size = self.radius();
        let row = point.r + size - 1;
        let column = point.q + row.min(size - 1);
        Some(self.row_offsets[row as usize] + column as usize)
    }

    pub fn point_of(&self, index: usize) -> Option<Point> {
        if index >= self.cells.len() {
            return None;
        }
        let row = self.row_offsets.partition_point(|&offset| offset <= index) - 1;
        let size = self.radius();
        let row_i = row as i64;
        let column = (index - self.row_offsets[row]) as i64;
        Some(Point::new(column - row_i.min(size - 1), row_i - size + 1))
    }

    /// The cell at `point`. Out-of-range points read as the filler no-op.
    pub fn get(&self, point: Point) -> char {
        self.index_of(point)
            .map(|index| self.cells[index])
            .unwrap_or(FILLER)
    }

    /// Overwrites cells in row-major order and stops silently when `source`
    /// runs out, so a caller may refill only a prefix of the hexagon.
    pub fn replace_characters(&mut self, source: &[char]) {
        for (cell, &ch) in self.cells.iter_mut().zip(source) {
            *cell = ch;
        }
    }

    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.cells.len()).filter_map(move |index| self.point_of(index))
    }

    /// Moves one step from `from` along `direction` and folds the result back
    /// into the hexagon.
    pub fn step(&self, from: Point, direction: Direction) -> Wrap {
        self.wrap(from + direction.vector(), direction)
    }

    /// Folds a point that may have just left the hexagon back onto it.
    /// `direction` is the move that produced `moved`.
    pub fn wrap(&self, moved: Point, direction: Direction) -> Wrap {
        if self.size == 1 {
            return Wrap::Fixed(Point::ORIGIN);
        }
        if self.contains(moved) {
            return Wrap::Fixed(moved);
        }

        let size = self.radius();
        let x_out = moved.q.abs() >= size;
        let y_out = moved.y().abs() >= size;
        let z_out = moved.r.abs() >= size;

        let p = moved - direction.vector();
        let across_r = Point::new(p.q + p.r, -p.r);
        let across_q = Point::new(-p.q, p.q + p.r);
        let across_y = Point::new(-p.r, -p.q);

        match (x_out, y_out, z_out) {
            (false, false, true) => Wrap::Fixed(across_r),
            (true, false, false) => Wrap::Fixed(across_q),
            (false, true, false) => Wrap::Fixed(across_y),
            (true, true, false) => Wrap::Corner {
                positive: across_q,
                non_positive: across_y,
            },
            (true, false, true) => Wrap::Corner {
                positive: across_r,
                non_positive: across_q,
            },
            (false, true, true) => Wrap::Corner {
                positive: across_y,
                non_positive: across_r,
            },
            _ => Wrap::Fixed(p),
        }
    }

    /// Layout plus the Q range and R of every row.
    pub fn debug_string(&self) -> String {
        let size = self.radius();
        (0..self.rows())
            .map(|row| {
                let line = self.row(row);
                let padding = " ".repeat(2 * self.size - line.len());
                let q1 = (1 - size).max(-(row as i64));
                let q2 = q1 + line.len() as i64 - 1;
                format!(
                    "{padding}{}{padding}    Q: [{q1:>3},{q2:>3}], R: {:>2}",
                    join_cells(line),
                    row as i64 - size + 1
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn rows(&self) -> usize {
        self.row_offsets.len() - 1
    }

    fn row(&self, row: usize) -> &[char] {
        &self.cells[self.row_offsets[row]..self.row_offsets[row + 1]]
    }
}

fn row_len(size: usize, row: usize) -> usize {
    2 * size - 1 - (size as i64 - 1 - row as i64).unsigned_abs() as usize
}

fn join_cells(line: &[char]) -> String {
    line.iter()
        .map(char::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows() {
            let line = self.row(row);
            if row > 0 {
                writeln!(f)?;
            }
            write!(
                f,
                "{}{}",
                " ".repeat(2 * self.size - line.len()),
                join_cells(line)
            )?;
        }
        Ok(())
    }
}
