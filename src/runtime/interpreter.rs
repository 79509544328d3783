use crate::language::geometry::{Direction, Point};
use crate::language::grid::Grid;
use crate::language::opcode::Opcode;
use crate::runtime::io::OutputSink;
use crate::runtime::machine::{Flow, Machine};
use crate::runtime::memory::Memory;
use log::trace;
use std::io::Read;

/// Number of instruction pointers in every program.
pub const IP_COUNT: usize = 6;

/// Outcome of a single tick, or of a whole run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Running,
    Halted,
    TimedOut,
}

/// Starting position and heading of each instruction pointer: the six corners
/// of the hexagon, each facing clockwise along the perimeter.
pub fn initial_ips(size: usize) -> [(Point, Direction); IP_COUNT] {
    let s = size.max(1) as i64 - 1;
    [
        (Point::new(0, -s), Direction::East),
        (Point::new(s, -s), Direction::SouthEast),
        (Point::new(s, 0), Direction::SouthWest),
        (Point::new(0, s), Direction::West),
        (Point::new(-s, s), Direction::NorthWest),
        (Point::new(-s, 0), Direction::NorthEast),
    ]
}

#[derive(Clone, Debug)]
pub struct Interpreter<R, S> {
    grid: Grid,
    machine: Machine<R, S>,
    ips: [(Point, Direction); IP_COUNT],
    active: usize,
    tick: u64,
    max_ticks: Option<u64>,
    halted: bool,
}

impl<R: Read, S: OutputSink> Interpreter<R, S> {
    pub fn new(source: &str, input: R, sink: S) -> Self {
        Self::with_grid(Grid::parse(source), input, sink)
    }

    pub fn with_grid(grid: Grid, input: R, sink: S) -> Self {
        let ips = initial_ips(grid.size());
        Self {
            grid,
            machine: Machine::new(input, sink),
            ips,
            active: 0,
            tick: 0,
            max_ticks: None,
            halted: false,
        }
    }

    /// Copy of this interpreter with the grid refilled in row-major order.
    /// Memory, pointers, tick count and output so far carry over.
    pub fn fork(&self, chars: &[char]) -> Self
    where
        R: Clone,
        S: Clone,
    {
        let mut fork = self.clone();
        fork.grid.replace_characters(chars);
        fork
    }

    pub fn set_max_ticks(&mut self, max_ticks: Option<u64>) {
        self.max_ticks = max_ticks;
    }

    /// Switches output from the sink to comparison against `target`.
    pub fn set_target(&mut self, target: Option<&str>) {
        self.machine.output.set_target(target);
    }

    /// Runs until the program halts or the tick budget is spent. Calling it
    /// again after raising the budget resumes where it stopped.
    pub fn run(&mut self) -> RunState {
        loop {
            match self.step() {
                RunState::Running => continue,
                state => return state,
            }
        }
    }

    /// Executes the active pointer's instruction and advances it.
    pub fn step(&mut self) -> RunState {
        if self.halted {
            return RunState::Halted;
        }
        if self.timed_out() {
            return RunState::TimedOut;
        }

        let (mut point, mut dir) = self.ips[self.active];
        let opcode = Opcode::decode(self.grid.get(point));
        trace!(
            "tick {:>6} ip {} at {} {:>2} executing {:?}",
            self.tick,
            self.active,
            point,
            dir,
            opcode
        );

        let mut next = self.active;
        match opcode {
            Opcode::Mirror(mirror) => dir = dir.reflect(mirror, self.machine.is_positive()),
            Opcode::NextIp => next = (self.active + 1) % IP_COUNT,
            Opcode::PreviousIp => next = (self.active + IP_COUNT - 1) % IP_COUNT,
            Opcode::SelectIp => {
                next = self.machine.memory.get().rem_euclid(IP_COUNT as i64) as usize;
            }
            Opcode::Skip => point = self.advance(point, dir),
            other => {
                if self.machine.execute(other) == Flow::Halt {
                    self.halted = true;
                }
            }
        }

        self.tick += 1;
        if self.halted {
            return RunState::Halted;
        }

        self.ips[self.active] = (self.advance(point, dir), dir);
        self.active = next;
        if self.timed_out() {
            RunState::TimedOut
        } else {
            RunState::Running
        }
    }

    fn advance(&self, point: Point, dir: Direction) -> Point {
        self.grid
            .step(point, dir)
            .resolve(self.machine.is_positive())
    }
}

impl<R, S> Interpreter<R, S> {
    /// True while the output matches the target, or always without a target.
    /// Once halted, also requires the whole target to have been produced.
    pub fn success(&self) -> bool {
        self.machine.output.success()
    }

    pub fn timed_out(&self) -> bool {
        !self.halted && self.max_ticks.is_some_and(|max| self.tick >= max)
    }

    pub fn halted(&self) -> bool {
        self.halted
    }

    pub fn output_length(&self) -> usize {
        self.machine.output.length()
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn max_ticks(&self) -> Option<u64> {
        self.max_ticks
    }

    pub fn active_ip(&self) -> usize {
        self.active
    }

    pub fn ips(&self) -> &[(Point, Direction); IP_COUNT] {
        &self.ips
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn memory(&self) -> &Memory {
        &self.machine.memory
    }

    pub fn sink(&self) -> &S {
        self.machine.output.sink()
    }

    pub fn into_sink(self) -> S {
        self.machine.output.into_sink()
    }
}
