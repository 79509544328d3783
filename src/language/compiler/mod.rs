//! Branch-sensitive abstract traversal of a grid.
//!
//! The compiler follows instruction pointer 0 without knowing any memory
//! values. Mirrors, no-ops, `$` and `@` are interpreted; every other cell
//! becomes an opaque command slot. What the traversal does track is whether
//! the current memory edge is known to be positive, known to be non-positive,
//! or unknown, so the two sign-dependent mirrors and corner wraps only fork
//! when the sign is actually unknown.
//!
//! Discovery records straight-line segments keyed by cursor state. Revisiting
//! a state ends the segment with a jump; afterwards segments that jump back
//! into themselves become canonical loop nodes.

mod loops;
mod scaffold;

pub use loops::{minimal_rotation, rotate};
pub use scaffold::{Node, Scaffold, Slot};

use crate::language::geometry::{Direction, Point};
use crate::language::grid::{Grid, Wrap};
use crate::language::opcode::Opcode;
use crate::runtime::interpreter::initial_ips;
use log::debug;
use std::collections::{HashMap, HashSet};

/// Marks a cell whose instruction is supplied after compilation.
pub const PLACEHOLDER: char = '?';

/// What the traversal knows about the sign of the current memory edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SignKnowledge {
    Unknown,
    Positive,
    NonPositive,
}

impl SignKnowledge {
    fn from_positive(positive: bool) -> Self {
        if positive {
            SignKnowledge::Positive
        } else {
            SignKnowledge::NonPositive
        }
    }

    fn known(self) -> Option<bool> {
        match self {
            SignKnowledge::Unknown => None,
            SignKnowledge::Positive => Some(true),
            SignKnowledge::NonPositive => Some(false),
        }
    }
}

/// The pointer about to execute the cell at `point`. With `skip` set, the
/// cell is passed over instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct State {
    point: Point,
    dir: Direction,
    sign: SignKnowledge,
    skip: bool,
}

/// (segment, offset) of a discovered op.
type Location = (usize, usize);

/// A discovered op. Targets are cursor states while discovering and
/// locations once every state has been placed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Op<T> {
    Command(usize),
    Jump(T),
    Branch { positive: T, non_positive: T },
    Exit,
}

enum Next {
    Go(State),
    Fork { positive: State, non_positive: State },
}

pub struct ScaffoldCompiler<'g> {
    grid: &'g Grid,
    segments: Vec<Vec<Op<State>>>,
    entries: HashMap<State, Location>,
    /// States passed since the last emitted op, in order.
    pending: Vec<State>,
    /// Same states as `pending`, for membership checks.
    pending_set: HashSet<State>,
    worklist: Vec<State>,
    slots: Vec<Slot>,
    slot_ids: HashMap<Point, usize>,
}

/// Parses `source` and compiles it. `?` cells become placeholder slots.
pub fn compile(source: &str) -> Scaffold {
    ScaffoldCompiler::new(&Grid::parse(source)).compile()
}

impl<'g> ScaffoldCompiler<'g> {
    pub fn new(grid: &'g Grid) -> Self {
        Self {
            grid,
            segments: Vec::new(),
            entries: HashMap::new(),
            pending: Vec::new(),
            pending_set: HashSet::new(),
            worklist: Vec::new(),
            slots: Vec::new(),
            slot_ids: HashMap::new(),
        }
    }

    pub fn compile(mut self) -> Scaffold {
        let (point, dir) = initial_ips(self.grid.size())[0];
        self.worklist.push(State {
            point,
            dir,
            sign: SignKnowledge::NonPositive,
            skip: false,
        });

        while let Some(state) = self.worklist.pop() {
            if self.entries.contains_key(&state) {
                continue;
            }
            self.segments.push(Vec::new());
            self.trace(state);
        }

        let entries = &self.entries;
        let place = |state: State| entries[&state];
        let segments: Vec<Vec<Op<Location>>> = self
            .segments
            .iter()
            .map(|segment| {
                segment
                    .iter()
                    .map(|op| match *op {
                        Op::Command(slot) => Op::Command(slot),
                        Op::Jump(target) => Op::Jump(place(target)),
                        Op::Branch {
                            positive,
                            non_positive,
                        } => Op::Branch {
                            positive: place(positive),
                            non_positive: place(non_positive),
                        },
                        Op::Exit => Op::Exit,
                    })
                    .collect()
            })
            .collect();

        let nodes = loops::layout(&segments);
        debug!(
            "compiled {} cursor states into {} segments, {} nodes, {} slots",
            self.entries.len(),
            segments.len(),
            nodes.len(),
            self.slots.len()
        );
        Scaffold {
            nodes,
            slots: self.slots,
        }
    }

    /// Follows one straight-line path until it ends in an exit, a fork, or
    /// a state that has been seen before.
    fn trace(&mut self, mut state: State) {
        loop {
            if self.entries.contains_key(&state) || self.pending_set.contains(&state) {
                self.emit(Op::Jump(state));
                return;
            }
            self.pending.push(state);
            self.pending_set.insert(state);

            let State {
                point,
                dir,
                sign,
                skip,
            } = state;
            let cell = self.grid.get(point);
            let next = if skip {
                self.advance(point, dir, sign, false)
            } else if cell == PLACEHOLDER {
                self.command(point, cell, dir)
            } else {
                match Opcode::decode(cell) {
                    Opcode::Nop => self.advance(point, dir, sign, false),
                    Opcode::Terminate => {
                        self.emit(Op::Exit);
                        return;
                    }
                    Opcode::Skip => self.advance(point, dir, sign, true),
                    Opcode::Mirror(mirror) => {
                        let positive = dir.reflect(mirror, true);
                        let non_positive = dir.reflect(mirror, false);
                        if positive == non_positive {
                            self.advance(point, positive, sign, false)
                        } else {
                            match sign.known() {
                                Some(true) => self.advance(point, positive, sign, false),
                                Some(false) => self.advance(point, non_positive, sign, false),
                                None => Next::Fork {
                                    positive: self.settle(point, positive, true),
                                    non_positive: self.settle(point, non_positive, false),
                                },
                            }
                        }
                    }
                    _ => self.command(point, cell, dir),
                }
            };

            match next {
                Next::Go(following) => state = following,
                Next::Fork {
                    positive,
                    non_positive,
                } => {
                    self.emit(Op::Branch {
                        positive,
                        non_positive,
                    });
                    self.worklist.push(non_positive);
                    self.worklist.push(positive);
                    return;
                }
            }
        }
    }

    fn command(&mut self, point: Point, cell: char, dir: Direction) -> Next {
        let slot = match self.slot_ids.get(&point) {
            Some(&slot) => slot,
            None => {
                let slot = self.slots.len();
                self.slots.push(Slot {
                    position: point,
                    cell,
                });
                self.slot_ids.insert(point, slot);
                slot
            }
        };
        self.emit(Op::Command(slot));
        self.advance(point, dir, SignKnowledge::Unknown, false)
    }

    /// Appends `op` to the open segment; every state passed through since
    /// the previous op resolves to it.
    fn emit(&mut self, op: Op<State>) {
        let segment = self.segments.len() - 1;
        let offset = self.segments[segment].len();
        for state in self.pending.drain(..) {
            self.entries.insert(state, (segment, offset));
        }
        self.pending_set.clear();
        self.segments[segment].push(op);
    }

    fn advance(&self, point: Point, dir: Direction, sign: SignKnowledge, skip: bool) -> Next {
        let state = |point| State {
            point,
            dir,
            sign,
            skip,
        };
        match self.grid.step(point, dir) {
            Wrap::Fixed(next) => Next::Go(state(next)),
            wrap @ Wrap::Corner {
                positive,
                non_positive,
            } => match sign.known() {
                Some(known) => Next::Go(state(wrap.resolve(known))),
                None => Next::Fork {
                    positive: State {
                        point: positive,
                        dir,
                        sign: SignKnowledge::Positive,
                        skip,
                    },
                    non_positive: State {
                        point: non_positive,
                        dir,
                        sign: SignKnowledge::NonPositive,
                        skip,
                    },
                },
            },
        }
    }

    /// Moves with a known sign, so any corner resolves immediately.
    fn settle(&self, point: Point, dir: Direction, positive: bool) -> State {
        State {
            point: self.grid.step(point, dir).resolve(positive),
            dir,
            sign: SignKnowledge::from_positive(positive),
            skip: false,
        }
    }
}
