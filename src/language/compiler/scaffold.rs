use crate::language::geometry::Point;
use std::fmt;

/// One node of a compiled scaffold. Targets are indices into
/// [`Scaffold::nodes`]; a `Command` falls through to the next index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Command { slot: usize },
    Jump { target: usize },
    /// Taken on the sign of the current memory edge.
    Branch { positive: usize, non_positive: usize },
    /// Repeats `body` forever, starting at `body[phase]`. The body is stored
    /// in its lexicographically smallest rotation.
    Loop { body: Vec<usize>, phase: usize },
    Exit,
}

/// A grid cell whose instruction the scaffold runs but does not interpret.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Slot {
    pub position: Point,
    pub cell: char,
}

impl Slot {
    pub fn is_placeholder(&self) -> bool {
        self.cell == super::PLACEHOLDER
    }

    /// The fixed instruction, or `None` when the cell is a placeholder.
    pub fn opcode(&self) -> Option<char> {
        (!self.is_placeholder()).then_some(self.cell)
    }
}

/// Control flow of a grid with every non-control cell abstracted into a slot.
/// Node 0 is the entry point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scaffold {
    pub(super) nodes: Vec<Node>,
    pub(super) slots: Vec<Slot>,
}

impl Scaffold {
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Slots in the order the traversal first reached them.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn placeholder_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_placeholder()).count()
    }

    pub fn loops(&self) -> impl Iterator<Item = &[usize]> + '_ {
        self.nodes.iter().filter_map(|node| match node {
            Node::Loop { body, .. } => Some(body.as_slice()),
            _ => None,
        })
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Command { slot } => write!(f, "_{slot}"),
            Node::Jump { target } => write!(f, ">{target}"),
            Node::Branch {
                positive,
                non_positive,
            } => write!(f, ">?{positive}:{non_positive}"),
            Node::Loop { body, phase } => {
                write!(f, "loop[")?;
                for (i, slot) in body.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "_{slot}")?;
                }
                write!(f, "]")?;
                if *phase != 0 {
                    write!(f, "+{phase}")?;
                }
                Ok(())
            }
            Node::Exit => write!(f, "@"),
        }
    }
}

impl fmt::Display for Scaffold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "nodes:")?;
        for (id, node) in self.nodes.iter().enumerate() {
            writeln!(f, "{id:>4}  {node}")?;
        }
        writeln!(f, "slots:")?;
        for (index, slot) in self.slots.iter().enumerate() {
            writeln!(f, "{index:>4}  {} {}", slot.position, slot.cell)?;
        }
        Ok(())
    }
}
