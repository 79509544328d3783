use crate::language::compiler::{Node, Scaffold};
use crate::language::opcode::Opcode;
use crate::runtime::error::{RuntimeError, RuntimeResult};
use crate::runtime::interpreter::RunState;
use crate::runtime::io::OutputSink;
use crate::runtime::machine::{Flow, Machine};
use crate::runtime::memory::Memory;
use std::io::Read;

/// Resolves every slot of `scaffold` to an instruction. Placeholders take
/// `fills` in slot order; surplus fills are ignored.
pub fn instantiate(scaffold: &Scaffold, fills: &[char]) -> RuntimeResult<Vec<Opcode>> {
    let mut fills = fills.iter().copied();
    scaffold
        .slots()
        .iter()
        .enumerate()
        .map(|(slot, cell)| {
            let ch = match cell.opcode() {
                Some(ch) => ch,
                None => fills.next().ok_or(RuntimeError::MissingFill { slot })?,
            };
            let opcode = Opcode::decode(ch);
            if opcode.is_control() {
                return Err(RuntimeError::UnsupportedCommand { slot, opcode: ch });
            }
            Ok(opcode)
        })
        .collect()
}

/// Runs a compiled scaffold with concrete slot instructions. Each visited node
/// counts as one step, each loop iteration as one step per command.
#[derive(Clone, Debug)]
pub struct Replay<R, S> {
    nodes: Vec<Node>,
    commands: Vec<Opcode>,
    machine: Machine<R, S>,
    node: usize,
    loop_phase: Option<usize>,
    steps: u64,
    max_steps: Option<u64>,
    halted: bool,
}

impl<R: Read, S: OutputSink> Replay<R, S> {
    pub fn new(scaffold: &Scaffold, fills: &[char], input: R, sink: S) -> RuntimeResult<Self> {
        Ok(Self {
            nodes: scaffold.nodes().to_vec(),
            commands: instantiate(scaffold, fills)?,
            machine: Machine::new(input, sink),
            node: 0,
            loop_phase: None,
            steps: 0,
            max_steps: None,
            halted: false,
        })
    }

    pub fn set_max_steps(&mut self, max_steps: Option<u64>) {
        self.max_steps = max_steps;
    }

    pub fn set_target(&mut self, target: Option<&str>) {
        self.machine.output.set_target(target);
    }

    pub fn run(&mut self) -> RunState {
        loop {
            match self.step() {
                RunState::Running => continue,
                state => return state,
            }
        }
    }

    pub fn step(&mut self) -> RunState {
        if self.halted {
            return RunState::Halted;
        }
        if self.timed_out() {
            return RunState::TimedOut;
        }
        let Some(node) = self.nodes.get(self.node) else {
            self.halted = true;
            return RunState::Halted;
        };

        let mut flow = Flow::Continue;
        match node {
            Node::Command { slot } => {
                flow = self.machine.execute(self.commands[*slot]);
                self.node += 1;
            }
            Node::Jump { target } => self.node = *target,
            Node::Branch {
                positive,
                non_positive,
            } => {
                self.node = if self.machine.is_positive() {
                    *positive
                } else {
                    *non_positive
                };
            }
            Node::Loop { body, phase } => {
                let current = self.loop_phase.unwrap_or(*phase);
                if let Some(&slot) = body.get(current) {
                    flow = self.machine.execute(self.commands[slot]);
                    self.loop_phase = Some((current + 1) % body.len());
                }
            }
            Node::Exit => flow = self.machine.terminate(),
        }
        if !matches!(self.nodes.get(self.node), Some(Node::Loop { .. })) {
            self.loop_phase = None;
        }

        self.steps += 1;
        if flow == Flow::Halt {
            self.halted = true;
            return RunState::Halted;
        }
        if self.timed_out() {
            RunState::TimedOut
        } else {
            RunState::Running
        }
    }
}

impl<R, S> Replay<R, S> {
    pub fn success(&self) -> bool {
        self.machine.output.success()
    }

    pub fn timed_out(&self) -> bool {
        !self.halted && self.max_steps.is_some_and(|max| self.steps >= max)
    }

    pub fn halted(&self) -> bool {
        self.halted
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn output_length(&self) -> usize {
        self.machine.output.length()
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::compiler::compile;
    use crate::runtime::io::StringSink;
    use std::io::{empty, Empty};

    fn replay(source: &str, fills: &[char]) -> Replay<Empty, StringSink> {
        let scaffold = compile(source);
        Replay::new(&scaffold, fills, empty(), StringSink::new()).unwrap()
    }

    fn summary<R, S>(run: &Replay<R, S>) -> (bool, u64, usize) {
        (run.success(), run.steps(), run.output_length())
    }

    #[test]
    fn accessors_need_no_trait_bounds() {
        let mut run = replay("?@", &['!']);
        run.run();
        assert_eq!(summary(&run), (true, 2, 1));
        assert_eq!(run.into_sink().as_str(), "0");
    }

    #[test]
    fn fills_placeholders_in_slot_order() {
        let scaffold = compile("??@");
        let commands = instantiate(&scaffold, &[')', '!']).unwrap();
        assert_eq!(commands, vec![Opcode::Increment, Opcode::WriteInteger]);

        let mut run = replay("??@", &[')', '!']);
        assert_eq!(run.run(), RunState::Halted);
        assert_eq!(run.sink().as_str(), "1");
        assert_eq!(run.steps(), 3);
    }

    #[test]
    fn missing_and_control_fills_are_rejected() {
        let scaffold = compile("??@");
        assert_eq!(
            instantiate(&scaffold, &[')']),
            Err(RuntimeError::MissingFill { slot: 1 })
        );
        assert_eq!(
            instantiate(&scaffold, &[')', '/']),
            Err(RuntimeError::UnsupportedCommand {
                slot: 1,
                opcode: '/'
            })
        );
        assert_eq!(
            instantiate(&compile("]@"), &[]),
            Err(RuntimeError::UnsupportedCommand {
                slot: 0,
                opcode: ']'
            })
        );
    }

    #[test]
    fn terminate_is_a_valid_fill() {
        let mut run = replay("?!", &['@']);
        assert_eq!(run.run(), RunState::Halted);
        assert_eq!(run.sink().as_str(), "");
    }

    #[test]
    fn loops_run_until_the_budget() {
        // A single incrementing cell, forever.
        let mut run = replay("?", &[')']);
        run.set_max_steps(Some(10));
        assert_eq!(run.run(), RunState::TimedOut);
        assert_eq!(run.memory().get(), 10);
        assert!(run.timed_out());
    }

    #[test]
    fn output_target_is_validated() {
        let mut run = replay("??@", &[')', '!']);
        run.set_target(Some("1"));
        run.run();
        assert!(run.success());

        let mut run = replay("??@", &[')', '!']);
        run.set_target(Some("2"));
        assert_eq!(run.run(), RunState::Halted);
        assert!(!run.success());
    }
}
