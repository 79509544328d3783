use crate::language::compiler::{compile, minimal_rotation, Node};
use crate::language::grid::cell_count;
use crate::runtime::io::StringSink;
use crate::runtime::{Interpreter, Replay, RunState};

/// Every instruction a compiled scaffold can replay. `?` and the IP switches
/// are left out.
const ALPHABET: &[u8] = b"....@@)(+-*~:%{}=\"'^&,;!0123456789AZaz/\\_|<>$";

const MAX_TICKS: u64 = 2_000;

/// Deterministic linear congruential generator.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.0 >> 33
    }

    fn program(&mut self, size: usize) -> String {
        (0..cell_count(size))
            .map(|_| char::from(ALPHABET[self.next() as usize % ALPHABET.len()]))
            .collect()
    }
}

fn corpus() -> Vec<String> {
    let mut rng = Lcg(0x4845_5853);
    (0..400)
        .map(|index| rng.program(1 + index % 4))
        .collect()
}

#[test]
fn replay_matches_the_interpreter() {
    let mut compared = 0;
    for source in corpus() {
        let mut interp = Interpreter::new(&source, &b""[..], StringSink::new());
        interp.set_max_ticks(Some(MAX_TICKS));
        if interp.run() != RunState::Halted {
            continue;
        }

        let scaffold = compile(&source);
        let mut replay = Replay::new(&scaffold, &[], &b""[..], StringSink::new())
            .unwrap_or_else(|err| panic!("{source}: {err}"));
        replay.set_max_steps(Some(10 * interp.tick() + 10_000));
        assert_eq!(replay.run(), RunState::Halted, "{source}\n{scaffold}");
        assert_eq!(
            replay.sink().as_str(),
            interp.sink().as_str(),
            "{source}\n{scaffold}"
        );
        assert_eq!(replay.memory().get(), interp.memory().get(), "{source}");
        compared += 1;
    }
    assert!(compared > 20, "only {compared} programs halted");
}

#[test]
fn compiled_loops_are_canonical() {
    for source in corpus() {
        let scaffold = compile(&source);
        for node in scaffold.nodes() {
            if let Node::Loop { body, phase } = node {
                assert_eq!(minimal_rotation(body), 0, "{source}\n{scaffold}");
                assert!(body.is_empty() || *phase < body.len(), "{source}");
            }
        }
    }
}

#[test]
fn targets_stay_in_range() {
    for source in corpus() {
        let scaffold = compile(&source);
        let len = scaffold.nodes().len();
        for node in scaffold.nodes() {
            match node {
                Node::Jump { target } => assert!(*target < len, "{source}"),
                Node::Branch {
                    positive,
                    non_positive,
                } => {
                    assert!(*positive < len && *non_positive < len, "{source}");
                }
                Node::Command { slot } => assert!(*slot < scaffold.slots().len()),
                Node::Loop { body, .. } => {
                    assert!(body.iter().all(|slot| *slot < scaffold.slots().len()));
                }
                Node::Exit => {}
            }
        }
    }
}
