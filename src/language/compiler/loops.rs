use super::{Location, Op};
use crate::language::compiler::scaffold::Node;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashSet};

/// Start index of the lexicographically smallest rotation of `body`. Ties
/// resolve to the earliest start.
pub fn minimal_rotation(body: &[usize]) -> usize {
    let n = body.len();
    (0..n)
        .min_by(|&a, &b| {
            let left = body[a..].iter().chain(&body[..a]);
            let right = body[b..].iter().chain(&body[..b]);
            left.cmp(right)
        })
        .unwrap_or(0)
}

pub fn rotate(body: &[usize], start: usize) -> Vec<usize> {
    if body.is_empty() {
        return Vec::new();
    }
    body[start..].iter().chain(&body[..start]).copied().collect()
}

/// A segment whose final jump lands back inside itself.
struct Cycle {
    start: usize,
    body: Vec<usize>,
    rotation: usize,
    phase_nodes: BTreeMap<usize, usize>,
}

impl Cycle {
    /// Index into the rotated body of the command executed next when control
    /// reaches `offset` of the segment.
    fn phase(&self, offset: usize) -> usize {
        let n = self.body.len();
        if n == 0 {
            return 0;
        }
        let k = if offset >= self.start + n {
            0
        } else {
            offset - self.start
        };
        (k + n - self.rotation) % n
    }
}

struct Block {
    base: usize,
    cycle: Option<Cycle>,
}

/// Flattens discovered segments into the node arena. Segments keep their
/// discovery order, so the first segment's entry becomes node 0.
pub(super) fn layout(segments: &[Vec<Op<Location>>]) -> Vec<Node> {
    let mut referenced: HashSet<Location> = HashSet::new();
    for (index, segment) in segments.iter().enumerate() {
        referenced.insert((index, 0));
        for op in segment {
            match *op {
                Op::Jump(target) => {
                    referenced.insert(target);
                }
                Op::Branch {
                    positive,
                    non_positive,
                } => {
                    referenced.insert(positive);
                    referenced.insert(non_positive);
                }
                Op::Command(_) | Op::Exit => {}
            }
        }
    }

    let mut blocks = Vec::with_capacity(segments.len());
    let mut next_id = 0;
    for (index, segment) in segments.iter().enumerate() {
        let base = next_id;
        let cycle = match segment.last() {
            Some(Op::Jump((target, start))) if *target == index => {
                let body: Vec<usize> = segment[*start..segment.len() - 1]
                    .iter()
                    .filter_map(|op| match op {
                        Op::Command(slot) => Some(*slot),
                        _ => None,
                    })
                    .collect();
                Some(Cycle {
                    start: *start,
                    rotation: minimal_rotation(&body),
                    body,
                    phase_nodes: BTreeMap::new(),
                })
            }
            _ => None,
        };

        match cycle {
            None => {
                next_id += segment.len();
                blocks.push(Block { base, cycle: None });
            }
            Some(mut cycle) => {
                next_id += cycle.start;
                let main_phase = cycle.phase(cycle.start);
                cycle.phase_nodes.insert(main_phase, next_id);
                next_id += 1;
                let mut phases: Vec<usize> = referenced
                    .iter()
                    .filter(|(owner, offset)| *owner == index && *offset >= cycle.start)
                    .map(|&(_, offset)| cycle.phase(offset))
                    .collect();
                phases.sort_unstable();
                phases.dedup();
                for phase in phases {
                    if let Entry::Vacant(entry) = cycle.phase_nodes.entry(phase) {
                        entry.insert(next_id);
                        next_id += 1;
                    }
                }
                blocks.push(Block {
                    base,
                    cycle: Some(cycle),
                });
            }
        }
    }

    let node_of = |(segment, offset): Location| -> usize {
        let block = &blocks[segment];
        match &block.cycle {
            Some(cycle) if offset >= cycle.start => cycle.phase_nodes[&cycle.phase(offset)],
            _ => block.base + offset,
        }
    };

    let mut nodes = Vec::with_capacity(next_id);
    for (segment, block) in segments.iter().zip(&blocks) {
        let end = block
            .cycle
            .as_ref()
            .map_or(segment.len(), |cycle| cycle.start);
        for op in &segment[..end] {
            nodes.push(match *op {
                Op::Command(slot) => Node::Command { slot },
                Op::Jump(target) => Node::Jump {
                    target: node_of(target),
                },
                Op::Branch {
                    positive,
                    non_positive,
                } => Node::Branch {
                    positive: node_of(positive),
                    non_positive: node_of(non_positive),
                },
                Op::Exit => Node::Exit,
            });
        }
        if let Some(cycle) = &block.cycle {
            let body = rotate(&cycle.body, cycle.rotation);
            let mut by_id: Vec<(usize, usize)> = cycle
                .phase_nodes
                .iter()
                .map(|(&phase, &id)| (id, phase))
                .collect();
            by_id.sort_unstable();
            for (_, phase) in by_id {
                nodes.push(Node::Loop {
                    body: body.clone(),
                    phase,
                });
            }
        }
    }
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smallest_rotation_is_found() {
        assert_eq!(minimal_rotation(&[]), 0);
        assert_eq!(minimal_rotation(&[4]), 0);
        assert_eq!(minimal_rotation(&[3, 1, 2]), 1);
        assert_eq!(minimal_rotation(&[2, 1, 1, 2, 1, 0]), 5);
        assert_eq!(minimal_rotation(&[1, 0, 1, 0]), 1);
        assert_eq!(rotate(&[3, 1, 2], 1), vec![1, 2, 3]);
    }

    #[test]
    fn rotations_share_a_canonical_form() {
        let body = [5, 2, 7, 2, 6];
        let canonical = rotate(&body, minimal_rotation(&body));
        for start in 0..body.len() {
            let rotated = rotate(&body, start);
            assert_eq!(rotate(&rotated, minimal_rotation(&rotated)), canonical);
        }
        assert_eq!(minimal_rotation(&canonical), 0);
    }

    #[test]
    fn self_jump_becomes_a_loop_with_prefix() {
        // _0 _1 _2 >1  ==> _0 loop[_1 _2]
        let segments = vec![vec![
            Op::Command(0),
            Op::Command(1),
            Op::Command(2),
            Op::Jump((0, 1)),
        ]];
        assert_eq!(
            layout(&segments),
            vec![
                Node::Command { slot: 0 },
                Node::Loop {
                    body: vec![1, 2],
                    phase: 0
                }
            ]
        );
    }

    #[test]
    fn loop_entries_keep_their_phase() {
        // Segment 0 loops over slots 2, 0; segment 1 jumps into its middle.
        let segments = vec![
            vec![
                Op::Branch {
                    positive: (1, 0),
                    non_positive: (0, 1),
                },
                Op::Command(2),
                Op::Command(0),
                Op::Jump((0, 1)),
            ],
            vec![Op::Command(1), Op::Jump((0, 2))],
        ];
        let nodes = layout(&segments);
        assert_eq!(
            nodes,
            vec![
                Node::Branch {
                    positive: 3,
                    non_positive: 1
                },
                Node::Loop {
                    body: vec![0, 2],
                    phase: 1
                },
                Node::Loop {
                    body: vec![0, 2],
                    phase: 0
                },
                Node::Command { slot: 1 },
                Node::Jump { target: 2 },
            ]
        );
    }

    #[test]
    fn jump_to_itself_is_an_empty_loop() {
        let segments = vec![vec![Op::Jump((0, 0))]];
        assert_eq!(
            layout(&segments),
            vec![Node::Loop {
                body: vec![],
                phase: 0
            }]
        );
    }
}
