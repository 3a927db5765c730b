//! Hopcroft-style hash partition refinement, run once over the union of
//! every requested start state so equivalent states across languages are
//! shared in the result.

use crate::charrange::CharRange;
use crate::dfa::{Dfa, DfaState};
use crate::label::Label;
use crate::nfa::StateId;
use log::{debug, trace};
use rustc_hash::FxHashMap;

type BlockId = usize;

pub fn minimize<L: Label>(dfa: Dfa<L>) -> Dfa<L> {
    let dfa = prune_unreachable(dfa);
    if dfa.states.is_empty() {
        return dfa;
    }

    let mut block = initial_partition(&dfa);
    loop {
        let refined = refine(&dfa, &block);
        let converged = refined == block;
        block = refined;
        if converged {
            break;
        }
    }

    reconstruct(dfa, block)
}

/// Groups states by (accept label, accepts-or-not), assigning block ids in
/// order of first appearance by state index so the result is deterministic
/// given the input.
fn initial_partition<L: Label>(dfa: &Dfa<L>) -> Vec<BlockId> {
    let mut assigned: FxHashMap<Option<L>, BlockId> = FxHashMap::default();
    let mut next = 0;
    dfa.states
        .iter()
        .map(|s| {
            *assigned.entry(s.accept.clone()).or_insert_with(|| {
                let id = next;
                next += 1;
                id
            })
        })
        .collect()
}

/// One refinement pass: states with identical (block, transition-target
/// blocks) signatures merge into one new block; everything else splits.
/// New block ids are assigned in order of first appearance by state index —
/// a fast hash map keyed on the signature, rather than the classic
/// preimage-splitting worklist.
fn refine<L: Label>(dfa: &Dfa<L>, block: &[BlockId]) -> Vec<BlockId> {
    let mut assigned: FxHashMap<(BlockId, Vec<(CharRange, BlockId)>), BlockId> =
        FxHashMap::default();
    let mut next = 0;
    dfa.states
        .iter()
        .enumerate()
        .map(|(idx, state)| {
            let signature = (
                block[idx],
                state
                    .transitions
                    .iter()
                    .map(|&(range, target)| (range, block[target]))
                    .collect::<Vec<_>>(),
            );
            *assigned.entry(signature).or_insert_with(|| {
                let id = next;
                next += 1;
                id
            })
        })
        .collect()
}

fn reconstruct<L: Label>(dfa: Dfa<L>, block: Vec<BlockId>) -> Dfa<L> {
    let num_blocks = block.iter().copied().max().map_or(0, |m| m + 1);

    // Representative of each block: the lowest-indexed member state.
    let mut representative: Vec<Option<StateId>> = vec![None; num_blocks];
    for (idx, &b) in block.iter().enumerate() {
        if representative[b].is_none() {
            representative[b] = Some(idx);
        }
    }

    let states: Vec<DfaState<L>> = representative
        .into_iter()
        .map(|rep| {
            let rep = rep.expect("every block has at least one member");
            let src = &dfa.states[rep];
            DfaState {
                accept: src.accept.clone(),
                transitions: src
                    .transitions
                    .iter()
                    .map(|&(range, target)| (range, block[target]))
                    .collect(),
            }
        })
        .collect();

    let starts = dfa.starts.iter().map(|&s| block[s]).collect();
    debug!("minimization converged: {num_blocks} block(s)");
    Dfa { states, starts }
}

/// Prunes states unreachable from any start state, remapping the survivors
/// to a contiguous index range.
fn prune_unreachable<L: Label>(dfa: Dfa<L>) -> Dfa<L> {
    let mut reachable = vec![false; dfa.states.len()];
    let mut stack: Vec<StateId> = dfa.starts.clone();
    for &s in &dfa.starts {
        reachable[s] = true;
    }
    while let Some(s) = stack.pop() {
        for &(_, target) in &dfa.states[s].transitions {
            if !reachable[target] {
                reachable[target] = true;
                stack.push(target);
            }
        }
    }

    if reachable.iter().all(|&r| r) {
        return dfa;
    }

    let mut remap = vec![None; dfa.states.len()];
    let mut next = 0;
    for (idx, keep) in reachable.iter().enumerate() {
        if *keep {
            remap[idx] = Some(next);
            next += 1;
        }
    }
    trace!("pruned {} unreachable dfa state(s)", dfa.states.len() - next);

    let states = dfa
        .states
        .into_iter()
        .zip(reachable.iter())
        .filter(|(_, keep)| **keep)
        .map(|(s, _)| DfaState {
            accept: s.accept,
            transitions: s
                .transitions
                .into_iter()
                .map(|(range, target)| (range, remap[target].expect("target must be reachable")))
                .collect(),
        })
        .collect();

    let starts = dfa
        .starts
        .into_iter()
        .map(|s| remap[s].expect("start state must be reachable"))
        .collect();

    Dfa { states, starts }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::Found;

    fn char_dfa(a: char) -> CharRange {
        CharRange::single(a as u16)
    }

    #[test]
    fn merges_equivalent_states_across_start_states() {
        // Two disjoint chains "a" -> accept, "a" -> accept, sharing the
        // same language, should minimize to a single two-state DFA shared
        // across both start states.
        let dfa: Dfa<Found> = Dfa {
            states: vec![
                DfaState {
                    accept: None,
                    transitions: vec![(char_dfa('a'), 2)],
                },
                DfaState {
                    accept: None,
                    transitions: vec![(char_dfa('a'), 3)],
                },
                DfaState {
                    accept: Some(Found),
                    transitions: vec![],
                },
                DfaState {
                    accept: Some(Found),
                    transitions: vec![],
                },
            ],
            starts: vec![0, 1],
        };
        let min = minimize(dfa);
        assert_eq!(min.states.len(), 2);
        assert_eq!(min.starts[0], min.starts[1]);
    }

    #[test]
    fn prunes_unreachable_states() {
        let dfa: Dfa<Found> = Dfa {
            states: vec![
                DfaState {
                    accept: None,
                    transitions: vec![],
                },
                DfaState {
                    accept: Some(Found),
                    transitions: vec![],
                },
            ],
            starts: vec![0],
        };
        let min = minimize(dfa);
        assert_eq!(min.states.len(), 1);
    }
}
