//! Subset ("powerset") construction: NFA -> raw DFA.

use crate::charrange::disjoint_cover;
use crate::dfa::{Dfa, DfaState};
use crate::error::BuildError;
use crate::label::Label;
use crate::nfa::{Nfa, StateId};
use crate::resolver::Resolver;
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;
use log::trace;

type Closure = BTreeSet<StateId>;

/// Runs the worklist algorithm: closures are interned in a map from
/// canonical (sorted, deduplicated) NFA state sets to sequential DFA
/// indices, so set equality drives hashing and construction is
/// deterministic given the input.
pub fn construct<L: Label>(
    nfa: &Nfa<L>,
    nfa_starts: &[StateId],
    resolver: &dyn Resolver<L>,
) -> Result<Dfa<L>, BuildError<L>> {
    let mut seen: FxHashMap<Closure, StateId> = FxHashMap::default();
    let mut states: Vec<DfaState<L>> = Vec::new();
    let mut worklist: Vec<(StateId, Closure)> = Vec::new();

    let intern = |closure: Closure,
                       seen: &mut FxHashMap<Closure, StateId>,
                       states: &mut Vec<DfaState<L>>,
                       worklist: &mut Vec<(StateId, Closure)>| {
        if let Some(&idx) = seen.get(&closure) {
            return idx;
        }
        let idx = states.len();
        states.push(DfaState {
            accept: None,
            transitions: Vec::new(),
        });
        seen.insert(closure.clone(), idx);
        worklist.push((idx, closure));
        idx
    };

    let starts: Vec<StateId> = nfa_starts
        .iter()
        .map(|&s| {
            let closure = nfa.epsilon_closure([s]);
            intern(closure, &mut seen, &mut states, &mut worklist)
        })
        .collect();

    while let Some((dfa_idx, closure)) = worklist.pop() {
        trace!("subset construction: expanding dfa state {dfa_idx} ({} nfa state(s))", closure.len());

        // Accept resolution: collapse the closure's distinct accept labels.
        let mut conflicting: Vec<L> = Vec::new();
        for &member in &closure {
            if let Some(label) = &nfa.states[member].accept {
                if !conflicting.contains(label) {
                    conflicting.push(label.clone());
                }
            }
        }
        let accept = match conflicting.len() {
            0 => None,
            1 => Some(conflicting.into_iter().next().unwrap()),
            _ => match resolver.resolve(&conflicting) {
                Some(label) => Some(label),
                None => return Err(BuildError::Ambiguity { conflicting }),
            },
        };

        // Transition computation: disjoint covering of every outgoing
        // character range among the closure's members.
        let outgoing: Vec<(crate::charrange::CharRange, StateId)> = closure
            .iter()
            .flat_map(|&member| nfa.states[member].transitions.iter().copied())
            .collect();
        let cover = disjoint_cover(&outgoing);

        let mut transitions = Vec::with_capacity(cover.len());
        for (range, targets) in cover {
            let target_closure = nfa.epsilon_closure(targets);
            let target_idx = intern(target_closure, &mut seen, &mut states, &mut worklist);
            transitions.push((range, target_idx));
        }
        transitions.sort_by_key(|(r, _)| r.cmp_key());

        states[dfa_idx].accept = accept;
        states[dfa_idx].transitions = transitions;
    }

    Ok(Dfa { states, starts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charrange::CharRange;
    use crate::label::Found;
    use crate::resolver::{AlwaysFail, PanicOnAmbiguity};

    #[test]
    fn single_literal_chain() {
        let mut nfa: Nfa<Found> = Nfa::new();
        let s0 = nfa.new_state();
        let s1 = nfa.new_state();
        let accept = nfa.new_state();
        nfa.add_range(s0, CharRange::single(b'a' as u16), s1);
        nfa.add_range(s1, CharRange::single(b'b' as u16), accept);
        nfa.set_accept(accept, Found);

        let dfa = construct(&nfa, &[s0], &AlwaysFail).unwrap();
        assert_eq!(dfa.starts.len(), 1);
        let start = dfa.states[dfa.starts[0]].clone();
        assert!(start.accept.is_none());
        let (_, mid) = start.transitions[0];
        let mid_state = dfa.states[mid].clone();
        assert!(mid_state.accept.is_none());
        let (_, end) = mid_state.transitions[0];
        assert!(dfa.states[end].accept.is_some());
    }

    #[test]
    fn empty_alphabet_single_nonaccepting_start() {
        let mut nfa: Nfa<Found> = Nfa::new();
        let s0 = nfa.new_state();
        let dfa = construct(&nfa, &[s0], &AlwaysFail).unwrap();
        assert_eq!(dfa.states.len(), 1);
        assert!(dfa.states[0].accept.is_none());
        assert!(dfa.states[0].transitions.is_empty());
    }

    #[test]
    fn ambiguous_accept_fails_with_default_resolver() {
        let mut nfa: Nfa<String> = Nfa::new();
        let s0 = nfa.new_state();
        let a = nfa.new_state();
        let b = nfa.new_state();
        nfa.add_epsilon(s0, a);
        nfa.add_epsilon(s0, b);
        nfa.set_accept(a, "A".to_string());
        nfa.set_accept(b, "B".to_string());

        let err = construct(&nfa, &[s0], &AlwaysFail).unwrap_err();
        match err {
            BuildError::Ambiguity { mut conflicting } => {
                conflicting.sort();
                assert_eq!(conflicting, vec!["A".to_string(), "B".to_string()]);
            }
        }
    }

    #[test]
    #[should_panic]
    fn reverse_resolver_panics_on_unexpected_conflict() {
        let mut nfa: Nfa<String> = Nfa::new();
        let s0 = nfa.new_state();
        let a = nfa.new_state();
        let b = nfa.new_state();
        nfa.add_epsilon(s0, a);
        nfa.add_epsilon(s0, b);
        nfa.set_accept(a, "A".to_string());
        nfa.set_accept(b, "B".to_string());
        let _ = construct(&nfa, &[s0], &PanicOnAmbiguity);
    }
}
