//! Reverse finder assembly: a DFA that, fed a string right-to-left, accepts
//! at every position where a non-empty forward match begins.

use crate::accumulator::PatternAccumulator;
use crate::charrange::CharRange;
use crate::label::{Found, Label};
use crate::nfa::{Nfa, StateId};
use crate::pattern::maybe_repeat;
use log::trace;
use std::collections::HashSet;

/// Builds the reverse-finder NFA and its per-language start states.
///
/// One accept state `e` tagged `Found` is shared across every language in
/// the batch: the reverse finder only ever reports "a match starts here",
/// never which label, so there is nothing to distinguish.
pub fn assemble_reverse<L: Label>(
    accumulator: &PatternAccumulator<L>,
    languages: &[HashSet<L>],
) -> (Nfa<Found>, Vec<StateId>) {
    let mut nfa: Nfa<Found> = Nfa::new();
    if languages.is_empty() {
        return (nfa, Vec::new());
    }

    let accept = nfa.new_state();
    nfa.set_accept(accept, Found);

    let mut starts = Vec::with_capacity(languages.len());
    for language in languages {
        let s0 = nfa.new_state();
        for (label, patterns) in accumulator.iter() {
            if !language.contains(label) {
                continue;
            }
            for pattern in patterns {
                let entry = pattern.reversed().add_to_nfa(&mut nfa, accept);
                nfa.add_epsilon(s0, entry);
            }
        }

        let s1 = disemptify(&mut nfa, s0, accept);
        trace!("reverse finder: disemptified start state {s1}");
        let star = maybe_repeat(CharRange::ALL);
        let final_start = star.add_to_nfa(&mut nfa, s1);
        starts.push(final_start);
    }

    (nfa, starts)
}

/// "Disemptify": if `start`'s epsilon closure reaches `accept`, rebuild
/// `start` as a state equivalent to the closure except it carries no
/// epsilon edges of its own — only the character transitions unioned from
/// every closure member (their targets are epsilon-closed again
/// downstream, by subset construction). Dropping `start`'s epsilons
/// removes every zero-symbol path to `accept` while every non-empty path
/// through the closure survives — standard epsilon-elimination, applied
/// to a single state rather than the whole NFA.
fn disemptify<L: Label>(nfa: &mut Nfa<L>, start: StateId, accept: StateId) -> StateId {
    let closure = nfa.epsilon_closure([start]);
    if !closure.contains(&accept) {
        return start;
    }

    let mut transitions = Vec::new();
    for member in closure.into_iter().filter(|&s| s != accept) {
        transitions.extend(nfa.states[member].transitions.iter().copied());
    }
    nfa.states[start].transitions = transitions;
    nfa.states[start].epsilon.clear();
    start
}
