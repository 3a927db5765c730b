//! The DFA artifact and the shared build-from-NFA entry point. States live
//! in a `Vec` and are referenced by index, with `CharRange`-keyed
//! transitions and support for multiple named start states.

pub mod minimize;
pub mod subset;

use crate::charrange::CharRange;
use crate::error::BuildError;
use crate::label::Label;
use crate::nfa::{Nfa, StateId};
use crate::resolver::Resolver;
use log::debug;

#[derive(Debug, Clone)]
pub struct DfaState<L: Label> {
    pub accept: Option<L>,
    /// Sorted, pairwise-disjoint; a code unit with no matching range has
    /// no transition (the implicit dead sink).
    pub transitions: Vec<(CharRange, StateId)>,
}

impl<L: Label> DfaState<L> {
    pub fn target(&self, code_unit: u16) -> Option<StateId> {
        // Transitions are sorted and disjoint, so a linear scan suffices;
        // the table per state is small in practice (character classes).
        self.transitions
            .iter()
            .find(|(range, _)| range.contains(code_unit))
            .map(|(_, target)| *target)
    }
}

#[derive(Debug, Clone)]
pub struct Dfa<L: Label> {
    pub states: Vec<DfaState<L>>,
    pub starts: Vec<StateId>,
}

impl<L: Label> Dfa<L> {
    /// One handle per requested language, in order.
    pub fn start_states(&self) -> Vec<DfaStateRef<'_, L>> {
        self.starts
            .iter()
            .map(|&idx| DfaStateRef { dfa: self, idx })
            .collect()
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }
}

/// The only two operations the external matcher needs: step on one code
/// unit, or read the current accept label.
#[derive(Debug, Clone, Copy)]
pub struct DfaStateRef<'a, L: Label> {
    dfa: &'a Dfa<L>,
    idx: StateId,
}

impl<'a, L: Label> DfaStateRef<'a, L> {
    pub fn next_state(&self, code_unit: u16) -> Option<DfaStateRef<'a, L>> {
        self.dfa.states[self.idx]
            .target(code_unit)
            .map(|idx| DfaStateRef { dfa: self.dfa, idx })
    }

    pub fn accept(&self) -> Option<&'a L> {
        self.dfa.states[self.idx].accept.as_ref()
    }

    pub fn index(&self) -> StateId {
        self.idx
    }
}

/// The shared tail used by both the forward and reverse pipelines: runs
/// subset construction followed by minimization over the union of all
/// requested start states, so equivalent states across languages are
/// shared in the result.
pub fn build_from_nfa<L: Label>(
    nfa: &Nfa<L>,
    starts: &[StateId],
    resolver: &dyn Resolver<L>,
) -> Result<Dfa<L>, BuildError<L>> {
    if starts.is_empty() {
        return Ok(Dfa {
            states: Vec::new(),
            starts: Vec::new(),
        });
    }
    debug!("build_from_nfa: {} nfa state(s), {} start(s)", nfa.len(), starts.len());
    let raw = subset::construct(nfa, starts, resolver)?;
    debug!("subset construction: {} raw dfa state(s)", raw.states.len());
    let minimized = minimize::minimize(raw);
    debug!("minimization: {} final dfa state(s)", minimized.states.len());
    Ok(minimized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::Found;

    #[test]
    fn dfa_state_ref_walks_transitions() {
        let dfa: Dfa<Found> = Dfa {
            states: vec![
                DfaState {
                    accept: None,
                    transitions: vec![(CharRange::single(b'a' as u16), 1)],
                },
                DfaState {
                    accept: Some(Found),
                    transitions: vec![],
                },
            ],
            starts: vec![0],
        };
        let start = &dfa.start_states()[0];
        assert!(start.accept().is_none());
        let next = start.next_state(b'a' as u16).unwrap();
        assert_eq!(next.accept(), Some(&Found));
        assert!(next.next_state(b'a' as u16).is_none());
    }
}
