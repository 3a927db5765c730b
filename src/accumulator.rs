//! Pattern accumulator and forward NFA assembler.

use crate::dfa::{build_from_nfa, Dfa};
use crate::error::BuildError;
use crate::label::{Found, Label};
use crate::nfa::{Nfa, StateId};
use crate::pattern::Pattern;
use crate::resolver::{PanicOnAmbiguity, Resolver};
use indexmap::IndexMap;
use log::{debug, trace};
use std::collections::HashSet;
use std::rc::Rc;

/// Maintains an insertion-ordered mapping from label to the patterns
/// contributing to it. Order of first insertion governs both fingerprint
/// determinism and the order labels are wired into the NFA.
#[derive(Debug, Default)]
pub struct PatternAccumulator<L: Label> {
    patterns: IndexMap<L, Vec<Rc<dyn Pattern>>>,
}

impl<L: Label> PatternAccumulator<L> {
    pub fn new() -> Self {
        PatternAccumulator {
            patterns: IndexMap::new(),
        }
    }

    /// Appends `pattern` to `label`'s pattern list, inserting the label at
    /// the end of iteration order on first use.
    pub fn add(&mut self, label: L, pattern: Rc<dyn Pattern>) {
        self.patterns.entry(label).or_default().push(pattern);
    }

    pub fn clear(&mut self) {
        self.patterns.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Labels and their pattern lists, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&L, &Vec<Rc<dyn Pattern>>)> {
        self.patterns.iter()
    }

    pub fn get(&self, label: &L) -> Option<&[Rc<dyn Pattern>]> {
        self.patterns.get(label).map(Vec::as_slice)
    }

    /// Builds a minimized DFA with one start state per requested language.
    /// An empty `languages` list returns an empty result without touching
    /// the NFA builder.
    pub fn build(
        &self,
        languages: &[HashSet<L>],
        resolver: &dyn Resolver<L>,
    ) -> Result<Dfa<L>, BuildError<L>> {
        let (nfa, starts) = assemble_forward(self, languages);
        build_from_nfa(&nfa, &starts, resolver)
    }

    /// Builds the reverse finder for the same language list. All accept
    /// labels collapse to `Found`, so ambiguity is impossible; a conflict
    /// here indicates a bug in the assembler, hence the panic.
    pub fn build_reverse_finders(&self, languages: &[HashSet<L>]) -> Dfa<Found> {
        let (nfa, starts) = crate::reverse::assemble_reverse(self, languages);
        build_from_nfa(&nfa, &starts, &PanicOnAmbiguity)
            .expect("reverse finder construction cannot produce ambiguous accepts")
    }
}

/// Builds a single arena holding one fresh start state per requested
/// language, epsilon-wired to the (possibly shared) accept state for every
/// label included in that language.
///
/// Returns the NFA and the list of language start states, in the same
/// order as `languages`.
pub fn assemble_forward<L: Label>(
    accumulator: &PatternAccumulator<L>,
    languages: &[HashSet<L>],
) -> (Nfa<L>, Vec<StateId>) {
    let mut nfa = Nfa::new();
    if languages.is_empty() {
        return (nfa, Vec::new());
    }

    let starts: Vec<StateId> = (0..languages.len()).map(|_| nfa.new_state()).collect();
    debug!("nfa assembly: {} language start states", starts.len());

    for (label, patterns) in accumulator.iter() {
        if patterns.is_empty() {
            continue;
        }
        let langs: Vec<usize> = languages
            .iter()
            .enumerate()
            .filter(|(_, lang)| lang.contains(label))
            .map(|(i, _)| i)
            .collect();
        if langs.is_empty() {
            continue;
        }

        let accept = nfa.new_state();
        nfa.set_accept(accept, label.clone());
        trace!("label {label:?}: {} pattern(s), accept state {accept}", patterns.len());

        let entry = if let [single] = patterns.as_slice() {
            single.add_to_nfa(&mut nfa, accept)
        } else {
            let union = nfa.new_state();
            for p in patterns {
                let branch = p.add_to_nfa(&mut nfa, accept);
                nfa.add_epsilon(union, branch);
            }
            union
        };

        for i in langs {
            nfa.add_epsilon(starts[i], entry);
        }
    }

    (nfa, starts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::Literal;

    fn units(s: &str) -> Vec<u16> {
        s.encode_utf16().collect()
    }

    #[test]
    fn empty_languages_list_touches_nothing() {
        let acc: PatternAccumulator<String> = PatternAccumulator::new();
        let (nfa, starts) = assemble_forward(&acc, &[]);
        assert!(nfa.is_empty());
        assert!(starts.is_empty());
    }

    #[test]
    fn label_absent_from_every_language_is_skipped() {
        let mut acc = PatternAccumulator::new();
        acc.add("A".to_string(), Rc::new(Literal(units("a"))));
        let languages = vec![HashSet::from(["B".to_string()])];
        let (nfa, starts) = assemble_forward(&acc, &languages);
        assert_eq!(starts.len(), 1);
        // Only the language start state was allocated; no accept state for A.
        assert!(!nfa.states.iter().any(|s| s.accept.is_some()));
    }

    #[test]
    fn shared_accept_state_for_multi_pattern_label() {
        let mut acc = PatternAccumulator::new();
        acc.add("A".to_string(), Rc::new(Literal(units("cat"))));
        acc.add("A".to_string(), Rc::new(Literal(units("car"))));
        let languages = vec![HashSet::from(["A".to_string()])];
        let (nfa, _) = assemble_forward(&acc, &languages);
        let accept_states: Vec<_> = nfa
            .states
            .iter()
            .enumerate()
            .filter(|(_, s)| s.accept.is_some())
            .map(|(i, _)| i)
            .collect();
        assert_eq!(accept_states.len(), 1);
    }
}
