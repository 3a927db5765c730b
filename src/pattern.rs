//! Reference pattern combinators: a small concrete family implementing the
//! `Pattern` capability so the construction core is directly testable
//! without a textual pattern syntax.
//!
//! Each combinator allocates one incoming state per subtree and stitches
//! it to the state the caller wants control handed to next via epsilons,
//! over `CharRange`-keyed transitions and the
//! `add_to_nfa(nfa, accept_state) -> entry_state` contract, so a pattern
//! can be compiled against many different accept states (one per label,
//! per language) rather than a single fixed one.

use crate::charrange::CharRange;
use crate::nfa::{NfaBuild, StateId};
use sha1::Sha1;
use std::fmt::Debug;
use std::rc::Rc;

/// A value contributing a sub-automaton to an NFA under construction.
pub trait Pattern: Debug {
    /// Appends states/transitions to `nfa` so that, starting from the
    /// returned entry state, the input reaches `accept` iff it matches
    /// this pattern.
    fn add_to_nfa(&self, nfa: &mut dyn NfaBuild, accept: StateId) -> StateId;

    /// The pattern matching the reverse of every string this one matches.
    /// `p.reversed().reversed()` must match the same language as `p`.
    fn reversed(&self) -> Rc<dyn Pattern>;

    /// Appends this pattern's structure to a running digest; two patterns
    /// that contribute equal fingerprints must describe the same language.
    fn write_fingerprint(&self, sha1: &mut Sha1);
}

fn digest_tag(sha1: &mut Sha1, tag: u8) {
    sha1::Digest::update(sha1, [tag]);
}

/// Matches exactly one code unit drawn from `range`.
#[derive(Debug, Clone)]
pub struct CharClass(pub CharRange);

impl Pattern for CharClass {
    fn add_to_nfa(&self, nfa: &mut dyn NfaBuild, accept: StateId) -> StateId {
        let entry = nfa.new_state();
        nfa.add_range(entry, self.0, accept);
        entry
    }

    fn reversed(&self) -> Rc<dyn Pattern> {
        Rc::new(self.clone())
    }

    fn write_fingerprint(&self, sha1: &mut Sha1) {
        digest_tag(sha1, 0);
        sha1::Digest::update(sha1, self.0.lo.to_le_bytes());
        sha1::Digest::update(sha1, self.0.hi.to_le_bytes());
    }
}

/// A literal sequence of code units, matching `units` in order.
#[derive(Debug, Clone)]
pub struct Literal(pub Vec<u16>);

impl Pattern for Literal {
    fn add_to_nfa(&self, nfa: &mut dyn NfaBuild, accept: StateId) -> StateId {
        let mut send_to = accept;
        for &unit in self.0.iter().rev() {
            let entry = nfa.new_state();
            nfa.add_range(entry, CharRange::single(unit), send_to);
            send_to = entry;
        }
        if self.0.is_empty() {
            let entry = nfa.new_state();
            nfa.add_epsilon(entry, send_to);
            entry
        } else {
            send_to
        }
    }

    fn reversed(&self) -> Rc<dyn Pattern> {
        let mut units = self.0.clone();
        units.reverse();
        Rc::new(Literal(units))
    }

    fn write_fingerprint(&self, sha1: &mut Sha1) {
        digest_tag(sha1, 1);
        sha1::Digest::update(sha1, (self.0.len() as u32).to_le_bytes());
        for unit in &self.0 {
            sha1::Digest::update(sha1, unit.to_le_bytes());
        }
    }
}

/// Matches each sub-pattern in sequence.
#[derive(Debug, Clone)]
pub struct Concat(pub Vec<Rc<dyn Pattern>>);

impl Pattern for Concat {
    fn add_to_nfa(&self, nfa: &mut dyn NfaBuild, accept: StateId) -> StateId {
        let mut send_to = accept;
        for p in self.0.iter().rev() {
            send_to = p.add_to_nfa(nfa, send_to);
        }
        if self.0.is_empty() {
            let entry = nfa.new_state();
            nfa.add_epsilon(entry, send_to);
            entry
        } else {
            send_to
        }
    }

    fn reversed(&self) -> Rc<dyn Pattern> {
        let mut parts: Vec<_> = self.0.iter().map(|p| p.reversed()).collect();
        parts.reverse();
        Rc::new(Concat(parts))
    }

    fn write_fingerprint(&self, sha1: &mut Sha1) {
        digest_tag(sha1, 2);
        sha1::Digest::update(sha1, (self.0.len() as u32).to_le_bytes());
        for p in &self.0 {
            p.write_fingerprint(sha1);
        }
    }
}

/// Matches any one of its alternatives.
#[derive(Debug, Clone)]
pub struct Union(pub Vec<Rc<dyn Pattern>>);

impl Pattern for Union {
    fn add_to_nfa(&self, nfa: &mut dyn NfaBuild, accept: StateId) -> StateId {
        let entry = nfa.new_state();
        for p in &self.0 {
            let branch_entry = p.add_to_nfa(nfa, accept);
            nfa.add_epsilon(entry, branch_entry);
        }
        entry
    }

    fn reversed(&self) -> Rc<dyn Pattern> {
        Rc::new(Union(self.0.iter().map(|p| p.reversed()).collect()))
    }

    fn write_fingerprint(&self, sha1: &mut Sha1) {
        digest_tag(sha1, 3);
        sha1::Digest::update(sha1, (self.0.len() as u32).to_le_bytes());
        for p in &self.0 {
            p.write_fingerprint(sha1);
        }
    }
}

/// Zero-or-more repetitions of `inner` (Kleene star).
#[derive(Debug, Clone)]
pub struct Star(pub Rc<dyn Pattern>);

impl Pattern for Star {
    fn add_to_nfa(&self, nfa: &mut dyn NfaBuild, accept: StateId) -> StateId {
        let entry = nfa.new_state();
        let loop_entry = self.0.add_to_nfa(nfa, entry);
        nfa.add_epsilon(entry, loop_entry);
        nfa.add_epsilon(entry, accept);
        entry
    }

    fn reversed(&self) -> Rc<dyn Pattern> {
        Rc::new(Star(self.0.reversed()))
    }

    fn write_fingerprint(&self, sha1: &mut Sha1) {
        digest_tag(sha1, 4);
        self.0.write_fingerprint(sha1);
    }
}

/// One-or-more repetitions of `inner` (Kleene plus), built as `inner` then
/// `Star(inner)`.
#[derive(Debug, Clone)]
pub struct Plus(pub Rc<dyn Pattern>);

impl Pattern for Plus {
    fn add_to_nfa(&self, nfa: &mut dyn NfaBuild, accept: StateId) -> StateId {
        let star_entry = Star(self.0.clone()).add_to_nfa(nfa, accept);
        self.0.add_to_nfa(nfa, star_entry)
    }

    fn reversed(&self) -> Rc<dyn Pattern> {
        Rc::new(Plus(self.0.reversed()))
    }

    fn write_fingerprint(&self, sha1: &mut Sha1) {
        digest_tag(sha1, 5);
        self.0.write_fingerprint(sha1);
    }
}

/// A zero-or-more sub-automaton over a single character range, the
/// building block `CharRange::ALL`-prefixed reverse finders use.
pub fn maybe_repeat(range: CharRange) -> Rc<dyn Pattern> {
    Rc::new(Star(Rc::new(CharClass(range))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::Found;
    use crate::nfa::Nfa;

    fn accepts(pattern: &dyn Pattern, input: &[u16]) -> bool {
        let mut nfa: Nfa<Found> = Nfa::new();
        let accept = nfa.new_state();
        nfa.set_accept(accept, Found);
        let entry = pattern.add_to_nfa(&mut nfa, accept);
        let mut current = nfa.epsilon_closure([entry]);
        for &unit in input {
            let mut next = std::collections::BTreeSet::new();
            for &s in &current {
                for (range, target) in &nfa.states[s].transitions {
                    if range.contains(unit) {
                        next.insert(*target);
                    }
                }
            }
            current = nfa.epsilon_closure(next);
        }
        current.iter().any(|&s| nfa.states[s].accept.is_some())
    }

    fn str_units(s: &str) -> Vec<u16> {
        s.encode_utf16().collect()
    }

    #[test]
    fn literal_matches_exact_string() {
        let p = Literal(str_units("cat"));
        assert!(accepts(&p, &str_units("cat")));
        assert!(!accepts(&p, &str_units("ca")));
        assert!(!accepts(&p, &str_units("cats")));
    }

    #[test]
    fn union_matches_either_branch() {
        let p = Union(vec![
            Rc::new(Literal(str_units("cat"))),
            Rc::new(Literal(str_units("car"))),
        ]);
        assert!(accepts(&p, &str_units("cat")));
        assert!(accepts(&p, &str_units("car")));
        assert!(!accepts(&p, &str_units("cab")));
    }

    #[test]
    fn plus_requires_at_least_one() {
        let p = Plus(Rc::new(CharClass(CharRange::single(b'a' as u16))));
        assert!(!accepts(&p, &str_units("")));
        assert!(accepts(&p, &str_units("a")));
        assert!(accepts(&p, &str_units("aaaa")));
    }

    #[test]
    fn star_accepts_empty() {
        let p = Star(Rc::new(CharClass(CharRange::single(b'a' as u16))));
        assert!(accepts(&p, &str_units("")));
        assert!(accepts(&p, &str_units("aaa")));
        assert!(!accepts(&p, &str_units("aab")));
    }

    #[test]
    fn reversed_is_involutive_on_literal() {
        let p = Literal(str_units("abc"));
        let rr = p.reversed().reversed();
        assert!(accepts(rr.as_ref(), &str_units("abc")));
        assert!(!accepts(rr.as_ref(), &str_units("cba")));
    }

    #[test]
    fn reversed_literal_matches_reverse() {
        let p = Literal(str_units("abc"));
        let r = p.reversed();
        assert!(accepts(r.as_ref(), &str_units("cba")));
        assert!(!accepts(r.as_ref(), &str_units("abc")));
    }
}
