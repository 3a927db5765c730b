//! # dfacore
//!
//! The DFA construction core of a lexical-analysis library: given a set of
//! labeled regular-language patterns, build a minimized deterministic
//! finite automaton that recognizes all of them simultaneously and reports,
//! at every input position, which label (if any) has been accepted.
//!
//! Three tightly coupled subsystems do the work:
//!
//! * [`accumulator`] assembles an NFA from labeled [`pattern::Pattern`]
//!   descriptors, one fresh start state per requested language.
//! * [`dfa::subset`] is the powerset construction that turns that NFA into
//!   a deterministic automaton, resolving overlapping accept labels through
//!   a caller-supplied [`resolver::Resolver`].
//! * [`dfa::minimize`] collapses the raw DFA with a Hopcroft-style hash
//!   partition refinement, sharing equivalent states across every start
//!   state built in the same batch.
//!
//! [`reverse`] builds a derived automaton — fed a string back to front, it
//! accepts wherever a non-empty forward match begins — by composing
//! reversed patterns ahead of the same subset+minimize pipeline.
//!
//! The pattern surface syntax (parsing textual regex source), the runtime
//! matcher that walks the produced DFA, and persistent storage of built
//! automata are out of scope; [`pattern`] ships a small concrete pattern
//! family and [`cache`] a reference in-memory cache only so the core is
//! directly exercisable.
//!
//! ```
//! use dfacore::accumulator::PatternAccumulator;
//! use dfacore::pattern::Literal;
//! use dfacore::resolver::AlwaysFail;
//! use std::collections::HashSet;
//! use std::rc::Rc;
//!
//! let mut patterns = PatternAccumulator::new();
//! patterns.add("A", Rc::new(Literal("cat".encode_utf16().collect())));
//! patterns.add("B", Rc::new(Literal("car".encode_utf16().collect())));
//!
//! let languages = vec![HashSet::from(["A", "B"])];
//! let dfa = patterns.build(&languages, &AlwaysFail).unwrap();
//!
//! let mut state = dfa.start_states().into_iter().next().unwrap();
//! for unit in "cat".encode_utf16() {
//!     state = state.next_state(unit).unwrap();
//! }
//! assert_eq!(state.accept(), Some(&"A"));
//! ```

pub mod accumulator;
pub mod cache;
pub mod charrange;
pub mod dfa;
pub mod error;
pub mod fingerprint;
pub mod label;
pub mod nfa;
pub mod pattern;
pub mod resolver;
pub mod reverse;
