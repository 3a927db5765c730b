//! Ambiguity resolution: deciding which label wins when a DFA state's NFA
//! members carry more than one distinct accept label.

use crate::label::Label;
use sha1::Sha1;

/// A first-class value the subset constructor calls at most once per
/// raw-DFA state whose members disagree on an accept label.
pub trait Resolver<L: Label> {
    /// `conflicting` holds more than one distinct label. Returns the label
    /// to accept, or `None` to fail the build with `BuildError::Ambiguity`.
    fn resolve(&self, conflicting: &[L]) -> Option<L>;

    /// Folds this resolver's identity into the content fingerprint.
    fn write_fingerprint(&self, sha1: &mut Sha1);
}

/// The default resolver: unconditionally fails. A build against
/// overlapping patterns with no caller-supplied resolver surfaces an
/// `Ambiguity` error rather than silently picking a label.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysFail;

impl<L: Label> Resolver<L> for AlwaysFail {
    fn resolve(&self, _conflicting: &[L]) -> Option<L> {
        None
    }

    fn write_fingerprint(&self, sha1: &mut Sha1) {
        sha1::Digest::update(sha1, [0u8]);
    }
}

/// Resolver used internally by the reverse finder: every accept label is
/// `Found`, so the subset constructor should never observe more
/// than one distinct label in a conflict set. If it ever does, that is a
/// bug in the reverse-finder assembler, not a build-time ambiguity.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanicOnAmbiguity;

impl<L: Label> Resolver<L> for PanicOnAmbiguity {
    fn resolve(&self, conflicting: &[L]) -> Option<L> {
        panic!("reverse finder produced conflicting accept labels: {conflicting:?}");
    }

    fn write_fingerprint(&self, _sha1: &mut Sha1) {
        // Reverse finder fingerprints omit the resolver field entirely.
    }
}
