//! Result labels: the opaque, caller-supplied values tagging accept states.

use sha1::Sha1;
use std::fmt::Debug;
use std::hash::Hash;

/// A value a DFA state can be tagged with, plus enough structure to fold it
/// into a content fingerprint (see [`crate::fingerprint`]).
///
/// No ordering is assumed of `L`; determinism instead comes from the
/// insertion-ordered containers used throughout the accumulator and
/// assembler.
pub trait Label: Clone + Eq + Hash + Debug {
    /// Appends this label's content to a running digest, in a form stable
    /// across runs for equal labels.
    fn write_fingerprint(&self, sha1: &mut Sha1);
}

impl Label for String {
    fn write_fingerprint(&self, sha1: &mut Sha1) {
        sha1::Digest::update(sha1, self.as_bytes());
    }
}

impl Label for &'static str {
    fn write_fingerprint(&self, sha1: &mut Sha1) {
        sha1::Digest::update(sha1, self.as_bytes());
    }
}

impl Label for u32 {
    fn write_fingerprint(&self, sha1: &mut Sha1) {
        sha1::Digest::update(sha1, self.to_le_bytes());
    }
}

/// The sole accept label used by reverse finders: there is only ever one
/// kind of match, so no caller-facing label type is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Found;

impl Label for Found {
    fn write_fingerprint(&self, sha1: &mut Sha1) {
        sha1::Digest::update(sha1, [1u8]);
    }
}
