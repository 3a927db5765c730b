//! Content fingerprint / cache key: a 160-bit digest over a deterministic
//! serialization of whatever semantically determines a build's output,
//! Base32-encoded into a cache key.

use crate::accumulator::PatternAccumulator;
use crate::label::Label;
use crate::resolver::Resolver;
use data_encoding::BASE32;
use sha1::{Digest, Sha1};
use std::collections::HashSet;

const FORWARD: u8 = 0;
const REVERSE: u8 = 1;

/// Shared body: `num_languages`, then for each label (insertion order)
/// with a nonempty pattern list appearing in at least one language, the
/// pattern count, the bit-packed language membership (only when there is
/// more than one language, 32 bits per word, little-endian within each
/// word — kept exactly this way for cache interoperability, see
/// DESIGN.md), each pattern, the label, and a sentinel byte.
fn write_common<L: Label>(
    sha1: &mut Sha1,
    accumulator: &PatternAccumulator<L>,
    languages: &[HashSet<L>],
) {
    sha1.update((languages.len() as u32).to_le_bytes());
    for (label, patterns) in accumulator.iter() {
        let included = languages.iter().any(|lang| lang.contains(label));
        if patterns.is_empty() || !included {
            continue;
        }
        sha1.update((patterns.len() as u32).to_le_bytes());
        if languages.len() > 1 {
            for word_idx in 0..languages.len().div_ceil(32) {
                let mut word: u32 = 0;
                for bit in 0..32 {
                    let i = word_idx * 32 + bit;
                    if i < languages.len() && languages[i].contains(label) {
                        word |= 1 << bit;
                    }
                }
                sha1.update(word.to_le_bytes());
            }
        }
        for pattern in patterns {
            pattern.write_fingerprint(sha1);
        }
        label.write_fingerprint(sha1);
        sha1.update([0u8]);
    }
}

pub fn forward_fingerprint<L: Label>(
    accumulator: &PatternAccumulator<L>,
    languages: &[HashSet<L>],
    resolver: &dyn Resolver<L>,
) -> [u8; 20] {
    let mut sha1 = Sha1::new();
    sha1.update([FORWARD]);
    write_common(&mut sha1, accumulator, languages);
    resolver.write_fingerprint(&mut sha1);
    sha1.finalize().into()
}

pub fn reverse_fingerprint<L: Label>(
    accumulator: &PatternAccumulator<L>,
    languages: &[HashSet<L>],
) -> [u8; 20] {
    let mut sha1 = Sha1::new();
    sha1.update([REVERSE]);
    write_common(&mut sha1, accumulator, languages);
    sha1.finalize().into()
}

/// The cache key is the Base32 encoding of the digest.
pub fn cache_key(digest: &[u8; 20]) -> String {
    BASE32.encode(digest)
}
