//! Crate-level error type: one variant per failure kind, a
//! `#[error("...")]` message per variant, no type-erased `anyhow`-style
//! catch-all.

use crate::label::Label;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError<L: Label> {
    #[error("ambiguous accept labels could not be resolved: {conflicting:?}")]
    Ambiguity { conflicting: Vec<L> },
}
