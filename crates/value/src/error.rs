//! Error types for the value crate.

use thiserror::Error;

/// Errors raised while building or manipulating [`crate::Value`] trees.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// The arena's allocation budget was exhausted.
    #[error("allocation failure: requested {requested} bytes, {remaining} remaining of {budget}")]
    AllocationFailure {
        requested: usize,
        remaining: usize,
        budget: usize,
    },

    /// A placeholder in an argument template has no matching substitution.
    #[error("missing substitution for placeholder {placeholder_id}")]
    MissingSubstitution { placeholder_id: u32 },

    /// A path in a replacement program does not resolve inside the template literal.
    #[error("replacement path does not resolve inside template literal")]
    InvalidPath,
}

pub type ValueResult<T> = Result<T, ValueError>;
