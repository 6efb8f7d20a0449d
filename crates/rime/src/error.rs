//! Errors reported for misuse of the container API.
//!
//! Missing keys and paths are not errors; lookups return `None` instead.

use crate::container::ContainerKind;
use crate::key::Key;

/// Invalid-operation conditions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A record-only or sequence-only operation was applied to the other kind.
    #[error("expected a {expected} but found a {found}")]
    WrongKind {
        expected: ContainerKind,
        found: ContainerKind,
    },

    /// A sequence position was addressed with something that is not a
    /// non-negative integer.
    #[error("`{key}` is not a valid sequence index")]
    InvalidIndex { key: Key },

    /// A path step would have to descend through a scalar.
    #[error("cannot descend through `{key}`: it holds a scalar, not a container")]
    ScalarInPath { key: Key },

    /// The root of a container tree was asked to become a scalar.
    #[error("the root of a container tree must be a record or a sequence")]
    ScalarRoot,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
