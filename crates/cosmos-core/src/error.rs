//! Error types for name resolution.

use crate::id::{NodeId, ScopeId};
use crate::scope::ScopeKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("structural error: {0}")]
    Structural(#[from] StructuralError),

    #[error("missing placeholder: {0} is not defined")]
    MissingPlaceholder(String),
}

/// A scope chain that cannot be walked up to a single root.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    #[error("{kind} '{name}' has no parent reference")]
    MissingParent { kind: ScopeKind, name: String },

    #[error("scope {0} is not part of the tree")]
    UnknownScope(ScopeId),

    #[error("{kind} '{name}' points at a {parent} parent")]
    UnexpectedParent {
        kind: ScopeKind,
        name: String,
        parent: ScopeKind,
    },

    #[error("construct {0} is not part of the tree")]
    UnknownNode(NodeId),

    #[error("construct {0} is not bound to a scope")]
    Unbound(NodeId),

    #[error("Partition not found on Cosmos bubble '{0}'")]
    MissingPartition(String),

    #[error("scope chain exceeds {0} levels below the root")]
    DepthExceeded(usize),
}

pub type Result<T> = std::result::Result<T, Error>;
