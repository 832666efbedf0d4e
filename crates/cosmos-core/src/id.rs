//! Arena identifiers.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Index of a scope inside a [`ScopeTree`](crate::scope::ScopeTree).
///
/// Ids are only meaningful for the tree that issued them. Children hold the
/// id of their parent, never the parent itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display)]
#[display("#{_0}")]
pub struct ScopeId(usize);

impl ScopeId {
    /// Position of the scope in its tree.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl From<usize> for ScopeId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl From<ScopeId> for usize {
    fn from(id: ScopeId) -> Self {
        id.0
    }
}

/// Index of a node inside a [`ConstructTree`](crate::construct::ConstructTree).
///
/// Like [`ScopeId`], only meaningful for the tree that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display)]
#[display("@{_0}")]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl From<usize> for NodeId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}
