//! Hierarchical naming for Cosmos infrastructure.
//!
//! This crate contains:
//! - The scope hierarchy (Cosmos → Galaxy → SolarSystem, plus extensions)
//! - Name patterns and the canonical pattern catalog
//! - The resolver turning a pattern and a scope into a name
//! - A construct tree that resolves names from a node's ancestry
//! - Selector-based node ids for stacks and constructs

pub mod catalog;
pub mod construct;
pub mod error;
pub mod id;
pub mod node_id;
pub mod pattern;
pub mod resolve;
pub mod scope;

pub use construct::{ConstructTree, NodeRef};
pub use error::{Error, Result, StructuralError};
pub use id::{NodeId, ScopeId};
pub use pattern::{Params, Pattern};
pub use resolve::{Named, Resolution, TypeLabel, resolve};
pub use scope::{Scope, ScopeKind, ScopeRef, ScopeTree};
