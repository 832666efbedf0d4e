//! KDL configuration for Cosmos naming.
//!
//! This crate handles parsing of:
//! - Scope hierarchy files (cosmos.kdl)
//! - Default extra parameters for name resolution

pub mod error;
pub mod hierarchy;

pub use error::{ConfigError, ConfigResult};
pub use hierarchy::{Hierarchy, load_hierarchy, parse_hierarchy};
