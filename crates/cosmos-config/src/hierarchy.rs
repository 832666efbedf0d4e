//! Scope hierarchy configuration parsing.
//!
//! ```kdl
//! params {
//!     Region "ap-southeast-2"
//! }
//!
//! cosmos "Demo" {
//!     galaxy "Mgt" {
//!         solar-system "Dev"
//!     }
//! }
//!
//! cosmos-extension "Demo" partition="App" {
//!     galaxy-extension "Mgt"
//! }
//! ```

use crate::{ConfigError, ConfigResult};
use cosmos_core::resolve::{COSMOS, GALAXY, PARTITION, SOLAR_SYSTEM, TYPE};
use cosmos_core::{Params, ScopeId, ScopeKind, ScopeTree};
use kdl::{KdlDocument, KdlNode};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, warn};

/// A parsed hierarchy file.
#[derive(Debug, Clone, Default)]
pub struct Hierarchy {
    scopes: ScopeTree,
    params: Params,
}

impl Hierarchy {
    pub fn scopes(&self) -> &ScopeTree {
        &self.scopes
    }

    /// Default extra parameters for every resolution.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Look up a scope by path, e.g. `Demo/Mgt/Dev` or `App:Demo/Mgt`.
    ///
    /// The optional `Partition:` prefix picks between roots sharing a name.
    pub fn find(&self, path: &str) -> ConfigResult<ScopeId> {
        let (partition, rest) = match path.split_once(':') {
            Some((partition, rest)) => (Some(partition), rest),
            None => (None, path),
        };
        if rest.is_empty() {
            return Err(ConfigError::InvalidReference(format!("empty scope path '{path}'")));
        }
        let mut segments = rest.split('/');
        if segments.clone().any(str::is_empty) {
            return Err(ConfigError::InvalidReference(format!(
                "empty segment in scope path '{path}'"
            )));
        }
        let root_name = segments
            .next()
            .ok_or_else(|| ConfigError::InvalidReference(format!("empty scope path '{path}'")))?;

        let roots: Vec<ScopeId> = self
            .scopes
            .roots()
            .filter(|(_, scope)| scope.name() == root_name)
            .filter(|(_, scope)| partition.is_none_or(|p| scope.partition() == Some(p)))
            .map(|(id, _)| id)
            .collect();

        let mut current = match roots.as_slice() {
            [id] => *id,
            [] => {
                return Err(ConfigError::InvalidReference(format!(
                    "no root scope named '{root_name}'"
                )));
            }
            _ => {
                return Err(ConfigError::InvalidReference(format!(
                    "'{root_name}' matches several roots, qualify it with a partition"
                )));
            }
        };

        for segment in segments {
            current = self
                .scopes
                .children(current)
                .find(|(_, scope)| scope.name() == segment)
                .map(|(id, _)| id)
                .ok_or_else(|| {
                    ConfigError::InvalidReference(format!("no scope '{segment}' in '{path}'"))
                })?;
        }
        Ok(current)
    }

    /// Fully qualified path of a scope, the inverse of [`Hierarchy::find`].
    pub fn path_of(&self, id: ScopeId) -> ConfigResult<String> {
        let ancestry = self.scopes.ancestry(id)?;
        let mut path = format!("{}:{}", ancestry.partition, ancestry.cosmos);
        for name in [ancestry.galaxy, ancestry.solar_system].into_iter().flatten() {
            path.push('/');
            path.push_str(name);
        }
        Ok(path)
    }

    /// Walk every scope up to its root.
    pub fn validate(&self) -> ConfigResult<()> {
        for (id, _) in self.scopes.iter() {
            self.scopes.ancestry(id)?;
        }

        for (name, _) in self.params.iter() {
            if [PARTITION, COSMOS, GALAXY, SOLAR_SYSTEM, TYPE].contains(&name) {
                warn!(param = %name, "Parameter can be overridden by scope values");
            }
        }

        info!(scopes = self.scopes.len(), params = self.params.len(), "Hierarchy is valid");
        Ok(())
    }
}

/// Read and parse a hierarchy file.
pub fn load_hierarchy(path: impl AsRef<Path>) -> ConfigResult<Hierarchy> {
    let path = path.as_ref();
    debug!(path = %path.display(), "Loading hierarchy");
    let content = std::fs::read_to_string(path)?;
    parse_hierarchy(&content)
}

/// Parse a hierarchy from KDL text.
pub fn parse_hierarchy(kdl: &str) -> ConfigResult<Hierarchy> {
    let doc: KdlDocument = kdl.parse()?;

    let mut hierarchy = Hierarchy::default();
    let mut roots = HashSet::new();

    for node in doc.nodes() {
        let node_name = node.name().value();
        match node_name {
            "params" => {
                if let Some(children) = node.children() {
                    for child in children.nodes() {
                        let key = child.name().value().to_string();
                        if let Some(val) = get_first_string_arg(child) {
                            hierarchy.params.insert(key, val);
                        }
                    }
                }
            }
            _ => {
                let kind = scope_kind(node_name).ok_or_else(|| ConfigError::InvalidValue {
                    field: "top-level node".to_string(),
                    message: format!("unknown node: {}", node_name),
                })?;
                if !kind.is_root() {
                    return Err(ConfigError::InvalidValue {
                        field: "top-level node".to_string(),
                        message: format!("{} must be nested inside a parent scope", kind),
                    });
                }

                let name = get_first_string_arg(node)
                    .ok_or_else(|| ConfigError::MissingField(format!("{} name", node_name)))?;
                let partition = get_string_prop(node, "partition")
                    .or_else(|| kind.default_partition().map(str::to_string))
                    .unwrap_or_default();
                if partition.is_empty() {
                    return Err(ConfigError::InvalidValue {
                        field: format!("{} '{}' partition", node_name, name),
                        message: "partition must not be empty".to_string(),
                    });
                }

                if !roots.insert((partition.clone(), name.clone())) {
                    return Err(ConfigError::Duplicate(format!("{}:{}", partition, name)));
                }

                let id = match kind {
                    ScopeKind::CosmosExtension => {
                        hierarchy.scopes.cosmos_extension_in(name.as_str(), partition.as_str())
                    }
                    _ => hierarchy.scopes.cosmos_in(name.as_str(), partition.as_str()),
                };
                debug!(kind = %kind, name = %name, partition = %partition, "Parsed scope");

                parse_children(node, id, kind, &mut hierarchy.scopes)?;
            }
        }
    }

    info!(scopes = hierarchy.scopes.len(), "Parsed hierarchy");
    Ok(hierarchy)
}

fn parse_children(
    node: &KdlNode,
    parent: ScopeId,
    parent_kind: ScopeKind,
    scopes: &mut ScopeTree,
) -> ConfigResult<()> {
    let Some(children) = node.children() else {
        return Ok(());
    };

    let mut names = HashSet::new();
    for child in children.nodes() {
        let node_name = child.name().value();
        let kind = scope_kind(node_name).ok_or_else(|| ConfigError::InvalidValue {
            field: format!("child of {}", parent_kind),
            message: format!("unknown node: {}", node_name),
        })?;
        if !kind.accepts_parent(parent_kind) {
            return Err(ConfigError::InvalidValue {
                field: format!("child of {}", parent_kind),
                message: format!("{} cannot be nested here", kind),
            });
        }

        let name = get_first_string_arg(child)
            .ok_or_else(|| ConfigError::MissingField(format!("{} name", node_name)))?;
        if !names.insert(name.clone()) {
            return Err(ConfigError::Duplicate(format!(
                "{} '{}' under the same parent",
                kind, name
            )));
        }

        let id = match kind {
            ScopeKind::Galaxy => scopes.galaxy(parent, name.as_str())?,
            ScopeKind::GalaxyExtension => scopes.galaxy_extension(parent, name.as_str())?,
            ScopeKind::SolarSystem => scopes.solar_system(parent, name.as_str())?,
            _ => scopes.solar_system_extension(parent, name.as_str())?,
        };
        debug!(kind = %kind, name = %name, "Parsed scope");

        parse_children(child, id, kind, scopes)?;
    }
    Ok(())
}

fn scope_kind(node_name: &str) -> Option<ScopeKind> {
    match node_name {
        "cosmos" => Some(ScopeKind::Cosmos),
        "galaxy" => Some(ScopeKind::Galaxy),
        "solar-system" => Some(ScopeKind::SolarSystem),
        "cosmos-extension" => Some(ScopeKind::CosmosExtension),
        "galaxy-extension" => Some(ScopeKind::GalaxyExtension),
        "solar-system-extension" => Some(ScopeKind::SolarSystemExtension),
        _ => None,
    }
}

// Helper functions for extracting values from KDL nodes

fn get_first_string_arg(node: &KdlNode) -> Option<String> {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .and_then(|e| e.value().as_string())
        .map(|s| s.to_string())
}

fn get_string_prop(node: &KdlNode, name: &str) -> Option<String> {
    node.get(name)
        .and_then(|v| v.as_string())
        .map(|s| s.to_string())
}
