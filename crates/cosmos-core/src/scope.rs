//! Scope hierarchy: Cosmos → Galaxy → SolarSystem and their extensions.

use crate::error::StructuralError;
use crate::id::ScopeId;
use serde::{Deserialize, Serialize};

/// Partition label carried by base-hierarchy roots.
pub const CORE_PARTITION: &str = "Core";

/// Partition label carried by extension-hierarchy roots.
pub const APP_PARTITION: &str = "App";

/// Levels a scope chain may climb before it is rejected.
///
/// [`ScopeKind::accepts_parent`] only allows a strictly shallower parent, so a
/// well-formed walk reaches its root first. The bound guards the loop itself.
pub const MAX_DEPTH: usize = 3;

/// Scope kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScopeKind {
    Cosmos,
    Galaxy,
    SolarSystem,
    CosmosExtension,
    GalaxyExtension,
    SolarSystemExtension,
}

impl std::fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScopeKind::Cosmos => write!(f, "Cosmos"),
            ScopeKind::Galaxy => write!(f, "Galaxy"),
            ScopeKind::SolarSystem => write!(f, "SolarSystem"),
            ScopeKind::CosmosExtension => write!(f, "CosmosExtension"),
            ScopeKind::GalaxyExtension => write!(f, "GalaxyExtension"),
            ScopeKind::SolarSystemExtension => write!(f, "SolarSystemExtension"),
        }
    }
}

impl ScopeKind {
    /// Number of levels below the root: 0 for cosmos kinds, 2 for solar systems.
    pub fn depth(&self) -> usize {
        match self {
            ScopeKind::Cosmos | ScopeKind::CosmosExtension => 0,
            ScopeKind::Galaxy | ScopeKind::GalaxyExtension => 1,
            ScopeKind::SolarSystem | ScopeKind::SolarSystemExtension => 2,
        }
    }

    pub fn is_root(&self) -> bool {
        self.depth() == 0
    }

    pub fn is_extension(&self) -> bool {
        matches!(
            self,
            ScopeKind::CosmosExtension | ScopeKind::GalaxyExtension | ScopeKind::SolarSystemExtension
        )
    }

    /// Partition a root of this kind gets when none is given explicitly.
    pub fn default_partition(&self) -> Option<&'static str> {
        match self {
            ScopeKind::Cosmos => Some(CORE_PARTITION),
            ScopeKind::CosmosExtension => Some(APP_PARTITION),
            _ => None,
        }
    }

    /// Whether a scope of this kind may hang below a scope of kind `parent`.
    ///
    /// Extension scopes may point at a base-hierarchy parent one level up;
    /// base scopes never point into the extension hierarchy.
    pub fn accepts_parent(&self, parent: ScopeKind) -> bool {
        match self {
            ScopeKind::Galaxy => parent == ScopeKind::Cosmos,
            ScopeKind::SolarSystem => parent == ScopeKind::Galaxy,
            ScopeKind::GalaxyExtension => {
                matches!(parent, ScopeKind::Cosmos | ScopeKind::CosmosExtension)
            }
            ScopeKind::SolarSystemExtension => {
                matches!(parent, ScopeKind::Galaxy | ScopeKind::GalaxyExtension)
            }
            ScopeKind::Cosmos | ScopeKind::CosmosExtension => false,
        }
    }
}

/// A node in the naming hierarchy.
///
/// Each variant carries only what its kind needs: roots carry a partition,
/// everything else carries the id of the scope one level up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Scope {
    Cosmos {
        name: String,
        partition: Option<String>,
    },
    Galaxy {
        name: String,
        cosmos: Option<ScopeId>,
    },
    SolarSystem {
        name: String,
        galaxy: Option<ScopeId>,
    },
    CosmosExtension {
        name: String,
        partition: Option<String>,
    },
    GalaxyExtension {
        name: String,
        cosmos: Option<ScopeId>,
    },
    SolarSystemExtension {
        name: String,
        galaxy: Option<ScopeId>,
    },
}

impl Scope {
    pub fn kind(&self) -> ScopeKind {
        match self {
            Scope::Cosmos { .. } => ScopeKind::Cosmos,
            Scope::Galaxy { .. } => ScopeKind::Galaxy,
            Scope::SolarSystem { .. } => ScopeKind::SolarSystem,
            Scope::CosmosExtension { .. } => ScopeKind::CosmosExtension,
            Scope::GalaxyExtension { .. } => ScopeKind::GalaxyExtension,
            Scope::SolarSystemExtension { .. } => ScopeKind::SolarSystemExtension,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Scope::Cosmos { name, .. }
            | Scope::Galaxy { name, .. }
            | Scope::SolarSystem { name, .. }
            | Scope::CosmosExtension { name, .. }
            | Scope::GalaxyExtension { name, .. }
            | Scope::SolarSystemExtension { name, .. } => name,
        }
    }

    /// Id of the scope one level up, `None` for roots and dangling leaves.
    pub fn parent(&self) -> Option<ScopeId> {
        match self {
            Scope::Galaxy { cosmos, .. } | Scope::GalaxyExtension { cosmos, .. } => *cosmos,
            Scope::SolarSystem { galaxy, .. } | Scope::SolarSystemExtension { galaxy, .. } => {
                *galaxy
            }
            Scope::Cosmos { .. } | Scope::CosmosExtension { .. } => None,
        }
    }

    pub fn partition(&self) -> Option<&str> {
        match self {
            Scope::Cosmos { partition, .. } | Scope::CosmosExtension { partition, .. } => {
                partition.as_deref()
            }
            _ => None,
        }
    }
}

/// Names collected while walking from a scope up to its root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ancestry<'a> {
    pub root: ScopeId,
    pub partition: &'a str,
    pub cosmos: &'a str,
    pub galaxy: Option<&'a str>,
    pub solar_system: Option<&'a str>,
}

/// Arena owning every scope of one hierarchy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
}

impl ScopeTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a scope as given, without checking its parent reference.
    ///
    /// Malformed chains are rejected when they are walked, not here.
    pub fn insert(&mut self, scope: Scope) -> ScopeId {
        let id = ScopeId::from(self.scopes.len());
        self.scopes.push(scope);
        id
    }

    pub fn get(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id.index())
    }

    pub fn scope(&self, id: ScopeId) -> ScopeRef<'_> {
        ScopeRef { tree: self, id }
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ScopeId, &Scope)> {
        self.scopes
            .iter()
            .enumerate()
            .map(|(index, scope)| (ScopeId::from(index), scope))
    }

    pub fn roots(&self) -> impl Iterator<Item = (ScopeId, &Scope)> {
        self.iter().filter(|(_, scope)| scope.kind().is_root())
    }

    pub fn children(&self, parent: ScopeId) -> impl Iterator<Item = (ScopeId, &Scope)> {
        self.iter()
            .filter(move |(_, scope)| scope.parent() == Some(parent))
    }

    /// Add a base root with the `Core` partition.
    pub fn cosmos(&mut self, name: impl Into<String>) -> ScopeId {
        self.cosmos_in(name, CORE_PARTITION)
    }

    pub fn cosmos_in(&mut self, name: impl Into<String>, partition: impl Into<String>) -> ScopeId {
        self.insert(Scope::Cosmos {
            name: name.into(),
            partition: Some(partition.into()),
        })
    }

    /// Add an extension root with the `App` partition.
    pub fn cosmos_extension(&mut self, name: impl Into<String>) -> ScopeId {
        self.cosmos_extension_in(name, APP_PARTITION)
    }

    pub fn cosmos_extension_in(
        &mut self,
        name: impl Into<String>,
        partition: impl Into<String>,
    ) -> ScopeId {
        self.insert(Scope::CosmosExtension {
            name: name.into(),
            partition: Some(partition.into()),
        })
    }

    pub fn galaxy(
        &mut self,
        cosmos: ScopeId,
        name: impl Into<String>,
    ) -> Result<ScopeId, StructuralError> {
        let scope = Scope::Galaxy {
            name: name.into(),
            cosmos: Some(cosmos),
        };
        self.insert_checked(scope)
    }

    pub fn galaxy_extension(
        &mut self,
        cosmos: ScopeId,
        name: impl Into<String>,
    ) -> Result<ScopeId, StructuralError> {
        let scope = Scope::GalaxyExtension {
            name: name.into(),
            cosmos: Some(cosmos),
        };
        self.insert_checked(scope)
    }

    pub fn solar_system(
        &mut self,
        galaxy: ScopeId,
        name: impl Into<String>,
    ) -> Result<ScopeId, StructuralError> {
        let scope = Scope::SolarSystem {
            name: name.into(),
            galaxy: Some(galaxy),
        };
        self.insert_checked(scope)
    }

    pub fn solar_system_extension(
        &mut self,
        galaxy: ScopeId,
        name: impl Into<String>,
    ) -> Result<ScopeId, StructuralError> {
        let scope = Scope::SolarSystemExtension {
            name: name.into(),
            galaxy: Some(galaxy),
        };
        self.insert_checked(scope)
    }

    fn insert_checked(&mut self, scope: Scope) -> Result<ScopeId, StructuralError> {
        self.checked_parent(&scope)?;
        Ok(self.insert(scope))
    }

    /// Walk from `id` up to its root, collecting the name at every level.
    pub fn ancestry(&self, id: ScopeId) -> Result<Ancestry<'_>, StructuralError> {
        let mut galaxy = None;
        let mut solar_system = None;
        let mut current = id;

        for _ in 0..=MAX_DEPTH {
            let scope = self
                .get(current)
                .ok_or(StructuralError::UnknownScope(current))?;

            match scope {
                Scope::SolarSystem { name, .. } | Scope::SolarSystemExtension { name, .. } => {
                    solar_system = Some(name.as_str());
                    current = self.checked_parent(scope)?;
                }
                Scope::Galaxy { name, .. } | Scope::GalaxyExtension { name, .. } => {
                    galaxy = Some(name.as_str());
                    current = self.checked_parent(scope)?;
                }
                Scope::Cosmos { name, partition } | Scope::CosmosExtension { name, partition } => {
                    let partition = partition
                        .as_deref()
                        .filter(|p| !p.is_empty())
                        .ok_or_else(|| StructuralError::MissingPartition(name.clone()))?;
                    return Ok(Ancestry {
                        root: current,
                        partition,
                        cosmos: name.as_str(),
                        galaxy,
                        solar_system,
                    });
                }
            }
        }

        Err(StructuralError::DepthExceeded(MAX_DEPTH))
    }

    fn checked_parent(&self, scope: &Scope) -> Result<ScopeId, StructuralError> {
        let parent_id = scope
            .parent()
            .ok_or_else(|| StructuralError::MissingParent {
                kind: scope.kind(),
                name: scope.name().to_string(),
            })?;
        let parent = self
            .get(parent_id)
            .ok_or(StructuralError::UnknownScope(parent_id))?;

        if !scope.kind().accepts_parent(parent.kind()) {
            return Err(StructuralError::UnexpectedParent {
                kind: scope.kind(),
                name: scope.name().to_string(),
                parent: parent.kind(),
            });
        }
        Ok(parent_id)
    }
}

/// A scope together with the tree it lives in.
#[derive(Debug, Clone, Copy)]
pub struct ScopeRef<'a> {
    tree: &'a ScopeTree,
    id: ScopeId,
}

impl<'a> ScopeRef<'a> {
    pub fn id(&self) -> ScopeId {
        self.id
    }

    pub fn tree(&self) -> &'a ScopeTree {
        self.tree
    }

    pub fn get(&self) -> Option<&'a Scope> {
        self.tree.get(self.id)
    }

    pub fn ancestry(&self) -> Result<Ancestry<'a>, StructuralError> {
        self.tree.ancestry(self.id)
    }
}
