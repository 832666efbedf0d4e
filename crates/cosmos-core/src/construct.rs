//! Construct tree binding.
//!
//! Infrastructure code builds a tree of constructs (stacks, buckets,
//! services). Some of those constructs *are* scopes: a Cosmos stack, a
//! Galaxy stack. A [`NodeRef`] resolves names using the nearest such
//! construct among its ancestors, so resource code never has to pass the
//! scope around explicitly.

use crate::error::{Result, StructuralError};
use crate::id::{NodeId, ScopeId};
use crate::node_id::{self, IdScope, KeyValue, NodeIdProps};
use crate::pattern::Params;
use crate::resolve::{self, Named, TypeLabel};
use crate::scope::{ScopeKind, ScopeRef, ScopeTree};
use std::collections::BTreeMap;

/// Context key holding the partition used by node-id generation.
pub const COSMOS_PARTITION: &str = "COSMOS_PARTITION";

/// Context key holding the version used by node-id generation.
pub const COSMOS_VERSION: &str = "COSMOS_VERSION";

/// Node type given to constructs that are not scopes.
pub const RESOURCE: &str = "Resource";

#[derive(Debug, Clone)]
struct ConstructNode {
    id: String,
    parent: Option<NodeId>,
    scope: Option<ScopeId>,
    node_type: String,
    pattern: Option<String>,
}

/// Arena of constructs plus the scope hierarchy they are bound to.
#[derive(Debug, Clone, Default)]
pub struct ConstructTree {
    scopes: ScopeTree,
    nodes: Vec<ConstructNode>,
    context: BTreeMap<String, String>,
}

impl ConstructTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scopes(&self) -> &ScopeTree {
        &self.scopes
    }

    pub fn set_context(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.context.insert(key.into(), value.into());
    }

    pub fn context(&self, key: &str) -> Option<&str> {
        self.context.get(key).map(String::as_str)
    }

    /// Add a plain construct of type `Resource`.
    pub fn add(&mut self, parent: Option<NodeId>, id: impl Into<String>) -> NodeId {
        self.push(parent, id.into(), None, RESOURCE.to_string())
    }

    /// Add a construct with an explicit node type, e.g. `Stack`.
    pub fn add_typed(
        &mut self,
        parent: Option<NodeId>,
        id: impl Into<String>,
        node_type: impl Into<String>,
    ) -> NodeId {
        self.push(parent, id.into(), None, node_type.into())
    }

    /// Override the node-id pattern used for this construct and its descendants.
    pub fn set_pattern(&mut self, node: NodeId, pattern: impl Into<String>) -> Result<()> {
        let entry = self
            .nodes
            .get_mut(node.index())
            .ok_or(StructuralError::UnknownNode(node))?;
        entry.pattern = Some(pattern.into());
        Ok(())
    }

    pub fn add_cosmos(&mut self, parent: Option<NodeId>, name: &str) -> NodeId {
        let scope = self.scopes.cosmos(name);
        self.bind(parent, name, scope, ScopeKind::Cosmos)
    }

    pub fn add_cosmos_extension(&mut self, parent: Option<NodeId>, name: &str) -> NodeId {
        let scope = self.scopes.cosmos_extension(name);
        self.bind(parent, name, scope, ScopeKind::CosmosExtension)
    }

    pub fn add_galaxy(&mut self, cosmos: NodeId, name: &str) -> Result<NodeId> {
        let parent = self.bound_scope(cosmos)?;
        let scope = self.scopes.galaxy(parent, name)?;
        Ok(self.bind(Some(cosmos), name, scope, ScopeKind::Galaxy))
    }

    pub fn add_galaxy_extension(&mut self, cosmos: NodeId, name: &str) -> Result<NodeId> {
        let parent = self.bound_scope(cosmos)?;
        let scope = self.scopes.galaxy_extension(parent, name)?;
        Ok(self.bind(Some(cosmos), name, scope, ScopeKind::GalaxyExtension))
    }

    pub fn add_solar_system(&mut self, galaxy: NodeId, name: &str) -> Result<NodeId> {
        let parent = self.bound_scope(galaxy)?;
        let scope = self.scopes.solar_system(parent, name)?;
        Ok(self.bind(Some(galaxy), name, scope, ScopeKind::SolarSystem))
    }

    pub fn add_solar_system_extension(&mut self, galaxy: NodeId, name: &str) -> Result<NodeId> {
        let parent = self.bound_scope(galaxy)?;
        let scope = self.scopes.solar_system_extension(parent, name)?;
        Ok(self.bind(Some(galaxy), name, scope, ScopeKind::SolarSystemExtension))
    }

    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef { tree: self, id }
    }

    /// Like [`ConstructTree::node`], but `None` for an id this tree never issued.
    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.entry(id).map(|_| self.node(id))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn bind(&mut self, parent: Option<NodeId>, name: &str, scope: ScopeId, kind: ScopeKind) -> NodeId {
        // node types match the selector keys used by node-id patterns
        let node_type = if kind.is_extension() {
            kind.to_string().trim_end_matches("Extension").to_string()
        } else {
            kind.to_string()
        };
        self.push(parent, name.to_string(), Some(scope), node_type)
    }

    fn push(
        &mut self,
        parent: Option<NodeId>,
        id: String,
        scope: Option<ScopeId>,
        node_type: String,
    ) -> NodeId {
        let node = NodeId::from(self.nodes.len());
        self.nodes.push(ConstructNode {
            id,
            parent,
            scope,
            node_type,
            pattern: None,
        });
        node
    }

    fn bound_scope(&self, node: NodeId) -> std::result::Result<ScopeId, StructuralError> {
        self.entry(node)
            .ok_or(StructuralError::UnknownNode(node))?
            .scope
            .ok_or(StructuralError::Unbound(node))
    }

    fn entry(&self, node: NodeId) -> Option<&ConstructNode> {
        self.nodes.get(node.index())
    }
}

/// Borrowed handle on one construct.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a ConstructTree,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The construct's own id, without its ancestors.
    pub fn local_id(&self) -> &'a str {
        self.tree.entry(self.id).map(|e| e.id.as_str()).unwrap_or_default()
    }

    pub fn node_type(&self) -> &'a str {
        self.tree
            .entry(self.id)
            .map(|e| e.node_type.as_str())
            .unwrap_or(RESOURCE)
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.tree
            .entry(self.id)
            .and_then(|e| e.parent)
            .map(|id| self.tree.node(id))
    }

    /// This node followed by its ancestors, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = NodeRef<'a>> + use<'a> {
        std::iter::successors(Some(*self), |node| node.parent())
    }

    /// Root-first list of ids joined with `/`.
    pub fn path(&self) -> String {
        let mut ids: Vec<&str> = self.ancestors().map(|node| node.local_id()).collect();
        ids.reverse();
        ids.join("/")
    }

    /// Nearest scope bound to this node or one of its ancestors.
    pub fn scope(&self) -> Option<ScopeRef<'a>> {
        self.ancestors()
            .find_map(|node| self.tree.entry(node.id).and_then(|e| e.scope))
            .map(|scope| self.tree.scopes.scope(scope))
    }

    /// Resolve `pattern` using this node's ancestry as the scope.
    pub fn resolve(
        &self,
        pattern: &str,
        ty: Option<TypeLabel<'_>>,
        extra: Option<&Params>,
    ) -> Result<String> {
        self.checked()?;
        resolve::resolve(pattern, self.scope(), ty, extra)
    }

    /// Generate a node id from this node's ancestry.
    pub fn node_id(&self, props: &NodeIdProps) -> Result<String> {
        self.checked()?;
        let mut scopes: Vec<IdScope> = self
            .ancestors()
            .map(|node| IdScope {
                id: node.local_id().to_string(),
                node_type: node.node_type().to_string(),
                pattern: self.tree.entry(node.id).and_then(|e| e.pattern.clone()),
            })
            .collect();
        scopes.reverse();
        scopes.extend(props.scopes.iter().cloned());

        let mut context = node_id::scope_context(&scopes);
        let partition = props
            .partition
            .as_deref()
            .or_else(|| self.tree.context(COSMOS_PARTITION));
        if let Some(partition) = partition {
            context.push(KeyValue::new("Partition", partition));
        }
        let version = props
            .version
            .as_deref()
            .or_else(|| self.tree.context(COSMOS_VERSION));
        if let Some(version) = version {
            context.push(KeyValue::new("Version", version));
        }

        let pattern = props
            .pattern
            .clone()
            .or_else(|| scopes.iter().rev().find_map(|s| s.pattern.clone()))
            .unwrap_or_else(|| node_id::COSMOS.to_string());

        node_id::node_id(&context, &pattern, props.delimiter.as_deref().unwrap_or(""))
    }

    fn checked(&self) -> std::result::Result<(), StructuralError> {
        self.tree
            .entry(self.id)
            .map(|_| ())
            .ok_or(StructuralError::UnknownNode(self.id))
    }
}

impl Named for NodeRef<'_> {
    fn local_name(&self) -> &str {
        self.local_id()
    }
}
