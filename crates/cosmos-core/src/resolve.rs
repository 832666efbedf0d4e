//! Scope hierarchy resolver.
//!
//! Turns a pattern plus a scope into a canonical name:
//!
//! ```
//! use cosmos_core::{catalog, resolve, ScopeTree, TypeLabel};
//!
//! let mut tree = ScopeTree::new();
//! let cosmos = tree.cosmos("App");
//! let galaxy = tree.galaxy(cosmos, "Mgt").unwrap();
//! let dev = tree.solar_system(galaxy, "Dev").unwrap();
//!
//! let name = resolve(
//!     catalog::SOLAR_SYSTEM,
//!     Some(tree.scope(dev)),
//!     Some(TypeLabel::from("Cluster")),
//!     None,
//! )
//! .unwrap();
//! assert_eq!(name, "Core-App-Mgt-Dev-Cluster");
//! ```
//!
//! Parameters are assembled fresh for every call: extra parameters first,
//! then the names found while walking the scope up to its root, then
//! `Type`. Later writes win, so scope-derived values always override extras
//! of the same name.

use crate::error::Result;
use crate::pattern::{Params, Pattern};
use crate::scope::ScopeRef;
use tracing::{debug, trace};

pub const PARTITION: &str = "Partition";
pub const COSMOS: &str = "Cosmos";
pub const GALAXY: &str = "Galaxy";
pub const SOLAR_SYSTEM: &str = "SolarSystem";
pub const TYPE: &str = "Type";

/// Anything with a short local name that can stand in for a type label.
pub trait Named {
    fn local_name(&self) -> &str;
}

/// The `Type` part of a name.
#[derive(Clone, Copy)]
pub enum TypeLabel<'a> {
    Text(&'a str),
    Node(&'a dyn Named),
}

impl<'a> TypeLabel<'a> {
    pub fn as_str(&self) -> &'a str {
        match *self {
            TypeLabel::Text(text) => text,
            TypeLabel::Node(node) => node.local_name(),
        }
    }
}

impl std::fmt::Debug for TypeLabel<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeLabel::Text(text) => f.debug_tuple("Text").field(text).finish(),
            TypeLabel::Node(node) => f.debug_tuple("Node").field(&node.local_name()).finish(),
        }
    }
}

impl<'a> From<&'a str> for TypeLabel<'a> {
    fn from(text: &'a str) -> Self {
        TypeLabel::Text(text)
    }
}

impl<'a> From<&'a String> for TypeLabel<'a> {
    fn from(text: &'a String) -> Self {
        TypeLabel::Text(text)
    }
}

/// Resolve `pattern` against `scope`.
///
/// `ty` defaults to the empty string. Without a scope only `extra` and
/// `Type` are available to the pattern.
pub fn resolve(
    pattern: &str,
    scope: Option<ScopeRef<'_>>,
    ty: Option<TypeLabel<'_>>,
    extra: Option<&Params>,
) -> Result<String> {
    resolve_pattern(&Pattern::parse(pattern), scope, ty, extra)
}

/// Same as [`resolve`] for an already tokenized pattern.
pub fn resolve_pattern(
    pattern: &Pattern,
    scope: Option<ScopeRef<'_>>,
    ty: Option<TypeLabel<'_>>,
    extra: Option<&Params>,
) -> Result<String> {
    let result = assemble(scope, ty, extra).and_then(|params| pattern.render(&params));

    match result {
        Ok(rendered) => {
            let name = tidy(&rendered);
            trace!(pattern = %pattern, name = %name, "Resolved name");
            Ok(name)
        }
        Err(err) => {
            debug!(pattern = %pattern, error = %err, "Name resolution failed");
            Err(err)
        }
    }
}

fn assemble(
    scope: Option<ScopeRef<'_>>,
    ty: Option<TypeLabel<'_>>,
    extra: Option<&Params>,
) -> Result<Params> {
    let mut params = extra.cloned().unwrap_or_default();

    if let Some(scope) = scope {
        let ancestry = scope.ancestry()?;
        if let Some(solar_system) = ancestry.solar_system {
            params.insert(SOLAR_SYSTEM, solar_system);
        }
        if let Some(galaxy) = ancestry.galaxy {
            params.insert(GALAXY, galaxy);
        }
        params.insert(COSMOS, ancestry.cosmos);
        params.insert(PARTITION, ancestry.partition);
    }

    params.insert(TYPE, ty.map(|ty| ty.as_str()).unwrap_or_default());
    Ok(params)
}

/// Drop one dangling separator left by an empty leading or trailing field.
fn tidy(rendered: &str) -> String {
    let name = rendered.trim();
    let name = name.strip_prefix('-').unwrap_or(name);
    let name = name.strip_suffix('-').unwrap_or(name);
    name.trim().to_string()
}

/// Builder-style front end for [`resolve`].
#[derive(Debug, Clone)]
pub struct Resolution<'a> {
    pattern: &'a str,
    scope: Option<ScopeRef<'a>>,
    ty: Option<TypeLabel<'a>>,
    params: Params,
}

impl<'a> Resolution<'a> {
    pub fn new(pattern: &'a str) -> Self {
        Self {
            pattern,
            scope: None,
            ty: None,
            params: Params::new(),
        }
    }

    pub fn scope(mut self, scope: ScopeRef<'a>) -> Self {
        self.scope = Some(scope);
        self
    }

    pub fn of_type(mut self, ty: impl Into<TypeLabel<'a>>) -> Self {
        self.ty = Some(ty.into());
        self
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name, value);
        self
    }

    pub fn params(mut self, params: &Params) -> Self {
        self.params.merge(params);
        self
    }

    pub fn resolve(&self) -> Result<String> {
        resolve(self.pattern, self.scope, self.ty, Some(&self.params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::error::{Error, StructuralError};
    use crate::id::ScopeId;
    use crate::scope::{Scope, ScopeTree};

    fn app_tree() -> (ScopeTree, ScopeId) {
        let mut tree = ScopeTree::new();
        let cosmos = tree.cosmos("App");
        let galaxy = tree.galaxy(cosmos, "Mgt").unwrap();
        let dev = tree.solar_system(galaxy, "Dev").unwrap();
        (tree, dev)
    }

    struct Label(&'static str);

    impl Named for Label {
        fn local_name(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn test_solar_system_pattern() {
        let (tree, dev) = app_tree();
        let name = resolve(
            catalog::SOLAR_SYSTEM,
            Some(tree.scope(dev)),
            Some("Cluster".into()),
            None,
        )
        .unwrap();
        assert_eq!(name, "Core-App-Mgt-Dev-Cluster");
    }

    #[test]
    fn test_docker_tag_pattern() {
        let (tree, dev) = app_tree();
        let name = Resolution::new(catalog::DOCKER_TAG)
            .scope(tree.scope(dev))
            .of_type("web")
            .resolve()
            .unwrap();
        assert_eq!(name, "App/web");
    }

    #[test]
    fn test_empty_type_trims_separator() {
        let mut tree = ScopeTree::new();
        let cosmos = tree.cosmos("App");

        let name = resolve("${Partition}-${Type}", Some(tree.scope(cosmos)), None, None).unwrap();
        assert_eq!(name, "Core");

        let name = resolve(catalog::COSMOS, Some(tree.scope(cosmos)), None, None).unwrap();
        assert_eq!(name, "Core-App");
    }

    #[test]
    fn test_extra_params() {
        let (tree, dev) = app_tree();
        let extra = Params::new().with("Region", "ap-southeast-2");

        let name = resolve(
            "${Region}-${Cosmos}-${Type}",
            Some(tree.scope(dev)),
            Some("Cluster".into()),
            Some(&extra),
        )
        .unwrap();
        assert_eq!(name, "ap-southeast-2-App-Cluster");
    }

    #[test]
    fn test_scope_values_override_extras() {
        let (tree, dev) = app_tree();
        let extra = Params::new()
            .with("Partition", "Nope")
            .with("Cosmos", "Nope")
            .with("Galaxy", "Nope")
            .with("SolarSystem", "Nope")
            .with("Type", "Nope");

        let name = resolve(
            catalog::SOLAR_SYSTEM,
            Some(tree.scope(dev)),
            Some("Cluster".into()),
            Some(&extra),
        )
        .unwrap();
        assert_eq!(name, "Core-App-Mgt-Dev-Cluster");

        // an omitted type still replaces an extra Type
        let name = resolve(catalog::COSMOS, Some(tree.scope(dev)), None, Some(&extra)).unwrap();
        assert_eq!(name, "Core-App");
    }

    #[test]
    fn test_extras_fill_levels_above_scope() {
        let mut tree = ScopeTree::new();
        let cosmos = tree.cosmos("App");
        let galaxy = tree.galaxy(cosmos, "Mgt").unwrap();
        let extra = Params::new().with("SolarSystem", "Shared");

        let name = resolve(
            catalog::SOLAR_SYSTEM,
            Some(tree.scope(galaxy)),
            Some("Zone".into()),
            Some(&extra),
        )
        .unwrap();
        assert_eq!(name, "Core-App-Mgt-Shared-Zone");
    }

    #[test]
    fn test_extension_partition() {
        let mut tree = ScopeTree::new();
        let cosmos = tree.cosmos_extension("Demo");
        let galaxy = tree.galaxy_extension(cosmos, "Mgt").unwrap();
        let dev = tree.solar_system_extension(galaxy, "Dev").unwrap();

        let name = resolve(
            catalog::LOG_GROUP,
            Some(tree.scope(dev)),
            Some("Api".into()),
            None,
        )
        .unwrap();
        assert_eq!(name, "App/Demo/Dev/Api");
    }

    #[test]
    fn test_named_type() {
        let (tree, dev) = app_tree();
        let bucket = Label("Bucket");

        let name = Resolution::new(catalog::SHORT_SOLAR_SYSTEM)
            .scope(tree.scope(dev))
            .of_type(TypeLabel::Node(&bucket))
            .resolve()
            .unwrap();
        assert_eq!(name, "Core-App-Dev-Bucket");
    }

    #[test]
    fn test_no_scope() {
        let extra = Params::new().with("Partition", "Core").with("Cosmos", "Demo");
        let name = resolve(catalog::COSMOS, None, Some("Cosmos".into()), Some(&extra)).unwrap();
        assert_eq!(name, "Core-Demo-Cosmos");
    }

    #[test]
    fn test_galaxy_without_cosmos() {
        let mut tree = ScopeTree::new();
        let galaxy = tree.insert(Scope::Galaxy {
            name: "Mgt".to_string(),
            cosmos: None,
        });

        let err = resolve(catalog::GALAXY, Some(tree.scope(galaxy)), None, None).unwrap_err();
        assert!(matches!(
            err,
            Error::Structural(StructuralError::MissingParent { .. })
        ));
    }

    #[test]
    fn test_empty_partition_is_not_dropped() {
        let mut tree = ScopeTree::new();
        let cosmos = tree.insert(Scope::Cosmos {
            name: "Demo".to_string(),
            partition: Some(String::new()),
        });

        let err = resolve(catalog::COSMOS, Some(tree.scope(cosmos)), Some("Bucket".into()), None)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Structural(StructuralError::MissingPartition(ref name)) if name == "Demo"
        ));
    }

    #[test]
    fn test_unknown_placeholder() {
        let (tree, dev) = app_tree();
        let err = resolve("${Unknown}-${Type}", Some(tree.scope(dev)), None, None).unwrap_err();
        assert!(matches!(err, Error::MissingPlaceholder(ref name) if name == "Unknown"));
    }

    #[test]
    fn test_placeholder_above_scope_is_missing() {
        let mut tree = ScopeTree::new();
        let cosmos = tree.cosmos("App");

        let err = resolve(catalog::GALAXY, Some(tree.scope(cosmos)), None, None).unwrap_err();
        assert!(matches!(err, Error::MissingPlaceholder(ref name) if name == "Galaxy"));
    }

    #[test]
    fn test_surrounding_whitespace_trimmed() {
        let extra = Params::new().with("Pad", " ");
        let name = resolve("${Pad}-x-${Type}${Pad}", None, None, Some(&extra)).unwrap();
        assert_eq!(name, "x");
    }
}
