//! Property-based tests for name resolution.

use cosmos_core::catalog;
use cosmos_core::{Error, Params, Scope, ScopeId, ScopeTree, TypeLabel, resolve};
use proptest::prelude::*;

fn name() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9]{0,7}"
}

fn label() -> impl Strategy<Value = String> {
    "[A-Za-z0-9]{0,8}"
}

fn catalog_pattern() -> impl Strategy<Value = &'static str> {
    prop::sample::select(
        catalog::ALL
            .iter()
            .map(|(_, template)| *template)
            .collect::<Vec<_>>(),
    )
}

fn solar_system(cosmos: &str, galaxy: &str, solar_system: &str, extension: bool) -> (ScopeTree, ScopeId) {
    let mut tree = ScopeTree::new();
    let id = if extension {
        let c = tree.cosmos_extension(cosmos);
        let g = tree.galaxy_extension(c, galaxy).unwrap();
        tree.solar_system_extension(g, solar_system).unwrap()
    } else {
        let c = tree.cosmos(cosmos);
        let g = tree.galaxy(c, galaxy).unwrap();
        tree.solar_system(g, solar_system).unwrap()
    };
    (tree, id)
}

proptest! {
    #[test]
    fn resolution_is_deterministic(
        cosmos in name(),
        galaxy in name(),
        system in name(),
        ty in label(),
        extension in any::<bool>(),
        pattern in catalog_pattern(),
    ) {
        let (tree, id) = solar_system(&cosmos, &galaxy, &system, extension);
        let first = resolve(pattern, Some(tree.scope(id)), Some(TypeLabel::from(&ty)), None).unwrap();
        let second = resolve(pattern, Some(tree.scope(id)), Some(TypeLabel::from(&ty)), None).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn empty_type_leaves_no_dangling_separator(
        cosmos in name(),
        galaxy in name(),
        system in name(),
        pattern in catalog_pattern(),
    ) {
        let (tree, id) = solar_system(&cosmos, &galaxy, &system, false);
        let resolved = resolve(pattern, Some(tree.scope(id)), None, None).unwrap();
        prop_assert!(!resolved.starts_with('-') && !resolved.ends_with('-'));
        prop_assert_eq!(resolved.trim(), resolved.as_str());
    }

    #[test]
    fn scope_values_override_extras(
        cosmos in name(),
        galaxy in name(),
        system in name(),
        ty in name(),
        noise in name(),
        pattern in catalog_pattern(),
    ) {
        let (tree, id) = solar_system(&cosmos, &galaxy, &system, false);
        let extra: Params = ["Partition", "Cosmos", "Galaxy", "SolarSystem", "Type"]
            .into_iter()
            .map(|key| (key, noise.clone()))
            .collect();

        let plain = resolve(pattern, Some(tree.scope(id)), Some(TypeLabel::from(&ty)), None).unwrap();
        let noisy = resolve(pattern, Some(tree.scope(id)), Some(TypeLabel::from(&ty)), Some(&extra)).unwrap();
        prop_assert_eq!(plain, noisy);
    }

    #[test]
    fn chain_without_root_is_structural(galaxy in name(), system in name(), pattern in catalog_pattern()) {
        let mut tree = ScopeTree::new();
        let g = tree.insert(Scope::Galaxy { name: galaxy, cosmos: None });
        let s = tree.insert(Scope::SolarSystem { name: system, galaxy: Some(g) });

        for id in [g, s] {
            let err = resolve(pattern, Some(tree.scope(id)), None, None).unwrap_err();
            prop_assert!(matches!(err, Error::Structural(_)));
        }
    }

    #[test]
    fn unknown_placeholder_is_missing(key in "X[a-z]{1,6}", cosmos in name()) {
        let mut tree = ScopeTree::new();
        let c = tree.cosmos(&cosmos);
        let pattern = format!("${{{key}}}-${{Type}}");

        let err = resolve(&pattern, Some(tree.scope(c)), None, None).unwrap_err();
        prop_assert!(matches!(err, Error::MissingPlaceholder(ref name) if *name == key));
    }
}

#[test]
fn scope_tree_serializes_with_kind_tags() {
    let mut tree = ScopeTree::new();
    let cosmos = tree.cosmos("Demo");
    tree.galaxy(cosmos, "Mgt").unwrap();

    let json = serde_json::to_value(&tree).unwrap();
    assert_eq!(json["scopes"][0]["kind"], "Cosmos");
    assert_eq!(json["scopes"][0]["partition"], "Core");
    assert_eq!(json["scopes"][1]["kind"], "Galaxy");
    assert_eq!(json["scopes"][1]["cosmos"], 0);

    let back: ScopeTree = serde_json::from_value(json).unwrap();
    assert_eq!(back.get(cosmos), tree.get(cosmos));
}
