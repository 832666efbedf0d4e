//! Selector-based node ids.
//!
//! A second naming scheme used for stack names and construct ids. The
//! pattern is a list of selectors such as `{Partition}{Cosmos}{Galaxy}?`:
//!
//! - `{Key}` - exactly one value; the last one seen wins
//! - `{Key}?` - the last value if there is one
//! - `{Key}+` - every value, at least one
//! - `{Key}*` - every value
//!
//! Values are picked from an ordered list of key/value pairs gathered from
//! a construct's ancestry, then joined with a delimiter.

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

pub const SINGLETON_COSMOS: &str = "{Partition}{Resource}+";
pub const SINGLETON_GALAXY: &str = "{Partition}{Galaxy}{Resource}+";
pub const SINGLETON_SOLAR_SYSTEM: &str = "{Partition}{Galaxy}{SolarSystem}{Resource}+";
pub const STACK: &str = "{Partition}{Cosmos}{Galaxy}?{SolarSystem}?{Version}?{Type}";
pub const COSMOS: &str = "{Partition}{Cosmos}{Galaxy}?{SolarSystem}?{Resource}*{Version}?";
pub const RESOURCE: &str = "{Resource}+{Version}?";

/// Longest id a node may get.
pub const MAX_LENGTH: usize = 240;

/// Values that never appear in an id.
const HIDDEN: &[&str] = &["Default", "Resource"];

static SELECTOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\w+)\}([*+?])?").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// One level of ancestry as seen by the id generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdScope {
    pub id: String,
    pub node_type: String,
    pub pattern: Option<String>,
}

impl IdScope {
    pub fn new(id: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_type: node_type.into(),
            pattern: None,
        }
    }
}

/// Inputs for [`NodeRef::node_id`](crate::construct::NodeRef::node_id).
#[derive(Debug, Clone, Default)]
pub struct NodeIdProps {
    /// Extra levels appended below the node, e.g. the resource being named.
    pub scopes: Vec<IdScope>,
    pub pattern: Option<String>,
    pub partition: Option<String>,
    pub version: Option<String>,
    pub delimiter: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quantifier {
    One,
    Optional,
    Many,
    Any,
}

#[derive(Debug)]
struct Selector<'a> {
    key: &'a str,
    quantifier: Quantifier,
    items: Vec<&'a str>,
}

impl<'a> Selector<'a> {
    fn render(&self) -> Result<Vec<&'a str>> {
        let missing = || Error::MissingPlaceholder(self.key.to_string());
        match self.quantifier {
            Quantifier::Any => Ok(self.items.clone()),
            Quantifier::Many if self.items.is_empty() => Err(missing()),
            Quantifier::Many => Ok(self.items.clone()),
            Quantifier::Optional => Ok(self.items.last().copied().into_iter().collect()),
            Quantifier::One => self.items.last().map(|v| vec![*v]).ok_or_else(missing),
        }
    }
}

/// Flatten ancestry into key/value pairs, root first.
///
/// Every level with an id contributes `(node_type, id)` followed by
/// `("Type", node_type)`.
pub fn scope_context(scopes: &[IdScope]) -> Vec<KeyValue> {
    scopes
        .iter()
        .filter(|scope| !scope.id.is_empty())
        .flat_map(|scope| {
            [
                KeyValue::new(&scope.node_type, &scope.id),
                KeyValue::new("Type", &scope.node_type),
            ]
        })
        .collect()
}

/// Render `pattern` against `context`.
pub fn node_id(context: &[KeyValue], pattern: &str, delimiter: &str) -> Result<String> {
    let mut selectors: Vec<Selector<'_>> = SELECTOR_REGEX
        .captures_iter(pattern)
        .filter_map(|caps| {
            let key = caps.get(1)?.as_str();
            let quantifier = match caps.get(2).map(|m| m.as_str()) {
                Some("?") => Quantifier::Optional,
                Some("+") => Quantifier::Many,
                Some("*") => Quantifier::Any,
                _ => Quantifier::One,
            };
            Some(Selector {
                key,
                quantifier,
                items: Vec::new(),
            })
        })
        .collect();

    let visible: Vec<&KeyValue> = context
        .iter()
        .filter(|item| !HIDDEN.contains(&item.value.as_str()))
        .collect();

    // a value repeated under the same key by a nested construct is dropped
    let unique = visible.iter().enumerate().filter(|(index, item)| {
        match index.checked_sub(1).map(|prev| visible[prev]) {
            Some(previous) => !(previous.key == item.key && previous.value.ends_with(&item.value)),
            None => true,
        }
    });

    for (_, item) in unique {
        for selector in selectors.iter_mut().filter(|s| s.key == item.key) {
            selector.items.push(&item.value);
        }
    }

    let mut selected = Vec::new();
    for selector in &selectors {
        selected.extend(selector.render()?);
    }

    Ok(selected.join(delimiter).chars().take(MAX_LENGTH).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(pairs: &[(&str, &str)]) -> Vec<KeyValue> {
        pairs.iter().map(|(k, v)| KeyValue::new(*k, *v)).collect()
    }

    #[test]
    fn test_required_selectors() {
        let ctx = context(&[("Partition", "Core"), ("Cosmos", "Demo")]);
        assert_eq!(node_id(&ctx, "{Partition}{Cosmos}", "").unwrap(), "CoreDemo");
        assert_eq!(node_id(&ctx, "{Partition}{Cosmos}", "-").unwrap(), "Core-Demo");
    }

    #[test]
    fn test_required_selector_missing() {
        let ctx = context(&[("Partition", "Core")]);
        let err = node_id(&ctx, "{Partition}{Cosmos}", "").unwrap_err();
        assert!(matches!(err, Error::MissingPlaceholder(ref key) if key == "Cosmos"));

        let err = node_id(&ctx, "{Resource}+", "").unwrap_err();
        assert!(matches!(err, Error::MissingPlaceholder(ref key) if key == "Resource"));
    }

    #[test]
    fn test_quantifiers() {
        let ctx = context(&[
            ("Resource", "Api"),
            ("Resource", "Bucket"),
            ("Galaxy", "Mgt"),
            ("Galaxy", "Prd"),
        ]);
        assert_eq!(node_id(&ctx, "{Resource}*", "-").unwrap(), "Api-Bucket");
        assert_eq!(node_id(&ctx, "{Resource}+", "-").unwrap(), "Api-Bucket");
        assert_eq!(node_id(&ctx, "{Galaxy}", "-").unwrap(), "Prd");
        assert_eq!(node_id(&ctx, "{Galaxy}?", "-").unwrap(), "Prd");
        assert_eq!(node_id(&ctx, "{Version}?{Version}*", "-").unwrap(), "");
    }

    #[test]
    fn test_hidden_values() {
        let ctx = context(&[("Resource", "Default"), ("Resource", "Queue")]);
        assert_eq!(node_id(&ctx, "{Resource}+", "").unwrap(), "Queue");
    }

    #[test]
    fn test_nested_duplicate_dropped() {
        let ctx = context(&[("Resource", "AppBucket"), ("Resource", "Bucket")]);
        assert_eq!(node_id(&ctx, "{Resource}*", "-").unwrap(), "AppBucket");
    }

    #[test]
    fn test_truncated() {
        let long = "x".repeat(300);
        let ctx = context(&[("Resource", long.as_str())]);
        assert_eq!(node_id(&ctx, RESOURCE, "").unwrap().len(), MAX_LENGTH);
    }

    #[test]
    fn test_scope_context() {
        let scopes = vec![
            IdScope::new("", "Resource"),
            IdScope::new("Demo", "Cosmos"),
            IdScope::new("Bucket", "Resource"),
        ];
        assert_eq!(
            scope_context(&scopes),
            context(&[
                ("Cosmos", "Demo"),
                ("Type", "Cosmos"),
                ("Resource", "Bucket"),
                ("Type", "Resource"),
            ])
        );
    }

    #[test]
    fn test_stack_pattern() {
        let scopes = vec![
            IdScope::new("Demo", "Cosmos"),
            IdScope::new("Mgt", "Galaxy"),
            IdScope::new("Network", "Stack"),
        ];
        let mut ctx = scope_context(&scopes);
        ctx.push(KeyValue::new("Partition", "Core"));
        assert_eq!(node_id(&ctx, STACK, "").unwrap(), "CoreDemoMgtStack");
    }
}
