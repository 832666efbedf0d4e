//! CLI command implementations.

pub mod patterns;

use anyhow::{Context, Result, bail};
use cosmos_config::{Hierarchy, load_hierarchy};
use cosmos_core::{ScopeKind, TypeLabel, catalog};
use serde::Serialize;
use std::path::Path;
use tracing::debug;

/// Parse a `KEY=VALUE` argument.
pub fn parse_key_val(arg: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no `=` found in `{}`", arg))?;
    if key.is_empty() {
        return Err(format!("invalid KEY=VALUE: empty key in `{}`", arg));
    }
    Ok((key.to_string(), value.to_string()))
}

fn load(config: &Path) -> Result<Hierarchy> {
    load_hierarchy(config).with_context(|| format!("failed to load {}", config.display()))
}

pub fn resolve(
    config: &Path,
    pattern: &str,
    scope: Option<&str>,
    ty: Option<&str>,
    overrides: &[(String, String)],
) -> Result<()> {
    let template = catalog::lookup(pattern).unwrap_or(pattern);
    debug!(pattern, template, "Selected pattern");

    // the config file is optional unless a scope has to be looked up in it
    let hierarchy = if scope.is_some() || config.exists() {
        Some(load(config)?)
    } else {
        None
    };

    let mut params = hierarchy
        .as_ref()
        .map(|h| h.params().clone())
        .unwrap_or_default();
    for (key, value) in overrides {
        params.insert(key.as_str(), value.as_str());
    }

    let scope = match (scope, hierarchy.as_ref()) {
        (Some(path), Some(hierarchy)) => Some(hierarchy.scopes().scope(hierarchy.find(path)?)),
        _ => None,
    };

    let name = cosmos_core::resolve(
        template,
        scope,
        ty.map(TypeLabel::from),
        Some(&params),
    )?;
    println!("{}", name);
    Ok(())
}

pub fn validate(config: &Path) -> Result<()> {
    let result = load(config).and_then(|hierarchy| Ok(hierarchy.validate()?));
    match result {
        Ok(()) => {
            println!("Configuration is valid");
            Ok(())
        }
        Err(e) => {
            println!("Configuration error: {:#}", e);
            std::process::exit(1);
        }
    }
}

#[derive(Debug, Serialize)]
struct NamedScope {
    path: String,
    kind: ScopeKind,
    name: String,
}

pub fn names(config: &Path, json: bool) -> Result<()> {
    let hierarchy = load(config)?;
    let mut rows = Vec::new();

    for (id, scope) in hierarchy.scopes().iter() {
        let kind = scope.kind();
        let pattern = match kind.depth() {
            0 => catalog::COSMOS,
            1 => catalog::GALAXY,
            2 => catalog::SOLAR_SYSTEM,
            depth => bail!("unexpected scope depth {}", depth),
        };
        let kind_label = kind.to_string();
        let name = cosmos_core::resolve(
            pattern,
            Some(hierarchy.scopes().scope(id)),
            Some(TypeLabel::from(&kind_label)),
            None,
        )?;
        rows.push(NamedScope {
            path: hierarchy.path_of(id)?,
            kind,
            name,
        });
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        for row in &rows {
            println!("{:<40} {}", row.path, row.name);
        }
    }
    Ok(())
}
