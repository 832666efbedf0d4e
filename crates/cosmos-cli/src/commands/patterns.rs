//! Pattern catalog commands.

use anyhow::Result;
use cosmos_core::{Pattern, catalog};
use std::collections::BTreeMap;

pub fn list(json: bool) -> Result<()> {
    if json {
        let entries: BTreeMap<&str, &str> = catalog::ALL.iter().copied().collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for (name, template) in catalog::ALL {
        let placeholders = Pattern::parse(template).placeholders().join(", ");
        println!("{:<24} {:<56} [{}]", name, template, placeholders);
    }
    Ok(())
}
