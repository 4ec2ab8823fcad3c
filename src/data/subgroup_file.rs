//! Subgroup definition files.
//!
//! A JSON array of `{ "name": str, "indices": [int, ..] }` objects mapping
//! segmented-region labels to named subgroups.

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde_json::Value;

use crate::domain::SubgroupDefinition;

/// Parses definitions, naming the missing key when an object is malformed
pub fn parse_subgroups(value: Value) -> Result<Vec<SubgroupDefinition>> {
    let Value::Array(entries) = value else {
        bail!("Wrong format on subgroup file (expected a JSON array)");
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| {
            if entry.get("indices").is_none() {
                bail!("Wrong format on json object {} (does not contain 'indices')", i);
            }
            if entry.get("name").is_none() {
                bail!("Wrong format on json object {} (does not contain 'name')", i);
            }
            serde_json::from_value::<SubgroupDefinition>(entry)
                .with_context(|| format!("Wrong format on json object {}", i))
        })
        .collect()
}

pub fn load_subgroups(path: &Path) -> Result<Vec<SubgroupDefinition>> {
    if !path.exists() {
        bail!("Subgroup file does not exist: {}", path.display());
    }
    let value: Value = super::json_file::load_from_path(path)?;
    let subgroups = parse_subgroups(value)
        .with_context(|| format!("Failed to read subgroups from {}", path.display()))?;
    log::info!(
        "Loaded {} subgroups from {}",
        subgroups.len(),
        path.display()
    );
    Ok(subgroups)
}
