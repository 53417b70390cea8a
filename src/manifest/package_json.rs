use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value;
use tracing::debug;

use crate::error::ScanError;
use crate::models::Dependency;

/// Read `package.json` and return `dependencies` merged with `devDependencies`.
///
/// The file must be UTF-8; there is no fallback encoding for JSON.
pub fn read(path: &Path) -> Result<Vec<Dependency>, ScanError> {
    let bytes = std::fs::read(path).map_err(|e| ScanError::from_io(path, e))?;
    let content = String::from_utf8(bytes).context("package.json is not valid UTF-8")?;
    Ok(extract_dependencies(&content)?)
}

/// Parse manifest JSON and merge the two dependency sections.
///
/// Entries from `devDependencies` replace same-named `dependencies` entries.
/// A missing section counts as empty.
pub fn extract_dependencies(content: &str) -> Result<Vec<Dependency>> {
    let json: Value = serde_json::from_str(content).context("invalid package.json")?;
    if !json.is_object() {
        bail!("invalid package.json: top-level value is not an object");
    }

    let mut merged: BTreeMap<String, String> = BTreeMap::new();
    for section in ["dependencies", "devDependencies"] {
        let Some(entries) = json.get(section) else {
            continue;
        };
        let Some(entries) = entries.as_object() else {
            bail!("invalid package.json: `{}` is not an object", section);
        };
        for (name, spec) in entries {
            match spec.as_str() {
                Some(version) => {
                    merged.insert(name.clone(), version.to_string());
                }
                None => debug!(package = %name, section, "skipping non-string version spec"),
            }
        }
    }

    Ok(merged
        .into_iter()
        .map(|(name, version)| Dependency::new(name, version))
        .collect())
}
