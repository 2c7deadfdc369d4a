use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::{Context, Result};

use crate::core::{Package, Script};

pub trait PackageDatabase {
    fn owner_of(&self, path: &Path) -> Result<Option<String>>;
    fn metadata_of(&self, package: &str) -> Result<Option<Package>>;
}

pub fn resolve(scripts: &[Script], db: &dyn PackageDatabase) -> Result<BTreeMap<String, Package>> {
    let wanted: BTreeSet<&str> = scripts
        .iter()
        .filter_map(|s| s.package.as_deref())
        .collect();

    let mut packages = BTreeMap::new();
    for id in wanted {
        let metadata = db
            .metadata_of(id)
            .with_context(|| format!("querying package metadata: {id}"))?;
        match metadata {
            Some(package) => {
                packages.insert(id.to_string(), package);
            }
            None => tracing::debug!(package = id, "package metadata unavailable; skipped"),
        }
    }
    Ok(packages)
}
