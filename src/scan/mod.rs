use std::path::Path;

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use walkdir::WalkDir;

use crate::core::Script;
use crate::packages::PackageDatabase;

const BUILTIN_EXCLUDES: &[&str] = &["*.swp"];

pub fn collect(dir: &Path, excludes: &[String], db: &dyn PackageDatabase) -> Result<Vec<Script>> {
    let dir = std::path::absolute(dir)
        .with_context(|| format!("resolving directory: {}", dir.display()))?;
    let dir = dir.as_path();
    if !dir.exists() {
        tracing::debug!(dir = %dir.display(), "init script directory does not exist");
        return Ok(Vec::new());
    }

    let exclude_set = build_exclude_set(excludes)?;
    let mut scripts = Vec::new();

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false);

    for entry in walker {
        let entry = entry.with_context(|| format!("reading directory: {}", dir.display()))?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        if exclude_set.is_match(entry.file_name()) {
            tracing::debug!(path = %path.display(), "excluded");
            continue;
        }

        let package = match db.owner_of(path) {
            Ok(package) => package,
            Err(err) => {
                tracing::warn!(path = %path.display(), "owner query failed: {err:#}");
                None
            }
        };
        let is_empty = script_is_empty(path)?;

        scripts.push(Script::new(path, package, is_empty));
    }

    Ok(scripts)
}

pub fn validate_excludes(excludes: &[String]) -> Result<()> {
    let _ = build_exclude_set(excludes)?;
    Ok(())
}

fn build_exclude_set(excludes: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in BUILTIN_EXCLUDES {
        builder.add(Glob::new(pat).with_context(|| format!("invalid exclude glob: {pat}"))?);
    }
    for pat in excludes {
        builder.add(Glob::new(pat).with_context(|| format!("invalid exclude glob: {pat}"))?);
    }
    Ok(builder.build()?)
}

fn script_is_empty(path: &Path) -> Result<bool> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(is_empty_text(&String::from_utf8_lossy(&bytes)))
}

pub fn is_empty_text(text: &str) -> bool {
    let content_chars: usize = text
        .lines()
        .filter(|line| !is_blank_line(line))
        .map(|line| line.chars().count())
        .sum();
    content_chars == 0
}

fn is_blank_line(line: &str) -> bool {
    let line = line.trim();
    line.is_empty() || line.starts_with('#')
}
