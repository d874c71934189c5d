//! Build Tree Module for Component CSS
//!
//! A `BuildTree` is an immutable snapshot of `relative path -> contents`.
//! Every pipeline stage takes trees and returns new ones; nothing is
//! mutated in place, so clones are cheap handles onto shared data.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use walkdir::WalkDir;

use crate::error::{Result, StyleError};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildTree {
    entries: Arc<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CombineOptions {
    /// Later trees replace earlier ones on the same path
    pub overwrite: bool,
}

impl BuildTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(path, contents)| (normalize_path(path.as_ref()), contents.into()))
            .filter(|(path, _)| !path.is_empty())
            .collect();
        Self {
            entries: Arc::new(entries),
        }
    }

    /// Load every regular file under `dir`. A missing directory is an empty tree.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        Self::from_dir_matching(dir, |_| true)
    }

    /// Load the files under `dir` whose relative path satisfies `keep`.
    pub fn from_dir_matching<F>(dir: &Path, keep: F) -> Result<Self>
    where
        F: Fn(&str) -> bool,
    {
        if !dir.exists() {
            return Ok(Self::new());
        }

        let mut entries = BTreeMap::new();
        for entry in WalkDir::new(dir).follow_links(true) {
            let entry =
                entry.map_err(|e| StyleError::io(dir.display().to_string(), e.into()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let relative = path
                .strip_prefix(dir)
                .map(|p| p.to_string_lossy().to_string())
                .unwrap_or_default();
            let relative = normalize_path(&relative);
            if !keep(&relative) {
                continue;
            }
            let contents = fs::read_to_string(path)
                .map_err(|e| StyleError::io(path.display().to_string(), e))?;
            entries.insert(relative, contents);
        }

        tracing::debug!(dir = %dir.display(), files = entries.len(), "Loaded build tree");
        Ok(Self {
            entries: Arc::new(entries),
        })
    }

    pub fn write_to_dir(&self, dir: &Path) -> Result<()> {
        for (relative, contents) in self.iter() {
            let target = dir.join(relative);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)
                    .map_err(|e| StyleError::io(parent.display().to_string(), e))?;
            }
            fs::write(&target, contents)
                .map_err(|e| StyleError::io(target.display().to_string(), e))?;
        }
        Ok(())
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(|s| s.as_str())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in path order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    /// Merge `trees` in order.
    ///
    /// With `overwrite` the last tree wins on a shared path. Without it, a
    /// shared path is only accepted when every tree agrees on its contents.
    pub fn combine(trees: &[BuildTree], options: CombineOptions) -> Result<BuildTree> {
        if let [single] = trees {
            return Ok(single.clone());
        }

        let mut merged: BTreeMap<String, String> = BTreeMap::new();
        for tree in trees {
            for (path, contents) in tree.entries.iter() {
                if !options.overwrite {
                    if let Some(existing) = merged.get(path) {
                        if existing != contents {
                            return Err(StyleError::TreeConflict { path: path.clone() });
                        }
                    }
                }
                merged.insert(path.clone(), contents.clone());
            }
        }

        Ok(BuildTree {
            entries: Arc::new(merged),
        })
    }
}

/// Normalize to a `/`-separated relative path without `.` segments
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// File extension without the dot, if any
pub fn extension_of(path: &str) -> Option<&str> {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    match file_name.rfind('.') {
        Some(0) | None => None,
        Some(idx) => Some(&file_name[idx + 1..]),
    }
}
