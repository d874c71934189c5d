//! Tree Selector for Component CSS
//!
//! Picks the style files out of a project tree. A selection can be rebased
//! onto a sub-directory (`src_dir`), so pod files nested under a module
//! prefix come out at the same relative paths as everywhere else.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Result, StyleError};
use crate::naming::CLASSIC_STYLES_ROOT;
use crate::tree::{normalize_path, BuildTree, CombineOptions};

// ═══════════════════════════════════════════════════════════════════════════════
// SELECTION
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectOptions {
    /// Only keep entries under this directory, with the prefix removed
    #[serde(default)]
    pub src_dir: Option<String>,
    /// Empty means "everything"
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub allow_empty: bool,
}

/// Where a project's styles come from
#[derive(Debug, Clone)]
pub enum StyleSource {
    Directory(PathBuf),
    Tree(BuildTree),
}

impl StyleSource {
    pub fn load(&self) -> Result<BuildTree> {
        match self {
            StyleSource::Directory(dir) => BuildTree::from_dir(dir),
            StyleSource::Tree(tree) => Ok(tree.clone()),
        }
    }

    fn describe(&self) -> String {
        match self {
            StyleSource::Directory(dir) => dir.display().to_string(),
            StyleSource::Tree(_) => "<tree>".to_string(),
        }
    }
}

pub fn select(source: &StyleSource, options: &SelectOptions) -> Result<BuildTree> {
    let tree = source.load()?;
    filter_tree(&tree, options).map_err(|e| match e {
        StyleError::EmptySelection { patterns, .. } => StyleError::EmptySelection {
            root: source.describe(),
            patterns,
        },
        other => other,
    })
}

/// Filter (and optionally rebase) `tree`. Exclusion wins over inclusion.
pub fn filter_tree(tree: &BuildTree, options: &SelectOptions) -> Result<BuildTree> {
    let include = build_globset(&options.include)?;
    let exclude = build_globset(&options.exclude)?;
    let prefix = options
        .src_dir
        .as_deref()
        .map(normalize_path)
        .filter(|p| !p.is_empty());

    let selected: Vec<(String, String)> = tree
        .iter()
        .filter_map(|(path, contents)| {
            let relative = match &prefix {
                Some(prefix) => path.strip_prefix(prefix.as_str())?.strip_prefix('/')?,
                None => path,
            };
            Some((relative, contents))
        })
        .filter(|(relative, _)| include.as_ref().map_or(true, |set| set.is_match(relative)))
        .filter(|(relative, _)| !exclude.as_ref().map_or(false, |set| set.is_match(relative)))
        .map(|(relative, contents)| (relative.to_string(), contents.to_string()))
        .collect();

    if selected.is_empty() && !options.allow_empty {
        return Err(StyleError::EmptySelection {
            root: prefix.unwrap_or_else(|| ".".to_string()),
            patterns: options.include.clone(),
        });
    }

    tracing::debug!(
        src_dir = ?options.src_dir,
        include = ?options.include,
        exclude = ?options.exclude,
        files = selected.len(),
        "Selected files"
    );
    Ok(BuildTree::from_entries(selected))
}

fn build_globset(patterns: &[String]) -> Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map_err(|err| StyleError::InvalidPattern {
                pattern: pattern.clone(),
                message: err.to_string(),
            })?;
        builder.add(glob);
    }
    builder
        .build()
        .map(Some)
        .map_err(|err| StyleError::InvalidPattern {
            pattern: patterns.join(", "),
            message: err.to_string(),
        })
}

// ═══════════════════════════════════════════════════════════════════════════════
// STYLE FUNNELS
// ═══════════════════════════════════════════════════════════════════════════════

/// The selections that make up a project's component styles
#[derive(Debug, Clone)]
pub struct StyleFunnels {
    pub pod_directory: String,
    pub classic_style_dir: String,
    pub extensions: Vec<String>,
}

impl StyleFunnels {
    fn extension_glob(&self) -> String {
        match self.extensions.as_slice() {
            [] => "css".to_string(),
            [single] => single.clone(),
            many => format!("{{{}}}", many.join(",")),
        }
    }

    fn pod_src_dir(&self) -> Option<String> {
        Some(self.pod_directory.clone()).filter(|d| !d.is_empty())
    }

    /// Component folders under the pod root, minus `styles/` and `exclude`
    pub fn pod(&self, exclude: &[String]) -> SelectOptions {
        let mut excluded = vec![format!("{}/**/*", CLASSIC_STYLES_ROOT)];
        excluded.extend(exclude.iter().cloned());
        SelectOptions {
            src_dir: self.pod_src_dir(),
            include: vec![format!("**/*.{}", self.extension_glob())],
            exclude: excluded,
            allow_empty: true,
        }
    }

    /// `styles/<classicStyleDir>/**`
    pub fn classic(&self) -> SelectOptions {
        SelectOptions {
            src_dir: None,
            include: vec![format!(
                "{}/{}/**/*.{}",
                CLASSIC_STYLES_ROOT,
                self.classic_style_dir,
                self.extension_glob()
            )],
            exclude: vec![],
            allow_empty: true,
        }
    }

    /// Files a bundle claims, relative to the pod root
    pub fn bundle(&self, include: &[String], exclude: &[String]) -> SelectOptions {
        SelectOptions {
            src_dir: self.pod_src_dir(),
            include: include.to_vec(),
            exclude: exclude.to_vec(),
            allow_empty: true,
        }
    }

    /// Pod and classic styles together. The pod funnel never reaches into
    /// `styles/`, so the two never share a path; a component styled both ways
    /// is caught by the name extractor.
    pub fn select_default(&self, source: &StyleSource, exclude: &[String]) -> Result<BuildTree> {
        let pod = select(source, &self.pod(exclude))?;
        let classic = select(source, &self.classic())?;
        BuildTree::combine(&[pod, classic], CombineOptions { overwrite: true })
    }
}
