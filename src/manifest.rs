//! Style Manifest Builder
//!
//! Combines every style file of a tree into one output per extension:
//! plain CSS is concatenated, preprocessor sources get an `@import` line
//! per file so the preprocessor resolves them itself.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::Result;
use crate::tree::{extension_of, BuildTree};

pub const DEFAULT_MANIFEST_NAME: &str = "pod-styles";

const IMPORTED_EXTENSIONS: &[&str] = &["scss", "sass", "less", "styl"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestOptions {
    pub output_file_name_without_extension: String,
}

impl Default for ManifestOptions {
    fn default() -> Self {
        Self {
            output_file_name_without_extension: DEFAULT_MANIFEST_NAME.to_string(),
        }
    }
}

/// Manifest name for a bundle: `<bundle>-pod-styles`
pub fn bundle_manifest_name(bundle: &str) -> String {
    format!("{}-{}", bundle, DEFAULT_MANIFEST_NAME)
}

pub fn build_manifest(tree: &BuildTree, options: &ManifestOptions) -> Result<BuildTree> {
    let name = &options.output_file_name_without_extension;
    let mut by_extension: BTreeMap<&str, Vec<(&str, &str)>> = BTreeMap::new();
    for (path, contents) in tree.iter() {
        if let Some(ext) = extension_of(path) {
            by_extension.entry(ext).or_default().push((path, contents));
        }
    }

    if by_extension.is_empty() {
        return Ok(BuildTree::from_entries([(format!("{}.css", name), String::new())]));
    }

    let outputs: Vec<(String, String)> = by_extension
        .into_iter()
        .map(|(ext, files)| {
            let body = if IMPORTED_EXTENSIONS.contains(&ext) {
                import_manifest(&files)
            } else {
                concat_manifest(&files)
            };
            (format!("{}.{}", name, ext), body)
        })
        .collect();

    tracing::debug!(
        manifest = %name,
        files = tree.len(),
        outputs = outputs.len(),
        "Built style manifest"
    );
    Ok(BuildTree::from_entries(outputs))
}

fn import_manifest(files: &[(&str, &str)]) -> String {
    files
        .iter()
        .map(|(path, _)| format!("@import \"{}\";\n", path))
        .collect()
}

fn concat_manifest(files: &[(&str, &str)]) -> String {
    let mut out = String::new();
    for (path, contents) in files {
        out.push_str(&format!("/* {} */\n", path));
        out.push_str(contents);
        if !contents.ends_with('\n') {
            out.push('\n');
        }
    }
    out
}
