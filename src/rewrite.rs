//! Selector Rewriter ("process styles")
//!
//! Rewrites the class selectors of every style file in a tree to their
//! component-namespaced form. Files keep their relative paths; anything that
//! is not a style file passes through untouched.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::naming::{ClassNamer, DEFAULT_CLASSIC_STYLE_DIR};
use crate::tree::{extension_of, BuildTree};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteOptions {
    /// Style extensions without the dot (`css`, `scss`, ...)
    pub extensions: Vec<String>,
    #[serde(default = "default_classic_style_dir")]
    pub classic_style_dir: String,
    #[serde(default)]
    pub terse_class_names: bool,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            extensions: vec!["css".to_string()],
            classic_style_dir: default_classic_style_dir(),
            terse_class_names: false,
        }
    }
}

pub(crate) fn default_classic_style_dir() -> String {
    DEFAULT_CLASSIC_STYLE_DIR.to_string()
}

pub(crate) fn has_style_extension(path: &str, extensions: &[String]) -> bool {
    extension_of(path)
        .map(|ext| extensions.iter().any(|allowed| allowed == ext))
        .unwrap_or(false)
}

/// Namespace every style file in `tree`.
///
/// Output depends only on the tree and the options; files are rewritten in
/// parallel and collected back in path order.
pub fn rewrite_styles(tree: &BuildTree, options: &RewriteOptions) -> Result<BuildTree> {
    let namer = ClassNamer::new(&options.classic_style_dir, options.terse_class_names);
    let entries: Vec<(&str, &str)> = tree.iter().collect();

    let rewritten = entries
        .par_iter()
        .map(|&(path, source)| {
            if !has_style_extension(path, &options.extensions) {
                return Ok((path.to_string(), source.to_string()));
            }
            let style = namer.namespace_file(path, source)?;
            tracing::debug!(
                path,
                component = %style.component.id,
                classes = style.classes.len(),
                "Namespaced style file"
            );
            Ok((path.to_string(), style.rewrite(source)))
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::info!(
        files = rewritten.len(),
        mode = ?namer.mode(),
        "Rewrote component styles"
    );
    Ok(BuildTree::from_entries(rewritten))
}
