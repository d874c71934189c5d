//! Node-API bridge for the JavaScript build host.
//!
//! Trees cross the boundary as plain `{ path: contents }` objects. A
//! `ComponentCssSession` owns the style registry for one build session.

use napi_derive::napi;

use crate::addon::{ComponentCss, HostContext};
use crate::error::StyleError;
use crate::manifest::{build_manifest, ManifestOptions};
use crate::names::{extract_names, ExtractOptions};
use crate::registry::StyleRegistry;
use crate::rewrite::{rewrite_styles, RewriteOptions};
use crate::tree::BuildTree;

fn to_napi(e: StyleError) -> napi::Error {
    napi::Error::from_reason(format!("[{}] {}", e.code(), e))
}

fn from_json<T: serde::de::DeserializeOwned>(value: serde_json::Value, what: &str) -> napi::Result<T> {
    serde_json::from_value(value)
        .map_err(|e| napi::Error::from_reason(format!("Invalid {}: {}", what, e)))
}

fn tree_to_json(tree: &BuildTree) -> napi::Result<serde_json::Value> {
    serde_json::to_value(tree)
        .map_err(|e| napi::Error::from_reason(format!("Failed to serialize tree: {}", e)))
}

// ═══════════════════════════════════════════════════════════════════════════════
// STATELESS TRANSFORMS
// ═══════════════════════════════════════════════════════════════════════════════

#[napi]
pub fn process_styles_native(
    tree_json: serde_json::Value,
    options_json: serde_json::Value,
) -> napi::Result<serde_json::Value> {
    let tree: BuildTree = from_json(tree_json, "tree")?;
    let options: RewriteOptions = from_json(options_json, "RewriteOptions")?;
    let rewritten = rewrite_styles(&tree, &options).map_err(to_napi)?;
    tree_to_json(&rewritten)
}

#[napi]
pub fn extract_names_native(
    trees_json: Vec<serde_json::Value>,
    options_json: serde_json::Value,
) -> napi::Result<serde_json::Value> {
    let trees = trees_json
        .into_iter()
        .map(|t| from_json::<BuildTree>(t, "tree"))
        .collect::<napi::Result<Vec<_>>>()?;
    let options: ExtractOptions = from_json(options_json, "ExtractOptions")?;
    let artifact = extract_names(&trees, &options).map_err(to_napi)?;
    tree_to_json(&artifact)
}

#[napi]
pub fn build_manifest_native(
    tree_json: serde_json::Value,
    options_json: serde_json::Value,
) -> napi::Result<serde_json::Value> {
    let tree: BuildTree = from_json(tree_json, "tree")?;
    let options: ManifestOptions = from_json(options_json, "ManifestOptions")?;
    let manifest = build_manifest(&tree, &options).map_err(to_napi)?;
    tree_to_json(&manifest)
}

// ═══════════════════════════════════════════════════════════════════════════════
// SESSION
// ═══════════════════════════════════════════════════════════════════════════════

#[napi]
pub struct ComponentCssSession {
    addon: ComponentCss,
    registry: StyleRegistry,
}

#[napi]
impl ComponentCssSession {
    #[napi(constructor)]
    pub fn new(context_json: serde_json::Value) -> napi::Result<Self> {
        let context: HostContext = from_json(context_json, "HostContext")?;
        let addon = ComponentCss::included(context).map_err(to_napi)?;
        Ok(Self {
            addon,
            registry: StyleRegistry::new(),
        })
    }

    /// Hooks the host must register on the parent, e.g. `addon-styles`
    #[napi]
    pub fn parent_hooks(&self) -> napi::Result<serde_json::Value> {
        serde_json::to_value(self.addon.parent_hooks())
            .map_err(|e| napi::Error::from_reason(e.to_string()))
    }

    #[napi]
    pub fn process_component_styles(
        &mut self,
        tree_json: Option<serde_json::Value>,
    ) -> napi::Result<serde_json::Value> {
        let tree = optional_tree(tree_json)?;
        let out = self
            .addon
            .process_component_styles(&mut self.registry, tree.as_ref())
            .map_err(to_napi)?;
        tree_to_json(&out)
    }

    #[napi]
    pub fn tree_for_styles(
        &mut self,
        tree_json: Option<serde_json::Value>,
    ) -> napi::Result<serde_json::Value> {
        let tree = optional_tree(tree_json)?;
        let out = self
            .addon
            .tree_for_styles(&mut self.registry, tree.as_ref())
            .map_err(to_napi)?;
        tree_to_json(&out)
    }

    #[napi]
    pub fn tree_for_parent_addon_styles(
        &mut self,
        tree_json: Option<serde_json::Value>,
    ) -> napi::Result<serde_json::Value> {
        let tree = optional_tree(tree_json)?;
        let out = self
            .addon
            .tree_for_parent_addon_styles(&mut self.registry, tree.as_ref())
            .map_err(to_napi)?;
        tree_to_json(&out)
    }

    #[napi]
    pub fn tree_for_addon(&self, tree_json: serde_json::Value) -> napi::Result<serde_json::Value> {
        let tree: BuildTree = from_json(tree_json, "tree")?;
        let out = self
            .addon
            .tree_for_addon(&self.registry, &tree)
            .map_err(to_napi)?;
        tree_to_json(&out)
    }

    #[napi(getter)]
    pub fn accumulated_trees(&self) -> u32 {
        self.registry.len() as u32
    }
}

fn optional_tree(tree_json: Option<serde_json::Value>) -> napi::Result<Option<BuildTree>> {
    tree_json.map(|t| from_json(t, "tree")).transpose()
}
