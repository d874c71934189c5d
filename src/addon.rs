//! Orchestrator for Component CSS
//!
//! Wires selection, rewriting, manifests and name extraction together for
//! one build session. The host says up front whether this is an application
//! or a nested addon and keeps the `StyleRegistry` for the session; nothing
//! is inferred from the dependency graph or attached to the parent at
//! runtime.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::ResolvedConfig;
use crate::error::Result;
use crate::manifest::{build_manifest, bundle_manifest_name, ManifestOptions, DEFAULT_MANIFEST_NAME};
use crate::names::extract_names;
use crate::registry::StyleRegistry;
use crate::rewrite::{has_style_extension, rewrite_styles};
use crate::select::{select, StyleFunnels, StyleSource};
use crate::tree::{normalize_path, BuildTree, CombineOptions};

/// Parent tree type an addon asks its host to route through it
pub const ADDON_STYLES_TREE: &str = "addon-styles";

const ADDON_SOURCE_DIR: &str = "addon";
const APP_SOURCE_DIR: &str = "app";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    Application,
    Addon,
}

/// Everything the host knows when the addon is included
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostContext {
    pub role: Role,
    /// Root of the package whose styles are processed
    pub root: PathBuf,
    pub environment: String,
    #[serde(default)]
    pub project_config: serde_json::Value,
    /// Extensions the host registered for the `css` type
    #[serde(default)]
    pub style_extensions: Vec<String>,
    /// Pre-built application tree, used instead of `<root>/app`
    #[serde(default)]
    pub app_tree: Option<BuildTree>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TreeHook {
    ParentAddonStyles,
}

/// A hook the host must register on the parent
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentHook {
    pub tree_type: &'static str,
    pub hook: TreeHook,
}

// ═══════════════════════════════════════════════════════════════════════════════
// COMPONENT CSS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct ComponentCss {
    role: Role,
    source: StyleSource,
    config: ResolvedConfig,
    funnels: StyleFunnels,
}

impl ComponentCss {
    /// Resolve roots and configuration for this session.
    pub fn included(context: HostContext) -> Result<Self> {
        let config = ResolvedConfig::from_json(
            context.project_config,
            &context.environment,
            &context.style_extensions,
        )?;

        let source = match (context.role, context.app_tree) {
            (Role::Addon, _) => StyleSource::Directory(context.root.join(ADDON_SOURCE_DIR)),
            (Role::Application, Some(tree)) => StyleSource::Tree(tree),
            (Role::Application, None) => StyleSource::Directory(context.root.join(APP_SOURCE_DIR)),
        };

        let funnels = StyleFunnels {
            pod_directory: pod_directory(context.role, &config),
            classic_style_dir: config.classic_style_dir.clone(),
            extensions: config.extensions.clone(),
        };

        tracing::info!(
            role = ?context.role,
            source = %source_label(&source),
            pod_directory = %funnels.pod_directory,
            namespacing = config.namespacing,
            terse = config.terse_class_names,
            "component-css included"
        );

        Ok(Self {
            role: context.role,
            source,
            config,
            funnels,
        })
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    pub fn pod_directory(&self) -> &str {
        &self.funnels.pod_directory
    }

    pub fn namespacing_enabled(&self) -> bool {
        self.config.namespacing
    }

    /// Hooks the host has to register on the parent for this addon
    pub fn parent_hooks(&self) -> Vec<ParentHook> {
        match self.role {
            Role::Addon => vec![ParentHook {
                tree_type: ADDON_STYLES_TREE,
                hook: TreeHook::ParentAddonStyles,
            }],
            Role::Application => vec![],
        }
    }

    pub fn run_parent_hook(
        &self,
        hook: TreeHook,
        registry: &mut StyleRegistry,
        tree: Option<&BuildTree>,
    ) -> Result<BuildTree> {
        match hook {
            TreeHook::ParentAddonStyles => self.tree_for_parent_addon_styles(registry, tree),
        }
    }

    pub fn tree_for_parent_addon_styles(
        &self,
        registry: &mut StyleRegistry,
        tree: Option<&BuildTree>,
    ) -> Result<BuildTree> {
        self.process_component_styles(registry, tree)
    }

    /// The application's styles tree. Addons leave it alone; their styles
    /// arrive through the parent hook instead.
    pub fn tree_for_styles(
        &self,
        registry: &mut StyleRegistry,
        tree: Option<&BuildTree>,
    ) -> Result<BuildTree> {
        match self.role {
            Role::Application => self.process_component_styles(registry, tree),
            Role::Addon => Ok(tree.cloned().unwrap_or_default()),
        }
    }

    /// Select, namespace and manifest every bundle plus the default set,
    /// then merge the results over `tree`.
    pub fn process_component_styles(
        &self,
        registry: &mut StyleRegistry,
        tree: Option<&BuildTree>,
    ) -> Result<BuildTree> {
        let source = self.load_source()?;
        let mut outputs: Vec<BuildTree> = tree.into_iter().cloned().collect();
        let mut claimed: Vec<String> = Vec::new();

        for (bundle, patterns) in &self.config.bundles {
            let raw = select(&source, &self.funnels.bundle(patterns, &claimed))?;
            if raw.is_empty() {
                tracing::warn!(bundle = %bundle, patterns = ?patterns, "Style bundle matched no files");
            }
            claimed.extend(patterns.iter().cloned());

            let (processed, manifest) =
                self.process_style_tree(registry, raw, bundle_manifest_name(bundle))?;
            outputs.push(processed);
            outputs.push(manifest);
        }

        let raw = self.funnels.select_default(&source, &claimed)?;
        let (processed, manifest) =
            self.process_style_tree(registry, raw, DEFAULT_MANIFEST_NAME.to_string())?;
        outputs.push(processed);
        outputs.push(manifest);

        let combined = BuildTree::combine(&outputs, CombineOptions { overwrite: true })?;
        tracing::info!(
            bundles = self.config.bundles.len(),
            files = combined.len(),
            "Processed component styles"
        );
        Ok(combined)
    }

    /// Record the raw tree, then namespace it and build its manifest.
    fn process_style_tree(
        &self,
        registry: &mut StyleRegistry,
        raw: BuildTree,
        manifest_name: String,
    ) -> Result<(BuildTree, BuildTree)> {
        registry.push(raw.clone());

        let processed = if self.config.namespacing {
            rewrite_styles(&raw, &self.config.rewrite_options())?
        } else {
            raw
        };

        let manifest = build_manifest(
            &processed,
            &ManifestOptions {
                output_file_name_without_extension: manifest_name,
            },
        )?;
        Ok((processed, manifest))
    }

    /// Merge the class-name artifact for everything seen this session into
    /// the addon tree. Safe to call more than once.
    pub fn tree_for_addon(&self, registry: &StyleRegistry, tree: &BuildTree) -> Result<BuildTree> {
        if !self.config.namespacing {
            return Ok(tree.clone());
        }

        let names = extract_names(registry.trees(), &self.config.extract_options())?;
        BuildTree::combine(&[tree.clone(), names], CombineOptions { overwrite: true })
    }

    /// Snapshot the style files once so every funnel sees the same input
    fn load_source(&self) -> Result<StyleSource> {
        let extensions = &self.config.extensions;
        let tree = match &self.source {
            StyleSource::Directory(dir) => {
                BuildTree::from_dir_matching(dir, |path| has_style_extension(path, extensions))?
            }
            StyleSource::Tree(tree) => BuildTree::from_entries(
                tree.iter()
                    .filter(|(path, _)| has_style_extension(path, extensions)),
            ),
        };
        Ok(StyleSource::Tree(tree))
    }
}

/// Pod root relative to the source root: `podModulePrefix` without the
/// leading `modulePrefix`. Addons always use their own root.
pub fn pod_directory(role: Role, config: &ResolvedConfig) -> String {
    if role == Role::Addon {
        return String::new();
    }
    match (&config.pod_module_prefix, &config.module_prefix) {
        (Some(pod_prefix), Some(module_prefix)) if !module_prefix.is_empty() => {
            normalize_path(&pod_prefix.replacen(module_prefix.as_str(), "", 1))
        }
        (Some(pod_prefix), _) => normalize_path(pod_prefix),
        (None, _) => String::new(),
    }
}

fn source_label(source: &StyleSource) -> String {
    match source {
        StyleSource::Directory(dir) => dir.display().to_string(),
        StyleSource::Tree(tree) => format!("<tree: {} files>", tree.len()),
    }
}
