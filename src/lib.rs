//! # Component CSS Native
//!
//! Namespaces component-scoped stylesheets for a host build pipeline.
//!
//! ## Pipeline Invariants
//!
//! 1. **One Naming Algorithm**: `naming::ClassNamer` is the only code that maps
//!    a (component, class) pair to a generated class name. The rewriter writes
//!    those names into the CSS and the name extractor writes the same names
//!    into the runtime artifact.
//!
//! 2. **Pure Transforms**: selection, rewriting, manifests and extraction are
//!    functions of their input trees and options. Identical inputs give
//!    byte-identical outputs, so the host may cache or parallelize them.
//!
//! 3. **Last Write Wins**: every merge point combines with overwrite. Running
//!    the pipeline twice over the same input (nested apps, engines) converges
//!    instead of failing on duplicate paths.
//!
//! 4. **Bundles Partition**: a file claimed by a bundle is excluded from the
//!    default set and from every later bundle.
//!
//! 5. **Session State Is Explicit**: raw style trees accumulate in a
//!    `StyleRegistry` owned by the caller, never in a global.

#[cfg(feature = "napi")]
mod bridge;

mod addon;
mod config;
mod css;
mod error;
mod manifest;
mod names;
mod naming;
mod registry;
mod rewrite;
mod select;
mod tree;

#[cfg(test)]
mod rewrite_tests;
#[cfg(test)]
mod names_tests;

#[cfg(feature = "napi")]
pub use bridge::{
    build_manifest_native, extract_names_native, process_styles_native, ComponentCssSession,
};

pub use addon::{pod_directory, ComponentCss, HostContext, ParentHook, Role, TreeHook, ADDON_STYLES_TREE};
pub use config::{default_config, AddonConfig, ProjectConfig, ResolvedConfig, CONFIG_KEY};
pub use css::{scan_class_selectors, unescape_ident, ClassToken};
pub use error::{Result, StyleError};
pub use manifest::{build_manifest, bundle_manifest_name, ManifestOptions, DEFAULT_MANIFEST_NAME};
pub use names::{collect_names, extract_names, ExtractOptions, NameMapping, DEFAULT_NAMES_MODULE};
pub use naming::{
    component_identifier, namespaced_class, ClassNamer, ComponentPath, NamespacedStyle,
    NamingMode, StyleConvention, DEFAULT_CLASSIC_STYLE_DIR,
};
pub use registry::StyleRegistry;
pub use rewrite::{rewrite_styles, RewriteOptions};
pub use select::{filter_tree, select, SelectOptions, StyleFunnels, StyleSource};
pub use tree::{BuildTree, CombineOptions};
