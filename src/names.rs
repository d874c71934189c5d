//! Name Extractor ("extract names")
//!
//! Walks every raw style tree accumulated during the session and produces
//! the runtime artifact mapping each component to its generated class names.
//! Names come from the same `ClassNamer` the rewriter uses.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::css::unescape_ident;
use crate::error::{Result, StyleError};
use crate::naming::{ClassNamer, StyleConvention};
use crate::rewrite::{default_classic_style_dir, has_style_extension};
use crate::tree::BuildTree;

pub const DEFAULT_NAMES_MODULE: &str = "pod-names";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractOptions {
    pub extensions: Vec<String>,
    #[serde(default = "default_classic_style_dir")]
    pub classic_style_dir: String,
    #[serde(default)]
    pub terse_class_names: bool,
    /// Artifact file name without extension
    #[serde(default = "default_names_module")]
    pub output_name: String,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            extensions: vec!["css".to_string()],
            classic_style_dir: default_classic_style_dir(),
            terse_class_names: false,
            output_name: default_names_module(),
        }
    }
}

fn default_names_module() -> String {
    DEFAULT_NAMES_MODULE.to_string()
}

// ═══════════════════════════════════════════════════════════════════════════════
// NAME MAPPING
// ═══════════════════════════════════════════════════════════════════════════════

/// One component's classes, each with the file that declared it
#[derive(Debug, Clone)]
struct ComponentEntry {
    convention: StyleConvention,
    path: String,
    classes: Vec<DeclaredClass>,
}

#[derive(Debug, Clone)]
struct DeclaredClass {
    original: String,
    generated: String,
    path: String,
}

/// Component identifier -> generated class names, ordered by first appearance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NameMapping {
    entries: BTreeMap<String, Vec<String>>,
}

impl NameMapping {
    pub fn get(&self, component: &str) -> Option<&[String]> {
        self.entries.get(component).map(|v| v.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// ES module with the mapping as its default export
    pub fn to_module_source(&self) -> String {
        let mut out = String::from(
            "// Generated by component-css. Maps components to their namespaced class names.\n",
        );
        out.push_str("export default {\n");
        for (component, names) in &self.entries {
            let key = serde_json::to_string(component).unwrap_or_default();
            let values = serde_json::to_string(names).unwrap_or_default();
            out.push_str(&format!("  {}: {},\n", key, values));
        }
        out.push_str("};\n");
        out
    }

    pub fn to_json(&self) -> String {
        let mut json = serde_json::to_string_pretty(&self.entries).unwrap_or_default();
        json.push('\n');
        json
    }
}

/// Build the mapping from the accumulated raw trees.
///
/// A component found in several trees takes its entry from the last one.
/// Inside one tree, files of the same convention (a style file and its
/// partials) are merged in path order, while a pod file and a classic file
/// for one component abort the build. So does one generated name shared by
/// different classes.
pub fn collect_names(trees: &[BuildTree], options: &ExtractOptions) -> Result<NameMapping> {
    let namer = ClassNamer::new(&options.classic_style_dir, options.terse_class_names);
    let mut components: BTreeMap<String, ComponentEntry> = BTreeMap::new();

    for tree in trees {
        let mut in_tree: BTreeMap<String, ComponentEntry> = BTreeMap::new();

        for (path, source) in tree.iter() {
            if !has_style_extension(path, &options.extensions) {
                continue;
            }
            let style = namer.namespace_file(path, source)?;
            if style.component.shared_partial {
                tracing::debug!(path, "Skipping shared partial");
                continue;
            }

            let declared = style.classes.into_iter().map(|(original, generated)| DeclaredClass {
                original,
                generated: unescape_ident(&generated),
                path: path.to_string(),
            });

            match in_tree.get_mut(&style.component.id) {
                Some(entry) if entry.convention != style.component.convention => {
                    return Err(StyleError::AmbiguousComponent {
                        component: style.component.id,
                        first: entry.path.clone(),
                        second: path.to_string(),
                    });
                }
                Some(entry) => {
                    for class in declared {
                        if !entry.classes.iter().any(|c| c.original == class.original) {
                            entry.classes.push(class);
                        }
                    }
                }
                None => {
                    in_tree.insert(
                        style.component.id,
                        ComponentEntry {
                            convention: style.component.convention,
                            path: path.to_string(),
                            classes: declared.collect(),
                        },
                    );
                }
            }
        }

        components.extend(in_tree);
    }

    check_collisions(&components)?;

    let entries = components
        .into_iter()
        .map(|(component, entry)| {
            let names = entry.classes.into_iter().map(|c| c.generated).collect();
            (component, names)
        })
        .collect();

    Ok(NameMapping { entries })
}

fn check_collisions(components: &BTreeMap<String, ComponentEntry>) -> Result<()> {
    let mut owners: HashMap<&str, (&str, &DeclaredClass)> = HashMap::new();

    for (component, entry) in components {
        for class in &entry.classes {
            let existing = owners.get(class.generated.as_str()).copied();
            match existing {
                Some((other_component, other))
                    if other_component != component.as_str() || other.original != class.original =>
                {
                    return Err(StyleError::NamingCollision {
                        name: class.generated.clone(),
                        first: format!("'.{}' in {}", other.original, other.path),
                        second: format!("'.{}' in {}", class.original, class.path),
                    });
                }
                Some(_) => {}
                None => {
                    owners.insert(class.generated.as_str(), (component.as_str(), class));
                }
            }
        }
    }
    Ok(())
}

/// Produce the artifact tree (`<outputName>.js` + `<outputName>.json`).
pub fn extract_names(trees: &[BuildTree], options: &ExtractOptions) -> Result<BuildTree> {
    let mapping = collect_names(trees, options)?;
    tracing::info!(
        trees = trees.len(),
        components = mapping.len(),
        "Extracted component class names"
    );

    Ok(BuildTree::from_entries([
        (
            format!("{}.js", options.output_name),
            mapping.to_module_source(),
        ),
        (format!("{}.json", options.output_name), mapping.to_json()),
    ]))
}
