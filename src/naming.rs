//! Naming Module for Component CSS
//!
//! The one place that decides which component a style file belongs to and
//! what every class in it is renamed to. The rewriter and the name extractor
//! both go through `ClassNamer`, so the names written into the CSS and the
//! names looked up at runtime cannot drift apart.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

use crate::css::{apply_class_renames, distinct_class_names, scan_class_selectors, ClassToken};
use crate::error::Result;
use crate::tree::normalize_path;

pub const DEFAULT_CLASSIC_STYLE_DIR: &str = "component-styles";

/// Root directory of the classic convention inside the style tree
pub const CLASSIC_STYLES_ROOT: &str = "styles";

const TERSE_HASH_LEN: usize = 10;

lazy_static! {
    static ref UNSAFE_IDENT_CHARS: Regex = Regex::new(r"[^A-Za-z0-9_-]").unwrap();
}

// ═══════════════════════════════════════════════════════════════════════════════
// COMPONENT IDENTIFIERS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StyleConvention {
    /// Style file sits in the component's own folder
    Pod,
    /// Style file lives under `styles/<classicStyleDir>/`
    Classic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentPath {
    pub id: String,
    pub convention: StyleConvention,
    /// A `_partial` outside any component folder; it is not namespaced
    pub shared_partial: bool,
}

/// Resolve the component a style file belongs to.
///
/// Classic: `styles/<dir>/foo.css`, `<dir>/foo.css` and `<dir>/foo/style.css`
/// all give `foo`. Pod: the containing folder, so `foo/style.css` gives `foo`.
/// Partials (`_vars.scss`) belong to their folder's component.
pub fn component_identifier(path: &str, classic_style_dir: &str) -> ComponentPath {
    let path = normalize_path(path);
    let segments: Vec<&str> = path.split('/').collect();
    let classic_dir: Vec<&str> = classic_style_dir
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();

    if let Some(rest) = strip_classic_root(&segments, &classic_dir) {
        if !rest.is_empty() {
            let mut parts: Vec<&str> = rest.to_vec();
            let last = strip_extension(parts.pop().unwrap_or_default());
            let shared_partial = parts.is_empty() && is_partial(last);
            if parts.is_empty() || !(is_style_file_stem(last) || is_partial(last)) {
                parts.push(last);
            }
            return ComponentPath {
                id: parts.join("/"),
                convention: StyleConvention::Classic,
                shared_partial,
            };
        }
    }

    let (id, shared_partial) = match segments.split_last() {
        Some((file, [])) => {
            let stem = strip_extension(file);
            (stem.to_string(), is_partial(stem))
        }
        Some((_, dirs)) => (dirs.join("/"), false),
        None => (String::new(), false),
    };
    ComponentPath {
        id,
        convention: StyleConvention::Pod,
        shared_partial,
    }
}

fn strip_classic_root<'s>(segments: &'s [&'s str], classic_dir: &[&str]) -> Option<&'s [&'s str]> {
    if classic_dir.is_empty() {
        return None;
    }
    let after_styles = match segments.first() {
        Some(&CLASSIC_STYLES_ROOT) if classic_dir.first() != Some(&CLASSIC_STYLES_ROOT) => {
            &segments[1..]
        }
        _ => segments,
    };
    if after_styles.len() > classic_dir.len() && after_styles.starts_with(classic_dir) {
        Some(&after_styles[classic_dir.len()..])
    } else {
        None
    }
}

fn strip_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(0) | None => file_name,
        Some(idx) => &file_name[..idx],
    }
}

fn is_style_file_stem(stem: &str) -> bool {
    stem == "style" || stem == "styles"
}

fn is_partial(stem: &str) -> bool {
    stem.starts_with('_')
}

// ═══════════════════════════════════════════════════════════════════════════════
// CLASS NAMES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NamingMode {
    /// `a--widget__box`: readable, derived from the component path
    Verbose,
    /// `_3f9a0c1b2d`: short content hash
    Terse,
}

impl NamingMode {
    pub fn from_terse_flag(terse_class_names: bool) -> Self {
        if terse_class_names {
            NamingMode::Terse
        } else {
            NamingMode::Verbose
        }
    }
}

/// Generated class name for `class` declared by `component`.
pub fn namespaced_class(component: &str, class: &str, mode: NamingMode) -> String {
    match mode {
        NamingMode::Verbose => {
            let prefix = component
                .split('/')
                .filter(|s| !s.is_empty())
                .map(|segment| UNSAFE_IDENT_CHARS.replace_all(segment, "_").to_string())
                .collect::<Vec<_>>()
                .join("--");
            if prefix.starts_with(|c: char| c.is_ascii_digit()) {
                format!("_{}__{}", prefix, class)
            } else {
                format!("{}__{}", prefix, class)
            }
        }
        NamingMode::Terse => {
            let mut hasher = Sha256::new();
            hasher.update(component.as_bytes());
            hasher.update([0u8]);
            hasher.update(class.as_bytes());
            let digest = format!("{:x}", hasher.finalize());
            format!("_{}", &digest[..TERSE_HASH_LEN])
        }
    }
}

/// A style file after naming: its component and each class renamed, in
/// order of first appearance.
#[derive(Debug, Clone)]
pub struct NamespacedStyle {
    pub path: String,
    pub component: ComponentPath,
    pub tokens: Vec<ClassToken>,
    pub classes: Vec<(String, String)>,
}

impl NamespacedStyle {
    pub fn rewrite(&self, source: &str) -> String {
        if self.classes.is_empty() {
            return source.to_string();
        }
        let renames: HashMap<String, String> = self.classes.iter().cloned().collect();
        apply_class_renames(source, &self.tokens, &renames)
    }

    pub fn generated_names(&self) -> Vec<String> {
        self.classes.iter().map(|(_, new)| new.clone()).collect()
    }
}

#[derive(Debug, Clone)]
pub struct ClassNamer {
    classic_style_dir: String,
    mode: NamingMode,
}

impl ClassNamer {
    pub fn new(classic_style_dir: &str, terse_class_names: bool) -> Self {
        Self {
            classic_style_dir: classic_style_dir.to_string(),
            mode: NamingMode::from_terse_flag(terse_class_names),
        }
    }

    pub fn mode(&self) -> NamingMode {
        self.mode
    }

    pub fn component_for(&self, path: &str) -> ComponentPath {
        component_identifier(path, &self.classic_style_dir)
    }

    pub fn class_name(&self, component: &str, class: &str) -> String {
        namespaced_class(component, class, self.mode)
    }

    pub fn namespace_file(&self, path: &str, source: &str) -> Result<NamespacedStyle> {
        let component = self.component_for(path);
        let tokens = scan_class_selectors(source, path)?;
        if component.shared_partial {
            return Ok(NamespacedStyle {
                path: path.to_string(),
                component,
                tokens,
                classes: Vec::new(),
            });
        }

        let classes = distinct_class_names(&tokens)
            .into_iter()
            .map(|class| {
                let generated = self.class_name(&component.id, &class);
                (class, generated)
            })
            .collect();

        Ok(NamespacedStyle {
            path: path.to_string(),
            component,
            tokens,
            classes,
        })
    }
}
