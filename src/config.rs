//! Configuration Module for Component CSS
//!
//! The host hands over its project configuration as JSON. Settings for this
//! crate live under the `component-css` key; `modulePrefix` and
//! `podModulePrefix` come from the project itself.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Result, StyleError};
use crate::names::ExtractOptions;
use crate::naming::DEFAULT_CLASSIC_STYLE_DIR;
use crate::rewrite::RewriteOptions;

pub const CONFIG_KEY: &str = "component-css";
pub const PRODUCTION_ENV: &str = "production";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddonConfig {
    #[serde(default)]
    pub namespacing: Option<bool>,
    #[serde(default)]
    pub terse_class_names: Option<bool>,
    #[serde(default)]
    pub classic_style_dir: Option<String>,
    /// Bundle name -> file patterns, relative to the pod root
    #[serde(default)]
    pub bundles_config: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    #[serde(default)]
    pub module_prefix: Option<String>,
    #[serde(default)]
    pub pod_module_prefix: Option<String>,
    #[serde(default, rename = "component-css")]
    pub component_css: AddonConfig,
}

/// Defaults contributed to the project config for an environment
pub fn default_config(environment: &str) -> serde_json::Value {
    serde_json::json!({
        CONFIG_KEY: {
            "terseClassNames": environment == PRODUCTION_ENV,
        }
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// RESOLVED CONFIG
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub namespacing: bool,
    pub terse_class_names: bool,
    pub classic_style_dir: String,
    pub bundles: BTreeMap<String, Vec<String>>,
    /// Registered style extensions, without dots
    pub extensions: Vec<String>,
    pub module_prefix: Option<String>,
    pub pod_module_prefix: Option<String>,
}

impl ResolvedConfig {
    pub fn from_json(
        project_config: serde_json::Value,
        environment: &str,
        extensions: &[String],
    ) -> Result<Self> {
        let project: ProjectConfig = if project_config.is_null() {
            ProjectConfig::default()
        } else {
            serde_json::from_value(project_config)?
        };
        Self::resolve(project, environment, extensions)
    }

    pub fn resolve(project: ProjectConfig, environment: &str, extensions: &[String]) -> Result<Self> {
        let addon = project.component_css;

        let classic_style_dir = addon
            .classic_style_dir
            .unwrap_or_else(|| DEFAULT_CLASSIC_STYLE_DIR.to_string());
        let classic_style_dir = classic_style_dir.trim_matches('/').to_string();
        if classic_style_dir.is_empty() {
            return Err(StyleError::Config(
                "classicStyleDir must not be empty".to_string(),
            ));
        }

        if let Some(name) = addon.bundles_config.keys().find(|name| name.trim().is_empty()) {
            return Err(StyleError::Config(format!(
                "bundle names must not be empty (got {:?})",
                name
            )));
        }

        let mut extensions: Vec<String> = extensions
            .iter()
            .map(|ext| ext.trim().trim_start_matches('.').to_string())
            .filter(|ext| !ext.is_empty())
            .collect();
        extensions.dedup();
        if extensions.is_empty() {
            extensions.push("css".to_string());
        }

        let resolved = Self {
            namespacing: addon.namespacing != Some(false),
            terse_class_names: addon
                .terse_class_names
                .unwrap_or(environment == PRODUCTION_ENV),
            classic_style_dir,
            bundles: addon.bundles_config,
            extensions,
            module_prefix: project.module_prefix,
            pod_module_prefix: project.pod_module_prefix,
        };
        tracing::debug!(environment, config = ?resolved, "Resolved component-css config");
        Ok(resolved)
    }

    pub fn rewrite_options(&self) -> RewriteOptions {
        RewriteOptions {
            extensions: self.extensions.clone(),
            classic_style_dir: self.classic_style_dir.clone(),
            terse_class_names: self.terse_class_names,
        }
    }

    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            extensions: self.extensions.clone(),
            classic_style_dir: self.classic_style_dir.clone(),
            terse_class_names: self.terse_class_names,
            ..ExtractOptions::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn css() -> Vec<String> {
        vec!["css".to_string()]
    }

    #[test]
    fn test_defaults() {
        let config = ResolvedConfig::from_json(json!({}), "development", &css()).unwrap();
        assert!(config.namespacing);
        assert!(!config.terse_class_names);
        assert_eq!(config.classic_style_dir, "component-styles");
        assert!(config.bundles.is_empty());
    }

    #[test]
    fn test_missing_project_config() {
        let config = ResolvedConfig::from_json(serde_json::Value::Null, "test", &css()).unwrap();
        assert!(config.namespacing);
        assert_eq!(config.pod_module_prefix, None);
    }

    #[test]
    fn test_production_defaults_to_terse() {
        let config = ResolvedConfig::from_json(json!({}), "production", &css()).unwrap();
        assert!(config.terse_class_names);
    }

    #[test]
    fn test_explicit_settings_win() {
        let config = ResolvedConfig::from_json(
            json!({
                "modulePrefix": "my-app",
                "podModulePrefix": "my-app/pods",
                "component-css": {
                    "namespacing": false,
                    "terseClassNames": false,
                    "classicStyleDir": "/legacy/",
                    "bundlesConfig": { "admin": ["admin/**/*"] }
                }
            }),
            "production",
            &css(),
        )
        .unwrap();
        assert!(!config.namespacing);
        assert!(!config.terse_class_names);
        assert_eq!(config.classic_style_dir, "legacy");
        assert_eq!(config.bundles["admin"], vec!["admin/**/*".to_string()]);
        assert_eq!(config.pod_module_prefix.as_deref(), Some("my-app/pods"));
    }

    #[test]
    fn test_extensions_are_cleaned() {
        let exts = vec![".scss".to_string(), String::new(), "css".to_string()];
        let config = ResolvedConfig::from_json(json!({}), "test", &exts).unwrap();
        assert_eq!(config.extensions, vec!["scss".to_string(), "css".to_string()]);

        let config = ResolvedConfig::from_json(json!({}), "test", &[]).unwrap();
        assert_eq!(config.extensions, css());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let err = ResolvedConfig::from_json(
            json!({ "component-css": { "namespacing": "yes" } }),
            "test",
            &css(),
        )
        .unwrap_err();
        assert_eq!(err.code(), crate::error::ERR_CONFIG_INVALID);
    }

    #[test]
    fn test_default_config_hook() {
        assert_eq!(
            default_config("production")[CONFIG_KEY]["terseClassNames"],
            json!(true)
        );
        assert_eq!(
            default_config("development")[CONFIG_KEY]["terseClassNames"],
            json!(false)
        );
    }
}
