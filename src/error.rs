//! Error Module for Component CSS
//!
//! Every failure in the pipeline is fatal to the current build. Each variant
//! carries a stable code so the host can report it without string matching.

use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════════════
// ERROR CODES
// ═══════════════════════════════════════════════════════════════════════════════

pub const ERR_CSS_PARSE: &str = "CSS-PARSE";
pub const ERR_NAME_COLLISION: &str = "NAME-COLLISION";
pub const ERR_COMPONENT_AMBIGUOUS: &str = "COMPONENT-AMBIGUOUS";
pub const ERR_CONFIG_PATTERN: &str = "CONFIG-PATTERN";
pub const ERR_CONFIG_INVALID: &str = "CONFIG-INVALID";
pub const ERR_TREE_EMPTY: &str = "TREE-EMPTY";
pub const ERR_TREE_CONFLICT: &str = "TREE-CONFLICT";
pub const ERR_IO: &str = "IO";

// ═══════════════════════════════════════════════════════════════════════════════
// STYLE ERROR
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Error)]
pub enum StyleError {
    /// Malformed CSS found while scanning selectors
    #[error("{file}:{line}:{column}: {message}")]
    CssParse {
        file: String,
        line: u32,
        column: u32,
        message: String,
    },

    /// Two different (component, class) pairs produced the same generated name
    #[error("generated class name '{name}' is produced by both {first} and {second}")]
    NamingCollision {
        name: String,
        first: String,
        second: String,
    },

    /// Two style files in one tree resolve to the same component
    #[error("component '{component}' has more than one style file: '{first}' and '{second}'")]
    AmbiguousComponent {
        component: String,
        first: String,
        second: String,
    },

    #[error("invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    /// Selection matched nothing and `allow_empty` was not set
    #[error("no files in '{root}' matched {patterns:?}")]
    EmptySelection { root: String, patterns: Vec<String> },

    /// Combining trees without overwrite found one path with two contents
    #[error("'{path}' exists in more than one input tree; combine with overwrite to allow this")]
    TreeConflict { path: String },

    #[error("failed to access '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl StyleError {
    pub fn code(&self) -> &'static str {
        match self {
            StyleError::CssParse { .. } => ERR_CSS_PARSE,
            StyleError::NamingCollision { .. } => ERR_NAME_COLLISION,
            StyleError::AmbiguousComponent { .. } => ERR_COMPONENT_AMBIGUOUS,
            StyleError::InvalidPattern { .. } => ERR_CONFIG_PATTERN,
            StyleError::Config(_) => ERR_CONFIG_INVALID,
            StyleError::EmptySelection { .. } => ERR_TREE_EMPTY,
            StyleError::TreeConflict { .. } => ERR_TREE_CONFLICT,
            StyleError::Io { .. } => ERR_IO,
        }
    }

    pub(crate) fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        StyleError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for StyleError {
    fn from(e: serde_json::Error) -> Self {
        StyleError::Config(e.to_string())
    }
}

pub type Result<T, E = StyleError> = std::result::Result<T, E>;
