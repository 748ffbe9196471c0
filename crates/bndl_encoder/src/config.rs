// SPDX-License-Identifier: MIT OR Apache-2.0
//! Encoder configuration.
//!
//! Every hand-picked constant of the format lives here as a named default.
//! An [`EncoderConfig`] can be loaded from a RON file to revisit any of them
//! without touching the algorithms.

use crate::overrides::{OverrideProbe, DEFAULT_PROBES};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Format version written in the document header
pub const BNDL_VERSION: &str = "1.2";

/// Maximum number of hops any reroute or dead-end walk may take
pub const MAX_WALK_STEPS: usize = 1024;

/// Absolute tolerance for numeric override comparison
pub const NUMERIC_TOLERANCE: f64 = 1e-6;

/// Fixed decimals used when rendering numbers
pub const NUMBER_DECIMALS: usize = 6;

/// Tokens treated as uninformative socket defaults
pub const ZERO_LIKE_TOKENS: &[&str] = &["<0>", "<0, 0, 0>", "<0, 0, 0, 0>", "<False>", "©©"];

/// Socket categories whose links are drawn as definite
pub const CONCRETE_LINK_CATEGORIES: &[&str] = &["GEOMETRY", "OBJECT", "MATERIAL"];

/// Canonical tags for structural host node types
pub const TYPE_ALIASES: &[(&str, &str)] = &[
    ("GeometryNodeGroupInput", "Group Input"),
    ("GeometryNodeGroupOutput", "Group Output"),
    ("NodeGroupInput", "Group Input"),
    ("NodeGroupOutput", "Group Output"),
    ("GeometryNodeGroup", "Group"),
];

/// Host prefixes stripped from raw type ids when no label is available
pub const TYPE_PREFIXES: &[&str] = &["GeometryNode", "FunctionNode", "ShaderNode"];

/// Tunable encoder settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Header version
    pub version: String,
    /// Walk step bound
    pub max_walk_steps: usize,
    /// Override comparison tolerance
    pub tolerance: f64,
    /// Number rendering decimals
    pub decimals: usize,
    /// Suppressed default tokens
    pub zero_like_tokens: Vec<String>,
    /// Categories producing definite links
    pub concrete_categories: Vec<String>,
    /// Raw type id to tag aliases
    pub type_aliases: IndexMap<String, String>,
    /// Prefixes stripped from raw type ids
    pub type_prefixes: Vec<String>,
    /// Ordered probes used to read instance overrides
    pub override_probes: Vec<OverrideProbe>,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            version: BNDL_VERSION.to_string(),
            max_walk_steps: MAX_WALK_STEPS,
            tolerance: NUMERIC_TOLERANCE,
            decimals: NUMBER_DECIMALS,
            zero_like_tokens: ZERO_LIKE_TOKENS.iter().map(|s| s.to_string()).collect(),
            concrete_categories: CONCRETE_LINK_CATEGORIES.iter().map(|s| s.to_string()).collect(),
            type_aliases: TYPE_ALIASES
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            type_prefixes: TYPE_PREFIXES.iter().map(|s| s.to_string()).collect(),
            override_probes: DEFAULT_PROBES.to_vec(),
        }
    }
}

impl EncoderConfig {
    /// Parse a RON configuration; missing fields keep their defaults
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    /// Load a RON configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(&text)
    }

    /// Whether a serialized default is worth emitting
    pub fn is_meaningful(&self, token: &str) -> bool {
        let token = token.trim();
        !self.zero_like_tokens.iter().any(|z| z == token)
    }

    /// Whether a socket category counts as concrete for link classification
    pub fn is_concrete(&self, category: &str) -> bool {
        let category = category.to_uppercase();
        self.concrete_categories.iter().any(|c| *c == category)
    }
}

/// Error while loading a configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("Failed to read config {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Invalid RON
    #[error("Invalid config: {0}")]
    Ron(#[from] ron::error::SpannedError),
}
