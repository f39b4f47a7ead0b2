//! Configuration for the rendering engine

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Parameter that requests rendering of a single block instead of a document
pub const DEFAULT_RENDER_BLOCK_PARAM: &str = "_renderblock";

/// Configuration options for a render pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Suggest a similarly named block when an undefined one is requested
    pub suggest_block_names: bool,

    /// Name of the parameter carrying the block for single-block rendering
    pub render_block_param: String,

    /// Maximum number of nested template instances in one pass
    pub max_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            suggest_block_names: true,
            render_block_param: DEFAULT_RENDER_BLOCK_PARAM.to_string(),
            max_depth: 64,
        }
    }
}

/// TOML structure for deserializing engine configuration
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlEngineConfig {
    suggest_block_names: Option<bool>,
    render_block_param: Option<String>,
    max_depth: Option<usize>,
}

impl EngineConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string; missing keys keep their defaults
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlEngineConfig = toml::from_str(content)?;
        let defaults = Self::default();

        Ok(Self {
            suggest_block_names: parsed
                .suggest_block_names
                .unwrap_or(defaults.suggest_block_names),
            render_block_param: parsed
                .render_block_param
                .unwrap_or(defaults.render_block_param),
            max_depth: parsed.max_depth.unwrap_or(defaults.max_depth),
        })
    }

    /// Enable or disable block name suggestions
    pub fn with_suggestions(mut self, enabled: bool) -> Self {
        self.suggest_block_names = enabled;
        self
    }

    /// Set the single-block rendering parameter name
    pub fn with_render_block_param(mut self, name: impl Into<String>) -> Self {
        self.render_block_param = name.into();
        self
    }

    /// Set the maximum nesting depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}
