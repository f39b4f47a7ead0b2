//! Error types for rendering and configuration

use thiserror::Error;

/// Errors that abort a render pass
#[derive(Debug, Error)]
pub enum RenderError {
    /// No implementation registered for a block name
    #[error("cannot include undefined block '{name}'{}", format_hint(.suggestion))]
    UndefinedBlock {
        name: String,
        suggestion: Option<String>,
    },

    /// No less-derived implementation left for a block
    #[error("cannot include undefined parent block '{name}'")]
    UndefinedParentBlock { name: String },

    /// The loader or factory does not know the template
    #[error("template not found: {name}")]
    TemplateNotFound {
        name: String,
        suggestions: Vec<String>,
    },

    /// A template extends itself, directly or through its ancestors
    #[error("circular template inheritance: {}", chain.join(" -> "))]
    CircularExtends { chain: Vec<String> },

    /// Too many nested template instances in one render pass
    #[error("template nesting too deep at '{name}' (depth {depth})")]
    DepthExceeded { name: String, depth: usize },

    /// Failure raised by a custom loader, factory or template body
    #[error(transparent)]
    External(#[from] Box<dyn std::error::Error + Send + Sync>),

    /// Writing the final output to the caller's sink failed
    #[error("failed to write output: {0}")]
    Output(#[from] std::fmt::Error),
}

fn format_hint(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(name) => format!(", did you mean '{}'?", name),
        None => ".".to_string(),
    }
}

impl RenderError {
    /// Create an undefined block error
    pub fn undefined_block(name: impl Into<String>, suggestion: Option<String>) -> Self {
        Self::UndefinedBlock {
            name: name.into(),
            suggestion,
        }
    }

    /// Create an undefined parent block error
    pub fn undefined_parent_block(name: impl Into<String>) -> Self {
        Self::UndefinedParentBlock { name: name.into() }
    }

    /// Create a template not found error
    pub fn not_found(name: impl Into<String>, suggestions: Vec<String>) -> Self {
        Self::TemplateNotFound {
            name: name.into(),
            suggestions,
        }
    }

    /// Get suggestions if available
    pub fn suggestions(&self) -> Option<Vec<&str>> {
        match self {
            Self::UndefinedBlock { suggestion, .. } => {
                Some(suggestion.iter().map(|s| s.as_str()).collect())
            }
            Self::TemplateNotFound { suggestions, .. } => {
                Some(suggestions.iter().map(|s| s.as_str()).collect())
            }
            _ => None,
        }
    }

    /// Name of the block involved, for block resolution errors
    pub fn block_name(&self) -> Option<&str> {
        match self {
            Self::UndefinedBlock { name, .. } | Self::UndefinedParentBlock { name } => Some(name),
            _ => None,
        }
    }
}

/// Errors that can occur when loading engine configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}
