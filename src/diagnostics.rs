//! Non-fatal diagnostics collected during a render pass.

use std::fmt;

use crate::content_type::ContentType;

/// A warning about a template authoring mistake that did not stop rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Template whose declaration triggered the diagnostic
    pub template: String,
    pub block: String,
    pub message: String,
}

/// Category of diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    ContentTypeMismatch {
        recorded: ContentType,
        declared: ContentType,
    },
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::ContentTypeMismatch { .. } => write!(f, "content-type"),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.template, self.message)
    }
}

impl Diagnostic {
    pub fn content_type_mismatch(
        template: &str,
        block: &str,
        recorded: ContentType,
        declared: ContentType,
    ) -> Self {
        Self {
            kind: DiagnosticKind::ContentTypeMismatch { recorded, declared },
            template: template.to_string(),
            block: block.to_string(),
            message: format!(
                "overridden block '{}' in an incompatible context ({} declared, {} recorded)",
                block, declared, recorded
            ),
        }
    }

    pub fn is_content_type_mismatch(&self) -> bool {
        matches!(self.kind, DiagnosticKind::ContentTypeMismatch { .. })
    }
}
