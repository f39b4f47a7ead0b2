//! Content types and the per-chain block content-type guard

use std::collections::HashMap;
use std::fmt;

/// Semantic kind of output a template or block produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContentType {
    #[default]
    Html,
    Xhtml,
    Xml,
    Js,
    Css,
    Ical,
    Text,
}

impl ContentType {
    /// Whether output must follow XML rules (affects how markup is emitted)
    pub fn is_xml(self) -> bool {
        matches!(self, ContentType::Xml | ContentType::Xhtml)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Html => "html",
            ContentType::Xhtml => "xhtml",
            ContentType::Xml => "xml",
            ContentType::Js => "js",
            ContentType::Css => "css",
            ContentType::Ical => "ical",
            ContentType::Text => "text",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of checking a block declaration against the recorded type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCheck {
    /// First declaration of the name; its type is now recorded
    Recorded,
    /// Declared type matches the recorded one
    Matches,
    /// Declared type differs; the recorded type stays authoritative
    Mismatch { recorded: ContentType },
}

/// Block name -> content type fixed by the first declaration in a chain
#[derive(Debug, Default)]
pub struct BlockTypes {
    types: HashMap<String, ContentType>,
}

impl BlockTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check a declaration of `name` with type `declared`
    pub fn check(&mut self, declared: ContentType, name: &str) -> TypeCheck {
        match self.types.get(name) {
            None => {
                self.types.insert(name.to_string(), declared);
                TypeCheck::Recorded
            }
            Some(&recorded) if recorded == declared => TypeCheck::Matches,
            Some(&recorded) => TypeCheck::Mismatch { recorded },
        }
    }

    pub fn get(&self, name: &str) -> Option<ContentType> {
        self.types.get(name).copied()
    }
}
