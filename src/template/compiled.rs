//! Compiled templates and the collaborators that provide them
//!
//! Turning template source into render logic happens elsewhere. This module
//! only defines the shape of the result ([`CompiledTemplate`]) and the two
//! capabilities the engine consumes: a [`Loader`] for name resolution and a
//! [`TemplateFactory`] for instantiation. [`TemplateSet`] implements both over
//! an in-memory map.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::content_type::ContentType;
use crate::context::RenderContext;
use crate::error::RenderError;
use crate::scope::Params;

use super::registry::find_similar;

/// Render logic of a block, invoked with the caller-supplied params
pub type BlockFn = Rc<dyn Fn(&mut RenderContext<'_>, &Params) -> Result<(), RenderError>>;

/// Render logic of a template's main body
pub type BodyFn = Rc<dyn Fn(&mut RenderContext<'_>) -> Result<(), RenderError>>;

/// Computes the parent template name from the instance's params
pub type ParentFn = Rc<dyn Fn(&Params) -> Option<String>>;

/// A block declared locally by a template
#[derive(Clone)]
pub struct BlockDecl {
    pub name: String,
    pub content_type: ContentType,
    pub body: BlockFn,
}

impl fmt::Debug for BlockDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockDecl")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

/// Executable form of one template
#[derive(Clone)]
pub struct CompiledTemplate {
    content_type: ContentType,
    parent: Option<ParentFn>,
    blocks: Vec<BlockDecl>,
    body: Option<BodyFn>,
}

impl fmt::Debug for CompiledTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledTemplate")
            .field("content_type", &self.content_type)
            .field("extends", &self.parent.is_some())
            .field("blocks", &self.blocks)
            .finish_non_exhaustive()
    }
}

impl Default for CompiledTemplate {
    fn default() -> Self {
        Self::new(ContentType::default())
    }
}

impl CompiledTemplate {
    pub fn new(content_type: ContentType) -> Self {
        Self {
            content_type,
            parent: None,
            blocks: Vec::new(),
            body: None,
        }
    }

    /// Declare a fixed parent template
    pub fn extends(self, parent: impl Into<String>) -> Self {
        let parent = parent.into();
        self.extends_with(move |_| Some(parent.clone()))
    }

    /// Declare a parent template chosen from the params at render time
    pub fn extends_with<F>(mut self, parent: F) -> Self
    where
        F: Fn(&Params) -> Option<String> + 'static,
    {
        self.parent = Some(Rc::new(parent));
        self
    }

    /// Declare a block with the template's own content type
    pub fn block<F>(self, name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut RenderContext<'_>, &Params) -> Result<(), RenderError> + 'static,
    {
        let content_type = self.content_type;
        self.block_typed(name, content_type, body)
    }

    /// Declare a block whose content type differs from the template's
    pub fn block_typed<F>(
        mut self,
        name: impl Into<String>,
        content_type: ContentType,
        body: F,
    ) -> Self
    where
        F: Fn(&mut RenderContext<'_>, &Params) -> Result<(), RenderError> + 'static,
    {
        self.blocks.push(BlockDecl {
            name: name.into(),
            content_type,
            body: Rc::new(body),
        });
        self
    }

    /// Set the main body
    pub fn body<F>(mut self, body: F) -> Self
    where
        F: Fn(&mut RenderContext<'_>) -> Result<(), RenderError> + 'static,
    {
        self.body = Some(Rc::new(body));
        self
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    /// Blocks in declaration order
    pub fn blocks(&self) -> &[BlockDecl] {
        &self.blocks
    }

    pub fn parent_name(&self, params: &Params) -> Option<String> {
        self.parent.as_ref().and_then(|parent| parent(params))
    }

    pub(crate) fn body_fn(&self) -> Option<BodyFn> {
        self.body.clone()
    }
}

/// Resolves template names requested from inside another template
pub trait Loader {
    /// Resolve `requested` relative to the template named `current`
    fn resolve_relative_name(&self, requested: &str, current: &str) -> Result<String, RenderError>;
}

/// Produces compiled templates by canonical name
pub trait TemplateFactory {
    fn instantiate(&self, name: &str) -> Result<Rc<CompiledTemplate>, RenderError>;
}

/// In-memory set of compiled templates keyed by name.
///
/// Names beginning with `./` or `../` are resolved against the directory part
/// of the requesting template's name; all other names are used verbatim.
#[derive(Debug, Default, Clone)]
pub struct TemplateSet {
    templates: HashMap<String, Rc<CompiledTemplate>>,
}

impl TemplateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a template, replacing any previous one with the same name
    pub fn insert(&mut self, name: impl Into<String>, template: CompiledTemplate) {
        self.templates.insert(name.into(), Rc::new(template));
    }

    /// Builder form of [`TemplateSet::insert`]
    pub fn with(mut self, name: impl Into<String>, template: CompiledTemplate) -> Self {
        self.insert(name, template);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl Loader for TemplateSet {
    fn resolve_relative_name(&self, requested: &str, current: &str) -> Result<String, RenderError> {
        if !(requested.starts_with("./") || requested.starts_with("../")) {
            return Ok(requested.to_string());
        }

        let mut segments: Vec<&str> = current.split('/').collect();
        // Drop the file part of the current name
        segments.pop();
        for segment in requested.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                other => segments.push(other),
            }
        }
        Ok(segments.join("/"))
    }
}

impl TemplateFactory for TemplateSet {
    fn instantiate(&self, name: &str) -> Result<Rc<CompiledTemplate>, RenderError> {
        self.templates.get(name).cloned().ok_or_else(|| {
            RenderError::not_found(name, find_similar(self.names(), name, 3))
        })
    }
}
