//! Template instances of a render pass and the references between them

use std::fmt;
use std::rc::Rc;

use crate::content_type::ContentType;
use crate::error::RenderError;
use crate::scope::{Params, Scope, SharedScope};

use super::compiled::{CompiledTemplate, Loader, TemplateFactory};
use super::registry::{BlockRegistry, SharedBlocks};

/// Index of an instance in its render pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(pub usize);

/// How an instance was created from its referrer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceType {
    /// The originally requested template
    Root,
    /// Parent of the referrer in an inheritance chain
    Extends,
    /// Included with its own, independent blocks
    Include,
    /// Included with blocks shared with the referrer's chain
    IncludeBlock,
}

impl ReferenceType {
    /// Whether the created instance aliases the creator's block registry
    pub fn shares_blocks(self) -> bool {
        matches!(self, ReferenceType::Extends | ReferenceType::IncludeBlock)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReferenceType::Root => "root",
            ReferenceType::Extends => "extends",
            ReferenceType::Include => "include",
            ReferenceType::IncludeBlock => "includeblock",
        }
    }
}

impl fmt::Display for ReferenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One template body evaluated during a render pass
#[derive(Debug)]
pub struct TemplateInstance {
    name: String,
    compiled: Rc<CompiledTemplate>,
    pub(crate) params: Params,
    pub(crate) local: Scope,
    global: SharedScope,
    blocks: SharedBlocks,
    referrer: Option<InstanceId>,
    reference_type: ReferenceType,
    pub(crate) parent_name: Option<String>,
    depth: usize,
}

impl TemplateInstance {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn compiled(&self) -> &Rc<CompiledTemplate> {
        &self.compiled
    }

    pub fn content_type(&self) -> ContentType {
        self.compiled.content_type()
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn local(&self) -> &Scope {
        &self.local
    }

    pub fn global(&self) -> &SharedScope {
        &self.global
    }

    pub fn blocks(&self) -> &SharedBlocks {
        &self.blocks
    }

    pub fn referrer(&self) -> Option<InstanceId> {
        self.referrer
    }

    pub fn reference_type(&self) -> ReferenceType {
        self.reference_type
    }

    pub fn parent_name(&self) -> Option<&str> {
        self.parent_name.as_deref()
    }

    /// Number of creation links between this instance and the root
    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// Owns every instance created during one render pass.
///
/// Referrer links are plain indices into the arena, so walking up a chain
/// never involves ownership.
#[derive(Debug, Default)]
pub struct InstanceArena {
    instances: Vec<TemplateInstance>,
}

impl InstanceArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the originally requested template with a fresh registry and global scope
    pub fn root(
        &mut self,
        name: impl Into<String>,
        compiled: Rc<CompiledTemplate>,
        params: Params,
    ) -> InstanceId {
        self.push(TemplateInstance {
            name: name.into(),
            compiled,
            params,
            local: Scope::new(),
            global: Scope::shared(),
            blocks: BlockRegistry::shared(),
            referrer: None,
            reference_type: ReferenceType::Root,
            parent_name: None,
            depth: 0,
        })
    }

    /// Create a template referenced from `creator`.
    ///
    /// The name is resolved relative to the creator's name. The new instance
    /// shares the creator's global scope, and shares its block registry only
    /// for `extends` and `includeblock` references.
    #[allow(clippy::too_many_arguments)]
    pub fn create_template(
        &mut self,
        creator: InstanceId,
        name: &str,
        params: Params,
        reference_type: ReferenceType,
        loader: &dyn Loader,
        factory: &dyn TemplateFactory,
        max_depth: usize,
    ) -> Result<InstanceId, RenderError> {
        let (canonical, global, blocks, depth) = {
            let current = self.get(creator);
            let canonical = loader.resolve_relative_name(name, current.name())?;
            let blocks = if reference_type.shares_blocks() {
                Rc::clone(current.blocks())
            } else {
                BlockRegistry::shared()
            };
            (
                canonical,
                Rc::clone(current.global()),
                blocks,
                current.depth() + 1,
            )
        };

        if depth > max_depth {
            return Err(RenderError::DepthExceeded {
                name: canonical,
                depth,
            });
        }

        if reference_type == ReferenceType::Extends {
            let mut chain = self.extends_chain(creator);
            if chain.contains(&canonical) {
                chain.push(canonical);
                return Err(RenderError::CircularExtends { chain });
            }
        }

        let compiled = factory.instantiate(&canonical)?;
        tracing::debug!(
            template = %canonical,
            referrer = %self.get(creator).name(),
            reference = %reference_type,
            "creating template instance"
        );

        Ok(self.push(TemplateInstance {
            name: canonical,
            compiled,
            params,
            local: Scope::new(),
            global,
            blocks,
            referrer: Some(creator),
            reference_type,
            parent_name: None,
            depth,
        }))
    }

    pub fn get(&self, id: InstanceId) -> &TemplateInstance {
        &self.instances[id.0]
    }

    pub fn get_mut(&mut self, id: InstanceId) -> &mut TemplateInstance {
        &mut self.instances[id.0]
    }

    /// The instance itself followed by each referrer up to the root
    pub fn ancestors(&self, id: InstanceId) -> Ancestors<'_> {
        Ancestors {
            arena: self,
            next: Some(id),
        }
    }

    /// Whether the links from `id` up to the root are all `extends`.
    ///
    /// True for the top of the requested document's inheritance chain; false
    /// for anything reached across an `include` or `includeblock` boundary.
    pub fn is_document_root(&self, id: InstanceId) -> bool {
        self.ancestors(id)
            .map(|a| self.get(a).reference_type())
            .take_while(|t| *t != ReferenceType::Root)
            .all(|t| t == ReferenceType::Extends)
    }

    /// Names along the `extends` links ending at `id`, most-derived first
    fn extends_chain(&self, id: InstanceId) -> Vec<String> {
        let mut chain = Vec::new();
        for ancestor in self.ancestors(id) {
            let instance = self.get(ancestor);
            chain.push(instance.name().to_string());
            if instance.reference_type() != ReferenceType::Extends {
                break;
            }
        }
        chain.reverse();
        chain
    }

    fn push(&mut self, instance: TemplateInstance) -> InstanceId {
        self.instances.push(instance);
        InstanceId(self.instances.len() - 1)
    }
}

/// Iterator over an instance and its referrers
pub struct Ancestors<'a> {
    arena: &'a InstanceArena,
    next: Option<InstanceId>,
}

impl Iterator for Ancestors<'_> {
    type Item = InstanceId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.arena.get(current).referrer();
        Some(current)
    }
}
