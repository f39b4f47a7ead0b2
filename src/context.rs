//! API available to compiled template bodies and blocks

use std::fmt;
use std::rc::Rc;

use crate::content_type::ContentType;
use crate::engine::RenderPass;
use crate::error::RenderError;
use crate::scope::{Params, Scope, SharedScope, Value};
use crate::template::{BlockEntry, InstanceId, ReferenceType, TemplateInstance};

/// Handle through which a body or block renders.
///
/// A context is bound to one template instance. Block bodies always run bound
/// to the instance that declared them, so `params`, `local` and `name` refer
/// to the declaring template even when the block is invoked from an ancestor.
pub struct RenderContext<'a> {
    pass: &'a mut RenderPass,
    current: InstanceId,
}

impl<'a> RenderContext<'a> {
    pub(crate) fn new(pass: &'a mut RenderPass, current: InstanceId) -> Self {
        Self { pass, current }
    }

    fn instance(&self) -> &TemplateInstance {
        self.pass.arena.get(self.current)
    }

    /// Append text to the output
    pub fn write(&mut self, text: &str) {
        self.pass.output.write(text);
    }

    pub fn params(&self) -> &Params {
        self.instance().params()
    }

    pub fn param(&self, name: &str) -> Option<&Value> {
        self.instance().params().get(name)
    }

    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.pass.arena.get_mut(self.current).params
    }

    /// Replace all parameters of the current instance
    pub fn set_parameters(&mut self, params: Params) {
        self.pass.arena.get_mut(self.current).params = params;
    }

    /// Accumulators private to the current instance
    pub fn local(&self) -> &Scope {
        self.instance().local()
    }

    pub fn local_mut(&mut self) -> &mut Scope {
        &mut self.pass.arena.get_mut(self.current).local
    }

    /// Accumulators shared by every instance of the render pass
    pub fn global(&self) -> SharedScope {
        Rc::clone(self.instance().global())
    }

    pub fn name(&self) -> &str {
        self.instance().name()
    }

    pub fn content_type(&self) -> ContentType {
        self.instance().content_type()
    }

    /// Whether markup must be emitted following XML rules
    pub fn is_xhtml(&self) -> bool {
        self.content_type().is_xml()
    }

    pub fn instance_id(&self) -> InstanceId {
        self.current
    }

    pub fn reference_type(&self) -> ReferenceType {
        self.instance().reference_type()
    }

    /// Name of the instance that created this one
    pub fn referrer_name(&self) -> Option<&str> {
        let referrer = self.instance().referrer()?;
        Some(self.pass.arena.get(referrer).name())
    }

    /// This instance and its referrers up to the root, with their link types
    pub fn chain(&self) -> Vec<(String, ReferenceType)> {
        let arena = &self.pass.arena;
        arena
            .ancestors(self.current)
            .map(|id| {
                let instance = arena.get(id);
                (instance.name().to_string(), instance.reference_type())
            })
            .collect()
    }

    /// Whether a block is registered in this instance's chain
    pub fn has_block(&self, name: &str) -> bool {
        self.instance().blocks().borrow().contains(name)
    }

    /// Content type recorded for a block in this instance's chain
    pub fn block_content_type(&self, name: &str) -> Option<ContentType> {
        self.instance().blocks().borrow().content_type(name)
    }

    /// Render the most-derived implementation of block `name`
    pub fn render_block(&mut self, name: &str, params: &Params) -> Result<(), RenderError> {
        let blocks = Rc::clone(self.instance().blocks());
        let entry = blocks
            .borrow_mut()
            .first(name, self.pass.config.suggest_block_names)?;
        tracing::debug!(
            block = %name,
            owner = %self.pass.arena.get(entry.owner).name(),
            "rendering block"
        );
        self.invoke(entry, params)
    }

    /// Render the next less-derived implementation of block `name`
    pub fn render_block_parent(&mut self, name: &str, params: &Params) -> Result<(), RenderError> {
        let blocks = Rc::clone(self.instance().blocks());
        let (entry, previous) = blocks.borrow_mut().advance(name)?;
        tracing::debug!(
            block = %name,
            owner = %self.pass.arena.get(entry.owner).name(),
            "rendering parent block"
        );
        let result = self.invoke(entry, params);
        blocks.borrow_mut().rewind(name, previous);
        result
    }

    /// Render another template in place, with its own independent blocks
    pub fn include(&mut self, name: &str, params: Params) -> Result<(), RenderError> {
        let child = self
            .pass
            .create_template(self.current, name, params, ReferenceType::Include)?;
        self.pass.render_instance(child)
    }

    /// Render another template in place, merging its blocks into this chain
    pub fn include_block(&mut self, name: &str, params: Params) -> Result<(), RenderError> {
        let child = self
            .pass
            .create_template(self.current, name, params, ReferenceType::IncludeBlock)?;
        self.pass.render_instance(child)
    }

    fn invoke(&mut self, entry: BlockEntry, params: &Params) -> Result<(), RenderError> {
        let mut ctx = RenderContext::new(self.pass, entry.owner);
        (entry.body)(&mut ctx, params)
    }
}

impl fmt::Write for RenderContext<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write(s);
        Ok(())
    }
}

impl fmt::Debug for RenderContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderContext")
            .field("template", &self.name())
            .field("reference_type", &self.reference_type())
            .finish_non_exhaustive()
    }
}
