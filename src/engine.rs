//! Render orchestration
//!
//! An [`Engine`] starts a render pass per request. The pass owns every
//! instance it creates, the output buffer and the collected diagnostics.
//! Each instance goes through the same three steps:
//!
//! 1. `initialize` registers its blocks and decides whether its body runs
//! 2. the body runs (output suspended when the template extends another)
//! 3. `try_render_parent` hands output production to the parent, if any

use std::fmt;
use std::rc::Rc;

use crate::config::EngineConfig;
use crate::content_type::TypeCheck;
use crate::context::RenderContext;
use crate::diagnostics::Diagnostic;
use crate::error::RenderError;
use crate::output::Output;
use crate::scope::{Params, Value};
use crate::template::{
    BlockEntry, InstanceArena, InstanceId, Loader, ReferenceType, TemplateFactory,
};

/// Result of a successful render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub output: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Entry point: renders templates obtained from a loader and a factory
#[derive(Clone)]
pub struct Engine {
    loader: Rc<dyn Loader>,
    factory: Rc<dyn TemplateFactory>,
    config: EngineConfig,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Create an engine from a value acting as both loader and factory
    pub fn new<T>(templates: T) -> Self
    where
        T: Loader + TemplateFactory + 'static,
    {
        let shared = Rc::new(templates);
        Self {
            loader: shared.clone(),
            factory: shared,
            config: EngineConfig::default(),
        }
    }

    /// Create an engine from separate collaborators
    pub fn with_parts(
        loader: impl Loader + 'static,
        factory: impl TemplateFactory + 'static,
    ) -> Self {
        Self {
            loader: Rc::new(loader),
            factory: Rc::new(factory),
            config: EngineConfig::default(),
        }
    }

    /// Set the engine configuration
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Render the template `name` as a complete document
    pub fn render(&self, name: &str, params: Params) -> Result<Rendered, RenderError> {
        RenderPass::new(self).run(name, params)
    }

    /// Render into a caller-provided sink, returning the diagnostics
    pub fn render_into<W: fmt::Write>(
        &self,
        name: &str,
        params: Params,
        sink: &mut W,
    ) -> Result<Vec<Diagnostic>, RenderError> {
        let rendered = self.render(name, params)?;
        sink.write_str(&rendered.output)?;
        Ok(rendered.diagnostics)
    }

    /// Render only `block` of template `name`, as resolved through its chain
    pub fn render_block(
        &self,
        name: &str,
        block: &str,
        mut params: Params,
    ) -> Result<Rendered, RenderError> {
        params.insert(
            self.config.render_block_param.clone(),
            Value::from(block),
        );
        self.render(name, params)
    }
}

/// State of one render request
pub(crate) struct RenderPass {
    pub(crate) arena: InstanceArena,
    pub(crate) output: Output,
    pub(crate) config: EngineConfig,
    diagnostics: Vec<Diagnostic>,
    loader: Rc<dyn Loader>,
    factory: Rc<dyn TemplateFactory>,
}

impl RenderPass {
    fn new(engine: &Engine) -> Self {
        Self {
            arena: InstanceArena::new(),
            output: Output::new(),
            config: engine.config.clone(),
            diagnostics: Vec::new(),
            loader: Rc::clone(&engine.loader),
            factory: Rc::clone(&engine.factory),
        }
    }

    fn run(mut self, name: &str, params: Params) -> Result<Rendered, RenderError> {
        let compiled = self.factory.instantiate(name)?;
        let root = self.arena.root(name, compiled, params);
        self.render_instance(root)?;

        Ok(Rendered {
            output: self.output.into_string(),
            diagnostics: self.diagnostics,
        })
    }

    pub(crate) fn create_template(
        &mut self,
        creator: InstanceId,
        name: &str,
        params: Params,
        reference_type: ReferenceType,
    ) -> Result<InstanceId, RenderError> {
        self.arena.create_template(
            creator,
            name,
            params,
            reference_type,
            self.loader.as_ref(),
            self.factory.as_ref(),
            self.config.max_depth,
        )
    }

    pub(crate) fn render_instance(&mut self, id: InstanceId) -> Result<(), RenderError> {
        if !self.initialize(id)? {
            return Ok(());
        }

        if let Some(body) = self.arena.get(id).compiled().body_fn() {
            let mut ctx = RenderContext::new(self, id);
            if let Err(err) = body(&mut ctx) {
                // Close the capture opened for the parent so the caller's output resumes
                if self.arena.get(id).parent_name().is_some() {
                    self.output.discard();
                }
                return Err(err);
            }
        }

        let params = self.arena.get(id).params().clone();
        self.try_render_parent(id, params)?;
        Ok(())
    }

    /// Register the instance's blocks and decide whether its body runs
    fn initialize(&mut self, id: InstanceId) -> Result<bool, RenderError> {
        let instance = self.arena.get(id);
        let compiled = Rc::clone(instance.compiled());
        let blocks = Rc::clone(instance.blocks());
        let name = instance.name().to_string();

        {
            let mut registry = blocks.borrow_mut();
            for decl in compiled.blocks() {
                registry.push(
                    &decl.name,
                    BlockEntry {
                        owner: id,
                        body: Rc::clone(&decl.body),
                    },
                );
                if let TypeCheck::Mismatch { recorded } =
                    registry.check_content_type(decl.content_type, &decl.name)
                {
                    tracing::warn!(
                        template = %name,
                        block = %decl.name,
                        %recorded,
                        declared = %decl.content_type,
                        "overridden block in an incompatible context"
                    );
                    self.diagnostics.push(Diagnostic::content_type_mismatch(
                        &name,
                        &decl.name,
                        recorded,
                        decl.content_type,
                    ));
                }
            }
        }

        if let Some(parent) = compiled.parent_name(self.arena.get(id).params()) {
            tracing::debug!(template = %name, %parent, "suspending output for parent template");
            self.output.suspend();
            self.arena.get_mut(id).parent_name = Some(parent);
            return Ok(true);
        }

        let requested = self
            .arena
            .get(id)
            .params()
            .get(&self.config.render_block_param)
            .and_then(Value::as_str)
            .map(str::to_string);

        if let Some(block) = requested {
            if self.arena.is_document_root(id) {
                tracing::debug!(template = %name, %block, "rendering single block");
                let params = self.arena.get(id).params().clone();
                RenderContext::new(self, id).render_block(&block, &params)?;
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// Render the recorded parent, replacing this instance's own output
    fn try_render_parent(&mut self, id: InstanceId, params: Params) -> Result<bool, RenderError> {
        let Some(parent) = self.arena.get(id).parent_name().map(str::to_string) else {
            return Ok(false);
        };

        let discarded = self.output.discard();
        tracing::debug!(
            template = %self.arena.get(id).name(),
            %parent,
            discarded,
            "delegating output to parent template"
        );

        let parent_id = self.create_template(id, &parent, params, ReferenceType::Extends)?;
        self.render_instance(parent_id)?;
        Ok(true)
    }
}
