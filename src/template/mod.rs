//! Template instances, block registry and compiled template collaborators
//!
//! This module holds the state behind template inheritance:
//!
//! - [`CompiledTemplate`] describes what a template declares (blocks, parent,
//!   body) as produced by an external compiler
//! - [`InstanceArena`] tracks every instance of a render pass and how each one
//!   was created (`root`, `extends`, `include`, `includeblock`)
//! - [`BlockRegistry`] is shared along an inheritance chain and resolves a
//!   block name to its most-derived implementation
//!
//! # Example
//!
//! ```text
//! layout:  body = "<title>" + block(title) + "</title>"
//!          block title = "Site"
//! page:    extends layout
//!          block title = "Home | " + parent()
//!
//! render(page) == "<title>Home | Site</title>"
//! ```

mod compiled;
mod registry;
mod resolver;

pub use compiled::{
    BlockDecl, BlockFn, BodyFn, CompiledTemplate, Loader, ParentFn, TemplateFactory, TemplateSet,
};
pub use registry::{BlockEntry, BlockRegistry, BlockStack, SharedBlocks};
pub use resolver::{Ancestors, InstanceArena, InstanceId, ReferenceType, TemplateInstance};
