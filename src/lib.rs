//! Template Inherit - block resolution for inheriting templates
//!
//! This library decides which template of an `extends` chain produces the
//! output, which implementation of a named block wins, and how a block calls
//! the implementation it overrides. Compiling template source is left to the
//! caller; templates are supplied as [`CompiledTemplate`]s.
//!
//! # Example
//!
//! ```rust
//! use template_inherit::{CompiledTemplate, Engine, Params, TemplateSet};
//!
//! let templates = TemplateSet::new()
//!     .with(
//!         "layout",
//!         CompiledTemplate::default()
//!             .block("title", |ctx, _| {
//!                 ctx.write("Site");
//!                 Ok(())
//!             })
//!             .body(|ctx| {
//!                 let params = ctx.params().clone();
//!                 ctx.write("<title>");
//!                 ctx.render_block("title", &params)?;
//!                 ctx.write("</title>");
//!                 Ok(())
//!             }),
//!     )
//!     .with(
//!         "page",
//!         CompiledTemplate::default()
//!             .extends("layout")
//!             .block("title", |ctx, params| {
//!                 ctx.write("Home | ");
//!                 ctx.render_block_parent("title", params)
//!             }),
//!     );
//!
//! let rendered = Engine::new(templates).render("page", Params::new()).unwrap();
//! assert_eq!(rendered.output, "<title>Home | Site</title>");
//! ```

pub mod config;
pub mod content_type;
pub mod context;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod output;
pub mod scope;
pub mod template;

pub use config::EngineConfig;
pub use content_type::ContentType;
pub use context::RenderContext;
pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use engine::{Engine, Rendered};
pub use error::{ConfigError, RenderError};
pub use scope::{Params, Scope, SharedScope, Value};
pub use template::{CompiledTemplate, Loader, ReferenceType, TemplateFactory, TemplateSet};
