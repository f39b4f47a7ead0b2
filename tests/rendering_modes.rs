//! Integration tests for single-block rendering and template inclusion

use pretty_assertions::assert_eq;

use template_inherit::{
    CompiledTemplate, Engine, EngineConfig, Params, ReferenceType, RenderError, TemplateSet, Value,
};

fn site() -> TemplateSet {
    TemplateSet::new()
        .with(
            "layout",
            CompiledTemplate::default()
                .block("content", |ctx, _| {
                    ctx.write("default content");
                    Ok(())
                })
                .body(|ctx| {
                    let params = ctx.params().clone();
                    ctx.write("<html>");
                    ctx.render_block("content", &params)?;
                    ctx.write("</html>");
                    Ok(())
                }),
        )
        .with(
            "page",
            CompiledTemplate::default()
                .extends("layout")
                .block("content", |ctx, params| {
                    ctx.write("page content + ");
                    ctx.render_block_parent("content", params)
                }),
        )
}

#[test]
fn test_full_document() {
    let rendered = Engine::new(site()).render("page", Params::new()).unwrap();
    assert_eq!(rendered.output, "<html>page content + default content</html>");
}

#[test]
fn test_single_block_skips_layout_chrome() {
    let rendered = Engine::new(site())
        .render_block("page", "content", Params::new())
        .expect("Should render block");
    assert_eq!(rendered.output, "page content + default content");
}

#[test]
fn test_single_block_of_standalone_template() {
    let set = TemplateSet::new().with(
        "card",
        CompiledTemplate::default()
            .block("title", |ctx, _| {
                ctx.write("Title");
                Ok(())
            })
            .body(|ctx| {
                ctx.write("whole card");
                Ok(())
            }),
    );

    let rendered = Engine::new(set)
        .render_block("card", "title", Params::new())
        .unwrap();
    assert_eq!(rendered.output, "Title");
}

#[test]
fn test_single_block_undefined() {
    let err = Engine::new(site())
        .render_block("page", "contnet", Params::new())
        .unwrap_err();
    assert!(matches!(
        err,
        RenderError::UndefinedBlock { ref name, ref suggestion }
            if name == "contnet" && suggestion.as_deref() == Some("content")
    ));
}

#[test]
fn test_single_block_custom_param_name() {
    let engine = Engine::new(site())
        .with_config(EngineConfig::new().with_render_block_param("_snippet"));

    let rendered = engine.render_block("page", "content", Params::new()).unwrap();
    assert_eq!(rendered.output, "page content + default content");

    // The default name no longer has a special meaning
    let mut params = Params::new();
    params.insert("_renderblock".to_string(), Value::from("content"));
    let rendered = engine.render("page", params).unwrap();
    assert_eq!(rendered.output, "<html>page content + default content</html>");
}

#[test]
fn test_included_template_renders_fully_despite_block_request() {
    let set = TemplateSet::new()
        .with(
            "widget",
            CompiledTemplate::default()
                .block("x", |ctx, _| {
                    ctx.write("X");
                    Ok(())
                })
                .body(|ctx| {
                    ctx.write("widget body");
                    Ok(())
                }),
        )
        .with(
            "page",
            CompiledTemplate::default().body(|ctx| {
                let mut params = Params::new();
                params.insert("_renderblock".to_string(), Value::from("x"));
                ctx.write("[");
                ctx.include("widget", params)?;
                ctx.write("]");
                Ok(())
            }),
        );

    let rendered = Engine::new(set).render("page", Params::new()).unwrap();
    assert_eq!(rendered.output, "[widget body]");
}

#[test]
fn test_include_does_not_share_blocks() {
    let set = TemplateSet::new()
        .with(
            "partial",
            CompiledTemplate::default()
                .block("title", |ctx, _| {
                    ctx.write("partial title");
                    Ok(())
                })
                .body(|ctx| {
                    let params = ctx.params().clone();
                    ctx.render_block("title", &params)?;
                    let sees_page_block = ctx.has_block("footer");
                    ctx.write(&format!(" footer:{}", sees_page_block));
                    Ok(())
                }),
        )
        .with(
            "page",
            CompiledTemplate::default()
                .block("title", |ctx, _| {
                    ctx.write("page title");
                    Ok(())
                })
                .block("footer", |_, _| Ok(()))
                .body(|ctx| {
                    let params = ctx.params().clone();
                    ctx.include("partial", Params::new())?;
                    ctx.write(" / ");
                    ctx.render_block("title", &params)?;
                    ctx.write(&format!(" has_title:{}", ctx.has_block("title")));
                    Ok(())
                }),
        );

    let rendered = Engine::new(set).render("page", Params::new()).unwrap();
    assert_eq!(
        rendered.output,
        "partial title footer:false / page title has_title:true"
    );
}

#[test]
fn test_include_block_merges_blocks_into_chain() {
    let set = TemplateSet::new()
        .with(
            "definitions",
            CompiledTemplate::default()
                .block("badge", |ctx, _| {
                    ctx.write("<badge>");
                    Ok(())
                })
                .block("title", |ctx, _| {
                    ctx.write("shadowed");
                    Ok(())
                }),
        )
        .with(
            "page",
            CompiledTemplate::default()
                .block("title", |ctx, params| {
                    ctx.write("page>");
                    ctx.render_block_parent("title", params)
                })
                .body(|ctx| {
                    let params = ctx.params().clone();
                    ctx.include_block("definitions", Params::new())?;
                    ctx.render_block("badge", &params)?;
                    ctx.render_block("title", &params)
                }),
        );

    let rendered = Engine::new(set).render("page", Params::new()).unwrap();
    assert_eq!(rendered.output, "<badge>page>shadowed");
}

#[test]
fn test_included_template_can_extend() {
    let set = TemplateSet::new()
        .with(
            "box",
            CompiledTemplate::default().body(|ctx| {
                let params = ctx.params().clone();
                ctx.write("<box>");
                ctx.render_block("inner", &params)?;
                ctx.write("</box>");
                Ok(())
            }),
        )
        .with(
            "alert",
            CompiledTemplate::default()
                .extends("box")
                .block("inner", |ctx, _| {
                    ctx.write("alert!");
                    Ok(())
                }),
        )
        .with(
            "page",
            CompiledTemplate::default()
                .block("inner", |ctx, _| {
                    ctx.write("page inner");
                    Ok(())
                })
                .body(|ctx| {
                    ctx.write("before ");
                    ctx.include("alert", Params::new())?;
                    ctx.write(" after");
                    Ok(())
                }),
        );

    let rendered = Engine::new(set).render("page", Params::new()).unwrap();
    assert_eq!(rendered.output, "before <box>alert!</box> after");
}

#[test]
fn test_failed_extending_include_restores_output() {
    let set = TemplateSet::new()
        .with(
            "box",
            CompiledTemplate::default().body(|ctx| {
                ctx.write("<box/>");
                Ok(())
            }),
        )
        .with(
            "alert",
            CompiledTemplate::default().extends("box").body(|ctx| {
                ctx.write("partial alert");
                ctx.render_block("nope", &Params::new())
            }),
        )
        .with(
            "page",
            CompiledTemplate::default().body(|ctx| {
                ctx.write("before ");
                if ctx.include("alert", Params::new()).is_err() {
                    ctx.write("[fallback]");
                }
                ctx.write(" after");
                Ok(())
            }),
        );

    let rendered = Engine::new(set).render("page", Params::new()).unwrap();
    assert_eq!(rendered.output, "before [fallback] after");
}

#[test]
fn test_block_request_does_not_cross_include_into_extends_chain() {
    let set = TemplateSet::new()
        .with(
            "box",
            CompiledTemplate::default()
                .block("inner", |ctx, _| {
                    ctx.write("box inner");
                    Ok(())
                })
                .body(|ctx| {
                    let params = ctx.params().clone();
                    ctx.write("<box>");
                    ctx.render_block("inner", &params)?;
                    ctx.write("</box>");
                    Ok(())
                }),
        )
        .with(
            "alert",
            CompiledTemplate::default()
                .extends("box")
                .block("inner", |ctx, _| {
                    ctx.write("alert!");
                    Ok(())
                }),
        )
        .with(
            "page",
            CompiledTemplate::default().body(|ctx| {
                let mut params = Params::new();
                params.insert("_renderblock".to_string(), Value::from("inner"));
                ctx.write("before ");
                ctx.include("alert", params)?;
                ctx.write(" after");
                Ok(())
            }),
        );

    // The top of the included chain renders as a whole document
    let rendered = Engine::new(set).render("page", Params::new()).unwrap();
    assert_eq!(rendered.output, "before <box>alert!</box> after");
}

#[test]
fn test_chain_introspection() {
    let set = TemplateSet::new()
        .with(
            "partial",
            CompiledTemplate::default().body(|ctx| {
                let chain: Vec<String> = ctx
                    .chain()
                    .into_iter()
                    .map(|(name, kind)| format!("{}({})", name, kind))
                    .collect();
                let referrer = ctx.referrer_name().unwrap_or("-").to_string();
                ctx.write(&format!("{} via {}", chain.join(" < "), referrer));
                Ok(())
            }),
        )
        .with(
            "layout",
            CompiledTemplate::default().body(|ctx| ctx.include("partial", Params::new())),
        )
        .with("page", CompiledTemplate::default().extends("layout"));

    let rendered = Engine::new(set).render("page", Params::new()).unwrap();
    assert_eq!(
        rendered.output,
        "partial(include) < layout(extends) < page(root) via layout"
    );
}

#[test]
fn test_reference_type_of_root() {
    let set = TemplateSet::new().with(
        "page",
        CompiledTemplate::default().body(|ctx| {
            assert_eq!(ctx.reference_type(), ReferenceType::Root);
            assert_eq!(ctx.referrer_name(), None);
            Ok(())
        }),
    );
    Engine::new(set).render("page", Params::new()).unwrap();
}

#[test]
fn test_recursive_include_hits_depth_limit() {
    let set = TemplateSet::new().with(
        "loop",
        CompiledTemplate::default().body(|ctx| ctx.include("loop", Params::new())),
    );

    let err = Engine::new(set)
        .with_config(EngineConfig::new().with_max_depth(5))
        .render("loop", Params::new())
        .unwrap_err();
    assert!(matches!(err, RenderError::DepthExceeded { depth: 6, .. }));
}

#[test]
fn test_bounded_recursive_include() {
    let set = TemplateSet::new().with(
        "countdown",
        CompiledTemplate::default().body(|ctx| {
            let n = ctx.param("n").and_then(Value::as_i64).unwrap_or(0);
            ctx.write(&n.to_string());
            if n > 0 {
                let mut params = Params::new();
                params.insert("n".to_string(), Value::from(n - 1));
                ctx.include("countdown", params)?;
            }
            Ok(())
        }),
    );

    let mut params = Params::new();
    params.insert("n".to_string(), Value::from(3));
    let rendered = Engine::new(set).render("countdown", params).unwrap();
    assert_eq!(rendered.output, "3210");
}
