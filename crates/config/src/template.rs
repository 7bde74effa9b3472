//! Template expansion for configuration files.
//!
//! The whole file is rendered once with Handlebars before it is parsed as
//! YAML, so expressions can produce values or entire YAML fragments.
//!
//! Rendering is strict: referencing a variable that is not in the context is
//! an error. Output is never HTML-escaped.
//!
//! Context:
//! - `environment`: the active environment scope, or null.
//!
//! Helpers:
//! - `{{upcase "text"}}` / `{{downcase "text"}}`
//! - `{{env "NAME"}}` reads the process environment; fails when unset.
//! - `{{env "NAME" "fallback"}}` uses the fallback when unset.
//! - `{{default value "fallback"}}` uses the fallback when `value` is null or empty.

use handlebars::{
    Context, Handlebars, Helper, HelperResult, Output, RenderContext, RenderError,
    RenderErrorReason,
};
use serde_json::{Value, json};

/// Expands templates in configuration text.
pub struct TemplateEngine {
    handlebars: Handlebars<'static>,
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateEngine {
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        handlebars.register_escape_fn(handlebars::no_escape);

        handlebars.register_helper("upcase", Box::new(upcase_helper));
        handlebars.register_helper("downcase", Box::new(downcase_helper));
        handlebars.register_helper("env", Box::new(env_helper));
        handlebars.register_helper("default", Box::new(default_helper));

        Self { handlebars }
    }

    /// Renders `text` with the given environment scope in context.
    pub fn expand(&self, text: &str, environment: Option<&str>) -> Result<String, RenderError> {
        // Skip the renderer for plain files; they are the common case.
        if !text.contains("{{") {
            return Ok(text.to_string());
        }
        let data = json!({ "environment": environment });
        self.handlebars.render_template(text, &data)
    }
}

/// Expands `text` with a default engine.
pub fn expand(text: &str, environment: Option<&str>) -> Result<String, RenderError> {
    TemplateEngine::new().expand(text, environment)
}

fn string_param<'a>(h: &'a Helper, index: usize) -> Result<&'a str, RenderError> {
    let param = h
        .param(index)
        .ok_or(RenderErrorReason::ParamNotFoundForIndex("helper", index))?;
    param.value().as_str().ok_or_else(|| {
        RenderErrorReason::InvalidParamType("a string parameter").into()
    })
}

fn upcase_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let text = string_param(h, 0)?;
    out.write(&text.to_uppercase())?;
    Ok(())
}

fn downcase_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let text = string_param(h, 0)?;
    out.write(&text.to_lowercase())?;
    Ok(())
}

fn env_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let name = string_param(h, 0)?;
    let value = match std::env::var(name) {
        Ok(value) => value,
        Err(_) => match h.param(1) {
            Some(fallback) => scalar_text(fallback.value()),
            None => {
                return Err(RenderErrorReason::Other(format!(
                    "environment variable {name} is not set"
                ))
                .into());
            }
        },
    };
    out.write(&value)?;
    Ok(())
}

fn default_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let value = h
        .param(0)
        .map(|p| p.value().clone())
        .unwrap_or(Value::Null);
    let chosen = match &value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        other => Some(scalar_text(other)),
    };
    let text = match chosen {
        Some(text) => text,
        None => h.param(1).map(|p| scalar_text(p.value())).unwrap_or_default(),
    };
    out.write(&text)?;
    Ok(())
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
