//! Built-in template renderer.
//!
//! - `.md` / `.markdown`: converted to HTML with pulldown-cmark
//! - `.html` / `.htm`: passed through
//!
//! Both support `{{ name }}` placeholders filled from the page locals.
//! Values are HTML-escaped; non-string values are written as JSON.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::LazyLock;

use pulldown_cmark::{Options, Parser, html};
use regex::{Captures, Regex};
use serde_json::Value;

use super::{RenderContext, RenderError, Renderer};
use crate::utils::html::escape;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{[ \t]*([A-Za-z_][A-Za-z0-9_]*)[ \t]*\}\}").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TemplateKind {
    Markdown,
    Html,
}

impl TemplateKind {
    fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "md" | "markdown" => Some(Self::Markdown),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TemplateRenderer;

impl Renderer for TemplateRenderer {
    fn is_renderable(&self, source: &Path) -> bool {
        TemplateKind::from_path(source).is_some()
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Result<Vec<u8>, RenderError> {
        let source = ctx.source;
        let raw = match fs::read_to_string(source) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(RenderError::TemplateNotFound(format!(
                    "template not found: {}",
                    source.display()
                )));
            }
            Err(e) => {
                return Err(RenderError::Io {
                    path: source.to_path_buf(),
                    source: e,
                });
            }
        };

        let filled = substitute(&raw, ctx)?;
        let output = match TemplateKind::from_path(source) {
            Some(TemplateKind::Markdown) => markdown_to_html(&filled),
            Some(TemplateKind::Html) | None => filled,
        };
        Ok(output.into_bytes())
    }
}

/// Replace every `{{ name }}` with its local, failing on the first unknown name.
fn substitute(raw: &str, ctx: &RenderContext<'_>) -> Result<String, RenderError> {
    let locals = ctx.locals();
    let mut missing = None;

    let filled = PLACEHOLDER.replace_all(raw, |caps: &Captures<'_>| {
        let name = &caps[1];
        match locals.get(name) {
            Some(Value::String(s)) => escape(s).into_owned(),
            Some(value) => escape(&value.to_string()).into_owned(),
            None => {
                missing.get_or_insert_with(|| name.to_string());
                String::new()
            }
        }
    });

    match missing {
        Some(name) => Err(RenderError::UndefinedLocal {
            name,
            path: ctx.source.to_path_buf(),
        }),
        None => Ok(filled.into_owned()),
    }
}

fn markdown_to_html(markdown: &str) -> String {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_TABLES);
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    opts.insert(Options::ENABLE_FOOTNOTES);

    let parser = Parser::new_ext(markdown, opts);
    let mut output = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut output, parser);
    output
}
