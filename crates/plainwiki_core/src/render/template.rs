//! Renderer contract and the default `{{placeholder}}` template set.
//!
//! # Responsibility
//! - Load `view.html` and `edit.html` from one directory.
//! - Substitute `{{title}}` and `{{body}}` with HTML-escaped page values.
//!
//! # Invariants
//! - Unknown placeholders and unterminated `{{` are rejected at load time.
//! - Every substituted value is escaped; template literals are emitted as-is.

use crate::model::page::Page;
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};

/// Template used to display a stored page.
pub const VIEW_TEMPLATE: &str = "view";
/// Template used to edit a page.
pub const EDIT_TEMPLATE: &str = "edit";

const TEMPLATE_FILE_EXTENSION: &str = "html";
const REQUIRED_TEMPLATES: &[&str] = &[EDIT_TEMPLATE, VIEW_TEMPLATE];

static PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\s*([^{}]*?)\s*\}\}").expect("valid template placeholder regex")
});

/// Rendering failure.
#[derive(Debug)]
pub enum RenderError {
    /// No template registered under this name.
    UnknownTemplate(String),
    /// Template file could not be read.
    Io { path: PathBuf, source: io::Error },
    /// Template source is not valid template syntax.
    Malformed { template: String, reason: String },
}

impl Display for RenderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownTemplate(name) => write!(f, "template `{name}` is not defined"),
            Self::Io { path, source } => {
                write!(f, "failed to read template `{}`: {source}", path.display())
            }
            Self::Malformed { template, reason } => {
                write!(f, "template `{template}` is malformed: {reason}")
            }
        }
    }
}

impl Error for RenderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::UnknownTemplate(_) | Self::Malformed { .. } => None,
        }
    }
}

/// Turns a named template plus a page into a response document.
pub trait Renderer {
    fn render(&self, template: &str, page: &Page) -> Result<String, RenderError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Title,
    Body,
}

/// One parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Parses template source.
    ///
    /// # Errors
    /// - Returns [`RenderError::Malformed`] for unknown placeholder names or an
    ///   unterminated `{{`.
    pub fn parse(name: &str, source: &str) -> Result<Self, RenderError> {
        let mut segments = Vec::new();
        let mut cursor = 0;

        for captures in PLACEHOLDER_RE.captures_iter(source) {
            let (Some(whole), Some(key)) = (captures.get(0), captures.get(1)) else {
                continue;
            };
            push_literal(name, &mut segments, &source[cursor..whole.start()])?;
            segments.push(match key.as_str() {
                "title" => Segment::Title,
                "body" => Segment::Body,
                other => {
                    return Err(RenderError::Malformed {
                        template: name.to_string(),
                        reason: format!("unknown placeholder `{other}`"),
                    });
                }
            });
            cursor = whole.end();
        }
        push_literal(name, &mut segments, &source[cursor..])?;

        Ok(Self { segments })
    }

    /// Renders this template for `page`.
    pub fn render(&self, page: &Page) -> String {
        let body = page.body_text();
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Title => push_escaped(&mut out, &page.title),
                Segment::Body => push_escaped(&mut out, &body),
            }
        }
        out
    }
}

fn push_literal(name: &str, segments: &mut Vec<Segment>, text: &str) -> Result<(), RenderError> {
    if text.contains("{{") {
        return Err(RenderError::Malformed {
            template: name.to_string(),
            reason: "unterminated `{{`".to_string(),
        });
    }
    if !text.is_empty() {
        segments.push(Segment::Literal(text.to_string()));
    }
    Ok(())
}

/// Immutable set of named templates.
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    templates: HashMap<String, Template>,
}

impl TemplateSet {
    /// Loads and parses `edit.html` and `view.html` from `dir`.
    ///
    /// # Errors
    /// - Returns [`RenderError::Io`] when a template file is missing or unreadable.
    /// - Returns [`RenderError::Malformed`] when a template fails to parse.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, RenderError> {
        let dir = dir.as_ref();
        let mut sources = Vec::with_capacity(REQUIRED_TEMPLATES.len());
        for name in REQUIRED_TEMPLATES {
            let path = dir.join(format!("{name}.{TEMPLATE_FILE_EXTENSION}"));
            let source = std::fs::read_to_string(&path)
                .map_err(|source| RenderError::Io { path, source })?;
            sources.push((name.to_string(), source));
        }

        let set = Self::from_sources(sources)?;
        info!(
            "event=templates_load module=render status=ok dir={} count={}",
            dir.display(),
            set.templates.len()
        );
        Ok(set)
    }

    /// Builds a set from in-memory `(name, source)` pairs.
    pub fn from_sources<I, N, S>(sources: I) -> Result<Self, RenderError>
    where
        I: IntoIterator<Item = (N, S)>,
        N: Into<String>,
        S: AsRef<str>,
    {
        let mut templates = HashMap::new();
        for (name, source) in sources {
            let name = name.into();
            let template = Template::parse(&name, source.as_ref())?;
            templates.insert(name, template);
        }
        Ok(Self { templates })
    }

    /// Returns whether a template with `name` is loaded.
    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }
}

impl Renderer for TemplateSet {
    fn render(&self, template: &str, page: &Page) -> Result<String, RenderError> {
        self.templates
            .get(template)
            .map(|parsed| parsed.render(page))
            .ok_or_else(|| RenderError::UnknownTemplate(template.to_string()))
    }
}

fn push_escaped(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
}
