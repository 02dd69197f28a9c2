use thiserror::Error;

use crate::vars::DateMathError;

use super::expr;
use super::scope::RenderScope;

const OPEN: &str = "<%";
const CLOSE: &str = "%>";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateRenderError {
    #[error("line {line}: undefined variable `{name}`")]
    UndefinedVariable { name: String, line: usize },

    #[error("line {line}: unterminated tag (missing `%>`)")]
    UnterminatedTag { line: usize },

    #[error("line {line}: evaluation tags are not supported, use `<%= ... %>`")]
    UnsupportedTag { line: usize },

    #[error("line {line}: malformed expression `{expr}`: {reason}")]
    Syntax { expr: String, reason: String, line: usize },

    #[error("line {line}: `{name}` is not a function")]
    NotAFunction { name: String, line: usize },

    #[error("line {line}: `{name}` is a function, call it as `{name}(...)`")]
    FunctionAsValue { name: String, line: usize },

    #[error("line {line}: `{name}` expects {expected} argument(s), got {got}")]
    Arity { name: String, expected: &'static str, got: usize, line: usize },

    #[error("line {line}: {source}")]
    Date {
        #[source]
        source: DateMathError,
        line: usize,
    },
}

impl TemplateRenderError {
    pub fn line(&self) -> usize {
        match self {
            Self::UndefinedVariable { line, .. }
            | Self::UnterminatedTag { line }
            | Self::UnsupportedTag { line }
            | Self::Syntax { line, .. }
            | Self::NotAFunction { line, .. }
            | Self::FunctionAsValue { line, .. }
            | Self::Arity { line, .. }
            | Self::Date { line, .. } => *line,
        }
    }
}

/// Whitespace control marker next to a tag delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trim {
    /// `-`: one newline
    Newline,
    /// `_`: all whitespace
    Whitespace,
}

impl Trim {
    fn from_marker(c: char) -> Option<Self> {
        match c {
            '-' => Some(Self::Newline),
            '_' => Some(Self::Whitespace),
            _ => None,
        }
    }
}

struct Tag<'a> {
    expr: &'a str,
    trim_left: Option<Trim>,
    trim_right: Option<Trim>,
}

impl<'a> Tag<'a> {
    /// Split the text between `<%` and `%>` into markers and expression.
    fn parse(inner: &'a str, line: usize) -> Result<Self, TemplateRenderError> {
        let mut body = inner;

        let trim_left = body.chars().next().and_then(Trim::from_marker);
        if trim_left.is_some() {
            body = &body[1..];
        }

        body = match body.strip_prefix('=').or_else(|| body.strip_prefix('~')) {
            Some(rest) => rest,
            None => return Err(TemplateRenderError::UnsupportedTag { line }),
        };

        let trim_right = body.chars().last().and_then(Trim::from_marker);
        if trim_right.is_some() {
            body = &body[..body.len() - 1];
        }

        Ok(Self { expr: body, trim_left, trim_right })
    }
}

/// Render a template against `scope`.
///
/// Supports:
/// - Output tags: `<%= title %>`, `<%~ it.title %>`
/// - Date helper: `<%= format("%Y-%m-%d") %>`, `<%= format("%A", "+1d") %>`
/// - Fallbacks for optional variables: `<%= project ?? "inbox" %>`
/// - Whitespace control: `<%-= x -%>` trims one newline, `_` trims all whitespace
///
/// Text outside tags is copied verbatim; a `%>` inside a quoted string does
/// not close its tag. Any error aborts the whole render.
pub fn render(template: &str, scope: &RenderScope) -> Result<String, TemplateRenderError> {
    let mut out = String::with_capacity(template.len());
    let mut pos = 0;
    let mut pending: Option<Trim> = None;

    while let Some(rel) = template[pos..].find(OPEN) {
        let open = pos + rel;
        let line = line_at(template, open);

        let start = open + OPEN.len();
        let close = find_close(&template[start..])
            .map(|r| start + r)
            .ok_or(TemplateRenderError::UnterminatedTag { line })?;

        let tag = Tag::parse(&template[start..close], line)?;
        let value = expr::evaluate(&expr::parse(tag.expr, line)?, scope, line)?;

        let text = trim_start(&template[pos..open], pending.take());
        out.push_str(trim_end(text, tag.trim_left));
        out.push_str(&value);

        pending = tag.trim_right;
        pos = close + CLOSE.len();
    }

    out.push_str(trim_start(&template[pos..], pending));
    Ok(out)
}

/// Offset of the first `%>` that is not inside a string literal.
fn find_close(inner: &str) -> Option<usize> {
    let mut quote = None;
    let mut escaped = false;
    for (i, c) in inner.char_indices() {
        match quote {
            Some(_) if escaped => escaped = false,
            Some(_) if c == '\\' => escaped = true,
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if matches!(c, '"' | '\'' | '`') => quote = Some(c),
            None if inner[i..].starts_with(CLOSE) => return Some(i),
            None => {}
        }
    }
    None
}

fn line_at(text: &str, offset: usize) -> usize {
    text[..offset].matches('\n').count() + 1
}

fn trim_start(text: &str, trim: Option<Trim>) -> &str {
    match trim {
        None => text,
        Some(Trim::Whitespace) => text.trim_start(),
        Some(Trim::Newline) => text
            .strip_prefix("\r\n")
            .or_else(|| text.strip_prefix('\n'))
            .unwrap_or(text),
    }
}

fn trim_end(text: &str, trim: Option<Trim>) -> &str {
    match trim {
        None => text,
        Some(Trim::Whitespace) => text.trim_end(),
        Some(Trim::Newline) => text
            .strip_suffix("\r\n")
            .or_else(|| text.strip_suffix('\n'))
            .unwrap_or(text),
    }
}
