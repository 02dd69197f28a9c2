//! Rewrite of the first `#` line of a rendered note.
//!
//! This is a line match, not a Markdown parse: the first line starting with
//! `#` is the heading, wherever it is (including inside a code fence).

use std::sync::LazyLock;

use regex::{NoExpand, Regex};

// Stops before `\r` so CRLF line endings survive the rewrite.
static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#[^\r\n]*").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingAction<'a> {
    /// Replace the first heading line with `# <title>`.
    Replace(&'a str),
    /// Blank out the first heading line, keeping its newline.
    Remove,
    Keep,
}

impl<'a> HeadingAction<'a> {
    /// A supplied title always wins over `remove_title`.
    pub fn from_options(title: Option<&'a str>, remove_title: bool) -> Self {
        match title {
            Some(t) => Self::Replace(t),
            None if remove_title => Self::Remove,
            None => Self::Keep,
        }
    }
}

pub fn rewrite_heading(text: &str, action: HeadingAction<'_>) -> String {
    match action {
        HeadingAction::Replace(title) => {
            HEADING_RE.replace(text, NoExpand(&format!("# {title}"))).into_owned()
        }
        HeadingAction::Remove => HEADING_RE.replace(text, "").into_owned(),
        HeadingAction::Keep => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_options() {
        assert_eq!(HeadingAction::from_options(Some("T"), true), HeadingAction::Replace("T"));
        assert_eq!(HeadingAction::from_options(Some("T"), false), HeadingAction::Replace("T"));
        assert_eq!(HeadingAction::from_options(None, true), HeadingAction::Remove);
        assert_eq!(HeadingAction::from_options(None, false), HeadingAction::Keep);
    }

    #[test]
    fn test_title_with_dollar_is_literal() {
        let out = rewrite_heading("# Old\n", HeadingAction::Replace("Cost $1"));
        assert_eq!(out, "# Cost $1\n");
    }

    #[test]
    fn test_crlf_line_ending_is_kept() {
        let out = rewrite_heading("# Old\r\nbody", HeadingAction::Remove);
        assert_eq!(out, "\r\nbody");
    }
}
