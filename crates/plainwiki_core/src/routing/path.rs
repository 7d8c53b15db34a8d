//! Page path grammar.
//!
//! # Responsibility
//! - Accept `/<operation>/<title>` where `operation` is `view|edit|save` and
//!   `title` is one or more ASCII alphanumerics with nothing trailing.
//! - Hand only the title back to callers.
//!
//! # Invariants
//! - The grammar is a fixed, hand-written parser; it is built once at compile
//!   time and never mutated.
//! - Rejection carries the offending path so callers can log it.

use crate::model::page::is_valid_title;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Workflow operation named by the first path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    View,
    Edit,
    Save,
}

impl Operation {
    /// Path segment literal for this operation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Edit => "edit",
            Self::Save => "save",
        }
    }

    /// Parses one operation literal. Matching is case-sensitive.
    pub fn parse(segment: &str) -> Option<Self> {
        match segment {
            "view" => Some(Self::View),
            "edit" => Some(Self::Edit),
            "save" => Some(Self::Save),
            _ => None,
        }
    }

    /// Builds the canonical path for `title` under this operation.
    pub fn path_for(self, title: &str) -> String {
        format!("/{}/{title}", self.as_str())
    }
}

/// Path validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// Path does not match the page grammar.
    InvalidTitle { path: String },
}

impl Display for PathError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTitle { .. } => write!(f, "Invalid Page Title"),
        }
    }
}

impl Error for PathError {}

/// Extracts the page title from a request path.
///
/// The operation segment must be one of the three known literals, but which
/// one it is does not affect the result; dispatch is decided by prefix
/// elsewhere.
///
/// # Errors
/// - Returns [`PathError::InvalidTitle`] when the path does not match.
pub fn extract_title(path: &str) -> Result<String, PathError> {
    parse_page_path(path)
        .map(|(_, title)| title.to_string())
        .ok_or_else(|| PathError::InvalidTitle {
            path: path.to_string(),
        })
}

fn parse_page_path(path: &str) -> Option<(Operation, &str)> {
    let rest = path.strip_prefix('/')?;
    let (segment, title) = rest.split_once('/')?;
    let operation = Operation::parse(segment)?;
    if !is_valid_title(title) {
        return None;
    }
    Some((operation, title))
}

#[cfg(test)]
mod tests {
    use super::{extract_title, Operation, PathError};

    #[test]
    fn extracts_title_for_every_operation_literal() {
        assert_eq!(extract_title("/view/FrontPage").unwrap(), "FrontPage");
        assert_eq!(extract_title("/edit/FrontPage").unwrap(), "FrontPage");
        assert_eq!(extract_title("/save/FrontPage").unwrap(), "FrontPage");
    }

    #[test]
    fn accepts_digits_and_mixed_case() {
        assert_eq!(extract_title("/view/Page42").unwrap(), "Page42");
        assert_eq!(extract_title("/edit/2024").unwrap(), "2024");
    }

    #[test]
    fn rejects_paths_outside_the_grammar() {
        let rejected = [
            "",
            "/",
            "/view",
            "/view/",
            "/view/a/b",
            "/view/a b",
            "/view/a.txt",
            "/view/../secret",
            "/view/Page/",
            "view/Page",
            "//view/Page",
            "/View/Page",
            "/delete/Page",
            "/viewPage",
            "/edit/Page?x=1",
        ];
        for path in rejected {
            let err = extract_title(path).expect_err("path should be rejected");
            assert_eq!(
                err,
                PathError::InvalidTitle {
                    path: path.to_string()
                }
            );
        }
    }

    #[test]
    fn invalid_title_message_is_stable() {
        let err = extract_title("/nope").unwrap_err();
        assert_eq!(err.to_string(), "Invalid Page Title");
    }

    #[test]
    fn operation_builds_canonical_paths() {
        assert_eq!(Operation::Edit.path_for("Test"), "/edit/Test");
        assert_eq!(Operation::View.path_for("Test"), "/view/Test");
        assert_eq!(Operation::parse("save"), Some(Operation::Save));
        assert_eq!(Operation::parse("SAVE"), None);
    }
}
