//! Page domain model.
//!
//! # Responsibility
//! - Define the `title + body` record passed between store, workflow and renderer.
//! - Provide the "not found" fallback constructor used by the edit flow.
//!
//! # Invariants
//! - Routed titles are non-empty and match `[A-Za-z0-9]+`.
//! - `body` is raw bytes and is never trimmed or re-encoded.

use serde::{Deserialize, Serialize};

/// Title used by the edit fallback when the requested title is empty.
pub const FALLBACK_TITLE: &str = "noTitle";

/// Title + body content unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Page identifier; also the storage key stem.
    pub title: String,
    /// Raw page content. May be empty.
    pub body: Vec<u8>,
}

impl Page {
    /// Creates a page from a title and raw body bytes.
    pub fn new(title: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// Builds the empty-body page shown when editing a title with no stored content.
    ///
    /// An empty `title` maps to [`FALLBACK_TITLE`].
    pub fn fallback(title: &str) -> Self {
        let title = if title.is_empty() {
            FALLBACK_TITLE
        } else {
            title
        };
        Self::new(title, Vec::new())
    }

    /// Returns the body decoded as UTF-8, replacing invalid sequences.
    pub fn body_text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Returns whether `title` is a non-empty ASCII alphanumeric string.
pub fn is_valid_title(title: &str) -> bool {
    !title.is_empty() && title.bytes().all(|byte| byte.is_ascii_alphanumeric())
}
