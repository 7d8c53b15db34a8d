//! Page rendering.
//!
//! # Responsibility
//! - Define the renderer capability the workflow calls with a template name
//!   and a page.
//! - Provide the default file-backed template set.
//!
//! # Invariants
//! - Templates are parsed once at startup and are read-only afterwards.
//! - Rendering produces a complete document or an error, never partial output.

pub mod template;
