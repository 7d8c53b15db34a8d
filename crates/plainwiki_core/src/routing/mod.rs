//! Request path parsing and operation dispatch.
//!
//! # Responsibility
//! - Validate request paths and extract the page title.
//! - Map URL prefixes to workflow operations.
//!
//! # Invariants
//! - Paths that fail validation never reach the page store.

pub mod path;
pub mod request;
pub mod router;
