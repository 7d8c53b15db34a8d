//! HTTP transport for the PlainWiki page workflow.
//!
//! # Responsibility
//! - Parse startup arguments into a validated `WikiConfig`.
//! - Convert HTTP requests into `PageRequest`s and `Reply`s back into responses.
//!
//! # Invariants
//! - Templates, store and workflow are built once before the listener binds.
//! - Every request completes with exactly one response.

pub mod cli;
pub mod http;

pub use cli::Cli;
pub use http::{build_router, build_workflow, run, serve, SharedWorkflow, WikiWorkflow};
