//! Request use-case services.
//!
//! # Responsibility
//! - Orchestrate path validation, storage and rendering per operation.
//! - Keep the HTTP transport decoupled from storage details.

pub mod page_workflow;
