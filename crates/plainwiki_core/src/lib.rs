//! Core page store and request workflow for PlainWiki.
//! This crate owns every rule about titles, storage and the view/edit/save flow;
//! the HTTP transport only converts to and from its types.

pub mod config;
pub mod logging;
pub mod model;
pub mod render;
pub mod routing;
pub mod service;
pub mod store;

pub use config::{ConfigError, WikiConfig};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::page::{is_valid_title, Page, FALLBACK_TITLE};
pub use render::template::{RenderError, Renderer, TemplateSet, EDIT_TEMPLATE, VIEW_TEMPLATE};
pub use routing::path::{extract_title, Operation, PathError};
pub use routing::request::{is_multipart_content_type, FormValues, PageRequest};
pub use routing::router::{dispatch, route};
pub use service::page_workflow::{PageWorkflow, Reply, BODY_FIELD};
pub use store::page_store::{FilePageStore, PageStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
