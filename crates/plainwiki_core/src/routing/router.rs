//! Prefix router for the three page operations.
//!
//! Prefixes are matched in table order; the first match wins. Anything else
//! is a not-found reply without touching the workflow.

use crate::render::template::Renderer;
use crate::routing::path::Operation;
use crate::routing::request::PageRequest;
use crate::service::page_workflow::{PageWorkflow, Reply};
use crate::store::page_store::PageStore;

/// Route table: URL prefix to workflow operation.
pub const ROUTES: &[(&str, Operation)] = &[
    ("/view/", Operation::View),
    ("/edit/", Operation::Edit),
    ("/save/", Operation::Save),
];

/// Returns the operation whose prefix starts `path`.
pub fn route(path: &str) -> Option<Operation> {
    ROUTES
        .iter()
        .find(|(prefix, _)| path.starts_with(prefix))
        .map(|(_, operation)| *operation)
}

/// Dispatches one request to its workflow entry point.
pub fn dispatch<S: PageStore, R: Renderer>(
    workflow: &PageWorkflow<S, R>,
    request: &PageRequest,
) -> Reply {
    match route(&request.path) {
        Some(Operation::View) => workflow.view(request),
        Some(Operation::Edit) => workflow.edit(request),
        Some(Operation::Save) => workflow.save(request),
        None => Reply::NotFound,
    }
}
