//! View/edit/save page workflow.
//!
//! # Responsibility
//! - Turn one page request into exactly one terminal [`Reply`].
//! - Compose path validation, page storage and rendering.
//!
//! # Invariants
//! - Invalid paths produce `NotFound` before any store access.
//! - `view` of a missing page redirects to `edit` and never renders.
//! - `edit` always renders; a missing page becomes an empty-body fallback.
//! - `save` redirects to `view` only after the store reports success.
//! - Render and persist failures become `InternalError` carrying the error text.

use crate::model::page::Page;
use crate::render::template::{Renderer, EDIT_TEMPLATE, VIEW_TEMPLATE};
use crate::routing::path::{extract_title, Operation, PathError};
use crate::routing::request::PageRequest;
use crate::store::page_store::PageStore;
use log::{debug, error, info};

/// Form field carrying the page body on save.
pub const BODY_FIELD: &str = "body";

const MAX_LOGGED_PATH_CHARS: usize = 120;

/// Terminal outcome of one page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Rendered HTML document (200).
    Rendered { html: String },
    /// Redirect with `Found` status (302).
    Redirect { location: String },
    /// Standard not-found response (404).
    NotFound,
    /// Internal error (500) whose body is the failure message.
    InternalError { message: String },
}

impl Reply {
    /// HTTP status code for this reply.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Rendered { .. } => 200,
            Self::Redirect { .. } => 302,
            Self::NotFound => 404,
            Self::InternalError { .. } => 500,
        }
    }

    fn redirect(operation: Operation, title: &str) -> Self {
        Self::Redirect {
            location: operation.path_for(title),
        }
    }
}

/// Page workflow over a store and a renderer.
///
/// Holds no per-request state; one instance is shared by all requests.
pub struct PageWorkflow<S: PageStore, R: Renderer> {
    store: S,
    renderer: R,
}

impl<S: PageStore, R: Renderer> PageWorkflow<S, R> {
    /// Creates a workflow using the provided store and renderer.
    pub fn new(store: S, renderer: R) -> Self {
        Self { store, renderer }
    }

    /// Returns the backing page store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the renderer used for `view` and `edit`.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Shows a stored page, or redirects to its editor when nothing is stored.
    pub fn view(&self, request: &PageRequest) -> Reply {
        let title = match self.title_or_not_found(request) {
            Ok(title) => title,
            Err(reply) => return reply,
        };

        match self.store.load(&title) {
            Ok(page) => self.render(VIEW_TEMPLATE, &page),
            Err(err) => {
                info!(
                    "event=page_view module=workflow status=redirect title={} reason={}",
                    title, err
                );
                Reply::redirect(Operation::Edit, &title)
            }
        }
    }

    /// Shows the editor for a page, starting empty when nothing is stored.
    pub fn edit(&self, request: &PageRequest) -> Reply {
        let title = match self.title_or_not_found(request) {
            Ok(title) => title,
            Err(reply) => return reply,
        };

        let page = match self.store.load(&title) {
            Ok(page) => page,
            Err(err) => {
                debug!(
                    "event=page_edit module=workflow status=fallback title={} reason={}",
                    title, err
                );
                Page::fallback(&title)
            }
        };
        self.render(EDIT_TEMPLATE, &page)
    }

    /// Stores the submitted body and redirects to the page view.
    pub fn save(&self, request: &PageRequest) -> Reply {
        let title = match self.title_or_not_found(request) {
            Ok(title) => title,
            Err(reply) => return reply,
        };

        let body = request.form.value(BODY_FIELD);
        let page = Page::new(title, body.as_bytes());
        if let Err(err) = self.store.save(&page) {
            error!(
                "event=page_save module=workflow status=error title={} error={}",
                page.title, err
            );
            return Reply::InternalError {
                message: err.to_string(),
            };
        }

        info!(
            "event=page_save module=workflow status=ok title={} bytes={}",
            page.title,
            page.body.len()
        );
        Reply::redirect(Operation::View, &page.title)
    }

    fn title_or_not_found(&self, request: &PageRequest) -> Result<String, Reply> {
        extract_title(&request.path).map_err(|err| {
            let PathError::InvalidTitle { path } = &err;
            debug!(
                "event=path_validate module=workflow status=rejected path={} error={}",
                sanitize_for_log(path),
                err
            );
            Reply::NotFound
        })
    }

    fn render(&self, template: &str, page: &Page) -> Reply {
        match self.renderer.render(template, page) {
            Ok(html) => Reply::Rendered { html },
            Err(err) => {
                error!(
                    "event=page_render module=workflow status=error template={} title={} error={}",
                    template, page.title, err
                );
                Reply::InternalError {
                    message: err.to_string(),
                }
            }
        }
    }
}

fn sanitize_for_log(value: &str) -> String {
    crate::logging::sanitize_message(value, MAX_LOGGED_PATH_CHARS)
}
