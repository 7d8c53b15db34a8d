//! axum transport glue.
//!
//! One fallback handler receives every request; routing by prefix happens in
//! `plainwiki_core::routing::router` so the transport stays free of page rules.

use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::{header, HeaderValue, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use log::{error, info};
use plainwiki_core::{
    dispatch, init_logging, is_multipart_content_type, FilePageStore, PageRequest, PageWorkflow, Reply, TemplateSet,
    WikiConfig,
};
use std::io;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Workflow wired to the file store and file templates.
pub type WikiWorkflow = PageWorkflow<FilePageStore, TemplateSet>;
/// Read-only workflow handle shared by all requests.
pub type SharedWorkflow = Arc<WikiWorkflow>;

const NOT_FOUND_BODY: &str = "404 page not found\n";
const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";
const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Loads templates and opens the page store described by `config`.
///
/// # Errors
/// - Returns a message when templates are missing/malformed or the data
///   directory cannot be opened.
pub fn build_workflow(config: &WikiConfig) -> Result<WikiWorkflow, String> {
    let templates = TemplateSet::load_dir(&config.template_dir)
        .map_err(|err| format!("failed to load templates: {err}"))?;
    let store = FilePageStore::open(&config.data_dir).map_err(|err| {
        format!(
            "failed to open page store `{}`: {err}",
            config.data_dir.display()
        )
    })?;
    Ok(PageWorkflow::new(store, templates))
}

/// Builds the axum router serving every path through the page router.
pub fn build_router(workflow: SharedWorkflow) -> Router {
    Router::new().fallback(handle_request).with_state(workflow)
}

/// Serves `workflow` on an already-bound listener until ctrl-c.
pub async fn serve(listener: TcpListener, workflow: SharedWorkflow) -> io::Result<()> {
    axum::serve(listener, build_router(workflow))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

/// Validates config, initializes logging, builds the workflow and serves.
pub async fn run(config: WikiConfig) -> Result<(), String> {
    let addr = config.validate().map_err(|err| err.to_string())?;

    let log_dir = match &config.log_dir {
        Some(dir) => Some(
            dir.to_str()
                .ok_or_else(|| format!("log_dir `{}` is not valid UTF-8", dir.display()))?,
        ),
        None => None,
    };
    init_logging(&config.log_level, log_dir)?;

    let workflow = Arc::new(build_workflow(&config)?);
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|err| format!("failed to bind `{addr}`: {err}"))?;
    info!(
        "event=server_start module=http status=ok addr={} data_dir={}",
        addr,
        config.data_dir.display()
    );

    serve(listener, workflow)
        .await
        .map_err(|err| format!("server error: {err}"))?;

    info!("event=server_stop module=http status=ok");
    Ok(())
}

async fn handle_request(State(workflow): State<SharedWorkflow>, request: Request) -> Response {
    let method = request.method().clone();
    let request = match read_page_request(request).await {
        Ok(request) => request,
        Err(response) => {
            info!(
                "event=request module=http method={} status={} reason=unreadable_body",
                method,
                response.status().as_u16()
            );
            return response;
        }
    };

    let reply = match tokio::task::spawn_blocking(move || dispatch(&*workflow, &request)).await {
        Ok(reply) => reply,
        Err(err) => {
            error!(
                "event=request_dispatch module=http status=error method={} error={}",
                method, err
            );
            Reply::InternalError {
                message: err.to_string(),
            }
        }
    };

    info!(
        "event=request module=http method={} status={}",
        method,
        reply.status_code()
    );
    into_response(reply)
}

/// Reads path, query and form fields (url-encoded or multipart) into a `PageRequest`.
async fn read_page_request(request: Request) -> Result<PageRequest, Response> {
    let uri: Uri = request.uri().clone();
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    if content_type
        .as_deref()
        .map(is_multipart_content_type)
        .unwrap_or(false)
    {
        let multipart = Multipart::from_request(request, &())
            .await
            .map_err(IntoResponse::into_response)?;
        let fields = read_multipart_text_fields(multipart).await?;
        return Ok(PageRequest::from_parts(uri.path(), uri.query(), None, &[])
            .with_form_fields(fields));
    }

    let body = Bytes::from_request(request, &())
        .await
        .map_err(IntoResponse::into_response)?;
    Ok(PageRequest::from_parts(
        uri.path(),
        uri.query(),
        content_type.as_deref(),
        &body,
    ))
}

/// Collects named text parts; file uploads are skipped.
///
/// A malformed body is rejected before dispatch, so it never overwrites a page.
async fn read_multipart_text_fields(
    mut multipart: Multipart,
) -> Result<Vec<(String, String)>, Response> {
    let mut fields = Vec::new();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Ok(fields),
            Err(err) => return Err(err.into_response()),
        };
        if field.file_name().is_some() {
            continue;
        }
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        let value = field.text().await.map_err(IntoResponse::into_response)?;
        fields.push((name, value));
    }
}

fn into_response(reply: Reply) -> Response {
    match reply {
        Reply::Rendered { html } => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, HeaderValue::from_static(HTML_CONTENT_TYPE))],
            html,
        )
            .into_response(),
        Reply::Redirect { location } => match HeaderValue::from_str(&location) {
            Ok(location) => (StatusCode::FOUND, [(header::LOCATION, location)]).into_response(),
            Err(err) => plain_text(StatusCode::INTERNAL_SERVER_ERROR, format!("{err}\n")),
        },
        Reply::NotFound => plain_text(StatusCode::NOT_FOUND, NOT_FOUND_BODY.to_string()),
        Reply::InternalError { message } => {
            plain_text(StatusCode::INTERNAL_SERVER_ERROR, format!("{message}\n"))
        }
    }
}

fn plain_text(status: StatusCode, body: String) -> Response {
    (
        status,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(TEXT_CONTENT_TYPE)),
            (
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ),
        ],
        body,
    )
        .into_response()
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("event=shutdown_signal module=http status=error error={}", err);
        std::future::pending::<()>().await;
    }
}
