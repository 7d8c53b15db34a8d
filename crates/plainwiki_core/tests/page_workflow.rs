use plainwiki_core::{
    dispatch, FilePageStore, Page, PageRequest, PageStore, PageWorkflow, RenderError, Renderer,
    Reply, StoreError, StoreResult, TemplateSet, EDIT_TEMPLATE, VIEW_TEMPLATE,
};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::io;

/// In-memory store that counts backing accesses.
#[derive(Default)]
struct RecordingStore {
    pages: RefCell<HashMap<String, Vec<u8>>>,
    loads: Cell<usize>,
    saves: Cell<usize>,
    fail_saves: bool,
}

impl RecordingStore {
    fn failing() -> Self {
        Self {
            fail_saves: true,
            ..Self::default()
        }
    }

    fn accesses(&self) -> usize {
        self.loads.get() + self.saves.get()
    }
}

impl PageStore for RecordingStore {
    fn load(&self, title: &str) -> StoreResult<Page> {
        self.loads.set(self.loads.get() + 1);
        self.pages
            .borrow()
            .get(title)
            .map(|body| Page::new(title, body.clone()))
            .ok_or_else(|| StoreError::NotFoundOnLoad {
                title: title.to_string(),
                source: io::Error::from(io::ErrorKind::NotFound),
            })
    }

    fn save(&self, page: &Page) -> StoreResult<()> {
        self.saves.set(self.saves.get() + 1);
        if self.fail_saves {
            return Err(StoreError::PersistFailure {
                title: page.title.clone(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "disk is read-only"),
            });
        }
        self.pages
            .borrow_mut()
            .insert(page.title.clone(), page.body.clone());
        Ok(())
    }
}

/// Renderer that records every call and echoes `template|title|body`.
#[derive(Default)]
struct RecordingRenderer {
    calls: RefCell<Vec<(String, Page)>>,
}

impl Renderer for RecordingRenderer {
    fn render(&self, template: &str, page: &Page) -> Result<String, RenderError> {
        self.calls
            .borrow_mut()
            .push((template.to_string(), page.clone()));
        Ok(format!("{template}|{}|{}", page.title, page.body_text()))
    }
}

struct FailingRenderer;

impl Renderer for FailingRenderer {
    fn render(&self, template: &str, _page: &Page) -> Result<String, RenderError> {
        Err(RenderError::UnknownTemplate(template.to_string()))
    }
}

fn workflow() -> PageWorkflow<RecordingStore, RecordingRenderer> {
    PageWorkflow::new(RecordingStore::default(), RecordingRenderer::default())
}

fn save_request(title: &str, body: &str) -> PageRequest {
    let encoded = format!("body={}", body.replace(' ', "+"));
    PageRequest::new(format!("/save/{title}")).with_form_body(encoded.as_bytes())
}

#[test]
fn view_of_unsaved_page_redirects_to_edit_without_rendering() {
    let workflow = workflow();

    let reply = workflow.view(&PageRequest::new("/view/Missing"));

    assert_eq!(
        reply,
        Reply::Redirect {
            location: "/edit/Missing".to_string()
        }
    );
    assert_eq!(reply.status_code(), 302);
    assert!(workflow.renderer().calls.borrow().is_empty());
}

#[test]
fn edit_of_unsaved_page_renders_empty_fallback() {
    let workflow = workflow();

    let reply = workflow.edit(&PageRequest::new("/edit/Fresh"));

    assert_eq!(
        reply,
        Reply::Rendered {
            html: "edit|Fresh|".to_string()
        }
    );
    let calls = workflow.renderer().calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, EDIT_TEMPLATE);
    assert_eq!(calls[0].1, Page::new("Fresh", Vec::new()));
}

#[test]
fn edit_of_saved_page_renders_stored_body() {
    let workflow = workflow();
    workflow.save(&save_request("Known", "stored text"));

    let reply = workflow.edit(&PageRequest::new("/edit/Known"));

    assert_eq!(
        reply,
        Reply::Rendered {
            html: "edit|Known|stored text".to_string()
        }
    );
}

#[test]
fn save_then_view_renders_saved_body() {
    let workflow = workflow();

    let saved = workflow.save(&save_request("Test", "hello"));
    assert_eq!(
        saved,
        Reply::Redirect {
            location: "/view/Test".to_string()
        }
    );

    let viewed = workflow.view(&PageRequest::new("/view/Test"));
    assert_eq!(
        viewed,
        Reply::Rendered {
            html: "view|Test|hello".to_string()
        }
    );
    let calls = workflow.renderer().calls.borrow();
    assert_eq!(calls.last().map(|(name, _)| name.as_str()), Some(VIEW_TEMPLATE));
}

#[test]
fn save_without_body_field_stores_empty_page() {
    let workflow = workflow();

    let reply = workflow.save(&PageRequest::new("/save/Empty"));

    assert_eq!(reply.status_code(), 302);
    assert_eq!(workflow.store().load("Empty").unwrap().body, Vec::<u8>::new());
}

#[test]
fn save_keeps_body_bytes_verbatim() {
    let workflow = workflow();
    let request =
        PageRequest::new("/save/Raw").with_form_body(b"body=%20%20padded%20%0D%0A%09tab%20%20");

    workflow.save(&request);

    assert_eq!(
        workflow.store().load("Raw").unwrap().body,
        b"  padded \r\n\ttab  ".to_vec()
    );
}

#[test]
fn sequential_saves_leave_last_body() {
    let workflow = workflow();
    workflow.save(&save_request("Race", "first"));
    workflow.save(&save_request("Race", "second"));

    assert_eq!(workflow.store().load("Race").unwrap().body, b"second");
}

#[test]
fn persist_failure_is_internal_error_and_not_redirect() {
    let workflow = PageWorkflow::new(RecordingStore::failing(), RecordingRenderer::default());

    let reply = workflow.save(&save_request("Locked", "data"));

    match &reply {
        Reply::InternalError { message } => {
            assert!(message.contains("disk is read-only"));
            assert!(message.contains("Locked"));
        }
        other => panic!("unexpected reply: {other:?}"),
    }
    assert_eq!(reply.status_code(), 500);
}

#[test]
fn render_failure_is_internal_error_with_message() {
    let workflow = PageWorkflow::new(RecordingStore::default(), FailingRenderer);

    let reply = workflow.edit(&PageRequest::new("/edit/Broken"));

    assert_eq!(
        reply,
        Reply::InternalError {
            message: "template `edit` is not defined".to_string()
        }
    );
}

#[test]
fn view_render_failure_is_internal_error() {
    let workflow = PageWorkflow::new(RecordingStore::default(), FailingRenderer);
    workflow
        .store()
        .save(&Page::new("Stored", b"content".to_vec()))
        .unwrap();

    let reply = workflow.view(&PageRequest::new("/view/Stored"));

    assert_eq!(
        reply,
        Reply::InternalError {
            message: "template `view` is not defined".to_string()
        }
    );
    assert_eq!(reply.status_code(), 500);
}

#[test]
fn invalid_paths_are_not_found_without_store_access() {
    let workflow = workflow();
    let paths = ["/view/", "/view/a/b", "/edit/has space", "/save/dot.txt", "/save/"];

    for path in paths {
        let request = PageRequest::new(path).with_form_body(b"body=x");
        assert_eq!(workflow.view(&request), Reply::NotFound, "view {path}");
        assert_eq!(workflow.edit(&request), Reply::NotFound, "edit {path}");
        assert_eq!(workflow.save(&request), Reply::NotFound, "save {path}");
    }

    assert_eq!(workflow.store().accesses(), 0);
    assert!(workflow.renderer().calls.borrow().is_empty());
}

#[test]
fn dispatch_follows_prefix_table() {
    let workflow = workflow();

    assert_eq!(
        dispatch(&workflow, &PageRequest::new("/view/Home")),
        Reply::Redirect {
            location: "/edit/Home".to_string()
        }
    );
    assert_eq!(
        dispatch(&workflow, &PageRequest::new("/edit/Home")),
        Reply::Rendered {
            html: "edit|Home|".to_string()
        }
    );
    assert_eq!(
        dispatch(&workflow, &save_request("Home", "hi")),
        Reply::Redirect {
            location: "/view/Home".to_string()
        }
    );
    assert_eq!(dispatch(&workflow, &PageRequest::new("/")), Reply::NotFound);
    assert_eq!(
        dispatch(&workflow, &PageRequest::new("/delete/Home")),
        Reply::NotFound
    );
}

#[test]
fn file_store_and_templates_serve_full_edit_cycle() {
    let data = tempfile::tempdir().unwrap();
    let store = FilePageStore::open(data.path()).unwrap();
    let templates = TemplateSet::from_sources([
        (VIEW_TEMPLATE, "<h1>{{title}}</h1><div>{{body}}</div>"),
        (EDIT_TEMPLATE, "<h1>Editing {{title}}</h1><textarea>{{body}}</textarea>"),
    ])
    .unwrap();
    let workflow = PageWorkflow::new(store, templates);

    assert_eq!(
        dispatch(&workflow, &PageRequest::new("/edit/Home")),
        Reply::Rendered {
            html: "<h1>Editing Home</h1><textarea></textarea>".to_string()
        }
    );

    let saved = dispatch(
        &workflow,
        &PageRequest::new("/save/Home").with_form_body(b"body=%3Cb%3Ewelcome%3C%2Fb%3E"),
    );
    assert_eq!(saved.status_code(), 302);
    assert_eq!(
        std::fs::read(data.path().join("Home.txt")).unwrap(),
        b"<b>welcome</b>"
    );

    assert_eq!(
        dispatch(&workflow, &PageRequest::new("/view/Home")),
        Reply::Rendered {
            html: "<h1>Home</h1><div>&lt;b&gt;welcome&lt;/b&gt;</div>".to_string()
        }
    );
}
