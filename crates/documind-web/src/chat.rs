//! Chat page controller exposed to JavaScript
//!
//! Holds the transcript, document library, settings and session, and runs
//! the backend calls. The page renders from the `*Json` getters after each
//! promise settles.

use std::cell::RefCell;
use std::rc::Rc;

use documind_client::api::{check_upload, parse_answer, parse_documents};
use documind_client::{
    ApiError, ApiStatus, ClientConfig, DocuMindApi, DocumentLibrary, FileMeta, PipelineSettings,
    QuerySettings, SessionId, SidebarResize, Transcript,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::{File, FileList};

use crate::fetch::send;
use crate::storage::LocalStore;
use crate::util::{log, window};

struct ChatState {
    api: DocuMindApi,
    session: SessionId,
    transcript: Transcript,
    library: DocumentLibrary,
    pipeline: PipelineSettings,
    query: QuerySettings,
    sidebar: SidebarResize,
    status: ApiStatus,
}

fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// List the server's documents and merge the ones this session may see
async fn refresh_library(state: &Rc<RefCell<ChatState>>) -> Result<u32, ApiError> {
    let request = state.borrow().api.list_documents();
    let listing = send(&request, &[]).await.and_then(|r| parse_documents(&r))?;
    let mut s = state.borrow_mut();
    let session = s.session;
    Ok(s.library.merge_listing(&listing.documents, &session, now_ms() as u64) as u32)
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

#[wasm_bindgen]
pub struct DocuMindChat {
    state: Rc<RefCell<ChatState>>,
}

#[wasm_bindgen]
impl DocuMindChat {
    /// `config_json` is a [`ClientConfig`] in camelCase; unparseable input
    /// falls back to the defaults
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<DocuMindChat, JsValue> {
        let config = ClientConfig::from_json_or_default(config_json);
        let session = SessionId::load_or_create(&mut LocalStore::new(&window()?));
        log(&format!("[chat] session {} against {}", session, config.base_url));

        Ok(Self {
            state: Rc::new(RefCell::new(ChatState {
                api: DocuMindApi::new(config),
                session,
                transcript: Transcript::new(now_ms()),
                library: DocumentLibrary::new(),
                pipeline: PipelineSettings::default(),
                query: QuerySettings::default(),
                sidebar: SidebarResize::default(),
                status: ApiStatus::Checking,
            })),
        })
    }

    /// Probe the backend; resolves to `online` or `offline`
    #[wasm_bindgen(js_name = checkHealth)]
    pub fn check_health(&self) -> js_sys::Promise {
        let state = self.state.clone();
        let request = state.borrow().api.health();
        future_to_promise(async move {
            let status = ApiStatus::from_probe(&send(&request, &[]).await);
            state.borrow_mut().status = status;
            Ok(JsValue::from_str(status.label()))
        })
    }

    /// Ask a question restricted to the locked documents
    ///
    /// Resolves to `false` without sending when the question is blank or a
    /// request is already pending. Failures land in the transcript.
    pub fn ask(&self, question: &str) -> js_sys::Promise {
        let state = self.state.clone();
        let prepared = {
            let mut s = state.borrow_mut();
            match s.transcript.begin_question(question, now_ms()) {
                Some(q) => {
                    let body = s.pipeline.ask_request(&s.query, q, s.library.locked_names());
                    Some(s.api.ask(&body))
                }
                None => None,
            }
        };

        future_to_promise(async move {
            let request = match prepared {
                None => return Ok(JsValue::FALSE),
                Some(Ok(request)) => request,
                Some(Err(e)) => {
                    state.borrow_mut().transcript.push_error(&e, now_ms());
                    return Ok(JsValue::TRUE);
                }
            };
            let outcome = send(&request, &[])
                .await
                .and_then(|response| parse_answer(&response));
            let mut s = state.borrow_mut();
            match outcome {
                Ok(answer) => s.transcript.push_answer(answer, now_ms()),
                Err(e) => {
                    log(&format!("[chat] ask failed: {}", e));
                    s.transcript.push_error(&e, now_ms());
                }
            }
            Ok(JsValue::TRUE)
        })
    }

    /// Add picked or dropped files and upload the accepted ones
    ///
    /// After a successful upload the server listing is merged back in.
    /// Resolves to the number of files added; rejects with the error text if
    /// the upload fails (the files stay in the library).
    #[wasm_bindgen(js_name = addFiles)]
    pub fn add_files(&self, list: FileList) -> js_sys::Promise {
        let files: Vec<File> = (0..list.length()).filter_map(|i| list.get(i)).collect();
        let metas: Vec<FileMeta> = files
            .iter()
            .map(|f| FileMeta {
                name: f.name(),
                mime: f.type_(),
                size: f.size().max(0.0) as u64,
            })
            .collect();

        let state = self.state.clone();
        let prepared = {
            let mut s = state.borrow_mut();
            let now = now_ms() as u64;
            let session = s.session;
            let added = s.library.add_files(&metas, &session, now);
            let names: Vec<(String, String)> = added
                .iter()
                .map(|u| (u.file.name.clone(), u.server_name.clone()))
                .collect();
            (added.len(), s.api.upload_documents(&names))
        };

        future_to_promise(async move {
            let (count, request) = prepared;
            if count == 0 {
                return Ok(JsValue::from(0));
            }
            let result = match request {
                Ok(request) => send(&request, &files).await.and_then(|r| check_upload(&r)),
                Err(e) => Err(e),
            };
            match result {
                Ok(()) => {
                    if let Err(e) = refresh_library(&state).await {
                        log(&format!("[chat] document refresh failed: {}", e));
                    }
                    Ok(JsValue::from(count as u32))
                }
                Err(e) => {
                    log(&format!("[chat] upload failed: {}", e));
                    Err(JsValue::from_str(&e.chat_text()))
                }
            }
        })
    }

    /// Merge this session's view of the server listing into the library
    #[wasm_bindgen(js_name = refreshDocuments)]
    pub fn refresh_documents(&self) -> js_sys::Promise {
        let state = self.state.clone();
        future_to_promise(async move {
            refresh_library(&state)
                .await
                .map(JsValue::from)
                .map_err(|e| JsValue::from_str(&e.to_string()))
        })
    }

    #[wasm_bindgen(js_name = messagesJson)]
    pub fn messages_json(&self) -> String {
        to_json(&self.state.borrow().transcript.messages())
    }

    /// Library entries whose label matches `query`
    #[wasm_bindgen(js_name = documentsJson)]
    pub fn documents_json(&self, query: &str) -> String {
        to_json(&self.state.borrow().library.filter(query))
    }

    #[wasm_bindgen(js_name = toggleLock)]
    pub fn toggle_lock(&self, id: &str) -> bool {
        self.state.borrow_mut().library.toggle_lock(id)
    }

    #[wasm_bindgen(js_name = removeDocument)]
    pub fn remove_document(&self, id: &str) -> bool {
        self.state.borrow_mut().library.remove_uploaded(id)
    }

    #[wasm_bindgen(js_name = selectAll)]
    pub fn select_all(&self) {
        self.state.borrow_mut().library.select_all();
    }

    #[wasm_bindgen(js_name = deselectAll)]
    pub fn deselect_all(&self) {
        self.state.borrow_mut().library.deselect_all();
    }

    #[wasm_bindgen(js_name = clearChat)]
    pub fn clear_chat(&self) {
        self.state.borrow_mut().transcript.clear();
    }

    #[wasm_bindgen(getter, js_name = queryCount)]
    pub fn query_count(&self) -> u32 {
        self.state.borrow().transcript.query_count()
    }

    #[wasm_bindgen(getter)]
    pub fn pending(&self) -> bool {
        self.state.borrow().transcript.is_pending()
    }

    #[wasm_bindgen(getter, js_name = apiStatus)]
    pub fn api_status(&self) -> String {
        self.state.borrow().status.label().to_string()
    }

    #[wasm_bindgen(js_name = setQuery)]
    pub fn set_query(&self, top_k: u32, temperature: f32) {
        self.state.borrow_mut().query = QuerySettings { top_k, temperature };
    }

    /// Replace the pipeline settings; returns false for invalid JSON
    #[wasm_bindgen(js_name = setPipelineJson)]
    pub fn set_pipeline_json(&self, json: &str) -> bool {
        match serde_json::from_str::<PipelineSettings>(json) {
            Ok(settings) => {
                self.state.borrow_mut().pipeline = settings.sanitized();
                true
            }
            Err(_) => false,
        }
    }

    #[wasm_bindgen(js_name = pipelineJson)]
    pub fn pipeline_json(&self) -> String {
        to_json(&self.state.borrow().pipeline)
    }

    #[wasm_bindgen(js_name = startResize)]
    pub fn start_resize(&self) {
        self.state.borrow_mut().sidebar.start();
    }

    /// Returns whether the sidebar width changed
    #[wasm_bindgen(js_name = dragResize)]
    pub fn drag_resize(&self, client_x: f32) -> bool {
        self.state.borrow_mut().sidebar.drag_to(client_x)
    }

    #[wasm_bindgen(js_name = endResize)]
    pub fn end_resize(&self) -> bool {
        self.state.borrow_mut().sidebar.end()
    }

    #[wasm_bindgen(getter, js_name = sidebarWidth)]
    pub fn sidebar_width(&self) -> f32 {
        self.state.borrow().sidebar.width()
    }
}
