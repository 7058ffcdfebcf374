//! The backend HTTP contract
//!
//! | Route | Method | Body | Response |
//! |-------|--------|------|----------|
//! | `/documents` | GET | | `{ documents: string[] }` |
//! | `/documents/upload` | POST | multipart, field `files` | success or failure |
//! | `/ask-recruiter` | POST | [`AskRequest`] | [`AskResponse`] |
//! | `/docs` | GET | | reachability probe only |

use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, UploadPart};

pub const DOCUMENTS_PATH: &str = "/documents";
pub const UPLOAD_PATH: &str = "/documents/upload";
pub const ASK_PATH: &str = "/ask-recruiter";
pub const HEALTH_PATH: &str = "/docs";

/// Multipart field carrying uploaded files
pub const UPLOAD_FIELD: &str = "files";

/// Header carrying the optional API key
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Body of `POST /ask-recruiter`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AskRequest {
    pub question: String,
    pub top_k: u32,
    pub temperature: f32,
    /// Restrict retrieval to these document names; omitted when empty
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_filter: Vec<String>,
    pub guardrails_enabled: bool,
    pub confidence_threshold: f32,
    pub rerank_enabled: bool,
    pub similarity_threshold: f32,
    pub max_tokens: u32,
    pub embedding_model: String,
}

/// Answer confidence reported by the backend
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Low,
}

/// Body of a successful `POST /ask-recruiter`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
    pub confidence: Confidence,
    #[serde(default)]
    pub source_documents: Vec<String>,
    #[serde(default)]
    pub similarity_score: Option<f32>,
}

/// Body of `GET /documents`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentList {
    pub documents: Vec<String>,
}

/// Request builder bound to one backend
#[derive(Clone, Debug, Default)]
pub struct DocuMindApi {
    config: ClientConfig,
}

impl DocuMindApi {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn request(&self, request: HttpRequest) -> HttpRequest {
        let request = request.with_timeout(self.config.request_timeout_ms);
        match self.config.api_key() {
            Some(key) => request.with_header(API_KEY_HEADER, key),
            None => request,
        }
    }

    /// `GET /documents`
    pub fn list_documents(&self) -> HttpRequest {
        self.request(HttpRequest::get(self.config.url(DOCUMENTS_PATH)))
    }

    /// `POST /documents/upload` with one part per `(original, upload)` name
    ///
    /// Fails with [`ApiError::Rejected`] when there is nothing to send.
    pub fn upload_documents(&self, files: &[(String, String)]) -> Result<HttpRequest, ApiError> {
        if files.is_empty() {
            return Err(ApiError::Rejected("No supported files to upload".to_string()));
        }
        let parts = files
            .iter()
            .map(|(original, upload)| UploadPart {
                field: UPLOAD_FIELD.to_string(),
                original_name: original.clone(),
                upload_name: upload.clone(),
            })
            .collect();
        Ok(self.request(HttpRequest::post(self.config.url(UPLOAD_PATH)).with_multipart(parts)))
    }

    /// `POST /ask-recruiter`
    pub fn ask(&self, body: &AskRequest) -> Result<HttpRequest, ApiError> {
        let json = serde_json::to_string(body)?;
        Ok(self.request(HttpRequest::post(self.config.url(ASK_PATH)).with_json_body(json)))
    }

    /// `GET /docs` with the short probe timeout
    pub fn health(&self) -> HttpRequest {
        self.request(HttpRequest::get(self.config.url(HEALTH_PATH)))
            .with_timeout(self.config.health_timeout_ms)
    }
}

fn success_body(response: &HttpResponse) -> Result<&[u8], ApiError> {
    if response.is_success() {
        Ok(&response.body)
    } else {
        Err(ApiError::from_response(response.status, &response.body))
    }
}

/// Decode `GET /documents`
pub fn parse_documents(response: &HttpResponse) -> Result<DocumentList, ApiError> {
    Ok(serde_json::from_slice(success_body(response)?)?)
}

/// Decode `POST /ask-recruiter`
pub fn parse_answer(response: &HttpResponse) -> Result<AskResponse, ApiError> {
    Ok(serde_json::from_slice(success_body(response)?)?)
}

/// Check `POST /documents/upload`; the body is not interpreted
pub fn check_upload(response: &HttpResponse) -> Result<(), ApiError> {
    success_body(response).map(|_| ())
}
