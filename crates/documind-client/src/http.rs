//! Transport-neutral HTTP request and response types
//!
//! Requests are built here and executed by the host (browser `fetch` in
//! `documind-web`), which converts the outcome back into [`HttpResponse`].

use serde::{Deserialize, Serialize};

/// HTTP request method
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// One file part of a multipart upload
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadPart {
    /// Form field name
    pub field: String,
    /// Name of the file as the user picked it
    pub original_name: String,
    /// Name sent to the server
    pub upload_name: String,
}

/// Request body
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum RequestBody {
    #[default]
    Empty,
    /// Serialized JSON
    Json(String),
    /// Multipart form; file contents are attached by the host
    Multipart(Vec<UploadPart>),
}

/// HTTP request ready for the host to send
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    /// Headers as key-value pairs
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
    /// Abort after this many milliseconds
    pub timeout_ms: u32,
}

impl HttpRequest {
    /// Create a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            headers: Vec::new(),
            body: RequestBody::Empty,
            timeout_ms: 30_000,
        }
    }

    /// Create a POST request
    pub fn post(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Post,
            ..Self::get(url)
        }
    }

    /// Set a JSON body and its Content-Type header
    pub fn with_json_body(mut self, json: String) -> Self {
        self.headers
            .push(("Content-Type".into(), "application/json".into()));
        self.body = RequestBody::Json(json);
        self
    }

    /// Set a multipart body; the host sets the boundary header
    pub fn with_multipart(mut self, parts: Vec<UploadPart>) -> Self {
        self.body = RequestBody::Multipart(parts);
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn with_timeout(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Look up a header value (case-insensitive)
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

/// Response as received by the host
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Check for a 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_request_builder() {
        let req = HttpRequest::post("http://127.0.0.1:8000/ask-recruiter")
            .with_json_body("{}".into())
            .with_header("X-API-Key", "secret")
            .with_timeout(5000);

        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.timeout_ms, 5000);
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.header("x-api-key"), Some("secret"));
        assert_eq!(req.body, RequestBody::Json("{}".into()));
    }

    #[test]
    fn test_http_response_success() {
        assert!(HttpResponse::new(200, b"ok".to_vec()).is_success());
        assert!(HttpResponse::new(204, Vec::new()).is_success());
        assert!(!HttpResponse::new(422, Vec::new()).is_success());
        assert!(!HttpResponse::new(500, Vec::new()).is_success());
    }
}
