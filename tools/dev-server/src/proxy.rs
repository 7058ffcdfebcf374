//! Reverse proxy for the retrieval API routes

use axum::{
    body::Body,
    extract::State,
    http::{header, uri::InvalidUri, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;

/// Paths served by the backend rather than the static directory
pub const BACKEND_ROUTES: [&str; 5] = [
    "/documents",
    "/documents/upload",
    "/ask-recruiter",
    "/docs",
    "/openapi.json",
];

pub fn is_backend_path(path: &str) -> bool {
    BACKEND_ROUTES.contains(&path)
}

/// Upstream API and the pooled client used to reach it
#[derive(Clone)]
pub struct Backend {
    client: Client<HttpConnector, Body>,
    base: String,
}

impl Backend {
    pub fn new(url: &str) -> Result<Self, InvalidUri> {
        let base = url.trim_end_matches('/').to_string();
        // Validate once so forwarding can only fail on the path
        base.parse::<Uri>()?;
        Ok(Self {
            client: Client::builder(TokioExecutor::new()).build_http(),
            base,
        })
    }

    fn target(&self, uri: &Uri) -> Result<Uri, InvalidUri> {
        let path = uri.path_and_query().map_or("/", |pq| pq.as_str());
        format!("{}{}", self.base, path).parse()
    }
}

/// Forward method, headers, query and body; 502 when the backend is down
pub async fn forward(State(backend): State<Backend>, mut request: Request<Body>) -> Response {
    let target = match backend.target(request.uri()) {
        Ok(uri) => uri,
        Err(_) => return (StatusCode::BAD_REQUEST, "Invalid request path").into_response(),
    };
    let method = request.method().clone();
    *request.uri_mut() = target.clone();
    request.headers_mut().remove(header::HOST);

    match backend.client.request(request).await {
        Ok(response) => {
            println!("[proxy] {} {} -> {}", method, target, response.status());
            response.map(Body::new)
        }
        Err(e) => {
            eprintln!("[proxy] {} {} failed: {}", method, target, e);
            (StatusCode::BAD_GATEWAY, "Backend unavailable").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_keeps_query() {
        let backend = Backend::new("http://127.0.0.1:8000/").unwrap();
        let uri: Uri = "/documents?limit=5".parse().unwrap();
        assert_eq!(
            backend.target(&uri).unwrap().to_string(),
            "http://127.0.0.1:8000/documents?limit=5"
        );
    }

    #[test]
    fn test_backend_paths() {
        assert!(is_backend_path("/ask-recruiter"));
        assert!(is_backend_path("/documents/upload"));
        assert!(!is_backend_path("/index.html"));
    }
}
