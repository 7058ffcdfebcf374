//! Development Server for DocuMind
//!
//! Serves the built web client with corrected MIME types and forwards the
//! backend routes to the retrieval API so the page can use same-origin
//! requests.

mod proxy;

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::{
    body::Body,
    http::{header, HeaderValue, Request, StatusCode},
    response::Response,
    routing::{any, get_service},
    Router,
};
use tower_http::services::ServeDir;

use proxy::{Backend, BACKEND_ROUTES};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_WEB_DIR: &str = "web";

/// Settings read from the environment
struct ServerConfig {
    port: u16,
    api_url: String,
    web_dir: PathBuf,
}

impl ServerConfig {
    fn from_env() -> Self {
        Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            api_url: std::env::var("DOCUMIND_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            web_dir: std::env::var("DOCUMIND_WEB_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_WEB_DIR)),
        }
    }
}

fn app(backend: Backend, web_dir: PathBuf) -> Router {
    let serve_dir = ServeDir::new(web_dir).precompressed_gzip().precompressed_br();

    let mut router = Router::new();
    for route in BACKEND_ROUTES {
        router = router.route(route, any(proxy::forward));
    }

    router
        .with_state(backend)
        .fallback_service(get_service(serve_dir).handle_error(|_| async {
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }))
        .layer(axum::middleware::from_fn(fix_mime))
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = ServerConfig::from_env();
    let backend = match Backend::new(&config.api_url) {
        Ok(backend) => backend,
        Err(e) => {
            eprintln!("Invalid DOCUMIND_API_URL {:?}: {}", config.api_url, e);
            std::process::exit(2);
        }
    };

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));

    println!("╔═══════════════════════════════════════════════════╗");
    println!("║            DocuMind Development Server            ║");
    println!("╠═══════════════════════════════════════════════════╣");
    println!("  URL:     http://localhost:{}", config.port);
    println!("  Static:  {}", config.web_dir.display());
    println!("  Backend: {}", config.api_url);
    println!("  Press Ctrl+C to stop");
    println!("╚═══════════════════════════════════════════════════╝");
    println!();

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(backend, config.web_dir)).await
}

/// Content type for static assets the browser is strict about
fn mime_for(path: &str) -> Option<&'static str> {
    let ext = path.rsplit_once('.').map(|(_, ext)| ext)?;
    match ext {
        "js" | "mjs" => Some("application/javascript; charset=utf-8"),
        "wasm" => Some("application/wasm"),
        "css" => Some("text/css; charset=utf-8"),
        "html" => Some("text/html; charset=utf-8"),
        "json" => Some("application/json; charset=utf-8"),
        _ => None,
    }
}

/// Fix MIME types for module scripts and WASM
async fn fix_mime(request: Request<Body>, next: axum::middleware::Next) -> Response<Body> {
    let path = request.uri().path().to_string();
    let mut response = next.run(request).await;

    if proxy::is_backend_path(&path) || !response.status().is_success() {
        return response;
    }
    if let Some(mime) = mime_for(&path) {
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(mime));
    }
    response
}
