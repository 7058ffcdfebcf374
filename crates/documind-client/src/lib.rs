//! Client-side state and backend contract for DocuMind
//!
//! This crate holds everything the chat page needs that does not touch the
//! browser: the HTTP contract of the retrieval backend, the document library
//! with its lock-to-filter semantics, per-browser upload sessions, and the
//! chat transcript.
//!
//! # Architecture
//!
//! ```text
//! Chat page (documind-web)
//!        │
//!        │ DocuMindApi::ask(..) -> HttpRequest
//!        ▼
//! ┌─────────────────┐
//! │   fetch shim    │  ◄── Only place a request leaves the page
//! └────────┬────────┘
//!          │ HttpResponse / ApiError
//!          ▼
//! ┌─────────────────┐
//! │ parse_* helpers │  ◄── Decode into AskResponse / DocumentList
//! └────────┬────────┘
//!          ▼
//!     Transcript, DocumentLibrary
//! ```
//!
//! Requests are described as plain data ([`HttpRequest`]) so the whole
//! contract is testable on the host.

pub mod api;
pub mod chat;
pub mod config;
pub mod documents;
pub mod error;
pub mod health;
pub mod http;
pub mod session;
pub mod settings;
pub mod sidebar;

pub use api::{AskRequest, AskResponse, Confidence, DocuMindApi, DocumentList};
pub use chat::{Message, Role, Transcript};
pub use config::ClientConfig;
pub use documents::{format_bytes, Document, DocumentLibrary, FileMeta, PendingUpload};
pub use error::ApiError;
pub use health::ApiStatus;
pub use http::{HttpMethod, HttpRequest, HttpResponse, RequestBody, UploadPart};
pub use session::{display_name, KeyValueStore, SessionId};
pub use settings::{PipelineSettings, QuerySettings};
pub use sidebar::SidebarResize;
