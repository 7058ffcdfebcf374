//! Per-browser session identity and document visibility
//!
//! Uploaded documents are named `{session}__{unix_ms}__{name}` on the
//! server. A session sees shared documents, and its own uploads for
//! [`SESSION_TTL_MS`]; uploads of other sessions are hidden. Nothing is
//! deleted server-side.

use std::fmt;

use uuid::Uuid;

/// Storage key of the persisted session identifier
pub const STORAGE_KEY: &str = "documind_session_id";

/// How long a session keeps seeing its own uploads
pub const SESSION_TTL_MS: u64 = 2 * 60 * 60 * 1000;

const SEPARATOR: &str = "__";

/// String key-value storage the session id is persisted in
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// Randomly generated session identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generate a fresh v4 identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(value: &str) -> Option<Self> {
        Uuid::parse_str(value.trim()).ok().map(Self)
    }

    /// Restore the persisted identifier, generating and storing one if the
    /// store has none or holds garbage
    pub fn load_or_create(store: &mut impl KeyValueStore) -> Self {
        if let Some(id) = store.get(STORAGE_KEY).as_deref().and_then(Self::parse) {
            return id;
        }
        let id = Self::generate();
        store.set(STORAGE_KEY, &id.to_string());
        id
    }

    /// Server-side name for a file uploaded by this session
    pub fn namespaced(&self, name: &str, now_ms: u64) -> String {
        format!("{}{}{}{}{}", self.0, SEPARATOR, now_ms, SEPARATOR, name)
    }

    /// Filter a server listing down to what this session should see
    pub fn visible_documents<'a>(&self, names: &'a [String], now_ms: u64) -> Vec<&'a str> {
        names
            .iter()
            .map(String::as_str)
            .filter(|name| match parse_namespaced(name) {
                None => true,
                Some(upload) => {
                    upload.session == *self && now_ms.saturating_sub(upload.uploaded_ms) < SESSION_TTL_MS
                }
            })
            .collect()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Components of a session-namespaced document name
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamespacedName<'a> {
    pub session: SessionId,
    pub uploaded_ms: u64,
    pub name: &'a str,
}

/// Split a server name into its session components, if it has them
pub fn parse_namespaced(full: &str) -> Option<NamespacedName<'_>> {
    let mut parts = full.splitn(3, SEPARATOR);
    let session = SessionId::parse(parts.next()?)?;
    let uploaded_ms = parts.next()?.parse().ok()?;
    let name = parts.next().filter(|n| !n.is_empty())?;
    Some(NamespacedName {
        session,
        uploaded_ms,
        name,
    })
}

/// Name to show for a server document
pub fn display_name(full: &str) -> &str {
    parse_namespaced(full).map_or(full, |n| n.name)
}
