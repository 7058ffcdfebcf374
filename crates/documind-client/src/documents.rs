//! Document library shown in the sidebar
//!
//! Locked documents restrict retrieval: their names become the
//! `source_filter` of the next question.

use serde::{Deserialize, Serialize};

use crate::session::{display_name, SessionId};

const ALLOWED_EXTENSIONS: [&str; 4] = ["txt", "pdf", "doc", "docx"];
const ALLOWED_TYPES: [&str; 4] = [
    "text/plain",
    "application/pdf",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/msword",
];

/// One entry of the library
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    /// Name on the server; session-namespaced for uploads
    pub name: String,
    /// Short label for display
    pub label: String,
    /// Lowercase file extension
    pub kind: String,
    /// Shipped with the backend; cannot be removed
    pub builtin: bool,
    /// Included in the source filter
    pub locked: bool,
    /// Size in bytes for local uploads
    pub size: Option<u64>,
}

impl Document {
    fn builtin(id: &str, label: &str, locked: bool) -> Self {
        Self {
            id: id.to_string(),
            name: format!("{}.txt", id),
            label: label.to_string(),
            kind: "txt".to_string(),
            builtin: true,
            locked,
            size: None,
        }
    }

    /// Human-readable size, empty when unknown
    pub fn size_label(&self) -> String {
        self.size.map(format_bytes).unwrap_or_default()
    }
}

/// Metadata of a file the user picked or dropped
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMeta {
    pub name: String,
    /// MIME type as reported by the browser; may be empty
    #[serde(default)]
    pub mime: String,
    #[serde(default)]
    pub size: u64,
}

/// A file accepted into the library, paired with the name it is stored
/// under on the server
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingUpload {
    pub file: FileMeta,
    pub server_name: String,
}

/// Check a file against the allowed MIME types and extensions
pub fn is_accepted(file: &FileMeta) -> bool {
    ALLOWED_TYPES.contains(&file.mime.as_str())
        || ALLOWED_EXTENSIONS.contains(&extension(&file.name).as_str())
}

/// Keep only supported files; the rest are dropped without an error
pub fn accept_files(files: &[FileMeta]) -> Vec<&FileMeta> {
    files.iter().filter(|f| is_accepted(f)).collect()
}

/// Format a byte count: `512 B`, `1.5 KB`, `2.0 MB`; empty for zero
pub fn format_bytes(bytes: u64) -> String {
    match bytes {
        0 => String::new(),
        b if b < 1024 => format!("{} B", b),
        b if b < 1_048_576 => format!("{:.1} KB", b as f64 / 1024.0),
        b => format!("{:.1} MB", b as f64 / 1_048_576.0),
    }
}

fn extension(name: &str) -> String {
    name.rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default()
}

fn strip_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    }
}

/// Ordered document library
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentLibrary {
    docs: Vec<Document>,
}

impl Default for DocumentLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentLibrary {
    /// Library holding the five built-in documents
    pub fn new() -> Self {
        Self {
            docs: vec![
                Document::builtin("compliance_policy", "Compliance Policy", true),
                Document::builtin("rate_card_2026", "Rate Card 2026", false),
                Document::builtin("placement_checklist", "Placement Checklist", true),
                Document::builtin("screening_checklist_python", "Python Screening", false),
                Document::builtin("client_x_requirements", "Client X Reqs", false),
            ],
        }
    }

    pub fn docs(&self) -> &[Document] {
        &self.docs
    }

    pub fn get(&self, id: &str) -> Option<&Document> {
        self.docs.iter().find(|d| d.id == id)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.docs.iter().any(|d| d.name == name)
    }

    /// Flip a document's lock; returns false for unknown ids
    pub fn toggle_lock(&mut self, id: &str) -> bool {
        match self.docs.iter_mut().find(|d| d.id == id) {
            Some(doc) => {
                doc.locked = !doc.locked;
                true
            }
            None => false,
        }
    }

    /// Remove an uploaded document; built-ins stay
    pub fn remove_uploaded(&mut self, id: &str) -> bool {
        let before = self.docs.len();
        self.docs.retain(|d| d.builtin || d.id != id);
        self.docs.len() != before
    }

    pub fn select_all(&mut self) {
        self.docs.iter_mut().for_each(|d| d.locked = true);
    }

    pub fn deselect_all(&mut self) {
        self.docs.iter_mut().for_each(|d| d.locked = false);
    }

    /// Add supported files not already in the library, locked
    ///
    /// Each file is stored under its session-namespaced server name so the
    /// source filter matches what the backend indexed. Files whose display
    /// name is already present are skipped.
    pub fn add_files(
        &mut self,
        files: &[FileMeta],
        session: &SessionId,
        now_ms: u64,
    ) -> Vec<PendingUpload> {
        let mut added = Vec::new();
        for file in accept_files(files) {
            if self.docs.iter().any(|d| display_name(&d.name) == file.name) {
                continue;
            }
            let server_name = session.namespaced(&file.name, now_ms);
            self.docs.push(Document {
                id: format!("upload_{}_{}", now_ms, file.name),
                name: server_name.clone(),
                label: strip_extension(&file.name).to_string(),
                kind: extension(&file.name),
                builtin: false,
                locked: true,
                size: Some(file.size),
            });
            added.push(PendingUpload {
                file: file.clone(),
                server_name,
            });
        }
        added
    }

    /// Names of locked documents, in library order
    pub fn locked_names(&self) -> Vec<String> {
        self.docs
            .iter()
            .filter(|d| d.locked)
            .map(|d| d.name.clone())
            .collect()
    }

    /// Documents whose label contains `query`, case-insensitive; all for a
    /// blank query
    pub fn filter(&self, query: &str) -> Vec<&Document> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.docs.iter().collect();
        }
        self.docs
            .iter()
            .filter(|d| d.label.to_lowercase().contains(&query))
            .collect()
    }

    /// Merge the server listing as seen by `session` at `now_ms`
    ///
    /// Shared documents and this session's live uploads are merged; other
    /// sessions' uploads and expired ones are ignored. Returns how many
    /// were added.
    pub fn merge_listing(&mut self, listing: &[String], session: &SessionId, now_ms: u64) -> usize {
        let visible = session.visible_documents(listing, now_ms);
        self.merge_remote(&visible)
    }

    /// Add server documents the library does not know yet, unlocked
    ///
    /// Returns how many were added.
    pub fn merge_remote<S: AsRef<str>>(&mut self, names: &[S]) -> usize {
        let mut added = 0;
        for name in names.iter().map(AsRef::as_ref) {
            if self.contains_name(name) {
                continue;
            }
            let shown = display_name(name);
            self.docs.push(Document {
                id: format!("remote_{}", name),
                name: name.to_string(),
                label: strip_extension(shown).to_string(),
                kind: extension(shown),
                builtin: false,
                locked: false,
                size: None,
            });
            added += 1;
        }
        added
    }
}
