//! Chat transcript state

use serde::Serialize;

use crate::api::{AskResponse, Confidence};
use crate::error::ApiError;

/// First assistant message; survives [`Transcript::clear`]
pub const WELCOME_TEXT: &str = "Hello, I am DocuMind, your document intelligence platform for Indian MNCs and IT consulting firms.\n\nSelect and lock the documents you want to query in the left panel, then ask your question. I only answer from verified company documents.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    Error,
}

/// One chat bubble
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Message {
    pub id: u64,
    pub role: Role,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Confidence>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
    /// Wall-clock time in Unix milliseconds
    pub timestamp_ms: f64,
}

impl Message {
    fn plain(id: u64, role: Role, text: String, timestamp_ms: f64) -> Self {
        Self {
            id,
            role,
            text,
            confidence: None,
            sources: Vec::new(),
            score: None,
            timestamp_ms,
        }
    }
}

/// Ordered messages plus the single in-flight request flag
#[derive(Clone, Debug, PartialEq)]
pub struct Transcript {
    messages: Vec<Message>,
    pending: bool,
    query_count: u32,
    next_id: u64,
}

impl Transcript {
    pub fn new(now_ms: f64) -> Self {
        let mut welcome = Message::plain(0, Role::Assistant, WELCOME_TEXT.to_string(), now_ms);
        welcome.confidence = Some(Confidence::High);
        Self {
            messages: vec![welcome],
            pending: false,
            query_count: 0,
            next_id: 1,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Number of answered questions since the last clear
    pub fn query_count(&self) -> u32 {
        self.query_count
    }

    /// Record a user question and mark a request in flight
    ///
    /// Returns the trimmed question to send, or `None` when it is blank or
    /// another request is still pending.
    pub fn begin_question(&mut self, input: &str, now_ms: f64) -> Option<String> {
        let question = input.trim();
        if question.is_empty() || self.pending {
            return None;
        }
        self.push(Role::User, question.to_string(), now_ms);
        self.pending = true;
        Some(question.to_string())
    }

    pub fn push_answer(&mut self, answer: AskResponse, now_ms: f64) {
        let id = self.push(Role::Assistant, answer.answer, now_ms);
        if let Some(msg) = self.messages.iter_mut().rev().find(|m| m.id == id) {
            msg.confidence = Some(answer.confidence);
            msg.sources = answer.source_documents;
            msg.score = answer.similarity_score;
        }
        self.query_count += 1;
        self.pending = false;
    }

    pub fn push_error(&mut self, error: &ApiError, now_ms: f64) {
        self.push(Role::Error, error.chat_text(), now_ms);
        self.pending = false;
    }

    /// Drop everything but the welcome message and reset the query count
    pub fn clear(&mut self) {
        self.messages.truncate(1);
        self.query_count = 0;
    }

    fn push(&mut self, role: Role, text: String, now_ms: f64) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(Message::plain(id, role, text, now_ms));
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(text: &str) -> AskResponse {
        AskResponse {
            answer: text.into(),
            confidence: Confidence::Low,
            source_documents: vec!["rate_card_2026.txt".into()],
            similarity_score: Some(0.42),
        }
    }

    #[test]
    fn test_welcome_message() {
        let t = Transcript::new(0.0);
        assert_eq!(t.messages().len(), 1);
        assert_eq!(t.messages()[0].role, Role::Assistant);
        assert_eq!(t.messages()[0].text, WELCOME_TEXT);
    }

    #[test]
    fn test_begin_question_rejects_blank_and_pending() {
        let mut t = Transcript::new(0.0);
        assert_eq!(t.begin_question("   ", 1.0), None);
        assert_eq!(t.begin_question("  rates? ", 1.0).as_deref(), Some("rates?"));
        assert!(t.is_pending());
        assert_eq!(t.begin_question("again", 2.0), None);
        assert_eq!(t.messages().len(), 2);
    }

    #[test]
    fn test_answer_and_error_flow() {
        let mut t = Transcript::new(0.0);
        t.begin_question("rates?", 1.0);
        t.push_answer(answer("Senior rate is 90/h"), 2.0);
        assert!(!t.is_pending());
        assert_eq!(t.query_count(), 1);
        let last = t.messages().last().unwrap();
        assert_eq!(last.confidence, Some(Confidence::Low));
        assert_eq!(last.sources, vec!["rate_card_2026.txt".to_string()]);

        t.begin_question("policy?", 3.0);
        t.push_error(&ApiError::Unreachable("timeout".into()), 4.0);
        assert_eq!(t.query_count(), 1);
        assert_eq!(t.messages().last().unwrap().role, Role::Error);

        let ids: Vec<u64> = t.messages().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_clear_keeps_welcome() {
        let mut t = Transcript::new(0.0);
        t.begin_question("rates?", 1.0);
        t.push_answer(answer("x"), 2.0);
        t.clear();
        assert_eq!(t.messages().len(), 1);
        assert_eq!(t.query_count(), 0);
    }
}
