//! Retrieval pipeline and inference settings

use serde::{Deserialize, Serialize};

use crate::api::AskRequest;

/// Pipeline switches sent with every question
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    pub guardrails_enabled: bool,
    /// Answers below this confidence are flagged low
    pub confidence_threshold: f32,
    pub rerank_enabled: bool,
    /// Chunks below this similarity are discarded
    pub similarity_threshold: f32,
    pub max_tokens: u32,
    pub embedding_model: String,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            guardrails_enabled: true,
            confidence_threshold: 0.6,
            rerank_enabled: true,
            similarity_threshold: 0.5,
            max_tokens: 512,
            embedding_model: "MiniLM-L6".to_string(),
        }
    }
}

/// Per-question retrieval settings
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuerySettings {
    /// Number of chunks retrieved
    pub top_k: u32,
    pub temperature: f32,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            top_k: 3,
            temperature: 0.7,
        }
    }
}

impl PipelineSettings {
    /// Clamp thresholds into 0..=1
    pub fn sanitized(mut self) -> Self {
        self.confidence_threshold = clamp_unit(self.confidence_threshold);
        self.similarity_threshold = clamp_unit(self.similarity_threshold);
        self
    }

    /// Combine with a question into the `/ask-recruiter` body
    pub fn ask_request(
        &self,
        query: &QuerySettings,
        question: impl Into<String>,
        source_filter: Vec<String>,
    ) -> AskRequest {
        let settings = self.clone().sanitized();
        AskRequest {
            question: question.into(),
            top_k: query.top_k.max(1),
            temperature: query.temperature.max(0.0),
            source_filter,
            guardrails_enabled: settings.guardrails_enabled,
            confidence_threshold: settings.confidence_threshold,
            rerank_enabled: settings.rerank_enabled,
            similarity_threshold: settings.similarity_threshold,
            max_tokens: settings.max_tokens,
            embedding_model: settings.embedding_model,
        }
    }
}

fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
