// SPDX-FileCopyrightText: 2026 Tolk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock translation agent for deterministic testing.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use tolk_core::{
    AdapterType, HealthStatus, PluginAdapter, TolkError, TranslationAgent, TranslationRequest,
    TranslationResponse,
};

/// A translation agent that answers from pre-configured queues.
///
/// Translations are popped from a FIFO queue. When the queue is empty the
/// agent echoes `"<target>:<text>"` with full confidence, so tests can assert
/// on direction without queuing anything.
#[derive(Clone, Default)]
pub struct MockAgent {
    translations: Arc<Mutex<VecDeque<TranslationResponse>>>,
    requests: Arc<Mutex<Vec<TranslationRequest>>>,
    transcript: Option<String>,
    synthesized: Arc<Mutex<Vec<String>>>,
    fail_translate: bool,
    fail_transcribe: bool,
    fail_synthesize: bool,
}

impl MockAgent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transcription returns `text` for every audio clip.
    pub fn with_transcript(mut self, text: &str) -> Self {
        self.transcript = Some(text.to_string());
        self
    }

    /// Every `translate` call returns a provider error.
    pub fn failing_translate(mut self) -> Self {
        self.fail_translate = true;
        self
    }

    /// Every `transcribe` call returns a provider error.
    pub fn failing_transcribe(mut self) -> Self {
        self.fail_transcribe = true;
        self
    }

    /// Every `synthesize` call returns a provider error.
    pub fn failing_synthesize(mut self) -> Self {
        self.fail_synthesize = true;
        self
    }

    /// Queues the response for the next `translate` call.
    pub async fn push_translation(&self, response: TranslationResponse) {
        self.translations.lock().await.push_back(response);
    }

    /// All translation requests seen so far, in order.
    pub async fn requests(&self) -> Vec<TranslationRequest> {
        self.requests.lock().await.clone()
    }

    /// All texts passed to `synthesize`, in order.
    pub async fn synthesized(&self) -> Vec<String> {
        self.synthesized.lock().await.clone()
    }

    fn provider_error(what: &str) -> TolkError {
        TolkError::Provider {
            message: format!("mock {what} failure"),
            source: None,
        }
    }
}

#[async_trait]
impl PluginAdapter for MockAgent {
    fn name(&self) -> &str {
        "mock-agent"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Agent
    }

    async fn health_check(&self) -> Result<HealthStatus, TolkError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), TolkError> {
        Ok(())
    }
}

#[async_trait]
impl TranslationAgent for MockAgent {
    async fn translate(
        &self,
        request: TranslationRequest,
    ) -> Result<TranslationResponse, TolkError> {
        self.requests.lock().await.push(request.clone());
        if self.fail_translate {
            return Err(Self::provider_error("translate"));
        }
        let queued = self.translations.lock().await.pop_front();
        Ok(queued.unwrap_or_else(|| TranslationResponse {
            translated_text: format!("{}:{}", request.target_language, request.text),
            detected_language: request.source_language,
            confidence: 0.9,
        }))
    }

    async fn transcribe(&self, _audio: Vec<u8>) -> Result<String, TolkError> {
        if self.fail_transcribe {
            return Err(Self::provider_error("transcribe"));
        }
        Ok(self
            .transcript
            .clone()
            .unwrap_or_else(|| "mock transcript".to_string()))
    }

    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, TolkError> {
        if self.fail_synthesize {
            return Err(Self::provider_error("synthesize"));
        }
        self.synthesized.lock().await.push(text.to_string());
        Ok(b"OggS-mock".to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tolk_core::ChatId;

    fn request(text: &str) -> TranslationRequest {
        TranslationRequest {
            text: text.to_string(),
            source_language: "vi".to_string(),
            target_language: "en".to_string(),
            chat_id: ChatId(1),
        }
    }

    #[tokio::test]
    async fn echoes_when_queue_empty() {
        let agent = MockAgent::new();
        let response = agent.translate(request("xin chào")).await.unwrap();
        assert_eq!(response.translated_text, "en:xin chào");
        assert_eq!(agent.requests().await.len(), 1);
    }

    #[tokio::test]
    async fn queued_responses_come_first() {
        let agent = MockAgent::new();
        agent
            .push_translation(TranslationResponse {
                translated_text: String::new(),
                detected_language: "vi".to_string(),
                confidence: 0.0,
            })
            .await;
        let response = agent.translate(request("x")).await.unwrap();
        assert!(!response.is_usable());
    }

    #[tokio::test]
    async fn failure_switches() {
        let agent = MockAgent::new().failing_transcribe().failing_synthesize();
        assert!(agent.transcribe(vec![1, 2]).await.is_err());
        assert!(agent.synthesize("hi").await.is_err());
        assert!(agent.translate(request("ok")).await.is_ok());
    }
}
