// SPDX-FileCopyrightText: 2026 Tolk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI-backed translation agent for tolk.
//!
//! This crate implements [`TranslationAgent`] on top of the OpenAI chat
//! completions, audio transcription and text-to-speech endpoints.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use tolk_config::model::OpenAiConfig;
use tolk_core::{
    AdapterType, HealthStatus, PluginAdapter, TolkError, TranslationAgent, TranslationRequest,
    TranslationResponse,
};
use tracing::{debug, error, info};

use crate::client::OpenAiClient;
use crate::types::{ChatCompletionRequest, ChatMessage};

/// Confidence reported for a translation the model answered.
pub const SUCCESS_CONFIDENCE: f32 = 0.9;

/// Instructions that keep the model's answer to the bare translation.
pub const TRANSLATOR_INSTRUCTIONS: &str = "You are a highly specialized translation engine. Your SOLE purpose is to translate the text provided in the prompt from the specified source language to the specified target language.

RULES:
1.  Translate the text accurately from the source language code (e.g., 'en') to the target language code (e.g., 'ru').
2.  Your response MUST contain ONLY the translated text.
3.  DO NOT include explanations, apologies, greetings, labels (like \"Translation:\"), language codes, or any other text besides the translation itself.
4.  Preserve the basic paragraph structure if applicable.
5.  If the input text cannot be translated or is nonsensical, return the original text.";

/// Builds the user prompt for one translation.
pub fn translation_prompt(request: &TranslationRequest) -> String {
    format!(
        "Source Language: {}\nTarget Language: {}\nText to Translate:\n---\n{}\n---",
        request.source_language, request.target_language, request.text
    )
}

/// Translation agent talking to the OpenAI API.
///
/// API key resolution order: config -> `OPENAI_API_KEY` env var -> error.
pub struct OpenAiAgent {
    client: OpenAiClient,
    model: String,
    transcription_model: String,
    speech_model: String,
    voice: String,
}

impl OpenAiAgent {
    /// Creates an agent from the `[openai]` config section.
    pub fn new(config: &OpenAiConfig) -> Result<Self, TolkError> {
        let api_key = resolve_api_key(&config.api_key)?;
        let client = OpenAiClient::new(
            &api_key,
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
        )?;
        info!(model = %config.model, "OpenAI agent initialized");
        Ok(Self::with_client(client, config))
    }

    /// Creates an agent around an existing client.
    pub fn with_client(client: OpenAiClient, config: &OpenAiConfig) -> Self {
        Self {
            client,
            model: config.model.clone(),
            transcription_model: config.transcription_model.clone(),
            speech_model: config.speech_model.clone(),
            voice: config.voice.clone(),
        }
    }

    async fn request_translation(&self, request: &TranslationRequest) -> Result<String, TolkError> {
        let completion = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(TRANSLATOR_INSTRUCTIONS),
                ChatMessage::user(translation_prompt(request)),
            ],
            temperature: None,
        };
        let response = self.client.chat_completion(&completion).await?;
        match response.first_text().map(str::trim) {
            Some(text) if !text.is_empty() => Ok(text.to_string()),
            _ => Err(TolkError::Provider {
                message: "Agent did not return translated text.".into(),
                source: None,
            }),
        }
    }
}

#[async_trait]
impl PluginAdapter for OpenAiAgent {
    fn name(&self) -> &str {
        "openai"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Agent
    }

    async fn health_check(&self) -> Result<HealthStatus, TolkError> {
        // No API call: health checks should not spend tokens.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), TolkError> {
        debug!("OpenAI agent shutting down");
        Ok(())
    }
}

#[async_trait]
impl TranslationAgent for OpenAiAgent {
    /// Never fails: provider errors come back as a zero-confidence response
    /// whose text describes the error.
    async fn translate(
        &self,
        request: TranslationRequest,
    ) -> Result<TranslationResponse, TolkError> {
        debug!(
            chat_id = %request.chat_id,
            source = %request.source_language,
            target = %request.target_language,
            "translating"
        );
        match self.request_translation(&request).await {
            Ok(translated_text) => Ok(TranslationResponse {
                translated_text,
                detected_language: request.source_language,
                confidence: SUCCESS_CONFIDENCE,
            }),
            Err(e) => {
                error!(chat_id = %request.chat_id, error = %e, "translation failed");
                Ok(TranslationResponse {
                    translated_text: format!("[Translation Error: {}]", provider_message(&e)),
                    detected_language: request.source_language,
                    confidence: 0.0,
                })
            }
        }
    }

    async fn transcribe(&self, audio: Vec<u8>) -> Result<String, TolkError> {
        debug!(bytes = audio.len(), "transcribing voice message");
        self.client
            .transcribe(&self.transcription_model, &audio)
            .await
            .map_err(|e| TolkError::Provider {
                message: format!("Transcription Error: {}", provider_message(&e)),
                source: Some(Box::new(e)),
            })
    }

    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, TolkError> {
        debug!(chars = text.chars().count(), "synthesizing speech");
        self.client
            .speech(&self.speech_model, &self.voice, text)
            .await
            .map_err(|e| TolkError::Provider {
                message: format!("Text-to-speech Error: {}", provider_message(&e)),
                source: Some(Box::new(e)),
            })
    }
}

fn provider_message(e: &TolkError) -> String {
    match e {
        TolkError::Provider { message, .. } => message.clone(),
        other => other.to_string(),
    }
}

/// Resolves the API key from config, falling back to `OPENAI_API_KEY`.
fn resolve_api_key(config_key: &Option<String>) -> Result<String, TolkError> {
    if let Some(key) = config_key.as_deref().filter(|k| !k.is_empty()) {
        return Ok(key.to_string());
    }

    std::env::var("OPENAI_API_KEY")
        .ok()
        .filter(|k| !k.is_empty())
        .ok_or_else(|| {
            TolkError::Config(
                "OpenAI API key not found. Set openai.api_key in config or OPENAI_API_KEY environment variable.".into(),
            )
        })
}
