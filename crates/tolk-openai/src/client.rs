// SPDX-FileCopyrightText: 2026 Tolk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the OpenAI REST API.
//!
//! Provides [`OpenAiClient`] which handles authentication, request
//! construction for chat completions, transcription and speech, and a single
//! retry on transient errors.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use tolk_core::TolkError;
use tracing::{debug, warn};

use crate::types::{
    ApiErrorResponse, ChatCompletionRequest, ChatCompletionResponse, SpeechRequest,
    TranscriptionResponse,
};

/// File name sent with transcription uploads; the API infers the codec from it.
const VOICE_FILE_NAME: &str = "voice.ogg";

/// Output format requested from the speech endpoint. Telegram voice notes are
/// OGG/Opus.
const SPEECH_FORMAT: &str = "opus";

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    max_retries: u32,
    retry_delay: Duration,
}

impl OpenAiClient {
    /// Creates a client authenticating with `api_key` against `base_url`
    /// (e.g. `https://api.openai.com/v1`).
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self, TolkError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|e| {
                TolkError::Config(format!("invalid API key header value: {e}"))
            })?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| TolkError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_retries: 1,
            retry_delay: Duration::from_secs(1),
        })
    }

    /// Overrides the delay between a transient failure and its retry.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// `POST /chat/completions`.
    pub async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, TolkError> {
        let url = self.url("/chat/completions");
        let response = self
            .send_with_retry("chat completion", || Ok(self.client.post(&url).json(request)))
            .await?;
        parse_json(response).await
    }

    /// `POST /audio/transcriptions` with the audio as a multipart file.
    pub async fn transcribe(&self, model: &str, audio: &[u8]) -> Result<String, TolkError> {
        let url = self.url("/audio/transcriptions");
        let response = self
            .send_with_retry("transcription", || {
                let part = Part::bytes(audio.to_vec())
                    .file_name(VOICE_FILE_NAME)
                    .mime_str("audio/ogg")
                    .map_err(|e| TolkError::Provider {
                        message: format!("invalid upload content type: {e}"),
                        source: Some(Box::new(e)),
                    })?;
                let form = Form::new().text("model", model.to_string()).part("file", part);
                Ok(self.client.post(&url).multipart(form))
            })
            .await?;
        let body: TranscriptionResponse = parse_json(response).await?;
        Ok(body.text)
    }

    /// `POST /audio/speech`, returning the encoded audio.
    pub async fn speech(&self, model: &str, voice: &str, input: &str) -> Result<Vec<u8>, TolkError> {
        let url = self.url("/audio/speech");
        let request = SpeechRequest {
            model: model.to_string(),
            input: input.to_string(),
            voice: voice.to_string(),
            response_format: SPEECH_FORMAT.to_string(),
        };
        let response = self
            .send_with_retry("speech", || Ok(self.client.post(&url).json(&request)))
            .await?;
        let bytes = response.bytes().await.map_err(|e| TolkError::Provider {
            message: format!("failed to read speech audio: {e}"),
            source: Some(Box::new(e)),
        })?;
        Ok(bytes.to_vec())
    }

    /// Sends the request built by `build`, retrying once on 429/500/503.
    ///
    /// The builder is re-invoked per attempt because multipart bodies cannot
    /// be cloned.
    async fn send_with_retry<F>(&self, what: &str, build: F) -> Result<reqwest::Response, TolkError>
    where
        F: Fn() -> Result<reqwest::RequestBuilder, TolkError>,
    {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, what, "retrying request after transient error");
                tokio::time::sleep(self.retry_delay).await;
            }

            let response = build()?.send().await.map_err(|e| TolkError::Provider {
                message: format!("{what} request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

            let status = response.status();
            debug!(status = %status, attempt, what, "response received");

            if status.is_success() {
                return Ok(response);
            }

            let body = response.text().await.unwrap_or_default();
            if is_transient_error(status) && attempt < self.max_retries {
                warn!(status = %status, body = %body, "transient error, will retry");
                last_error = Some(TolkError::Provider {
                    message: format!("API returned {status}: {body}"),
                    source: None,
                });
                continue;
            }

            return Err(TolkError::Provider {
                message: api_error_message(status, &body),
                source: None,
            });
        }

        Err(last_error.unwrap_or_else(|| TolkError::Provider {
            message: format!("{what} request failed after retries"),
            source: None,
        }))
    }
}

async fn parse_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, TolkError> {
    let body = response.text().await.map_err(|e| TolkError::Provider {
        message: format!("failed to read response body: {e}"),
        source: Some(Box::new(e)),
    })?;
    serde_json::from_str(&body).map_err(|e| TolkError::Provider {
        message: format!("failed to parse API response: {e}"),
        source: Some(Box::new(e)),
    })
}

fn api_error_message(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(api_err) => match api_err.error.type_ {
            Some(kind) => format!("OpenAI API error ({kind}): {}", api_err.error.message),
            None => format!("OpenAI API error: {}", api_err.error.message),
        },
        Err(_) => format!("API returned {status}: {body}"),
    }
}

/// Returns true for HTTP status codes that indicate transient errors worth retrying.
fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChatMessage;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> OpenAiClient {
        OpenAiClient::new("sk-test", base_url, Duration::from_secs(5))
            .unwrap()
            .with_retry_delay(Duration::from_millis(10))
    }

    fn completion_request() -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: "gpt-4o".into(),
            messages: vec![ChatMessage::user("Hello")],
            temperature: None,
        }
    }

    fn completion_body(text: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-test",
            "model": "gpt-4o",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": text}, "finish_reason": "stop"}]
        })
    }

    #[tokio::test]
    async fn chat_completion_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("Hi")))
            .expect(1)
            .mount(&server)
            .await;

        let response = test_client(&server.uri())
            .chat_completion(&completion_request())
            .await
            .unwrap();
        assert_eq!(response.first_text(), Some("Hi"));
    }

    #[tokio::test]
    async fn chat_completion_retries_once_on_429() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("After retry")))
            .mount(&server)
            .await;

        let response = test_client(&server.uri())
            .chat_completion(&completion_request())
            .await
            .unwrap();
        assert_eq!(response.first_text(), Some("After retry"));
    }

    #[tokio::test]
    async fn non_transient_error_surfaces_api_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .chat_completion(&completion_request())
            .await
            .unwrap_err()
            .to_string();
        assert!(err.contains("Incorrect API key provided"), "got: {err}");
    }

    #[tokio::test]
    async fn transcribe_uploads_multipart_and_returns_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/audio/transcriptions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"text": "xin chào"})))
            .expect(1)
            .mount(&server)
            .await;

        let text = test_client(&server.uri())
            .transcribe("whisper-1", b"OggS")
            .await
            .unwrap();
        assert_eq!(text, "xin chào");

        let received = server.received_requests().await.unwrap();
        let body = String::from_utf8_lossy(&received[0].body);
        assert!(body.contains("filename=\"voice.ogg\""));
        assert!(body.contains("whisper-1"));
    }

    #[tokio::test]
    async fn speech_returns_raw_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/audio/speech"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"OggS-audio".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let audio = test_client(&server.uri())
            .speech("tts-1", "alloy", "hello")
            .await
            .unwrap();
        assert_eq!(audio, b"OggS-audio");

        let received = server.received_requests().await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
        assert_eq!(json["response_format"], "opus");
        assert_eq!(json["voice"], "alloy");
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = OpenAiClient::new("k", "http://localhost:1/v1/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.url("/audio/speech"), "http://localhost:1/v1/audio/speech");
    }
}
