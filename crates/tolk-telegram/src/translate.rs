// SPDX-FileCopyrightText: 2026 Tolk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Translation of group text and voice messages.
//!
//! Direction is picked with a crude script heuristic: text containing any
//! non-ASCII character is assumed to be in the secondary language and is
//! translated to the primary one; everything else goes primary to secondary.

use tolk_core::{ChatId, GroupConfig, LanguagePair, TolkError, TranslationAgent, TranslationRequest};
use tracing::{debug, info};

pub const VOICE_SYNTHESIS_FAILED: &str = "[Failed to generate voice reply]";
pub const VOICE_TRANSLATION_FAILED: &str = "[Translation failed or confidence too low]";
pub const VOICE_PROCESSING_FAILED: &str = "Sorry, I couldn't process that voice message.";

/// Shown in place of a sender without a username.
const ANONYMOUS_SENDER: &str = "User";

/// Source and target language codes for one translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Direction {
    pub source: String,
    pub target: String,
}

/// Picks the translation direction for `text` within the group's pair.
pub fn translation_direction(text: &str, pair: &LanguagePair) -> Direction {
    if text.chars().any(|c| !c.is_ascii()) {
        Direction {
            source: pair.secondary.clone(),
            target: pair.primary.clone(),
        }
    } else {
        Direction {
            source: pair.primary.clone(),
            target: pair.secondary.clone(),
        }
    }
}

/// Whether a group text message should be translated at all.
///
/// Disabled groups are skipped, and so are commands unless the group opted
/// into translating them.
pub fn should_translate_text(config: &GroupConfig, text: &str, command_prefix: &str) -> bool {
    if !config.enabled || text.trim().is_empty() {
        return false;
    }
    !text.starts_with(command_prefix) || config.translate_commands
}

fn sender(username: Option<&str>) -> &str {
    username.filter(|u| !u.is_empty()).unwrap_or(ANONYMOUS_SENDER)
}

/// Name of the audio file attached to a voice reply.
pub fn voice_file_name(unix_millis: i64) -> String {
    format!("translation-{unix_millis}.ogg")
}

/// Translates a group text message, returning the reply to post.
///
/// `None` means the agent failed or was not confident; the failure is logged
/// and nothing is posted.
pub async fn translate_text(
    agent: &dyn TranslationAgent,
    chat_id: ChatId,
    config: &GroupConfig,
    text: &str,
    username: Option<&str>,
) -> Option<String> {
    let direction = translation_direction(text, &config.language_pair);
    let request = TranslationRequest {
        text: text.to_string(),
        source_language: direction.source,
        target_language: direction.target,
        chat_id,
    };

    match agent.translate(request).await {
        Ok(response) if response.is_usable() => {
            Some(format!("@{}: {}", sender(username), response.translated_text))
        }
        Ok(response) => {
            info!(
                chat_id = %chat_id,
                confidence = response.confidence,
                "translation failed or confidence too low"
            );
            None
        }
        Err(e) => {
            info!(chat_id = %chat_id, error = %e, "translation failed");
            None
        }
    }
}

/// A successful voice message translation.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceTranslation {
    /// Text reply, `@user (🎤→target): translation`.
    pub reply_text: String,
    /// The bare translation, used for speech synthesis.
    pub translated_text: String,
}

/// Transcribes and translates a voice message.
///
/// `Ok(None)` means the translation was unusable and the caller should answer
/// with [`VOICE_TRANSLATION_FAILED`]. Errors (transcription, agent) should be
/// answered with [`VOICE_PROCESSING_FAILED`].
pub async fn translate_voice(
    agent: &dyn TranslationAgent,
    chat_id: ChatId,
    config: &GroupConfig,
    audio: Vec<u8>,
    username: Option<&str>,
) -> Result<Option<VoiceTranslation>, TolkError> {
    let transcript = agent.transcribe(audio).await?;
    debug!(chat_id = %chat_id, chars = transcript.chars().count(), "voice message transcribed");

    let direction = translation_direction(&transcript, &config.language_pair);
    debug!(chat_id = %chat_id, source = %direction.source, target = %direction.target, "voice direction");
    let target = direction.target.clone();
    let response = agent
        .translate(TranslationRequest {
            text: transcript,
            source_language: direction.source,
            target_language: direction.target,
            chat_id,
        })
        .await?;

    if !response.is_usable() {
        info!(chat_id = %chat_id, "voice translation failed or confidence too low");
        return Ok(None);
    }

    Ok(Some(VoiceTranslation {
        reply_text: format!(
            "@{} (🎤→{}): {}",
            sender(username),
            target,
            response.translated_text
        ),
        translated_text: response.translated_text,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tolk_core::{TranslationResponse, default_record};
    use tolk_test_utils::MockAgent;

    const CHAT: ChatId = ChatId(-300);

    #[test]
    fn ascii_text_goes_primary_to_secondary() {
        let d = translation_direction("hello there", &LanguagePair::default());
        assert_eq!(d.source, "en");
        assert_eq!(d.target, "vi");
    }

    #[test]
    fn non_ascii_text_goes_secondary_to_primary() {
        let d = translation_direction("xin chào", &LanguagePair::default());
        assert_eq!(d.source, "vi");
        assert_eq!(d.target, "en");
        // A single accented character is enough.
        let d = translation_direction("café", &LanguagePair::default());
        assert_eq!(d.source, "vi");
    }

    #[test]
    fn commands_and_disabled_groups_are_skipped() {
        let mut config = default_record(CHAT);
        assert!(should_translate_text(&config, "hello", "/"));
        assert!(!should_translate_text(&config, "/start", "/"));
        assert!(!should_translate_text(&config, "   ", "/"));

        config.translate_commands = true;
        assert!(should_translate_text(&config, "/start", "/"));

        config.enabled = false;
        assert!(!should_translate_text(&config, "hello", "/"));
    }

    #[test]
    fn voice_file_name_embeds_timestamp() {
        assert_eq!(voice_file_name(1_700_000_000_123), "translation-1700000000123.ogg");
    }

    #[tokio::test]
    async fn text_reply_names_sender() {
        let agent = MockAgent::new();
        let reply = translate_text(&agent, CHAT, &default_record(CHAT), "good morning", Some("alice"))
            .await
            .unwrap();
        assert_eq!(reply, "@alice: vi:good morning");

        let requests = agent.requests().await;
        assert_eq!(requests[0].source_language, "en");
        assert_eq!(requests[0].chat_id, CHAT);
    }

    #[tokio::test]
    async fn text_reply_falls_back_to_user() {
        let agent = MockAgent::new();
        let reply = translate_text(&agent, CHAT, &default_record(CHAT), "hi", None)
            .await
            .unwrap();
        assert!(reply.starts_with("@User: "));
    }

    #[tokio::test]
    async fn zero_confidence_posts_nothing() {
        let agent = MockAgent::new();
        agent
            .push_translation(TranslationResponse {
                translated_text: "[Translation Error: boom]".into(),
                detected_language: "en".into(),
                confidence: 0.0,
            })
            .await;
        assert!(
            translate_text(&agent, CHAT, &default_record(CHAT), "hi", None)
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn voice_translation_uses_transcript_direction() {
        let agent = MockAgent::new().with_transcript("chào buổi sáng");
        let result = translate_voice(&agent, CHAT, &default_record(CHAT), vec![1, 2, 3], Some("bob"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(result.reply_text, "@bob (🎤→en): en:chào buổi sáng");
        assert_eq!(result.translated_text, "en:chào buổi sáng");
    }

    #[tokio::test]
    async fn voice_transcription_failure_is_error() {
        let agent = MockAgent::new().failing_transcribe();
        let result = translate_voice(&agent, CHAT, &default_record(CHAT), vec![], None).await;
        assert!(result.is_err());
        assert!(agent.requests().await.is_empty());
    }

    #[tokio::test]
    async fn voice_unusable_translation_is_none() {
        let agent = MockAgent::new();
        agent
            .push_translation(TranslationResponse {
                translated_text: String::new(),
                detected_language: "en".into(),
                confidence: 0.9,
            })
            .await;
        let result = translate_voice(&agent, CHAT, &default_record(CHAT), vec![], None)
            .await
            .unwrap();
        assert!(result.is_none());
    }
}
