// SPDX-FileCopyrightText: 2026 Tolk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The per-group configuration record and its default-construction rule.
//!
//! The JSON shape (camelCase field names) is what every backend persists, so
//! payloads written by one backend can be read by another.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::types::ChatId;

pub const DEFAULT_PRIMARY_LANGUAGE: &str = "en";
pub const DEFAULT_SECONDARY_LANGUAGE: &str = "vi";
pub const DEFAULT_ENABLED: bool = true;
pub const DEFAULT_TRANSLATE_COMMANDS: bool = false;
pub const DEFAULT_REPLY_WITH_VOICE: bool = false;

/// How translated replies are delivered to the chat.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ReplyStyle {
    /// Reply to the original message.
    #[default]
    Reply,
    /// Reply inside the original message's forum thread.
    Thread,
    /// Plain message in the chat, no reply reference.
    Inline,
}

/// Primary/secondary language codes (ISO 639-1, e.g. `en`, `vi`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguagePair {
    pub primary: String,
    pub secondary: String,
}

impl Default for LanguagePair {
    fn default() -> Self {
        Self {
            primary: DEFAULT_PRIMARY_LANGUAGE.to_string(),
            secondary: DEFAULT_SECONDARY_LANGUAGE.to_string(),
        }
    }
}

impl std::fmt::Display for LanguagePair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ↔ {}", self.primary, self.secondary)
    }
}

/// Translation settings for one group conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupConfig {
    pub chat_id: ChatId,
    pub language_pair: LanguagePair,
    pub enabled: bool,
    pub translate_commands: bool,
    pub reply_style: ReplyStyle,
    /// Older payloads predate this field.
    #[serde(default)]
    pub reply_with_voice: bool,
}

impl GroupConfig {
    /// Builds the default record for a chat. Pure and deterministic.
    pub fn default_for(chat_id: ChatId) -> Self {
        Self {
            chat_id,
            language_pair: LanguagePair::default(),
            enabled: DEFAULT_ENABLED,
            translate_commands: DEFAULT_TRANSLATE_COMMANDS,
            reply_style: ReplyStyle::default(),
            reply_with_voice: DEFAULT_REPLY_WITH_VOICE,
        }
    }

    /// Serializes the record to the JSON payload stored by every backend.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decodes a stored payload, pinning the record to the key it was read from.
    ///
    /// The key is authoritative: a payload carrying a different `chatId` is
    /// rebound to `chat_id`.
    pub fn from_json(chat_id: ChatId, payload: &str) -> Result<Self, serde_json::Error> {
        let mut config: GroupConfig = serde_json::from_str(payload)?;
        config.chat_id = chat_id;
        Ok(config)
    }
}

/// Synthesizes the default record for `chat_id` without any I/O.
pub fn default_record(chat_id: ChatId) -> GroupConfig {
    GroupConfig::default_for(chat_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_record_matches_documented_defaults() {
        let config = default_record(ChatId(-100123));
        assert_eq!(config.chat_id, ChatId(-100123));
        assert_eq!(config.language_pair.primary, "en");
        assert_eq!(config.language_pair.secondary, "vi");
        assert!(config.enabled);
        assert!(!config.translate_commands);
        assert_eq!(config.reply_style, ReplyStyle::Reply);
        assert!(!config.reply_with_voice);
    }

    #[test]
    fn json_uses_camel_case_field_names() {
        let json = default_record(ChatId(7)).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["chatId"], 7);
        assert_eq!(value["languagePair"]["primary"], "en");
        assert_eq!(value["translateCommands"], false);
        assert_eq!(value["replyStyle"], "reply");
        assert_eq!(value["replyWithVoice"], false);
    }

    #[test]
    fn payload_without_reply_with_voice_decodes() {
        let payload = r#"{
            "chatId": 42,
            "languagePair": {"primary": "en", "secondary": "es"},
            "enabled": false,
            "translateCommands": true,
            "replyStyle": "thread"
        }"#;
        let config = GroupConfig::from_json(ChatId(42), payload).unwrap();
        assert!(!config.reply_with_voice);
        assert_eq!(config.reply_style, ReplyStyle::Thread);
        assert_eq!(config.language_pair.secondary, "es");
    }

    #[test]
    fn from_json_rebinds_chat_id_to_key() {
        let stored = default_record(ChatId(1)).to_json().unwrap();
        let config = GroupConfig::from_json(ChatId(2), &stored).unwrap();
        assert_eq!(config.chat_id, ChatId(2));
    }

    #[test]
    fn from_json_rejects_garbage() {
        assert!(GroupConfig::from_json(ChatId(1), "not json").is_err());
        assert!(GroupConfig::from_json(ChatId(1), r#"{"chatId": 1}"#).is_err());
    }

    #[test]
    fn reply_style_parses_case_insensitively() {
        use std::str::FromStr;
        assert_eq!(ReplyStyle::from_str("THREAD").unwrap(), ReplyStyle::Thread);
        assert_eq!(ReplyStyle::from_str("inline").unwrap(), ReplyStyle::Inline);
        assert!(ReplyStyle::from_str("sideways").is_err());
        assert_eq!(ReplyStyle::Reply.to_string(), "reply");
    }

    #[test]
    fn language_pair_display() {
        assert_eq!(LanguagePair::default().to_string(), "en ↔ vi");
    }

    proptest! {
        #[test]
        fn default_record_is_deterministic(id in any::<i64>()) {
            prop_assert_eq!(default_record(ChatId(id)), default_record(ChatId(id)));
            prop_assert_eq!(default_record(ChatId(id)).chat_id, ChatId(id));
        }
    }
}
