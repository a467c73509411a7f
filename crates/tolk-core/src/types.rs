// SPDX-FileCopyrightText: 2026 Tolk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Stable identifier of a conversation; the primary key of every config record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ChatId(pub i64);

impl std::fmt::Display for ChatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ChatId {
    fn from(id: i64) -> Self {
        ChatId(id)
    }
}

/// Whether a conversation is a one-to-one chat or a group.
///
/// Translation features are group-scoped; private chats never bind a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatKind {
    Private,
    Group,
}

/// Storage backend selector, parsed from configuration.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    /// Process-lifetime map.
    #[strum(to_string = "memory")]
    Memory,
    /// One JSON file per chat.
    #[strum(to_string = "file")]
    File,
    /// Networked key-value service.
    #[strum(to_string = "redis", serialize = "redis-like-kv", serialize = "kv")]
    #[serde(alias = "redis-like-kv", alias = "kv")]
    Redis,
    /// Embedded SQLite table.
    #[strum(to_string = "sqlite", serialize = "embedded-db", serialize = "db")]
    #[serde(alias = "embedded-db", alias = "db")]
    Sqlite,
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the role of an adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Channel,
    Agent,
    Storage,
}

// --- Translation agent types ---

/// A request to translate one piece of text for a chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRequest {
    pub text: String,
    pub source_language: String,
    pub target_language: String,
    pub chat_id: ChatId,
}

/// The agent's answer to a [`TranslationRequest`].
///
/// A confidence of zero means the translation failed and the text should not
/// be relayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationResponse {
    pub translated_text: String,
    pub detected_language: String,
    pub confidence: f32,
}

impl TranslationResponse {
    /// True when the response carries text worth sending back to the chat.
    pub fn is_usable(&self) -> bool {
        !self.translated_text.is_empty() && self.confidence > 0.0
    }
}
