// SPDX-FileCopyrightText: 2026 Tolk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for tolk.

use thiserror::Error;

use crate::types::{ChatId, StoreKind};

/// The primary error type used across tolk adapter traits and core operations.
///
/// A chat identifier that has never been stored is not an error anywhere in
/// this crate: stores answer it with a default record.
#[derive(Debug, Error)]
pub enum TolkError {
    /// A store could not read or write a record because its medium (disk,
    /// network, database) failed.
    #[error("persistence error for chat {chat_id} on {backend} store: {source}")]
    Persistence {
        chat_id: ChatId,
        backend: StoreKind,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An unrecognized store backend name was requested.
    #[error("configuration error: unknown store backend `{0}` (expected memory, file, redis or sqlite)")]
    UnknownBackend(String),

    /// The group's record could not be loaded for this event, so it must not
    /// be overwritten.
    #[error("group config for chat {chat_id} is unavailable")]
    Unbound { chat_id: ChatId },

    /// Other configuration errors (missing token, invalid header values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage failures not tied to one chat (opening a database, running
    /// migrations, connecting to Redis).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Chat platform errors (send failure, file download, command registration).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Language-model provider errors (translation, transcription, speech).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TolkError {
    /// Builds a [`TolkError::Persistence`] from any error source.
    pub fn persistence(
        chat_id: ChatId,
        backend: StoreKind,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        TolkError::Persistence {
            chat_id,
            backend,
            source: source.into(),
        }
    }

    /// Returns true for errors raised by a store's medium.
    pub fn is_persistence(&self) -> bool {
        matches!(self, TolkError::Persistence { .. })
    }
}
