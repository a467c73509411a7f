// SPDX-FileCopyrightText: 2026 Tolk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The group configuration store contract shared by every backend.

use async_trait::async_trait;

use crate::error::TolkError;
use crate::record::{GroupConfig, default_record};
use crate::traits::adapter::PluginAdapter;
use crate::types::{ChatId, StoreKind};

/// Persistence for per-group configuration records.
///
/// All backends expose the same observable behaviour:
///
/// - `get` on a key that was never stored (or was deleted) returns
///   [`default_record`] and does not write anything.
/// - `set` replaces the whole record; a concurrent reader of the same key sees
///   either the old or the new record, never a mix. A failed `set` leaves the
///   previous durable value in place.
/// - `delete` of an absent key succeeds.
///
/// Nothing serializes read-modify-write cycles across concurrent events for
/// the same chat: two handlers that both `get`, mutate different fields and
/// `set` can lose one of the updates.
#[async_trait]
pub trait GroupConfigStore: PluginAdapter {
    /// The backend kind, used in error reports and logs.
    fn kind(&self) -> StoreKind;

    /// Returns the stored record for `chat_id`, or the default when absent.
    async fn get(&self, chat_id: ChatId) -> Result<GroupConfig, TolkError>;

    /// Persists `config` under `chat_id`, replacing any prior value.
    async fn set(&self, chat_id: ChatId, config: &GroupConfig) -> Result<(), TolkError>;

    /// Removes the stored record for `chat_id`, if any.
    async fn delete(&self, chat_id: ChatId) -> Result<(), TolkError>;

    /// Synthesizes a default record without touching the backend.
    fn default_record(&self, chat_id: ChatId) -> GroupConfig {
        default_record(chat_id)
    }
}
