// SPDX-FileCopyrightText: 2026 Tolk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Payload decoding shared by the durable backends.

use tolk_core::{ChatId, GroupConfig, StoreKind, default_record};
use tracing::warn;

/// Decodes a stored payload, falling back to the default record when the
/// payload cannot be parsed.
///
/// A corrupt payload is treated like an absent one: the caller gets the
/// default and the bad payload stays where it is until the next `set`.
pub(crate) fn decode_or_default(backend: StoreKind, chat_id: ChatId, payload: &str) -> GroupConfig {
    match GroupConfig::from_json(chat_id, payload) {
        Ok(config) => config,
        Err(e) => {
            warn!(
                chat_id = %chat_id,
                backend = %backend,
                error = %e,
                "malformed group config payload, using defaults"
            );
            default_record(chat_id)
        }
    }
}
