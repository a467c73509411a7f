// SPDX-FileCopyrightText: 2026 Tolk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound message routing helpers.
//!
//! Maps Telegram messages onto the chat identity and chat kind the session
//! binder works with, and extracts the bits the translation flows need.

use teloxide::prelude::*;
use teloxide::types::ChatKind as TgChatKind;
use tolk_core::{ChatId as GroupId, ChatKind};

/// Checks whether the message is from a private (DM) chat.
///
/// Groups, supergroups and channels return `false`.
pub fn is_private(msg: &Message) -> bool {
    matches!(msg.chat.kind, TgChatKind::Private(_))
}

/// Chat kind as seen by the session binder.
pub fn chat_kind(msg: &Message) -> ChatKind {
    if is_private(msg) {
        ChatKind::Private
    } else {
        ChatKind::Group
    }
}

/// Store key for the message's chat.
pub fn group_id(msg: &Message) -> GroupId {
    GroupId(msg.chat.id.0)
}

/// The sender's username, when the sender has one.
pub fn sender_username(msg: &Message) -> Option<&str> {
    msg.from.as_ref().and_then(|u| u.username.as_deref())
}
