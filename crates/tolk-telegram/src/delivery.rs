// SPDX-FileCopyrightText: 2026 Tolk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! How a translated reply is attached to the chat.

use teloxide::prelude::*;
use teloxide::types::{InputFile, MessageId, ReplyParameters, ThreadId};
use tolk_core::{ReplyStyle, TolkError};

/// Where a reply goes relative to the message that triggered it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyTarget {
    /// Message to reply to, if any.
    pub reply_to: Option<MessageId>,
    /// Forum thread to post in, if any.
    pub thread_id: Option<ThreadId>,
}

impl ReplyTarget {
    /// Reply to `source` in the main chat.
    pub fn reply_to(source: MessageId) -> Self {
        Self {
            reply_to: Some(source),
            thread_id: None,
        }
    }

    /// Placement of a text translation under the group's reply style.
    ///
    /// `Thread` falls back to a plain reply when the source message is not
    /// part of a forum thread.
    pub fn for_style(style: ReplyStyle, source: MessageId, source_thread: Option<ThreadId>) -> Self {
        match style {
            ReplyStyle::Reply => Self::reply_to(source),
            ReplyStyle::Thread => Self {
                reply_to: Some(source),
                thread_id: source_thread,
            },
            ReplyStyle::Inline => Self {
                reply_to: None,
                thread_id: None,
            },
        }
    }
}

fn channel_error(what: &str, e: teloxide::RequestError) -> TolkError {
    TolkError::Channel {
        message: format!("failed to send {what}: {e}"),
        source: Some(Box::new(e)),
    }
}

/// Sends `text` to `chat` at `target`.
pub async fn send_text(bot: &Bot, chat: ChatId, target: ReplyTarget, text: &str) -> Result<(), TolkError> {
    let mut request = bot.send_message(chat, text);
    if let Some(source) = target.reply_to {
        request = request.reply_parameters(ReplyParameters::new(source).allow_sending_without_reply());
    }
    if let Some(thread) = target.thread_id {
        request = request.message_thread_id(thread);
    }
    request.await.map_err(|e| channel_error("message", e))?;
    Ok(())
}

/// Sends encoded audio to `chat` as a voice message at `target`.
pub async fn send_voice(
    bot: &Bot,
    chat: ChatId,
    target: ReplyTarget,
    audio: Vec<u8>,
    file_name: String,
) -> Result<(), TolkError> {
    let mut request = bot.send_voice(chat, InputFile::memory(audio).file_name(file_name));
    if let Some(source) = target.reply_to {
        request = request.reply_parameters(ReplyParameters::new(source).allow_sending_without_reply());
    }
    if let Some(thread) = target.thread_id {
        request = request.message_thread_id(thread);
    }
    request.await.map_err(|e| channel_error("voice message", e))?;
    Ok(())
}
