// SPDX-FileCopyrightText: 2026 Tolk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Voice note download.

use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::Voice;
use tolk_core::TolkError;
use tracing::debug;

/// Downloads a voice message's audio (OGG/Opus) from Telegram servers.
///
/// Uses the Bot API's `getFile` to resolve the file path, then downloads
/// the file content as bytes.
pub async fn download_voice(bot: &Bot, voice: &Voice) -> Result<Vec<u8>, TolkError> {
    let file = bot
        .get_file(voice.file.id.clone())
        .await
        .map_err(|e| TolkError::Channel {
            message: format!("failed to get file info: {e}"),
            source: Some(Box::new(e)),
        })?;

    let mut buf = Vec::new();
    bot.download_file(&file.path, &mut buf)
        .await
        .map_err(|e| TolkError::Channel {
            message: format!("failed to download voice file: {e}"),
            source: Some(Box::new(e)),
        })?;

    debug!(
        file_id = %voice.file.id,
        size = buf.len(),
        duration_secs = voice.duration.seconds(),
        "downloaded voice message"
    );
    Ok(buf)
}
