// SPDX-FileCopyrightText: 2026 Tolk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram front end for tolk.
//!
//! Runs the teloxide long-polling dispatcher. Every message is bound to its
//! group's configuration record, then routed to the command handlers or to
//! the text and voice translation flows.

pub mod binder;
pub mod commands;
pub mod delivery;
pub mod handler;
pub mod media;
pub mod translate;

use std::sync::Arc;

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{BotCommandScope, ChatAction};
use teloxide::utils::command::BotCommands;
use tolk_config::model::{BotConfig, TelegramConfig};
use tolk_core::{AdapterType, HealthStatus, PluginAdapter, TolkError, TranslationAgent};
use tracing::{debug, error, info, warn};

pub use binder::{SessionBinder, SessionContext};
pub use commands::Command;

use crate::delivery::ReplyTarget;

/// Shared state handed to every update handler.
struct BotState {
    binder: SessionBinder,
    agent: Arc<dyn TranslationAgent>,
    command_prefix: String,
}

/// The Telegram bot: long polling plus command and translation handling.
pub struct TelegramBot {
    bot: Bot,
    state: Arc<BotState>,
}

impl TelegramBot {
    /// Creates the bot. Requires `telegram.bot_token` to be set.
    pub fn new(
        telegram: &TelegramConfig,
        bot_config: &BotConfig,
        binder: SessionBinder,
        agent: Arc<dyn TranslationAgent>,
    ) -> Result<Self, TolkError> {
        Ok(Self {
            bot: bot_from_config(telegram)?,
            state: Arc::new(BotState {
                binder,
                agent,
                command_prefix: bot_config.command_prefix.clone(),
            }),
        })
    }

    /// Returns a reference to the underlying teloxide Bot.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }

    /// Publishes the command list for private and group chats.
    pub async fn register_commands(&self) -> Result<(), TolkError> {
        for scope in [BotCommandScope::AllPrivateChats, BotCommandScope::AllGroupChats] {
            self.bot
                .set_my_commands(Command::bot_commands())
                .scope(scope)
                .await
                .map_err(|e| TolkError::Channel {
                    message: format!("failed to register bot commands: {e}"),
                    source: Some(Box::new(e)),
                })?;
        }
        info!("bot commands registered with Telegram");
        Ok(())
    }

    /// Runs long polling until Ctrl-C.
    pub async fn run(&self) {
        let handler = Update::filter_message()
            .branch(
                dptree::entry()
                    .filter_command::<Command>()
                    .endpoint(on_command),
            )
            .branch(dptree::filter(|msg: Message| msg.voice().is_some()).endpoint(on_voice))
            .branch(dptree::filter(|msg: Message| msg.text().is_some()).endpoint(on_text));

        info!("starting Telegram long polling");
        Dispatcher::builder(self.bot.clone(), handler)
            .dependencies(dptree::deps![self.state.clone()])
            .default_handler(|_| async {}) // Silently ignore non-message updates
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
        info!("Telegram long polling stopped");
    }
}

/// Builds a teloxide client from `telegram.bot_token`.
fn bot_from_config(telegram: &TelegramConfig) -> Result<Bot, TolkError> {
    let token = telegram.bot_token.as_deref().ok_or_else(|| {
        TolkError::Config("telegram.bot_token is required (or set TELEGRAM_BOT_TOKEN)".into())
    })?;
    if token.is_empty() {
        return Err(TolkError::Config("telegram.bot_token cannot be empty".into()));
    }
    Ok(Bot::new(token))
}

/// Verifies the configured token by calling `getMe`.
pub async fn check_token(telegram: &TelegramConfig) -> Result<HealthStatus, TolkError> {
    let bot = bot_from_config(telegram)?;
    Ok(ping(&bot).await)
}

async fn ping(bot: &Bot) -> HealthStatus {
    match bot.get_me().await {
        Ok(me) => {
            debug!(username = %me.username(), "Telegram token verified");
            HealthStatus::Healthy
        }
        Err(e) => HealthStatus::Unhealthy(format!("Telegram bot unreachable: {e}")),
    }
}

#[async_trait]
impl PluginAdapter for TelegramBot {
    fn name(&self) -> &str {
        "telegram"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, TolkError> {
        Ok(ping(&self.bot).await)
    }

    async fn shutdown(&self) -> Result<(), TolkError> {
        debug!("Telegram bot shutting down");
        Ok(())
    }
}

async fn on_command(bot: Bot, msg: Message, cmd: Command, state: Arc<BotState>) -> ResponseResult<()> {
    let mut ctx = state
        .binder
        .bind(handler::group_id(&msg), handler::chat_kind(&msg))
        .await;
    let reply = commands::execute(&state.binder, &mut ctx, &cmd).await;
    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

async fn on_text(bot: Bot, msg: Message, state: Arc<BotState>) -> ResponseResult<()> {
    if handler::is_private(&msg) {
        return Ok(());
    }
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let ctx = state
        .binder
        .bind(handler::group_id(&msg), handler::chat_kind(&msg))
        .await;
    let Some(config) = ctx.config.as_ref() else {
        debug!(chat_id = %ctx.chat_id, "message ignored, no group config bound");
        return Ok(());
    };
    if !translate::should_translate_text(config, text, &state.command_prefix) {
        debug!(chat_id = %ctx.chat_id, enabled = config.enabled, "message not translated");
        return Ok(());
    }

    if let Err(e) = bot.send_chat_action(msg.chat.id, ChatAction::Typing).await {
        warn!(error = %e, "failed to send typing indicator");
    }

    let reply = translate::translate_text(
        state.agent.as_ref(),
        ctx.chat_id,
        config,
        text,
        handler::sender_username(&msg),
    )
    .await;

    if let Some(reply) = reply {
        let target = ReplyTarget::for_style(config.reply_style, msg.id, msg.thread_id);
        if let Err(e) = delivery::send_text(&bot, msg.chat.id, target, &reply).await {
            error!(chat_id = %ctx.chat_id, error = %e, "failed to deliver translation");
        }
    }
    Ok(())
}

async fn on_voice(bot: Bot, msg: Message, state: Arc<BotState>) -> ResponseResult<()> {
    if handler::is_private(&msg) {
        return Ok(());
    }
    let Some(voice) = msg.voice() else {
        return Ok(());
    };

    let ctx = state
        .binder
        .bind(handler::group_id(&msg), handler::chat_kind(&msg))
        .await;
    let Some(config) = ctx.config.clone() else {
        debug!(chat_id = %ctx.chat_id, "voice message ignored, no group config bound");
        return Ok(());
    };
    if !config.enabled {
        debug!(chat_id = %ctx.chat_id, "voice message ignored, translation disabled");
        return Ok(());
    }

    info!(chat_id = %ctx.chat_id, message_id = msg.id.0, "processing voice message");
    let target = ReplyTarget::reply_to(msg.id);

    let outcome = async {
        let audio = media::download_voice(&bot, voice).await?;
        if let Err(e) = bot.send_chat_action(msg.chat.id, ChatAction::Typing).await {
            warn!(error = %e, "failed to send typing indicator");
        }
        translate::translate_voice(
            state.agent.as_ref(),
            ctx.chat_id,
            &config,
            audio,
            handler::sender_username(&msg),
        )
        .await
    }
    .await;

    let result = match outcome {
        Ok(Some(translation)) => {
            deliver_voice_translation(&bot, &msg, &state, &config, target, translation).await
        }
        Ok(None) => {
            delivery::send_text(&bot, msg.chat.id, target, translate::VOICE_TRANSLATION_FAILED).await
        }
        Err(e) => {
            error!(chat_id = %ctx.chat_id, message_id = msg.id.0, error = %e, "error processing voice message");
            delivery::send_text(&bot, msg.chat.id, target, translate::VOICE_PROCESSING_FAILED).await
        }
    };
    if let Err(e) = result {
        error!(chat_id = %ctx.chat_id, error = %e, "failed to deliver voice reply");
    }
    Ok(())
}

async fn deliver_voice_translation(
    bot: &Bot,
    msg: &Message,
    state: &BotState,
    config: &tolk_core::GroupConfig,
    target: ReplyTarget,
    translation: translate::VoiceTranslation,
) -> Result<(), TolkError> {
    delivery::send_text(bot, msg.chat.id, target, &translation.reply_text).await?;
    if !config.reply_with_voice {
        return Ok(());
    }

    debug!(chat_id = msg.chat.id.0, "generating voice reply");
    if let Err(e) = bot.send_chat_action(msg.chat.id, ChatAction::RecordVoice).await {
        warn!(error = %e, "failed to send record-voice indicator");
    }
    let sent = match state.agent.synthesize(&translation.translated_text).await {
        Ok(audio) => {
            let name = translate::voice_file_name(chrono::Utc::now().timestamp_millis());
            delivery::send_voice(bot, msg.chat.id, target, audio, name).await
        }
        Err(e) => Err(e),
    };
    if let Err(e) = sent {
        error!(chat_id = msg.chat.id.0, error = %e, "failed to generate or send voice reply");
        delivery::send_text(bot, msg.chat.id, target, translate::VOICE_SYNTHESIS_FAILED).await?;
    }
    Ok(())
}
