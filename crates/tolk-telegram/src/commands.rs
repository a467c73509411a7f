// SPDX-FileCopyrightText: 2026 Tolk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bot commands and their handlers.
//!
//! Handlers take a bound [`SessionContext`] and return the reply text, so the
//! whole command set can be exercised against any store without Telegram.

use std::str::FromStr;

use teloxide::utils::command::BotCommands;
use tolk_core::{LanguagePair, ReplyStyle, TolkError};
use tracing::{error, info};

use crate::binder::{SessionBinder, SessionContext};

pub const GROUP_ONLY: &str = "Command only available in groups.";
pub const COMMAND_FAILED: &str =
    "Sorry, there was an error processing your command. Please try again.";
pub const WELCOME: &str = "Welcome! I am a translation bot. Add me to a group to help translate messages between languages.";
pub const SET_LANGUAGES_USAGE: &str = "Usage: /setlanguages <primary_lang_code> <secondary_lang_code>\nExample: /setlanguages en vi";
pub const INVALID_STYLE: &str = "Invalid style. Use 'thread', 'reply', or 'inline'.";

pub const HELP: &str = "Available commands:
/start - Start the bot / Show initial info
/setlanguages <primary> <secondary> - Set languages (e.g., /setlanguages en vi)
/showconfig - Show current group config
/enable - Enable translation in this group
/disable - Disable translation in this group
/setstyle <style> - Set reply style (reply, thread, inline)
/togglereplyvoice - Toggle replying with translated voice message
/help - Show this help message";

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    #[command(description = "Start the bot / Show initial info")]
    Start,
    #[command(description = "Set primary/secondary langs (e.g., en vi)")]
    SetLanguages(String),
    #[command(description = "Show current group config")]
    ShowConfig,
    #[command(description = "Enable translation in this group")]
    Enable,
    #[command(description = "Disable translation in this group")]
    Disable,
    #[command(description = "Set reply style (reply, thread, inline)")]
    SetStyle(String),
    #[command(description = "Toggle replying with translated voice message")]
    ToggleReplyVoice,
    #[command(description = "Show available commands and usage")]
    Help,
}

/// Runs `command` and returns the text to send back to the chat.
///
/// Store failures never escape: they are logged and answered with
/// [`COMMAND_FAILED`].
pub async fn execute(binder: &SessionBinder, ctx: &mut SessionContext, command: &Command) -> String {
    info!(chat_id = %ctx.chat_id, ?command, "processing command");
    match run(binder, ctx, command).await {
        Ok(reply) => reply,
        Err(e) => {
            error!(chat_id = %ctx.chat_id, ?command, error = %e, "command failed");
            COMMAND_FAILED.to_string()
        }
    }
}

async fn run(
    binder: &SessionBinder,
    ctx: &mut SessionContext,
    command: &Command,
) -> Result<String, TolkError> {
    match command {
        Command::Help => Ok(HELP.to_string()),
        Command::Start => start(binder, ctx).await,
        _ if ctx.is_private() => Ok(GROUP_ONLY.to_string()),
        Command::SetLanguages(args) => set_languages(binder, ctx, args).await,
        Command::ShowConfig => show_config(binder, ctx).await,
        Command::Enable => set_enabled(binder, ctx, true).await,
        Command::Disable => set_enabled(binder, ctx, false).await,
        Command::SetStyle(arg) => set_style(binder, ctx, arg).await,
        Command::ToggleReplyVoice => toggle_reply_voice(binder, ctx).await,
    }
}

async fn start(binder: &SessionBinder, ctx: &SessionContext) -> Result<String, TolkError> {
    if ctx.is_private() {
        return Ok(WELCOME.to_string());
    }
    let config = binder.store().get(ctx.chat_id).await?;
    Ok(format!(
        "Translation Bot Activated! Current language pair: {}\nUse /showconfig to see current settings.",
        config.language_pair
    ))
}

async fn set_languages(
    binder: &SessionBinder,
    ctx: &mut SessionContext,
    args: &str,
) -> Result<String, TolkError> {
    let codes: Vec<&str> = args.split_whitespace().collect();
    let [primary, secondary] = codes.as_slice() else {
        return Ok(SET_LANGUAGES_USAGE.to_string());
    };
    let pair = LanguagePair {
        primary: (*primary).to_string(),
        secondary: (*secondary).to_string(),
    };
    let reply = format!("Languages set to: {pair}");
    ctx.config_mut()?.language_pair = pair;
    binder.persist(ctx).await?;
    Ok(reply)
}

async fn show_config(binder: &SessionBinder, ctx: &SessionContext) -> Result<String, TolkError> {
    let config = match &ctx.config {
        Some(config) => config.clone(),
        None => binder.store().get(ctx.chat_id).await?,
    };
    Ok(format!(
        "Group Configuration:\n- Enabled: {}\n- Languages: {}\n- Reply Style: {}\n- Reply With Voice: {}\n- Translate Commands: {}",
        config.enabled,
        config.language_pair,
        config.reply_style,
        config.reply_with_voice,
        config.translate_commands
    ))
}

async fn set_enabled(
    binder: &SessionBinder,
    ctx: &mut SessionContext,
    enabled: bool,
) -> Result<String, TolkError> {
    let (unchanged, changed) = if enabled {
        ("Translation is already enabled.", "Translation enabled.")
    } else {
        ("Translation is already disabled.", "Translation disabled.")
    };
    let config = ctx.config_mut()?;
    if config.enabled == enabled {
        return Ok(unchanged.to_string());
    }
    config.enabled = enabled;
    binder.persist(ctx).await?;
    Ok(changed.to_string())
}

async fn set_style(
    binder: &SessionBinder,
    ctx: &mut SessionContext,
    arg: &str,
) -> Result<String, TolkError> {
    let Ok(style) = ReplyStyle::from_str(arg.trim()) else {
        return Ok(INVALID_STYLE.to_string());
    };
    ctx.config_mut()?.reply_style = style;
    binder.persist(ctx).await?;
    Ok(format!("Reply style set to: {style}"))
}

async fn toggle_reply_voice(
    binder: &SessionBinder,
    ctx: &mut SessionContext,
) -> Result<String, TolkError> {
    let config = ctx.config_mut()?;
    config.reply_with_voice = !config.reply_with_voice;
    let state = if config.reply_with_voice { "ENABLED" } else { "DISABLED" };
    binder.persist(ctx).await?;
    Ok(format!("Reply with voice is now {state}."))
}
