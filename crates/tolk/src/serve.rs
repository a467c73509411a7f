// SPDX-FileCopyrightText: 2026 Tolk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tolk serve` command implementation.
//!
//! Builds the configured group config store, the OpenAI agent and the
//! Telegram bot, then polls until Ctrl-C and closes the store.

use std::sync::Arc;

use tolk_config::model::TolkConfig;
use tolk_core::{GroupConfigStore, PluginAdapter, TolkError, TranslationAgent};
use tolk_openai::OpenAiAgent;
use tolk_storage::create_store;
use tolk_telegram::{SessionBinder, TelegramBot};
use tracing::{error, info, warn};

/// Runs the `tolk serve` command.
pub async fn run_serve(config: TolkConfig) -> Result<(), TolkError> {
    init_tracing(&config.bot.log_level);
    info!(name = %config.bot.name, backend = %config.storage.backend, "starting tolk");

    let store: Arc<dyn GroupConfigStore> = create_store(&config.storage).await?;
    let agent: Arc<dyn TranslationAgent> = Arc::new(OpenAiAgent::new(&config.openai)?);
    let bot = TelegramBot::new(
        &config.telegram,
        &config.bot,
        SessionBinder::new(store.clone()),
        agent.clone(),
    )?;

    if let Err(e) = bot.register_commands().await {
        warn!(error = %e, "continuing without registered command list");
    }

    bot.run().await;

    info!("shutting down");
    if let Err(e) = agent.shutdown().await {
        error!(error = %e, "agent shutdown failed");
    }
    store.shutdown().await?;
    info!("store closed");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
///
/// `RUST_LOG` overrides the configured level when set.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tolk={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
