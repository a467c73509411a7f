// SPDX-FileCopyrightText: 2026 Tolk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests: configuration, store factory, session binding, commands
//! and translation, wired the way `tolk serve` wires them but without
//! Telegram or OpenAI.

use std::sync::Arc;

use tolk_core::{ChatId, ChatKind, GroupConfigStore, ReplyStyle, StoreKind};
use tolk_storage::create_store;
use tolk_telegram::commands::{self, Command};
use tolk_telegram::translate;
use tolk_telegram::SessionBinder;
use tolk_test_utils::MockAgent;

const GROUP: ChatId = ChatId(-1001234567890);

fn config_for(backend: &str, dir: &std::path::Path) -> tolk_config::TolkConfig {
    let toml = format!(
        r#"
[storage]
backend = "{backend}"
file_dir = "{files}"
database_path = "{db}"
"#,
        files = dir.join("sessions").display(),
        db = dir.join("bot.db").display(),
    );
    tolk_config::load_and_validate_str(&toml).expect("config should be valid")
}

async fn run(binder: &SessionBinder, command: Command) -> String {
    let mut ctx = binder.bind(GROUP, ChatKind::Group).await;
    commands::execute(binder, &mut ctx, &command).await
}

async fn settings_survive_restart(backend: &str) {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(backend, dir.path());

    {
        let store = create_store(&config.storage).await.unwrap();
        let binder = SessionBinder::new(store.clone());
        assert_eq!(
            run(&binder, Command::SetLanguages("en es".into())).await,
            "Languages set to: en ↔ es"
        );
        run(&binder, Command::SetStyle("inline".into())).await;
        run(&binder, Command::ToggleReplyVoice).await;
        store.shutdown().await.unwrap();
    }

    let store = create_store(&config.storage).await.unwrap();
    let stored = store.get(GROUP).await.unwrap();
    assert_eq!(stored.language_pair.secondary, "es");
    assert_eq!(stored.reply_style, ReplyStyle::Inline);
    assert!(stored.reply_with_voice);
    assert!(stored.enabled);
}

#[tokio::test]
async fn file_backend_settings_survive_restart() {
    settings_survive_restart("file").await;
}

#[tokio::test]
async fn sqlite_backend_settings_survive_restart() {
    settings_survive_restart("embedded-db").await;
}

#[tokio::test]
async fn configured_backend_is_used() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for("memory", dir.path());
    let store = create_store(&config.storage).await.unwrap();
    assert_eq!(store.kind(), StoreKind::Memory);
}

#[tokio::test]
async fn disabled_group_is_not_translated() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for("file", dir.path());
    let store: Arc<dyn GroupConfigStore> = create_store(&config.storage).await.unwrap();
    let binder = SessionBinder::new(store);

    run(&binder, Command::Disable).await;
    let ctx = binder.bind(GROUP, ChatKind::Group).await;
    let record = ctx.config.expect("bound");
    assert!(!translate::should_translate_text(&record, "hello", &config.bot.command_prefix));

    run(&binder, Command::Enable).await;
    let ctx = binder.bind(GROUP, ChatKind::Group).await;
    let record = ctx.config.expect("bound");
    assert!(translate::should_translate_text(&record, "hello", &config.bot.command_prefix));

    let agent = MockAgent::new();
    let reply = translate::translate_text(&agent, GROUP, &record, "xin chào", Some("lan"))
        .await
        .unwrap();
    assert_eq!(reply, "@lan: en:xin chào");
}

#[tokio::test]
async fn private_chat_never_creates_records() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for("file", dir.path());
    let store = create_store(&config.storage).await.unwrap();
    let binder = SessionBinder::new(store);

    let mut ctx = binder.bind(ChatId(99), ChatKind::Private).await;
    let reply = commands::execute(&binder, &mut ctx, &Command::Disable).await;
    assert_eq!(reply, commands::GROUP_ONLY);

    let entries = std::fs::read_dir(dir.path().join("sessions")).unwrap().count();
    assert_eq!(entries, 0);
}
