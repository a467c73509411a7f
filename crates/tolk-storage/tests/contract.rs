// SPDX-FileCopyrightText: 2026 Tolk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Every backend against the shared store contract, plus durability across
//! store instances for the backends that outlive the process.

use tempfile::tempdir;
use std::time::{Duration, Instant};

use tolk_core::{ChatId, GroupConfigStore, LanguagePair, PluginAdapter, ReplyStyle, default_record};
use tolk_storage::{FileStore, MemoryStore, RedisStore, SqliteStore};
use tolk_test_utils::run_store_contract;

fn customized(chat_id: ChatId) -> tolk_core::GroupConfig {
    let mut config = default_record(chat_id);
    config.language_pair = LanguagePair {
        primary: "en".to_string(),
        secondary: "fr".to_string(),
    };
    config.enabled = false;
    config.reply_style = ReplyStyle::Inline;
    config
}

#[tokio::test]
async fn memory_store_satisfies_contract() {
    let store = MemoryStore::new();
    run_store_contract(&store).await;
}

#[tokio::test]
async fn file_store_satisfies_contract() {
    let dir = tempdir().unwrap();
    let store = FileStore::open(dir.path()).await.unwrap();
    run_store_contract(&store).await;
}

#[tokio::test]
async fn sqlite_store_satisfies_contract() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bot.db");
    let store = SqliteStore::open(path.to_str().unwrap(), true).await.unwrap();
    run_store_contract(&store).await;
    store.shutdown().await.unwrap();
}

#[tokio::test]
async fn file_store_survives_reopen() {
    let dir = tempdir().unwrap();
    let chat = ChatId(-42);
    {
        let store = FileStore::open(dir.path()).await.unwrap();
        store.set(chat, &customized(chat)).await.unwrap();
    }
    let reopened = FileStore::open(dir.path()).await.unwrap();
    assert_eq!(reopened.get(chat).await.unwrap(), customized(chat));
}

#[tokio::test]
async fn sqlite_store_survives_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bot.db");
    let path = path.to_str().unwrap();
    let chat = ChatId(-43);
    {
        let store = SqliteStore::open(path, true).await.unwrap();
        store.set(chat, &customized(chat)).await.unwrap();
        store.shutdown().await.unwrap();
    }
    let reopened = SqliteStore::open(path, true).await.unwrap();
    assert_eq!(reopened.get(chat).await.unwrap(), customized(chat));
}

#[tokio::test]
async fn file_store_read_of_absent_chat_writes_nothing() {
    let dir = tempdir().unwrap();
    let chat = ChatId(-46);
    {
        let store = FileStore::open(dir.path()).await.unwrap();
        assert_eq!(store.get(chat).await.unwrap(), default_record(chat));
    }
    assert!(!dir.path().join(tolk_storage::file::file_name(chat)).exists());

    let reopened = FileStore::open(dir.path()).await.unwrap();
    assert_eq!(reopened.get(chat).await.unwrap(), default_record(chat));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn sqlite_store_read_of_absent_chat_writes_nothing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bot.db");
    let path = path.to_str().unwrap();
    let chat = ChatId(-47);
    {
        let store = SqliteStore::open(path, true).await.unwrap();
        assert_eq!(store.get(chat).await.unwrap(), default_record(chat));
        store.shutdown().await.unwrap();
    }
    let reopened = SqliteStore::open(path, true).await.unwrap();
    assert_eq!(reopened.get(chat).await.unwrap(), default_record(chat));

    let rows: i64 = tolk_storage::Database::open(path, true)
        .await
        .unwrap()
        .connection()
        .call(|conn| -> Result<i64, rusqlite::Error> {
            conn.query_row("SELECT COUNT(*) FROM group_configs", [], |row| row.get(0))
        })
        .await
        .unwrap();
    assert_eq!(rows, 0);
}

#[tokio::test]
async fn file_written_by_one_handle_is_visible_to_another() {
    let dir = tempdir().unwrap();
    let writer = FileStore::open(dir.path()).await.unwrap();
    let reader = FileStore::open(dir.path()).await.unwrap();
    let chat = ChatId(-44);
    writer.set(chat, &customized(chat)).await.unwrap();
    assert_eq!(reader.get(chat).await.unwrap(), customized(chat));
    writer.delete(chat).await.unwrap();
    assert_eq!(reader.get(chat).await.unwrap(), default_record(chat));
}

#[tokio::test]
async fn concurrent_sets_on_distinct_chats_all_land() {
    let dir = tempdir().unwrap();
    let store = std::sync::Arc::new(FileStore::open(dir.path()).await.unwrap());
    let mut handles = Vec::new();
    for id in 0..16_i64 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            let chat = ChatId(-1000 - id);
            store.set(chat, &customized(chat)).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }
    for id in 0..16_i64 {
        let chat = ChatId(-1000 - id);
        assert_eq!(store.get(chat).await.unwrap(), customized(chat));
    }
}

/// Runs only when `TOLK_TEST_REDIS_URL` points at a disposable Redis server.
#[tokio::test]
async fn redis_store_satisfies_contract() {
    let Ok(url) = std::env::var("TOLK_TEST_REDIS_URL") else {
        return;
    };
    let namespace = format!("tolk-test:{}", std::process::id());
    let store = RedisStore::connect(&url, namespace.clone()).await.unwrap();
    run_store_contract(&store).await;

    let chat = ChatId(-45);
    store.set(chat, &customized(chat)).await.unwrap();
    let second = RedisStore::connect(&url, namespace).await.unwrap();
    assert_eq!(second.get(chat).await.unwrap(), customized(chat));
}

#[tokio::test]
async fn unreachable_redis_fails_to_connect() {
    let started = Instant::now();
    let result = RedisStore::connect("redis://127.0.0.1:1", "ns").await;
    assert!(result.is_err());
    assert!(
        started.elapsed() < Duration::from_secs(30),
        "connect took {:?}",
        started.elapsed()
    );
}
