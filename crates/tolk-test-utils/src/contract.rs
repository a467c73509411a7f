// SPDX-FileCopyrightText: 2026 Tolk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Behaviour shared by every [`GroupConfigStore`] backend.
//!
//! Each check panics with a descriptive message on violation and uses its own
//! chat ids, so checks can run in any order against one fresh store.

use tolk_core::{ChatId, GroupConfigStore, LanguagePair, ReplyStyle, default_record};

/// Runs every check against `store`.
pub async fn run_store_contract(store: &dyn GroupConfigStore) {
    absent_key_reads_as_default(store).await;
    set_then_get_round_trips(store).await;
    set_replaces_whole_record(store).await;
    delete_restores_default(store).await;
    delete_is_idempotent(store).await;
    enable_toggle_persists(store).await;
    language_pair_update_persists(store).await;
    keys_are_independent(store).await;
    interleaved_updates_last_write_wins(store).await;
}

/// `get` on an unknown chat yields the default and does not create it.
pub async fn absent_key_reads_as_default(store: &dyn GroupConfigStore) {
    let chat = ChatId(-100_000_001);
    let first = store.get(chat).await.expect("get absent");
    assert_eq!(first, default_record(chat), "{}: absent key", store.name());
    // Mutating the returned default must not leak into the store.
    let mut mutated = first;
    mutated.enabled = !mutated.enabled;
    let second = store.get(chat).await.expect("get absent again");
    assert_eq!(second, default_record(chat), "{}: default was persisted", store.name());
}

pub async fn set_then_get_round_trips(store: &dyn GroupConfigStore) {
    let chat = ChatId(-100_000_002);
    let mut config = default_record(chat);
    config.language_pair = LanguagePair {
        primary: "en".to_string(),
        secondary: "es".to_string(),
    };
    config.reply_style = ReplyStyle::Thread;
    config.translate_commands = true;
    config.reply_with_voice = true;
    store.set(chat, &config).await.expect("set");
    assert_eq!(store.get(chat).await.expect("get"), config, "{}: round trip", store.name());
}

pub async fn set_replaces_whole_record(store: &dyn GroupConfigStore) {
    let chat = ChatId(-100_000_003);
    let mut first = default_record(chat);
    first.reply_with_voice = true;
    first.reply_style = ReplyStyle::Inline;
    store.set(chat, &first).await.expect("first set");

    let second = default_record(chat);
    store.set(chat, &second).await.expect("second set");
    assert_eq!(store.get(chat).await.expect("get"), second, "{}: replace", store.name());
}

pub async fn delete_restores_default(store: &dyn GroupConfigStore) {
    let chat = ChatId(-100_000_004);
    let mut config = default_record(chat);
    config.enabled = false;
    store.set(chat, &config).await.expect("set");
    store.delete(chat).await.expect("delete");
    assert_eq!(
        store.get(chat).await.expect("get"),
        default_record(chat),
        "{}: delete then get",
        store.name()
    );
}

pub async fn delete_is_idempotent(store: &dyn GroupConfigStore) {
    let chat = ChatId(-100_000_005);
    store.delete(chat).await.expect("delete absent");
    store.delete(chat).await.expect("delete absent twice");
}

/// `/disable` on a fresh group persists exactly `enabled = false`.
pub async fn enable_toggle_persists(store: &dyn GroupConfigStore) {
    let chat = ChatId(-100_000_006);
    let mut config = store.get(chat).await.expect("get");
    config.enabled = false;
    store.set(chat, &config).await.expect("set");

    let mut expected = default_record(chat);
    expected.enabled = false;
    assert_eq!(store.get(chat).await.expect("get"), expected, "{}: disable", store.name());
}

pub async fn language_pair_update_persists(store: &dyn GroupConfigStore) {
    let chat = ChatId(-100_000_007);
    let mut config = store.get(chat).await.expect("get");
    config.language_pair = LanguagePair {
        primary: "ja".to_string(),
        secondary: "ko".to_string(),
    };
    store.set(chat, &config).await.expect("set");
    let read = store.get(chat).await.expect("get");
    assert_eq!(read.language_pair.primary, "ja");
    assert_eq!(read.language_pair.secondary, "ko");
    assert_eq!(read.reply_style, ReplyStyle::Reply);
}

pub async fn keys_are_independent(store: &dyn GroupConfigStore) {
    let a = ChatId(-100_000_008);
    let b = ChatId(-100_000_009);
    let mut config_a = default_record(a);
    config_a.enabled = false;
    store.set(a, &config_a).await.expect("set a");
    assert_eq!(store.get(b).await.expect("get b"), default_record(b));

    store.delete(b).await.expect("delete b");
    assert!(!store.get(a).await.expect("get a").enabled, "{}: delete leaked", store.name());
}

/// Two read-modify-write cycles on the same chat, interleaved: both read,
/// then both write. The second write carries the stale copy of the first
/// writer's field, so the first update is lost.
pub async fn interleaved_updates_last_write_wins(store: &dyn GroupConfigStore) {
    let chat = ChatId(-100_000_010);
    let mut first = store.get(chat).await.expect("first read");
    let mut second = store.get(chat).await.expect("second read");

    first.enabled = false;
    second.reply_style = ReplyStyle::Thread;
    store.set(chat, &first).await.expect("first write");
    store.set(chat, &second).await.expect("second write");

    let read = store.get(chat).await.expect("final read");
    assert_eq!(read.reply_style, ReplyStyle::Thread);
    assert!(read.enabled, "{}: expected the earlier update to be overwritten", store.name());
}
