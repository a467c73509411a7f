// SPDX-FileCopyrightText: 2026 Tolk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./tolk.toml` > `~/.config/tolk/tolk.toml` > `/etc/tolk/tolk.toml`
//! with environment variable overrides via `TOLK_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::TolkConfig;

/// Conventional deployment variables accepted without the `TOLK_` prefix.
const LEGACY_ENV_KEYS: &[(&str, &str)] = &[
    ("telegram_bot_token", "telegram.bot_token"),
    ("openai_api_key", "openai.api_key"),
    ("redis_url", "storage.redis_url"),
    ("file_store_dir", "storage.file_dir"),
];

/// Top-level sections addressable through `TOLK_<SECTION>_<KEY>`.
const ENV_SECTIONS: &[&str] = &["bot", "telegram", "openai", "storage"];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/tolk/tolk.toml` (system-wide)
/// 3. `~/.config/tolk/tolk.toml` (user XDG config)
/// 4. `./tolk.toml` (local directory)
/// 5. `TELEGRAM_BOT_TOKEN`, `OPENAI_API_KEY`, `REDIS_URL`, `FILE_STORE_DIR`
/// 6. `TOLK_*` environment variables
pub fn load_config() -> Result<TolkConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<TolkConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TolkConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TolkConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TolkConfig::default()))
        .merge(Toml::file(path))
        .merge(legacy_env_provider())
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(TolkConfig::default()))
        .merge(Toml::file("/etc/tolk/tolk.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("tolk/tolk.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("tolk.toml"))
        .merge(legacy_env_provider())
        .merge(env_provider())
}

/// Maps the unprefixed deployment variables onto their config keys.
fn legacy_env_provider() -> Env {
    let names: Vec<&str> = LEGACY_ENV_KEYS.iter().map(|(name, _)| *name).collect();
    Env::raw().only(&names).map(|key| {
        let lowered = key.as_str().to_ascii_lowercase();
        LEGACY_ENV_KEYS
            .iter()
            .find(|(name, _)| *name == lowered)
            .map(|(_, path)| (*path).into())
            .unwrap_or_else(|| lowered.into())
    })
}

/// Create the `TOLK_` environment provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `TOLK_TELEGRAM_BOT_TOKEN` must map to `telegram.bot_token`,
/// not `telegram.bot.token`.
fn env_provider() -> Env {
    Env::prefixed("TOLK_").map(|key| {
        // `key` keeps the variable's case with the prefix stripped.
        // Example: TOLK_STORAGE_REDIS_URL -> "STORAGE_REDIS_URL" -> "storage.redis_url"
        let lowered = key.as_str().to_ascii_lowercase();
        for section in ENV_SECTIONS {
            if let Some(rest) = lowered
                .strip_prefix(section)
                .and_then(|r| r.strip_prefix('_'))
            {
                return format!("{section}.{rest}").into();
            }
        }
        lowered.into()
    })
}
