// SPDX-FileCopyrightText: 2026 Tolk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tolk check` command implementation.
//!
//! Runs diagnostic checks against the configured store and external services
//! and prints one line per check.

use std::io::IsTerminal;
use std::time::{Duration, Instant};

use tolk_config::model::TolkConfig;
use tolk_core::{HealthStatus, PluginAdapter, TolkError};
use tolk_openai::OpenAiAgent;
use tolk_storage::create_store;
use tolk_telegram::check_token;

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

impl CheckResult {
    fn new(name: &str, status: CheckStatus, message: impl Into<String>, start: Instant) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: message.into(),
            duration: start.elapsed(),
        }
    }
}

/// Run the `tolk check` command.
///
/// Returns an error when any check fails so the exit code reflects it.
pub async fn run_check(config: &TolkConfig, plain: bool) -> Result<(), TolkError> {
    let use_color = !plain && std::io::stdout().is_terminal();

    let results = vec![
        check_store(config).await,
        check_openai(config),
        check_telegram(config).await,
    ];

    println!();
    println!("  tolk check");
    println!("  {}", "-".repeat(50));

    let mut fail_count = 0;
    let mut warn_count = 0;
    for result in &results {
        match result.status {
            CheckStatus::Pass => {}
            CheckStatus::Warn => warn_count += 1,
            CheckStatus::Fail => fail_count += 1,
        }
        println!("{}", format_line(result, use_color));
    }

    println!();
    if fail_count > 0 || warn_count > 0 {
        let issues = fail_count + warn_count;
        let issue_word = if issues == 1 { "issue" } else { "issues" };
        println!("  {issues} {issue_word} found.");
    } else {
        println!("  All checks passed.");
    }
    println!();

    if fail_count > 0 {
        return Err(TolkError::Internal(format!("{fail_count} check(s) failed")));
    }
    Ok(())
}

fn format_line(result: &CheckResult, use_color: bool) -> String {
    let duration_ms = result.duration.as_millis();
    if use_color {
        use colored::Colorize;
        let (symbol, message) = match result.status {
            CheckStatus::Pass => ("✓".green(), result.message.normal()),
            CheckStatus::Warn => ("!".yellow(), result.message.yellow()),
            CheckStatus::Fail => ("✗".red(), result.message.red()),
        };
        format!("    {symbol} {:<20} {message} ({duration_ms}ms)", result.name)
    } else {
        let tag = match result.status {
            CheckStatus::Pass => "[OK]  ",
            CheckStatus::Warn => "[WARN]",
            CheckStatus::Fail => "[FAIL]",
        };
        format!("    {tag} {:<20} {} ({duration_ms}ms)", result.name, result.message)
    }
}

fn health_to_result(name: &str, health: HealthStatus, start: Instant) -> CheckResult {
    match health {
        HealthStatus::Healthy => CheckResult::new(name, CheckStatus::Pass, "healthy", start),
        HealthStatus::Degraded(msg) => CheckResult::new(name, CheckStatus::Warn, msg, start),
        HealthStatus::Unhealthy(msg) => CheckResult::new(name, CheckStatus::Fail, msg, start),
    }
}

/// Opens the configured store and runs its health check.
async fn check_store(config: &TolkConfig) -> CheckResult {
    let start = Instant::now();
    let name = "Config store";
    let store = match create_store(&config.storage).await {
        Ok(store) => store,
        Err(e) => return CheckResult::new(name, CheckStatus::Fail, format!("open failed: {e}"), start),
    };
    let result = match store.health_check().await {
        Ok(health) => {
            let mut result = health_to_result(name, health, start);
            if result.status == CheckStatus::Pass {
                result.message = format!("{} backend healthy", store.kind());
            }
            result
        }
        Err(e) => CheckResult::new(name, CheckStatus::Fail, e.to_string(), start),
    };
    let _ = store.shutdown().await;
    result
}

/// Verifies an OpenAI key is configured. Makes no API call.
fn check_openai(config: &TolkConfig) -> CheckResult {
    let start = Instant::now();
    match OpenAiAgent::new(&config.openai) {
        Ok(_) => CheckResult::new(
            "OpenAI",
            CheckStatus::Pass,
            format!("key configured, model {}", config.openai.model),
            start,
        ),
        Err(e) => CheckResult::new("OpenAI", CheckStatus::Fail, e.to_string(), start),
    }
}

/// Calls `getMe` with the configured bot token.
async fn check_telegram(config: &TolkConfig) -> CheckResult {
    let start = Instant::now();
    match check_token(&config.telegram).await {
        Ok(health) => health_to_result("Telegram", health, start),
        Err(e) => CheckResult::new("Telegram", CheckStatus::Fail, e.to_string(), start),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tolk_core::StoreKind;

    fn memory_config() -> TolkConfig {
        let mut config = TolkConfig::default();
        config.storage.backend = StoreKind::Memory;
        config
    }

    #[tokio::test]
    async fn memory_store_check_passes() {
        let result = check_store(&memory_config()).await;
        assert_eq!(result.status, CheckStatus::Pass);
        assert!(result.message.contains("memory"));
    }

    #[tokio::test]
    async fn sqlite_store_check_creates_database() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = TolkConfig::default();
        config.storage.database_path = dir.path().join("bot.db").to_string_lossy().into_owned();
        let result = check_store(&config).await;
        assert_eq!(result.status, CheckStatus::Pass, "{}", result.message);
    }

    #[tokio::test]
    async fn missing_telegram_token_fails() {
        let mut config = memory_config();
        config.telegram.bot_token = None;
        let result = check_telegram(&config).await;
        assert_eq!(result.status, CheckStatus::Fail);
        assert!(result.message.contains("bot_token"));
    }

    #[test]
    fn plain_lines_use_tags() {
        let result = CheckResult {
            name: "Config store".into(),
            status: CheckStatus::Warn,
            message: "slow".into(),
            duration: Duration::from_millis(3),
        };
        let line = format_line(&result, false);
        assert!(line.starts_with("    [WARN] Config store"));
        assert!(line.ends_with("slow (3ms)"));
    }
}
