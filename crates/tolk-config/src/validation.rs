// SPDX-FileCopyrightText: 2026 Tolk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes:
//! the selected store backend must have a usable location, the log level must
//! be one tracing understands, and the command prefix must be a single token.

use tolk_core::StoreKind;

use crate::diagnostic::ConfigError;
use crate::model::TolkConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &TolkConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.bot.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "bot.log_level `{}` is not one of {}",
                config.bot.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    let prefix = &config.bot.command_prefix;
    if prefix.is_empty() || prefix.chars().any(char::is_whitespace) {
        errors.push(ConfigError::Validation {
            message: "bot.command_prefix must be a non-empty token without whitespace"
                .to_string(),
        });
    }

    // Only the selected backend's settings matter.
    let storage = &config.storage;
    match storage.backend {
        StoreKind::Memory => {}
        StoreKind::File => {
            if storage.file_dir.trim().is_empty() {
                errors.push(ConfigError::Validation {
                    message: "storage.file_dir must not be empty when backend is `file`"
                        .to_string(),
                });
            }
        }
        StoreKind::Redis => {
            let url = storage.redis_url.trim();
            if !(url.starts_with("redis://") || url.starts_with("rediss://")) {
                errors.push(ConfigError::Validation {
                    message: format!(
                        "storage.redis_url `{url}` must start with redis:// or rediss://"
                    ),
                });
            }
            if storage.redis_namespace.trim().is_empty() {
                errors.push(ConfigError::Validation {
                    message: "storage.redis_namespace must not be empty".to_string(),
                });
            }
        }
        StoreKind::Sqlite => {
            if storage.database_path.trim().is_empty() {
                errors.push(ConfigError::Validation {
                    message: "storage.database_path must not be empty when backend is `sqlite`"
                        .to_string(),
                });
            }
        }
    }

    if config.openai.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "openai.timeout_secs must be at least 1".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
