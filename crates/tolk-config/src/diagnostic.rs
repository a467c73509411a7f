// SPDX-FileCopyrightText: 2026 Tolk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Config errors as miette diagnostics, with "did you mean" hints for
//! misspelled keys and store backend names.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use figment::error::Kind;
use miette::Diagnostic;
use thiserror::Error;

/// Jaro-Winkler score a candidate must beat to be suggested.
const SUGGESTION_THRESHOLD: f64 = 0.75;

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A key no section declares, e.g. `bakend` under `[storage]`.
    #[error("unknown configuration key `{key}` in {section}")]
    #[diagnostic(code(tolk::config::unknown_key), help("{}", hint(suggestion.as_deref(), "valid keys", valid_keys)))]
    UnknownKey {
        key: String,
        /// `[storage]`, or `top level` for the root table.
        section: String,
        suggestion: Option<String>,
        valid_keys: String,
    },

    /// A value outside a fixed set, such as an unknown store backend.
    #[error("invalid value `{value}` for `{key}`")]
    #[diagnostic(code(tolk::config::unknown_value), help("{}", hint(suggestion.as_deref(), "accepted values", valid_values)))]
    UnknownValue {
        key: String,
        value: String,
        suggestion: Option<String>,
        valid_values: String,
    },

    /// Raised by `validation` after the config deserialized.
    #[error("validation error: {message}")]
    #[diagnostic(code(tolk::config::validation))]
    Validation { message: String },

    /// Any other load failure: bad types, unreadable files, TOML syntax.
    #[error("{0}")]
    #[diagnostic(code(tolk::config::malformed))]
    Malformed(String),
}

fn hint(suggestion: Option<&str>, what: &str, valid: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? {what}: {valid}"),
        None => format!("{what}: {valid}"),
    }
}

/// Splits a figment error into one diagnostic per underlying failure.
pub fn figment_to_config_errors(err: figment::Error) -> Vec<ConfigError> {
    err.into_iter()
        .map(|error| {
            let path: Vec<&str> = error.path.iter().map(String::as_str).collect();
            match &error.kind {
                Kind::UnknownField(field, expected) => ConfigError::UnknownKey {
                    key: field.clone(),
                    section: match path.first() {
                        Some(section) => format!("[{section}]"),
                        None => "top level".to_string(),
                    },
                    suggestion: suggest_key(field, expected),
                    valid_keys: expected.join(", "),
                },
                Kind::UnknownVariant(value, expected) => ConfigError::UnknownValue {
                    key: path.join("."),
                    value: value.clone(),
                    suggestion: suggest_key(value, expected),
                    valid_values: expected.join(", "),
                },
                _ => ConfigError::Malformed(error.to_string()),
            }
        })
        .collect()
}

/// Best candidate above [`SUGGESTION_THRESHOLD`], if any.
pub fn suggest_key(unknown: &str, candidates: &[&str]) -> Option<String> {
    candidates
        .iter()
        .map(|&c| (strsim::jaro_winkler(unknown, c), c))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, c)| c.to_string())
}

/// Prints each error to stderr with miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    for error in errors {
        let mut buf = String::new();
        if handler.render_report(&mut buf, error as &dyn Diagnostic).is_ok() {
            eprint!("{buf}");
        } else {
            eprintln!("Error: {error}");
        }
    }
}
