// SPDX-FileCopyrightText: 2026 Tolk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for tolk.
//!
//! This crate provides the per-group configuration record, the store contract
//! every persistence backend implements, the translation agent contract, and
//! the shared error type. Backends and channel glue live in other crates and
//! depend only on what is defined here.

pub mod error;
pub mod record;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::TolkError;
pub use record::{GroupConfig, LanguagePair, ReplyStyle, default_record};
pub use types::{
    AdapterType, ChatId, ChatKind, HealthStatus, StoreKind, TranslationRequest,
    TranslationResponse,
};

pub use traits::{GroupConfigStore, PluginAdapter, TranslationAgent};
