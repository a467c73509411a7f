// SPDX-FileCopyrightText: 2026 Tolk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Translation agent trait for language-model collaborators.

use async_trait::async_trait;

use crate::error::TolkError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{TranslationRequest, TranslationResponse};

/// A remote language-model agent that can translate, transcribe and speak.
///
/// The agent reads nothing from and writes nothing to the config store; the
/// caller passes the language pair taken from the group's record.
#[async_trait]
pub trait TranslationAgent: PluginAdapter {
    /// Translates text between the request's languages.
    async fn translate(
        &self,
        request: TranslationRequest,
    ) -> Result<TranslationResponse, TolkError>;

    /// Converts recorded audio (OGG/Opus voice notes) to text.
    async fn transcribe(&self, audio: Vec<u8>) -> Result<String, TolkError>;

    /// Synthesizes speech for `text`, returning encoded audio bytes.
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, TolkError>;
}
