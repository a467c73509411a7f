// SPDX-FileCopyrightText: 2026 Tolk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A store whose medium is permanently broken.

use async_trait::async_trait;

use tolk_core::{
    AdapterType, ChatId, GroupConfig, GroupConfigStore, HealthStatus, PluginAdapter, StoreKind,
    TolkError,
};

/// Store double that fails every write with [`TolkError::Persistence`].
///
/// Reads return the seeded record (or the default) unless
/// [`FailingStore::failing_reads`] was set, in which case they fail too.
#[derive(Debug, Clone)]
pub struct FailingStore {
    kind: StoreKind,
    seeded: Option<GroupConfig>,
    fail_reads: bool,
}

impl FailingStore {
    /// A store reporting itself as `kind` in errors.
    pub fn new(kind: StoreKind) -> Self {
        Self {
            kind,
            seeded: None,
            fail_reads: false,
        }
    }

    /// Reads of `config.chat_id` return `config`.
    pub fn with_record(mut self, config: GroupConfig) -> Self {
        self.seeded = Some(config);
        self
    }

    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    fn error(&self, chat_id: ChatId, op: &str) -> TolkError {
        TolkError::persistence(
            chat_id,
            self.kind,
            std::io::Error::other(format!("simulated {op} failure")),
        )
    }
}

impl Default for FailingStore {
    fn default() -> Self {
        Self::new(StoreKind::Redis)
    }
}

#[async_trait]
impl PluginAdapter for FailingStore {
    fn name(&self) -> &str {
        "failing-store"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, TolkError> {
        Ok(HealthStatus::Unhealthy("simulated outage".to_string()))
    }

    async fn shutdown(&self) -> Result<(), TolkError> {
        Ok(())
    }
}

#[async_trait]
impl GroupConfigStore for FailingStore {
    fn kind(&self) -> StoreKind {
        self.kind
    }

    async fn get(&self, chat_id: ChatId) -> Result<GroupConfig, TolkError> {
        if self.fail_reads {
            return Err(self.error(chat_id, "get"));
        }
        Ok(match &self.seeded {
            Some(config) if config.chat_id == chat_id => config.clone(),
            _ => self.default_record(chat_id),
        })
    }

    async fn set(&self, chat_id: ChatId, _config: &GroupConfig) -> Result<(), TolkError> {
        Err(self.error(chat_id, "set"))
    }

    async fn delete(&self, chat_id: ChatId) -> Result<(), TolkError> {
        Err(self.error(chat_id, "delete"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_fail_with_persistence_error() {
        let store = FailingStore::new(StoreKind::File);
        let err = store
            .set(ChatId(2), &tolk_core::default_record(ChatId(2)))
            .await
            .unwrap_err();
        assert!(err.is_persistence());
        assert!(store.delete(ChatId(2)).await.unwrap_err().is_persistence());
    }

    #[tokio::test]
    async fn reads_return_seeded_record_unless_failing() {
        let mut seeded = tolk_core::default_record(ChatId(3));
        seeded.enabled = false;
        let store = FailingStore::default().with_record(seeded.clone());
        assert_eq!(store.get(ChatId(3)).await.unwrap(), seeded);
        assert!(store.get(ChatId(4)).await.unwrap().enabled);

        let store = store.failing_reads();
        assert!(store.get(ChatId(3)).await.is_err());
    }
}
