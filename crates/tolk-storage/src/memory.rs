// SPDX-FileCopyrightText: 2026 Tolk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-local group config store.

use async_trait::async_trait;
use dashmap::DashMap;
use tolk_core::{
    AdapterType, ChatId, GroupConfig, GroupConfigStore, HealthStatus, PluginAdapter, StoreKind,
    TolkError,
};

/// Keeps records in a concurrent map for the lifetime of the process.
///
/// Readers receive clones, so mutating a returned record never changes what
/// is stored until it is passed back to [`GroupConfigStore::set`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: DashMap<ChatId, GroupConfig>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl PluginAdapter for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, TolkError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), TolkError> {
        Ok(())
    }
}

#[async_trait]
impl GroupConfigStore for MemoryStore {
    fn kind(&self) -> StoreKind {
        StoreKind::Memory
    }

    async fn get(&self, chat_id: ChatId) -> Result<GroupConfig, TolkError> {
        Ok(self
            .records
            .get(&chat_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_else(|| self.default_record(chat_id)))
    }

    async fn set(&self, chat_id: ChatId, config: &GroupConfig) -> Result<(), TolkError> {
        let mut record = config.clone();
        record.chat_id = chat_id;
        self.records.insert(chat_id, record);
        Ok(())
    }

    async fn delete(&self, chat_id: ChatId) -> Result<(), TolkError> {
        self.records.remove(&chat_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_absent_does_not_insert() {
        let store = MemoryStore::new();
        let config = store.get(ChatId(-10)).await.unwrap();
        assert_eq!(config, tolk_core::default_record(ChatId(-10)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn returned_record_is_a_copy() {
        let store = MemoryStore::new();
        store
            .set(ChatId(1), &tolk_core::default_record(ChatId(1)))
            .await
            .unwrap();
        let mut copy = store.get(ChatId(1)).await.unwrap();
        copy.enabled = false;
        assert!(store.get(ChatId(1)).await.unwrap().enabled);
    }
}
