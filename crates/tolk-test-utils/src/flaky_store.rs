// SPDX-FileCopyrightText: 2026 Tolk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A working store with a scripted number of read failures.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use tolk_core::{
    AdapterType, ChatId, GroupConfig, GroupConfigStore, HealthStatus, PluginAdapter, StoreKind,
    TolkError,
};

/// Wraps a real store and fails its next `n` reads with
/// [`TolkError::Persistence`]. Writes and deletes always reach the inner store.
pub struct FlakyStore {
    inner: Arc<dyn GroupConfigStore>,
    failing_reads: AtomicUsize,
}

impl FlakyStore {
    pub fn new(inner: Arc<dyn GroupConfigStore>) -> Self {
        Self {
            inner,
            failing_reads: AtomicUsize::new(0),
        }
    }

    pub fn fail_next_reads(self, n: usize) -> Self {
        self.failing_reads.store(n, Ordering::SeqCst);
        self
    }

    fn take_failure(&self) -> bool {
        self.failing_reads
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl PluginAdapter for FlakyStore {
    fn name(&self) -> &str {
        "flaky-store"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, TolkError> {
        self.inner.health_check().await
    }

    async fn shutdown(&self) -> Result<(), TolkError> {
        self.inner.shutdown().await
    }
}

#[async_trait]
impl GroupConfigStore for FlakyStore {
    fn kind(&self) -> StoreKind {
        self.inner.kind()
    }

    async fn get(&self, chat_id: ChatId) -> Result<GroupConfig, TolkError> {
        if self.take_failure() {
            return Err(TolkError::persistence(
                chat_id,
                self.kind(),
                std::io::Error::other("simulated get failure"),
            ));
        }
        self.inner.get(chat_id).await
    }

    async fn set(&self, chat_id: ChatId, config: &GroupConfig) -> Result<(), TolkError> {
        self.inner.set(chat_id, config).await
    }

    async fn delete(&self, chat_id: ChatId) -> Result<(), TolkError> {
        self.inner.delete(chat_id).await
    }
}
