// SPDX-FileCopyrightText: 2026 Tolk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend selection. The only place that branches on [`StoreKind`].

use std::str::FromStr;
use std::sync::Arc;

use tolk_config::model::StorageConfig;
use tolk_core::{GroupConfigStore, StoreKind, TolkError};
use tracing::info;

use crate::file::FileStore;
use crate::memory::MemoryStore;
use crate::redis::RedisStore;
use crate::sqlite::SqliteStore;

/// Builds the backend selected by `config.backend`.
pub async fn create_store(config: &StorageConfig) -> Result<Arc<dyn GroupConfigStore>, TolkError> {
    build(config.backend, config).await
}

/// Builds the backend named `kind`, using `config` for its settings.
///
/// Names are matched case-insensitively and accept the aliases understood by
/// [`StoreKind`]. Anything else is [`TolkError::UnknownBackend`].
pub async fn create_store_named(
    kind: &str,
    config: &StorageConfig,
) -> Result<Arc<dyn GroupConfigStore>, TolkError> {
    let kind =
        StoreKind::from_str(kind.trim()).map_err(|_| TolkError::UnknownBackend(kind.to_string()))?;
    build(kind, config).await
}

async fn build(kind: StoreKind, config: &StorageConfig) -> Result<Arc<dyn GroupConfigStore>, TolkError> {
    let store: Arc<dyn GroupConfigStore> = match kind {
        StoreKind::Memory => Arc::new(MemoryStore::new()),
        StoreKind::File => Arc::new(FileStore::open(&config.file_dir).await?),
        StoreKind::Redis => {
            Arc::new(RedisStore::connect(&config.redis_url, config.redis_namespace.clone()).await?)
        }
        StoreKind::Sqlite => {
            Arc::new(SqliteStore::open(&config.database_path, config.wal_mode).await?)
        }
    };
    info!(backend = %kind, "group config store ready");
    Ok(store)
}
