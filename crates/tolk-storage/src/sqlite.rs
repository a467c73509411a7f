// SPDX-FileCopyrightText: 2026 Tolk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-backed group config store.

use async_trait::async_trait;
use rusqlite::OptionalExtension;
use tolk_core::{
    AdapterType, ChatId, GroupConfig, GroupConfigStore, HealthStatus, PluginAdapter, StoreKind,
    TolkError,
};
use tracing::debug;

use crate::codec::decode_or_default;
use crate::database::{Database, map_tr_err};

/// Stores one row per group in the `group_configs` table.
///
/// All statements run on tokio-rusqlite's single connection thread, so a
/// `set` is one upsert and readers never see a partial row.
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    /// Opens (or creates) the database at `path` and runs migrations.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, TolkError> {
        let db = Database::open(path, wal_mode).await?;
        debug!(path, "SQLite store initialized");
        Ok(Self { db })
    }

    pub fn from_database(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PluginAdapter for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, TolkError> {
        self.db
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), TolkError> {
        self.db.checkpoint().await
    }
}

#[async_trait]
impl GroupConfigStore for SqliteStore {
    fn kind(&self) -> StoreKind {
        StoreKind::Sqlite
    }

    async fn get(&self, chat_id: ChatId) -> Result<GroupConfig, TolkError> {
        let id = chat_id.0;
        let payload = self
            .db
            .connection()
            .call(move |conn| -> Result<Option<String>, rusqlite::Error> {
                conn.query_row(
                    "SELECT config FROM group_configs WHERE chat_id = ?1",
                    rusqlite::params![id],
                    |row| row.get(0),
                )
                .optional()
            })
            .await
            .map_err(|e| TolkError::persistence(chat_id, StoreKind::Sqlite, e))?;
        Ok(match payload {
            Some(payload) => decode_or_default(StoreKind::Sqlite, chat_id, &payload),
            None => self.default_record(chat_id),
        })
    }

    async fn set(&self, chat_id: ChatId, config: &GroupConfig) -> Result<(), TolkError> {
        let mut record = config.clone();
        record.chat_id = chat_id;
        let payload = record
            .to_json()
            .map_err(|e| TolkError::persistence(chat_id, StoreKind::Sqlite, e))?;
        let id = chat_id.0;
        self.db
            .connection()
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.execute(
                    "INSERT INTO group_configs (chat_id, config, updated_at)
                     VALUES (?1, ?2, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
                     ON CONFLICT(chat_id) DO UPDATE SET
                         config = excluded.config,
                         updated_at = excluded.updated_at",
                    rusqlite::params![id, payload],
                )?;
                Ok(())
            })
            .await
            .map_err(|e| TolkError::persistence(chat_id, StoreKind::Sqlite, e))
    }

    async fn delete(&self, chat_id: ChatId) -> Result<(), TolkError> {
        let id = chat_id.0;
        self.db
            .connection()
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.execute(
                    "DELETE FROM group_configs WHERE chat_id = ?1",
                    rusqlite::params![id],
                )?;
                Ok(())
            })
            .await
            .map_err(|e| TolkError::persistence(chat_id, StoreKind::Sqlite, e))
    }
}
