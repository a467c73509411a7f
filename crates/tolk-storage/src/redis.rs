// SPDX-FileCopyrightText: 2026 Tolk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Redis-backed group config store.
//!
//! Each record is a JSON string under `<namespace>:<chatId>`. Every operation
//! is a single `GET`, `SET` or `DEL`, so whole-record replacement is atomic on
//! the server side.

use async_trait::async_trait;
use redis::AsyncCommands;
use std::time::Duration;

use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use tolk_core::{
    AdapterType, ChatId, GroupConfig, GroupConfigStore, HealthStatus, PluginAdapter, StoreKind,
    TolkError,
};
use tracing::debug;

use crate::codec::decode_or_default;

/// Reconnect attempts before a connect or reconnect gives up.
const CONNECT_RETRIES: usize = 2;
const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);
const RESPONSE_TIMEOUT: Duration = Duration::from_secs(5);

fn connection_config() -> ConnectionManagerConfig {
    ConnectionManagerConfig::new()
        .set_number_of_retries(CONNECT_RETRIES)
        .set_connection_timeout(CONNECT_TIMEOUT)
        .set_response_timeout(RESPONSE_TIMEOUT)
        .set_max_delay(1_000)
}

/// Builds the key a chat's record is stored under.
pub fn redis_key(namespace: &str, chat_id: ChatId) -> String {
    format!("{namespace}:{chat_id}")
}

/// Group config store over a shared, auto-reconnecting Redis connection.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
    namespace: String,
}

impl RedisStore {
    /// Connects to `url` and verifies the server is reachable.
    pub async fn connect(url: &str, namespace: impl Into<String>) -> Result<Self, TolkError> {
        let client = redis::Client::open(url).map_err(|e| TolkError::Storage {
            source: Box::new(e),
        })?;
        let conn = ConnectionManager::new_with_config(client, connection_config())
            .await
            .map_err(|e| TolkError::Storage {
                source: Box::new(e),
            })?;
        let namespace = namespace.into();
        debug!(namespace = %namespace, "redis store connected");
        Ok(Self { conn, namespace })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn key(&self, chat_id: ChatId) -> String {
        redis_key(&self.namespace, chat_id)
    }
}

#[async_trait]
impl PluginAdapter for RedisStore {
    fn name(&self) -> &str {
        "redis"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, TolkError> {
        let mut conn = self.conn.clone();
        match redis::cmd("PING").query_async::<String>(&mut conn).await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(format!("redis ping failed: {e}"))),
        }
    }

    async fn shutdown(&self) -> Result<(), TolkError> {
        Ok(())
    }
}

#[async_trait]
impl GroupConfigStore for RedisStore {
    fn kind(&self) -> StoreKind {
        StoreKind::Redis
    }

    async fn get(&self, chat_id: ChatId) -> Result<GroupConfig, TolkError> {
        let mut conn = self.conn.clone();
        let payload: Option<String> = conn
            .get(self.key(chat_id))
            .await
            .map_err(|e| TolkError::persistence(chat_id, StoreKind::Redis, e))?;
        Ok(match payload {
            Some(payload) => decode_or_default(StoreKind::Redis, chat_id, &payload),
            None => self.default_record(chat_id),
        })
    }

    async fn set(&self, chat_id: ChatId, config: &GroupConfig) -> Result<(), TolkError> {
        let mut record = config.clone();
        record.chat_id = chat_id;
        let payload = record
            .to_json()
            .map_err(|e| TolkError::persistence(chat_id, StoreKind::Redis, e))?;
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(self.key(chat_id), payload)
            .await
            .map_err(|e| TolkError::persistence(chat_id, StoreKind::Redis, e))
    }

    async fn delete(&self, chat_id: ChatId) -> Result<(), TolkError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(self.key(chat_id))
            .await
            .map_err(|e| TolkError::persistence(chat_id, StoreKind::Redis, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_namespace_colon_chat_id() {
        assert_eq!(redis_key("telegram:group", ChatId(-1001)), "telegram:group:-1001");
        assert_eq!(redis_key("bots", ChatId(7)), "bots:7");
    }

    #[tokio::test]
    async fn connect_rejects_malformed_url() {
        let err = RedisStore::connect("not a url", "ns").await.err().unwrap();
        assert!(matches!(err, TolkError::Storage { .. }));
    }
}
