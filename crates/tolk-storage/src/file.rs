// SPDX-FileCopyrightText: 2026 Tolk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-JSON-file-per-group store.
//!
//! Records live at `<dir>/group_<chatId>.json`. Writes go to a uniquely named
//! temp file in the same directory which is flushed and then renamed over the
//! target, so a reader sees either the old file or the new one.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tolk_core::{
    AdapterType, ChatId, GroupConfig, GroupConfigStore, HealthStatus, PluginAdapter, StoreKind,
    TolkError,
};
use tracing::{debug, warn};

use crate::codec::decode_or_default;

/// File name for a chat's record.
pub fn file_name(chat_id: ChatId) -> String {
    format!("group_{chat_id}.json")
}

/// Stores each group's record as its own JSON file.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens a store rooted at `dir`, creating the directory if needed.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, TolkError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| TolkError::Storage {
                source: Box::new(e),
            })?;
        debug!(dir = %dir.display(), "file store opened");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of the record file for `chat_id`.
    pub fn path_for(&self, chat_id: ChatId) -> PathBuf {
        self.dir.join(file_name(chat_id))
    }

    fn temp_path_for(&self, chat_id: ChatId) -> PathBuf {
        self.dir
            .join(format!(".group_{chat_id}.{}.tmp", uuid::Uuid::new_v4()))
    }

    async fn write_atomically(&self, target: &Path, tmp: &Path, payload: &[u8]) -> std::io::Result<()> {
        let mut file = tokio::fs::File::create(tmp).await?;
        file.write_all(payload).await?;
        file.sync_all().await?;
        drop(file);
        tokio::fs::rename(tmp, target).await
    }
}

#[async_trait]
impl PluginAdapter for FileStore {
    fn name(&self) -> &str {
        "file"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, TolkError> {
        match tokio::fs::metadata(&self.dir).await {
            Ok(meta) if meta.is_dir() => Ok(HealthStatus::Healthy),
            Ok(_) => Ok(HealthStatus::Unhealthy(format!(
                "{} is not a directory",
                self.dir.display()
            ))),
            Err(e) => Ok(HealthStatus::Unhealthy(format!(
                "{}: {e}",
                self.dir.display()
            ))),
        }
    }

    async fn shutdown(&self) -> Result<(), TolkError> {
        Ok(())
    }
}

#[async_trait]
impl GroupConfigStore for FileStore {
    fn kind(&self) -> StoreKind {
        StoreKind::File
    }

    async fn get(&self, chat_id: ChatId) -> Result<GroupConfig, TolkError> {
        let path = self.path_for(chat_id);
        match tokio::fs::read_to_string(&path).await {
            Ok(payload) => Ok(decode_or_default(StoreKind::File, chat_id, &payload)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(self.default_record(chat_id)),
            Err(e) => {
                warn!(
                    chat_id = %chat_id,
                    path = %path.display(),
                    error = %e,
                    "unreadable group config file, using defaults"
                );
                Ok(self.default_record(chat_id))
            }
        }
    }

    async fn set(&self, chat_id: ChatId, config: &GroupConfig) -> Result<(), TolkError> {
        let mut record = config.clone();
        record.chat_id = chat_id;
        let payload = record
            .to_json()
            .map_err(|e| TolkError::persistence(chat_id, StoreKind::File, e))?;

        let target = self.path_for(chat_id);
        let tmp = self.temp_path_for(chat_id);
        if let Err(e) = self
            .write_atomically(&target, &tmp, payload.as_bytes())
            .await
        {
            // The target is untouched; only the temp file may be left behind.
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(TolkError::persistence(chat_id, StoreKind::File, e));
        }
        debug!(chat_id = %chat_id, path = %target.display(), "group config written");
        Ok(())
    }

    async fn delete(&self, chat_id: ChatId) -> Result<(), TolkError> {
        match tokio::fs::remove_file(self.path_for(chat_id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(TolkError::persistence(chat_id, StoreKind::File, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use tolk_core::default_record;

    #[test]
    fn file_name_uses_group_prefix() {
        assert_eq!(file_name(ChatId(-100123)), "group_-100123.json");
    }

    #[tokio::test]
    async fn set_writes_camel_case_json_and_leaves_no_temp_files() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();
        store.set(ChatId(3), &default_record(ChatId(3))).await.unwrap();

        let raw = std::fs::read_to_string(dir.path().join("group_3.json")).unwrap();
        assert!(raw.contains("\"languagePair\""));

        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn corrupt_file_reads_as_default() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();
        std::fs::write(store.path_for(ChatId(8)), "{ not json").unwrap();
        assert_eq!(store.get(ChatId(8)).await.unwrap(), default_record(ChatId(8)));
    }

    #[tokio::test]
    async fn open_creates_missing_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("data/sessions");
        let store = FileStore::open(&nested).await.unwrap();
        assert!(nested.is_dir());
        assert_eq!(store.health_check().await.unwrap(), HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn set_into_removed_directory_is_persistence_error() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("gone");
        let store = FileStore::open(&root).await.unwrap();
        std::fs::remove_dir_all(&root).unwrap();

        let err = store
            .set(ChatId(4), &default_record(ChatId(4)))
            .await
            .unwrap_err();
        assert!(err.is_persistence());
        assert!(err.to_string().contains("file"));
    }
}
