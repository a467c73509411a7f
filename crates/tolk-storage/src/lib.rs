// SPDX-FileCopyrightText: 2026 Tolk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Group configuration persistence for tolk.
//!
//! Four interchangeable [`GroupConfigStore`](tolk_core::GroupConfigStore)
//! backends: an in-process map, one JSON file per group, Redis keys, and a
//! WAL-mode SQLite table with embedded migrations. [`create_store`] picks one
//! from configuration; nothing else in the workspace branches on the backend.

pub mod database;
pub mod factory;
pub mod file;
pub mod memory;
pub mod migrations;
pub mod redis;
pub mod sqlite;

mod codec;

pub use database::Database;
pub use factory::{create_store, create_store_named};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use crate::redis::RedisStore;
pub use sqlite::SqliteStore;
