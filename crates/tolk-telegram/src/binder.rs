// SPDX-FileCopyrightText: 2026 Tolk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-event session binding.
//!
//! Every inbound group event gets a [`SessionContext`] carrying the group's
//! record, read from the store once at the start of the event. Handlers mutate
//! the bound record through [`SessionContext::config_mut`] and write it back
//! with [`SessionBinder::persist`]. A context whose load failed refuses both,
//! so a store hiccup never turns into an overwrite with defaults.

use std::sync::Arc;

use tolk_core::{ChatId, ChatKind, GroupConfig, GroupConfigStore, TolkError, default_record};
use tracing::{debug, error};

/// State carried through the handling of one inbound event.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionContext {
    pub chat_id: ChatId,
    pub chat_kind: ChatKind,
    /// The group's record, when binding succeeded. Always `None` in private
    /// chats.
    pub config: Option<GroupConfig>,
    load_failed: bool,
}

impl SessionContext {
    /// A context with nothing bound.
    pub fn unbound(chat_id: ChatId, chat_kind: ChatKind) -> Self {
        Self {
            chat_id,
            chat_kind,
            config: None,
            load_failed: false,
        }
    }

    /// True when the store could not be read while binding this context.
    pub fn load_failed(&self) -> bool {
        self.load_failed
    }

    pub fn is_private(&self) -> bool {
        self.chat_kind == ChatKind::Private
    }

    /// Returns the bound record, first binding the default record when none
    /// is attached. Never touches the store.
    pub fn ensure_config(&mut self) -> &mut GroupConfig {
        let chat_id = self.chat_id;
        self.config.get_or_insert_with(|| default_record(chat_id))
    }

    /// The record to modify before [`SessionBinder::persist`].
    ///
    /// Fails with [`TolkError::Unbound`] when binding could not read the
    /// stored record: the stand-in default would clobber it on write.
    pub fn config_mut(&mut self) -> Result<&mut GroupConfig, TolkError> {
        if self.load_failed {
            return Err(TolkError::Unbound {
                chat_id: self.chat_id,
            });
        }
        Ok(self.ensure_config())
    }
}

/// Loads and stores the record behind each [`SessionContext`].
#[derive(Clone)]
pub struct SessionBinder {
    store: Arc<dyn GroupConfigStore>,
}

impl SessionBinder {
    pub fn new(store: Arc<dyn GroupConfigStore>) -> Self {
        Self { store }
    }

    /// The store records are read from and written to.
    pub fn store(&self) -> &Arc<dyn GroupConfigStore> {
        &self.store
    }

    /// Builds the context for an event in `chat_id`.
    ///
    /// Group chats get their record attached. A store failure is logged and
    /// leaves the context unbound and marked failed; the event can still be
    /// handled read-only.
    pub async fn bind(&self, chat_id: ChatId, chat_kind: ChatKind) -> SessionContext {
        let mut ctx = SessionContext::unbound(chat_id, chat_kind);
        if ctx.is_private() {
            debug!(chat_id = %chat_id, "private chat, skipping config load");
            return ctx;
        }

        match self.store.get(chat_id).await {
            Ok(config) => ctx.config = Some(config),
            Err(e) => {
                error!(chat_id = %chat_id, error = %e, "failed to load group config");
                ctx.load_failed = true;
            }
        }
        ctx
    }

    /// Writes the context's record back to the store, binding the default
    /// first if nothing is attached. Refuses contexts whose load failed.
    pub async fn persist(&self, ctx: &mut SessionContext) -> Result<(), TolkError> {
        let chat_id = ctx.chat_id;
        let config = ctx.config_mut()?;
        self.store.set(chat_id, config).await?;
        debug!(chat_id = %chat_id, "group config persisted");
        Ok(())
    }
}
