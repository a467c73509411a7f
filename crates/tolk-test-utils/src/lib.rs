// SPDX-FileCopyrightText: 2026 Tolk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for tolk.
//!
//! Provides test doubles and a reusable behavioural suite so every store
//! backend and every handler can be tested without network services.
//!
//! # Components
//!
//! - [`MockAgent`] - Translation agent with queued responses and recorded requests
//! - [`FailingStore`] - Store whose writes (and optionally reads) always fail
//! - [`FlakyStore`] - Wrapper that fails a scripted number of reads
//! - [`contract`] - Behaviour every `GroupConfigStore` backend must show

pub mod contract;
pub mod failing_store;
pub mod flaky_store;
pub mod mock_agent;

pub use contract::run_store_contract;
pub use failing_store::FailingStore;
pub use flaky_store::FlakyStore;
pub use mock_agent::MockAgent;
