// SPDX-FileCopyrightText: 2026 Volly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! External collaborators (the storage engine, the reasoning component,
//! the messaging gateway) are specified only at these seams; everything
//! behind them is replaceable, including by the mocks in
//! `volly-test-utils`.

pub mod channel;
pub mod decision;
pub mod storage;

pub use channel::ChannelAdapter;
pub use decision::DecisionAdapter;
pub use storage::StorageAdapter;
