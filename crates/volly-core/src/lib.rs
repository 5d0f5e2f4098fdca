// SPDX-FileCopyrightText: 2026 Volly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Volly attendance coordinator.
//!
//! This crate provides the foundational trait definitions, error types,
//! domain types, and phone canonicalization rules used throughout the
//! Volly workspace. All adapters implement traits defined here.

pub mod error;
pub mod phone;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::VollyError;
pub use types::{AttendanceStatus, EventStatus, MessageId, TurnRole};

// Re-export adapter traits at crate root.
pub use traits::{ChannelAdapter, DecisionAdapter, StorageAdapter};
