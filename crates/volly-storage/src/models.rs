// SPDX-FileCopyrightText: 2026 Volly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! The canonical types are defined in `volly-core::types` for use across
//! adapter trait boundaries. This module re-exports them for convenience
//! within the storage crate.

pub use volly_core::types::{
    AttendanceRecord, AttendanceStatus, ConversationTurn, Event, EventStatus, Player,
    RosterEntry, TurnRole,
};
