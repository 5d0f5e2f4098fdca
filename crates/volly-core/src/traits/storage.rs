// SPDX-FileCopyrightText: 2026 Volly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for the attendance store.
//!
//! The store enforces the two structural invariants natively: phone
//! uniqueness on players and (event, player) uniqueness on attendance.
//! Callers must not substitute application-level locking for either.

use async_trait::async_trait;

use crate::error::VollyError;
use crate::types::{
    AttendanceRecord, AttendanceStatus, ConversationTurn, Event, Player, RosterEntry,
};

/// Adapter for the entity persistence layer.
///
/// All operations are short, discrete reads or upserts; no implementation
/// may hold a transaction open across an external call.
#[async_trait]
pub trait StorageAdapter: Send + Sync {
    /// Opens the backing store and runs pending migrations.
    async fn initialize(&self) -> Result<(), VollyError>;

    /// Flushes and releases the backing store.
    async fn close(&self) -> Result<(), VollyError>;

    // --- Player operations ---

    /// Inserts a new player. Fails if the phone is already registered.
    async fn create_player(&self, player: &Player) -> Result<(), VollyError>;

    /// Exact-match lookup by stored phone string. Read-only; `Ok(None)`
    /// on miss. Encoding variants are the identity resolver's concern.
    async fn get_player_by_phone(&self, phone: &str) -> Result<Option<Player>, VollyError>;

    /// All players with the active flag set.
    async fn list_active_players(&self) -> Result<Vec<Player>, VollyError>;

    // --- Event operations ---

    /// Inserts a new event.
    async fn create_event(&self, event: &Event) -> Result<(), VollyError>;

    /// The event with the earliest start time strictly after `now`
    /// (ISO 8601), regardless of event status.
    async fn next_upcoming_event(&self, now: &str) -> Result<Option<Event>, VollyError>;

    /// Fetch a single event by id.
    async fn get_event(&self, id: &str) -> Result<Option<Event>, VollyError>;

    // --- Attendance operations ---

    /// Atomic insert-or-update keyed by (event, player). Last write wins;
    /// concurrent writers both observe success.
    async fn upsert_attendance(&self, record: &AttendanceRecord) -> Result<(), VollyError>;

    /// The single attendance record for (event, player), if any.
    async fn get_attendance(
        &self,
        event_id: &str,
        player_id: &str,
    ) -> Result<Option<AttendanceRecord>, VollyError>;

    /// Player names and statuses for every response to an event.
    async fn roster_for_event(&self, event_id: &str) -> Result<Vec<RosterEntry>, VollyError>;

    /// Count of records with the given status for an event.
    async fn count_attendance(
        &self,
        event_id: &str,
        status: AttendanceStatus,
    ) -> Result<i64, VollyError>;

    // --- Conversation history operations ---

    /// Appends one turn to the history. Turns are never mutated or deleted.
    async fn append_turn(&self, turn: &ConversationTurn) -> Result<(), VollyError>;

    /// The most recent `limit` turns for an identity, returned in
    /// chronological order (oldest first).
    async fn recent_turns(
        &self,
        phone: &str,
        limit: i64,
    ) -> Result<Vec<ConversationTurn>, VollyError>;
}
