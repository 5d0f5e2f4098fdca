// SPDX-FileCopyrightText: 2026 Volly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Attendance queries.
//!
//! The write path is a single atomic upsert keyed by (event, player).
//! Repeated writes for the same pair converge on the latest value; there
//! is never more than one row per pair.

use volly_core::VollyError;
use volly_core::types::{AttendanceRecord, AttendanceStatus, RosterEntry};

use crate::database::{Database, map_tr_err};
use crate::queries::parse_column;

fn row_to_record(row: &rusqlite::Row<'_>) -> Result<AttendanceRecord, rusqlite::Error> {
    let status: String = row.get(3)?;
    Ok(AttendanceRecord {
        id: row.get(0)?,
        event_id: row.get(1)?,
        player_id: row.get(2)?,
        status: parse_column(3, &status)?,
        original_message: row.get(4)?,
        confidence: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

const RECORD_COLUMNS: &str =
    "id, event_id, player_id, status, original_message, confidence, updated_at";

/// Atomic insert-or-update keyed by (event, player). Last write wins.
///
/// On conflict the existing row keeps its id; status, original message,
/// confidence, and the timestamp are replaced.
pub async fn upsert(db: &Database, record: &AttendanceRecord) -> Result<(), VollyError> {
    let r = record.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO attendance
                     (id, event_id, player_id, status, original_message, confidence, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT (event_id, player_id) DO UPDATE SET
                     status = excluded.status,
                     original_message = excluded.original_message,
                     confidence = excluded.confidence,
                     updated_at = excluded.updated_at",
                rusqlite::params![
                    r.id,
                    r.event_id,
                    r.player_id,
                    r.status.to_string(),
                    r.original_message,
                    r.confidence,
                    r.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// The single attendance record for (event, player), if any.
pub async fn get(
    db: &Database,
    event_id: &str,
    player_id: &str,
) -> Result<Option<AttendanceRecord>, VollyError> {
    let event_id = event_id.to_string();
    let player_id = player_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {RECORD_COLUMNS} FROM attendance
                 WHERE event_id = ?1 AND player_id = ?2"
            ))?;
            let mut rows = stmt.query_map([event_id, player_id], row_to_record)?;
            match rows.next() {
                Some(row) => Ok(Some(row?)),
                None => Ok(None),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Player names and statuses for every response to an event.
pub async fn roster(db: &Database, event_id: &str) -> Result<Vec<RosterEntry>, VollyError> {
    let event_id = event_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT p.name, a.status FROM attendance a
                 JOIN players p ON p.id = a.player_id
                 WHERE a.event_id = ?1
                 ORDER BY p.name",
            )?;
            let rows = stmt.query_map([event_id], |row| {
                let status: String = row.get(1)?;
                Ok(RosterEntry {
                    player_name: row.get(0)?,
                    status: parse_column(1, &status)?,
                })
            })?;
            let mut entries = Vec::new();
            for row in rows {
                entries.push(row?);
            }
            Ok(entries)
        })
        .await
        .map_err(map_tr_err)
}

/// Count of records with the given status for an event.
pub async fn count_by_status(
    db: &Database,
    event_id: &str,
    status: AttendanceStatus,
) -> Result<i64, VollyError> {
    let event_id = event_id.to_string();
    let status = status.to_string();
    db.connection()
        .call(move |conn| {
            let count = conn.query_row(
                "SELECT COUNT(*) FROM attendance WHERE event_id = ?1 AND status = ?2",
                [event_id, status],
                |row| row.get(0),
            )?;
            Ok(count)
        })
        .await
        .map_err(map_tr_err)
}
