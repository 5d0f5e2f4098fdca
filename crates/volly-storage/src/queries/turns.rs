// SPDX-FileCopyrightText: 2026 Volly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation history queries. The turns table is append-only.

use volly_core::VollyError;
use volly_core::types::ConversationTurn;

use crate::database::{Database, map_tr_err};
use crate::queries::parse_column;

fn row_to_turn(row: &rusqlite::Row<'_>) -> Result<ConversationTurn, rusqlite::Error> {
    let role: String = row.get(2)?;
    Ok(ConversationTurn {
        id: row.get(0)?,
        phone: row.get(1)?,
        role: parse_column(2, &role)?,
        content: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// Appends one turn to the history.
pub async fn append(db: &Database, turn: &ConversationTurn) -> Result<(), VollyError> {
    let t = turn.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO turns (id, phone, role, content, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![t.id, t.phone, t.role.to_string(), t.content, t.created_at],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// The most recent `limit` turns for an identity, oldest first.
///
/// Rowid breaks ties between turns sharing a timestamp, so same-instant
/// appends keep their insertion order.
pub async fn recent(
    db: &Database,
    phone: &str,
    limit: i64,
) -> Result<Vec<ConversationTurn>, VollyError> {
    let phone = phone.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, phone, role, content, created_at FROM turns
                 WHERE phone = ?1
                 ORDER BY created_at DESC, rowid DESC
                 LIMIT ?2",
            )?;
            let rows = stmt.query_map(rusqlite::params![phone, limit], row_to_turn)?;
            let mut turns = Vec::new();
            for row in rows {
                turns.push(row?);
            }
            turns.reverse();
            Ok(turns)
        })
        .await
        .map_err(map_tr_err)
}
