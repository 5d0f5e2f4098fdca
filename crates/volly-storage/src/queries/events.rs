// SPDX-FileCopyrightText: 2026 Volly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event queries.
//!
//! "Next upcoming" means the earliest start time strictly after the given
//! instant, regardless of event status. Start times are stored as ISO 8601
//! UTC strings, which compare correctly as text.

use volly_core::VollyError;
use volly_core::types::Event;

use crate::database::{Database, map_tr_err};
use crate::queries::parse_column;

fn row_to_event(row: &rusqlite::Row<'_>) -> Result<Event, rusqlite::Error> {
    let status: String = row.get(3)?;
    Ok(Event {
        id: row.get(0)?,
        start_time: row.get(1)?,
        location: row.get(2)?,
        status: parse_column(3, &status)?,
        capacity: row.get(4)?,
        created_at: row.get(5)?,
    })
}

const EVENT_COLUMNS: &str = "id, start_time, location, status, capacity, created_at";

/// Inserts a new event.
pub async fn insert_event(db: &Database, event: &Event) -> Result<(), VollyError> {
    let e = event.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO events (id, start_time, location, status, capacity, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    e.id,
                    e.start_time,
                    e.location,
                    e.status.to_string(),
                    e.capacity,
                    e.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Fetch a single event by id.
pub async fn get_event(db: &Database, id: &str) -> Result<Option<Event>, VollyError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = ?1"))?;
            let mut rows = stmt.query_map([id], row_to_event)?;
            match rows.next() {
                Some(row) => Ok(Some(row?)),
                None => Ok(None),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// The event with the earliest start time strictly after `now`.
pub async fn next_upcoming(db: &Database, now: &str) -> Result<Option<Event>, VollyError> {
    let now = now.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {EVENT_COLUMNS} FROM events
                 WHERE start_time > ?1
                 ORDER BY start_time ASC
                 LIMIT 1"
            ))?;
            let mut rows = stmt.query_map([now], row_to_event)?;
            match rows.next() {
                Some(row) => Ok(Some(row?)),
                None => Ok(None),
            }
        })
        .await
        .map_err(map_tr_err)
}
