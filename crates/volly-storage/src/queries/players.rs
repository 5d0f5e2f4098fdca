// SPDX-FileCopyrightText: 2026 Volly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Player queries. Phone is stored canonically and is UNIQUE.

use volly_core::VollyError;
use volly_core::types::Player;

use crate::database::{Database, map_tr_err};

fn row_to_player(row: &rusqlite::Row<'_>) -> Result<Player, rusqlite::Error> {
    Ok(Player {
        id: row.get(0)?,
        name: row.get(1)?,
        phone: row.get(2)?,
        skill_level: row.get(3)?,
        active: row.get::<_, i64>(4)? != 0,
        language: row.get(5)?,
        country: row.get(6)?,
        created_at: row.get(7)?,
    })
}

const PLAYER_COLUMNS: &str = "id, name, phone, skill_level, active, language, country, created_at";

/// Inserts a new player. The UNIQUE constraint on phone rejects duplicate
/// registrations at the database level.
pub async fn insert_player(db: &Database, player: &Player) -> Result<(), VollyError> {
    let p = player.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO players (id, name, phone, skill_level, active, language, country, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                rusqlite::params![
                    p.id,
                    p.name,
                    p.phone,
                    p.skill_level,
                    p.active as i64,
                    p.language,
                    p.country,
                    p.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Exact-match lookup by stored phone string.
pub async fn get_by_phone(db: &Database, phone: &str) -> Result<Option<Player>, VollyError> {
    let phone = phone.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {PLAYER_COLUMNS} FROM players WHERE phone = ?1"
            ))?;
            let mut rows = stmt.query_map([phone], row_to_player)?;
            match rows.next() {
                Some(row) => Ok(Some(row?)),
                None => Ok(None),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// All players with the active flag set, ordered by name.
pub async fn list_active(db: &Database) -> Result<Vec<Player>, VollyError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {PLAYER_COLUMNS} FROM players WHERE active = 1 ORDER BY name"
            ))?;
            let rows = stmt.query_map([], row_to_player)?;
            let mut players = Vec::new();
            for row in rows {
                players.push(row?);
            }
            Ok(players)
        })
        .await
        .map_err(map_tr_err)
}
