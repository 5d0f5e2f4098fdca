// SPDX-FileCopyrightText: 2026 Volly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query operations over the SQLite store.
//!
//! Each module owns the SQL for one table. All functions take the shared
//! [`Database`](crate::database::Database) handle and run on its
//! single-writer connection.

pub mod attendance;
pub mod events;
pub mod players;
pub mod turns;

use std::str::FromStr;

/// Parses a stored enum column, converting failures into a rusqlite
/// conversion error so they surface through the normal query error path.
pub(crate) fn parse_column<T>(idx: usize, raw: &str) -> Result<T, rusqlite::Error>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    T::from_str(raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}
