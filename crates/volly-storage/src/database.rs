// SPDX-FileCopyrightText: 2026 Volly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread. Do NOT create additional Connection instances for writes.

use tokio_rusqlite::Connection;
use tracing::debug;
use volly_core::VollyError;

use crate::migrations;

/// Handle to the SQLite database used by all query modules.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens (creating if necessary) the database at `path`, runs pending
    /// migrations, and applies the standard PRAGMA set.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, VollyError> {
        if let Some(parent) = std::path::Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| VollyError::Storage {
                    source: Box::new(e),
                })?;
        }

        // Migrations need a synchronous rusqlite connection; run them on
        // the blocking pool before the async connection takes over.
        let migration_path = path.to_string();
        tokio::task::spawn_blocking(move || -> Result<(), VollyError> {
            let mut conn =
                rusqlite::Connection::open(&migration_path).map_err(|e| VollyError::Storage {
                    source: Box::new(e),
                })?;
            migrations::run_migrations(&mut conn)
        })
        .await
        .map_err(|e| VollyError::Storage {
            source: Box::new(e),
        })??;

        let conn = Connection::open(path)
            .await
            .map_err(|e| VollyError::Storage {
                source: Box::new(e),
            })?;
        conn.call(move |conn| {
            if wal_mode {
                conn.execute_batch("PRAGMA journal_mode = WAL;")?;
            }
            conn.execute_batch(
                "PRAGMA synchronous = NORMAL;
                 PRAGMA foreign_keys = ON;
                 PRAGMA busy_timeout = 5000;",
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        debug!(path, "database opened");
        Ok(Self { conn })
    }

    /// Returns the shared tokio-rusqlite connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Checkpoints the WAL and releases the connection.
    pub async fn close(&self) -> Result<(), VollyError> {
        self.conn
            .call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

/// Maps a tokio-rusqlite error into the storage error variant.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error) -> VollyError {
    VollyError::Storage {
        source: Box::new(e),
    }
}
