// SPDX-FileCopyrightText: 2026 Volly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`StorageAdapter`] implementation backed by SQLite.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::info;
use volly_config::StorageConfig;
use volly_core::VollyError;
use volly_core::traits::StorageAdapter;
use volly_core::types::{
    AttendanceRecord, AttendanceStatus, ConversationTurn, Event, Player, RosterEntry,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed store. Construct with [`SqliteStore::new`], then call
/// `initialize()` before any other operation.
pub struct SqliteStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStore {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, VollyError> {
        self.db.get().ok_or_else(|| {
            VollyError::Internal("storage not initialized -- call initialize() first".to_string())
        })
    }
}

#[async_trait]
impl StorageAdapter for SqliteStore {
    async fn initialize(&self) -> Result<(), VollyError> {
        self.db
            .get_or_try_init(|| async {
                let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
                info!(path = %self.config.database_path, "storage initialized");
                Ok::<_, VollyError>(db)
            })
            .await?;
        Ok(())
    }

    async fn close(&self) -> Result<(), VollyError> {
        if let Some(db) = self.db.get() {
            db.close().await?;
        }
        Ok(())
    }

    async fn create_player(&self, player: &Player) -> Result<(), VollyError> {
        queries::players::insert_player(self.db()?, player).await
    }

    async fn get_player_by_phone(&self, phone: &str) -> Result<Option<Player>, VollyError> {
        queries::players::get_by_phone(self.db()?, phone).await
    }

    async fn list_active_players(&self) -> Result<Vec<Player>, VollyError> {
        queries::players::list_active(self.db()?).await
    }

    async fn create_event(&self, event: &Event) -> Result<(), VollyError> {
        queries::events::insert_event(self.db()?, event).await
    }

    async fn next_upcoming_event(&self, now: &str) -> Result<Option<Event>, VollyError> {
        queries::events::next_upcoming(self.db()?, now).await
    }

    async fn get_event(&self, id: &str) -> Result<Option<Event>, VollyError> {
        queries::events::get_event(self.db()?, id).await
    }

    async fn upsert_attendance(&self, record: &AttendanceRecord) -> Result<(), VollyError> {
        queries::attendance::upsert(self.db()?, record).await
    }

    async fn get_attendance(
        &self,
        event_id: &str,
        player_id: &str,
    ) -> Result<Option<AttendanceRecord>, VollyError> {
        queries::attendance::get(self.db()?, event_id, player_id).await
    }

    async fn roster_for_event(&self, event_id: &str) -> Result<Vec<RosterEntry>, VollyError> {
        queries::attendance::roster(self.db()?, event_id).await
    }

    async fn count_attendance(
        &self,
        event_id: &str,
        status: AttendanceStatus,
    ) -> Result<i64, VollyError> {
        queries::attendance::count_by_status(self.db()?, event_id, status).await
    }

    async fn append_turn(&self, turn: &ConversationTurn) -> Result<(), VollyError> {
        queries::turns::append(self.db()?, turn).await
    }

    async fn recent_turns(
        &self,
        phone: &str,
        limit: i64,
    ) -> Result<Vec<ConversationTurn>, VollyError> {
        queries::turns::recent(self.db()?, phone, limit).await
    }
}
