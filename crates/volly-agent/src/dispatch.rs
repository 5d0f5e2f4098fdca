// SPDX-FileCopyrightText: 2026 Volly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dispatch executor: the only component that applies decision actions.
//!
//! The decision component never touches storage. Every action it emits
//! is validated and applied here, and the textual result is fed back
//! into the decision loop. Missing events and similar conditions return
//! player-friendly text instead of errors, so the conversation degrades
//! gracefully.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;
use volly_core::VollyError;
use volly_core::traits::StorageAdapter;
use volly_core::types::{AttendanceRecord, AttendanceStatus, DecisionAction, Event, Player};

use crate::prompts;

/// Applies decision actions against storage on behalf of one player.
pub struct DispatchExecutor {
    store: Arc<dyn StorageAdapter>,
}

impl DispatchExecutor {
    pub fn new(store: Arc<dyn StorageAdapter>) -> Self {
        Self { store }
    }

    /// Applies one action and returns the result text.
    ///
    /// Storage failures propagate as errors; domain conditions (no
    /// upcoming event, empty roster) come back as reply-ready text.
    pub async fn apply(
        &self,
        player: &Player,
        original_message: &str,
        action: &DecisionAction,
    ) -> Result<String, VollyError> {
        match action {
            DecisionAction::LogResponse { status, confidence } => {
                self.log_response(player, original_message, *status, *confidence)
                    .await
            }
            DecisionAction::GetEventDetails => self.event_details().await,
            DecisionAction::CheckRoster => self.roster().await,
        }
    }

    async fn next_event(&self) -> Result<Option<Event>, VollyError> {
        let now = chrono::Utc::now().to_rfc3339();
        self.store.next_upcoming_event(&now).await
    }

    async fn log_response(
        &self,
        player: &Player,
        original_message: &str,
        status: AttendanceStatus,
        confidence: Option<f64>,
    ) -> Result<String, VollyError> {
        let Some(event) = self.next_event().await? else {
            return Ok(prompts::NO_UPCOMING_GAME.to_string());
        };

        let record = AttendanceRecord {
            id: Uuid::new_v4().to_string(),
            event_id: event.id.clone(),
            player_id: player.id.clone(),
            status,
            original_message: Some(original_message.to_string()),
            confidence,
            updated_at: chrono::Utc::now().to_rfc3339(),
        };
        self.store.upsert_attendance(&record).await?;
        info!(
            player = %player.name,
            event = %event.id,
            status = %status,
            "attendance recorded"
        );

        Ok(prompts::log_confirmation(status, &player.name, &event.start_time))
    }

    async fn event_details(&self) -> Result<String, VollyError> {
        let Some(event) = self.next_event().await? else {
            return Ok(prompts::NO_UPCOMING_GAME.to_string());
        };
        let confirmed = self
            .store
            .count_attendance(&event.id, AttendanceStatus::Confirmed)
            .await?;
        Ok(format!(
            "Game is at {} on {}. Currently {}/{} confirmed.",
            event.location, event.start_time, confirmed, event.capacity
        ))
    }

    async fn roster(&self) -> Result<String, VollyError> {
        let Some(event) = self.next_event().await? else {
            return Ok(prompts::NO_UPCOMING_GAME.to_string());
        };
        let roster = self.store.roster_for_event(&event.id).await?;

        let names_with = |status: AttendanceStatus| -> Vec<&str> {
            roster
                .iter()
                .filter(|entry| entry.status == status)
                .map(|entry| entry.player_name.as_str())
                .collect()
        };

        let confirmed = names_with(AttendanceStatus::Confirmed);
        let maybe = names_with(AttendanceStatus::Maybe);
        let declined = names_with(AttendanceStatus::Declined);

        let mut parts = Vec::new();
        if !confirmed.is_empty() {
            parts.push(format!(
                "Confirmed ({}/{}): {}",
                confirmed.len(),
                event.capacity,
                confirmed.join(", ")
            ));
        }
        if !maybe.is_empty() {
            parts.push(format!("Maybe: {}", maybe.join(", ")));
        }
        if !declined.is_empty() {
            parts.push(format!("Can't make it: {}", declined.join(", ")));
        }

        if parts.is_empty() {
            Ok("No responses yet for this game.".to_string())
        } else {
            Ok(parts.join("\n"))
        }
    }
}
