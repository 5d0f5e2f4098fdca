// SPDX-FileCopyrightText: 2026 Volly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Invitation broadcast orchestrator.
//!
//! Fans one event invitation out to every active player with bounded
//! parallelism and an overall deadline. Recipients are isolated: one
//! failure never aborts the run, and a failed invite generation falls
//! back to a plain template so the invite still goes out.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tokio::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;
use volly_core::VollyError;
use volly_core::traits::{ChannelAdapter, DecisionAdapter, StorageAdapter};
use volly_core::types::{
    AttendanceRecord, AttendanceStatus, ConversationTurn, DecisionOutcome, DecisionRequest,
    DecisionTurn, Event, Player, TurnRole,
};

use crate::prompts;

/// How one recipient fared during a broadcast run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipientOutcome {
    /// Invite text was generated by the decision component and sent.
    Generated,
    /// Invite generation failed; the fallback template was sent.
    Fallback,
    /// The send itself failed after invite text was ready.
    SendFailed,
    /// The deadline passed before this recipient was attempted.
    Skipped,
}

/// Per-recipient results for one broadcast run.
#[derive(Debug, Clone)]
pub struct BroadcastReport {
    pub event_id: String,
    pub outcomes: Vec<(String, RecipientOutcome)>,
}

impl BroadcastReport {
    fn count(&self, outcome: RecipientOutcome) -> usize {
        self.outcomes.iter().filter(|(_, o)| *o == outcome).count()
    }

    /// Recipients whose invite was delivered (generated or fallback).
    pub fn delivered(&self) -> usize {
        self.count(RecipientOutcome::Generated) + self.count(RecipientOutcome::Fallback)
    }

    pub fn failed(&self) -> usize {
        self.count(RecipientOutcome::SendFailed)
    }

    pub fn skipped(&self) -> usize {
        self.count(RecipientOutcome::Skipped)
    }
}

/// Settings for one broadcast run.
#[derive(Debug, Clone)]
pub struct BroadcastSettings {
    pub parallelism: usize,
    pub deadline: Duration,
    pub max_tokens: u32,
    pub default_language: String,
}

/// Fans out event invitations to the active roster.
pub struct BroadcastOrchestrator {
    store: Arc<dyn StorageAdapter>,
    decision: Arc<dyn DecisionAdapter>,
    channel: Arc<dyn ChannelAdapter>,
    settings: BroadcastSettings,
}

impl BroadcastOrchestrator {
    pub fn new(
        store: Arc<dyn StorageAdapter>,
        decision: Arc<dyn DecisionAdapter>,
        channel: Arc<dyn ChannelAdapter>,
        settings: BroadcastSettings,
    ) -> Self {
        Self {
            store,
            decision,
            channel,
            settings,
        }
    }

    /// Invites every active player to `event`.
    ///
    /// Returns a report covering all recipients; only listing the roster
    /// can fail the run as a whole.
    pub async fn run(&self, event: &Event) -> Result<BroadcastReport, VollyError> {
        let players = self.store.list_active_players().await?;
        let deadline = Instant::now() + self.settings.deadline;
        info!(
            event = %event.id,
            recipients = players.len(),
            parallelism = self.settings.parallelism,
            "starting broadcast"
        );

        let outcomes: Vec<(String, RecipientOutcome)> = futures::stream::iter(players)
            .map(|player| {
                let phone = player.phone.clone();
                async move {
                    let outcome = self.invite_one(event, &player, deadline).await;
                    (phone, outcome)
                }
            })
            .buffer_unordered(self.settings.parallelism.max(1))
            .collect()
            .await;

        let report = BroadcastReport {
            event_id: event.id.clone(),
            outcomes,
        };
        info!(
            event = %event.id,
            delivered = report.delivered(),
            failed = report.failed(),
            skipped = report.skipped(),
            "broadcast finished"
        );
        Ok(report)
    }

    async fn invite_one(
        &self,
        event: &Event,
        player: &Player,
        deadline: Instant,
    ) -> RecipientOutcome {
        if Instant::now() >= deadline {
            warn!(player = %player.name, "deadline passed, skipping recipient");
            return RecipientOutcome::Skipped;
        }

        let language = if player.language.is_empty() {
            &self.settings.default_language
        } else {
            &player.language
        };

        let (text, outcome) = match self.generate_invite(player, event, language).await {
            Ok(text) => (text, RecipientOutcome::Generated),
            Err(e) => {
                warn!(player = %player.name, error = %e, "invite generation failed, using fallback");
                (
                    prompts::fallback_invite(&event.start_time, language),
                    RecipientOutcome::Fallback,
                )
            }
        };

        if Instant::now() >= deadline {
            warn!(player = %player.name, "deadline passed before send, skipping recipient");
            return RecipientOutcome::Skipped;
        }

        if let Err(e) = self.channel.send(&player.phone, &text).await {
            warn!(player = %player.name, error = %e, "invite send failed");
            return RecipientOutcome::SendFailed;
        }

        // Best effort bookkeeping. The invite is already out; a failed
        // write must not turn a delivered invite into a failure.
        if let Err(e) = self.record_invite(event, player, &text).await {
            warn!(player = %player.name, error = %e, "failed to record invite");
        }
        outcome
    }

    async fn generate_invite(
        &self,
        player: &Player,
        event: &Event,
        language: &str,
    ) -> Result<String, VollyError> {
        let request = DecisionRequest {
            system_prompt: prompts::SYSTEM_PROMPT.to_string(),
            turns: vec![DecisionTurn::user(prompts::invite_prompt(
                &player.name,
                &event.start_time,
                language,
            ))],
            max_tokens: self.settings.max_tokens,
        };
        match self.decision.decide(request).await? {
            DecisionOutcome::Reply(text) if !text.trim().is_empty() => Ok(text),
            other => Err(VollyError::Decision {
                message: format!("unusable invite generation outcome: {other:?}"),
                source: None,
            }),
        }
    }

    /// Seeds a pending attendance record and logs the outbound turn.
    async fn record_invite(
        &self,
        event: &Event,
        player: &Player,
        text: &str,
    ) -> Result<(), VollyError> {
        let existing = self.store.get_attendance(&event.id, &player.id).await?;
        // Don't clobber a response the player already gave.
        if existing.is_none() {
            self.store
                .upsert_attendance(&AttendanceRecord {
                    id: Uuid::new_v4().to_string(),
                    event_id: event.id.clone(),
                    player_id: player.id.clone(),
                    status: AttendanceStatus::Pending,
                    original_message: None,
                    confidence: None,
                    updated_at: chrono::Utc::now().to_rfc3339(),
                })
                .await?;
        }
        self.store
            .append_turn(&ConversationTurn {
                id: Uuid::new_v4().to_string(),
                phone: player.phone.clone(),
                role: TurnRole::Outbound,
                content: text.to_string(),
                created_at: chrono::Utc::now().to_rfc3339(),
            })
            .await
    }
}
