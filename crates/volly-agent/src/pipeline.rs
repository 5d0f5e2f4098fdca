// SPDX-FileCopyrightText: 2026 Volly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound message pipeline.
//!
//! One inbound message flows through identity resolution, context
//! assembly, the decision loop, action dispatch, and finally a single
//! outbound reply. Failures degrade to friendly replies; the sender
//! never sees an internal error.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;
use volly_config::VollyConfig;
use volly_core::VollyError;
use volly_core::traits::{ChannelAdapter, DecisionAdapter, StorageAdapter};
use volly_core::types::{ConversationTurn, DecisionOutcome, DecisionTurn, TurnRole};

use crate::context;
use crate::dispatch::DispatchExecutor;
use crate::prompts;
use crate::resolver::IdentityResolver;

/// Upper bound on decide/dispatch rounds for one inbound message. A
/// conversational reply usually arrives in round one or two.
const MAX_ACTION_ROUNDS: usize = 3;

/// Behavior settings for the inbound pipeline, resolved from config.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub system_prompt: String,
    pub history_window: i64,
    pub max_tokens: u32,
    pub country: String,
}

impl PipelineSettings {
    /// Resolves settings from loaded configuration. A system prompt file
    /// takes precedence over the inline string; both default to the
    /// built-in prompt.
    pub fn from_config(config: &VollyConfig) -> Result<Self, VollyError> {
        let system_prompt = match &config.agent.system_prompt_file {
            Some(path) => std::fs::read_to_string(path).map_err(|e| {
                VollyError::Config(format!("failed to read system prompt file {path}: {e}"))
            })?,
            None => config
                .agent
                .system_prompt
                .clone()
                .unwrap_or_else(|| prompts::SYSTEM_PROMPT.to_string()),
        };
        Ok(Self {
            system_prompt,
            history_window: config.agent.history_window,
            max_tokens: config.anthropic.max_tokens,
            country: config.agent.country.clone(),
        })
    }
}

/// Handles inbound player messages end to end.
pub struct InboundPipeline {
    store: Arc<dyn StorageAdapter>,
    decision: Arc<dyn DecisionAdapter>,
    channel: Arc<dyn ChannelAdapter>,
    resolver: IdentityResolver,
    dispatch: DispatchExecutor,
    settings: PipelineSettings,
}

impl InboundPipeline {
    pub fn new(
        store: Arc<dyn StorageAdapter>,
        decision: Arc<dyn DecisionAdapter>,
        channel: Arc<dyn ChannelAdapter>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            resolver: IdentityResolver::new(settings.country.clone()),
            dispatch: DispatchExecutor::new(store.clone()),
            store,
            decision,
            channel,
            settings,
        }
    }

    /// Handles one inbound message: resolves the sender, runs the
    /// decision loop, sends exactly one reply, and records exactly one
    /// inbound and one outbound turn.
    pub async fn handle_inbound(&self, from: &str, text: &str) -> Result<(), VollyError> {
        let canonical = self.resolver.canonicalize(from);
        info!(from, canonical = %canonical, "handling inbound message");

        let reply = match self.compute_reply(from, &canonical, text).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, from, "inbound handling degraded to error reply");
                reply_for_error(&e).to_string()
            }
        };

        self.store
            .append_turn(&turn(&canonical, TurnRole::Inbound, text))
            .await?;
        self.channel.send(from, &reply).await?;
        self.store
            .append_turn(&turn(&canonical, TurnRole::Outbound, &reply))
            .await?;
        Ok(())
    }

    async fn compute_reply(
        &self,
        from: &str,
        canonical: &str,
        text: &str,
    ) -> Result<String, VollyError> {
        let Some(player) = self.resolver.resolve(self.store.as_ref(), from).await? else {
            return Ok(prompts::NEW_PLAYER_GREETING.to_string());
        };

        let history = self
            .store
            .recent_turns(canonical, self.settings.history_window)
            .await?;
        let status_summary = context::attendance_summary(self.store.as_ref(), &player).await?;
        let mut request = context::assemble(
            &self.settings.system_prompt,
            &player,
            &history,
            &status_summary,
            text,
            self.settings.max_tokens,
        );

        let mut last_result = String::new();
        for round in 0..MAX_ACTION_ROUNDS {
            match self.decision.decide(request.clone()).await? {
                DecisionOutcome::Reply(reply) => return Ok(reply),
                DecisionOutcome::Action(action) => {
                    info!(round, action = action.name(), "dispatching action");
                    let result = self.dispatch.apply(&player, text, &action).await?;
                    request
                        .turns
                        .push(DecisionTurn::assistant(format!("[{}] requested", action.name())));
                    request
                        .turns
                        .push(DecisionTurn::user(format!("[RESULT] {result}")));
                    last_result = result;
                }
            }
        }

        // Rounds exhausted. Action results are already player-friendly,
        // so the last one doubles as the reply.
        warn!(from, "decision loop exhausted action rounds");
        Ok(last_result)
    }
}

fn turn(canonical: &str, role: TurnRole, content: &str) -> ConversationTurn {
    ConversationTurn {
        id: Uuid::new_v4().to_string(),
        phone: canonical.to_string(),
        role,
        content: content.to_string(),
        created_at: chrono::Utc::now().to_rfc3339(),
    }
}

/// Maps internal failures to the friendly reply the sender receives.
fn reply_for_error(error: &VollyError) -> &'static str {
    match error {
        VollyError::NoUpcomingEvent => prompts::NO_UPCOMING_GAME,
        VollyError::Storage { .. } => prompts::STORAGE_ERROR,
        // Covers decision failures and rejected statuses alike; the
        // sender just gets asked to try again.
        _ => prompts::GENERIC_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use volly_config::StorageConfig;
    use volly_core::types::{
        AttendanceStatus, DecisionAction, Event, EventStatus, Player,
    };
    use volly_storage::SqliteStore;
    use volly_test_utils::{MockChannel, MockDecision};

    struct Fixture {
        _dir: tempfile::TempDir,
        store: Arc<SqliteStore>,
        decision: Arc<MockDecision>,
        channel: Arc<MockChannel>,
        pipeline: InboundPipeline,
    }

    async fn fixture() -> Fixture {
        let dir = tempdir().unwrap();
        let store = Arc::new(SqliteStore::new(StorageConfig {
            database_path: dir
                .path()
                .join("pipeline.db")
                .to_str()
                .unwrap()
                .to_string(),
            wal_mode: true,
        }));
        store.initialize().await.unwrap();

        let decision = Arc::new(MockDecision::new());
        let channel = Arc::new(MockChannel::new());
        let pipeline = InboundPipeline::new(
            store.clone(),
            decision.clone(),
            channel.clone(),
            PipelineSettings {
                system_prompt: "test prompt".to_string(),
                history_window: 10,
                max_tokens: 1024,
                country: "Israel".to_string(),
            },
        );
        Fixture {
            _dir: dir,
            store,
            decision,
            channel,
            pipeline,
        }
    }

    async fn register_dana(store: &SqliteStore) -> Player {
        let player = Player {
            id: "p1".to_string(),
            name: "Dana".to_string(),
            phone: "972501234567".to_string(),
            skill_level: "Intermediate".to_string(),
            active: true,
            language: "English".to_string(),
            country: "Israel".to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        store.create_player(&player).await.unwrap();
        player
    }

    async fn schedule_event(store: &SqliteStore) -> Event {
        let event = Event {
            id: "e1".to_string(),
            start_time: (chrono::Utc::now() + chrono::Duration::days(3)).to_rfc3339(),
            location: "Beach Court 1".to_string(),
            status: EventStatus::Recruiting,
            capacity: 4,
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        store.create_event(&event).await.unwrap();
        event
    }

    #[tokio::test]
    async fn confirmation_flows_through_dispatch_to_storage() {
        let f = fixture().await;
        let player = register_dana(&f.store).await;
        let event = schedule_event(&f.store).await;

        f.decision
            .push_outcome(DecisionOutcome::Action(DecisionAction::LogResponse {
                status: AttendanceStatus::Confirmed,
                confidence: Some(0.9),
            }))
            .await;
        f.decision
            .push_outcome(DecisionOutcome::Reply("See you Tuesday!".to_string()))
            .await;

        f.pipeline
            .handle_inbound("0501234567", "I'm in!")
            .await
            .unwrap();

        let record = f
            .store
            .get_attendance(&event.id, &player.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.status, AttendanceStatus::Confirmed);
        assert_eq!(record.original_message.as_deref(), Some("I'm in!"));

        let sent = f.channel.sent_messages().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].destination, "0501234567");
        assert_eq!(sent[0].text, "See you Tuesday!");
    }

    #[tokio::test]
    async fn exactly_one_inbound_and_one_outbound_turn_recorded() {
        let f = fixture().await;
        register_dana(&f.store).await;
        f.decision
            .push_outcome(DecisionOutcome::Reply("hey!".to_string()))
            .await;

        f.pipeline
            .handle_inbound("972501234567", "what's up")
            .await
            .unwrap();

        let turns = f.store.recent_turns("972501234567", 10).await.unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, TurnRole::Inbound);
        assert_eq!(turns[0].content, "what's up");
        assert_eq!(turns[1].role, TurnRole::Outbound);
        assert_eq!(turns[1].content, "hey!");
    }

    #[tokio::test]
    async fn unknown_sender_gets_onboarding_greeting() {
        let f = fixture().await;

        f.pipeline
            .handle_inbound("0549999999", "hello?")
            .await
            .unwrap();

        assert_eq!(f.decision.call_count().await, 0);
        let sent = f.channel.sent_messages().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].text, prompts::NEW_PLAYER_GREETING);

        // History is still recorded under the canonical identity.
        let turns = f.store.recent_turns("972549999999", 10).await.unwrap();
        assert_eq!(turns.len(), 2);
    }

    #[tokio::test]
    async fn history_window_excludes_the_message_being_handled() {
        let f = fixture().await;
        register_dana(&f.store).await;
        f.decision
            .push_outcome(DecisionOutcome::Reply("first".to_string()))
            .await;
        f.decision
            .push_outcome(DecisionOutcome::Reply("second".to_string()))
            .await;

        f.pipeline.handle_inbound("972501234567", "one").await.unwrap();
        f.pipeline.handle_inbound("972501234567", "two").await.unwrap();

        let requests = f.decision.requests().await;
        // Second request: 2 history turns + annotation + inbound.
        let second = &requests[1];
        assert_eq!(second.turns.len(), 4);
        assert_eq!(second.turns[0].content, "one");
        assert_eq!(second.turns[1].content, "first");
        assert!(second.turns[2].content.starts_with("[CONTEXT]"));
        assert_eq!(second.turns[3].content, "two");
    }

    #[tokio::test]
    async fn annotation_follows_history_and_precedes_inbound() {
        let f = fixture().await;
        register_dana(&f.store).await;
        f.decision
            .push_outcome(DecisionOutcome::Reply("hey".to_string()))
            .await;
        f.decision
            .push_outcome(DecisionOutcome::Reply("again".to_string()))
            .await;

        f.pipeline.handle_inbound("972501234567", "hi").await.unwrap();
        f.pipeline.handle_inbound("972501234567", "still there?").await.unwrap();

        let requests = f.decision.requests().await;
        let turns = &requests[1].turns;
        let annotation_idx = turns
            .iter()
            .position(|t| t.content.starts_with("[CONTEXT]"))
            .unwrap();
        let history_idx = turns.iter().position(|t| t.content == "hi").unwrap();
        assert!(annotation_idx > history_idx);
        assert_eq!(turns.last().unwrap().content, "still there?");
    }

    #[tokio::test]
    async fn annotation_reflects_recorded_attendance_status() {
        let f = fixture().await;
        let player = register_dana(&f.store).await;
        let event = schedule_event(&f.store).await;
        f.store
            .upsert_attendance(&volly_core::types::AttendanceRecord {
                id: "r1".to_string(),
                event_id: event.id.clone(),
                player_id: player.id.clone(),
                status: AttendanceStatus::Confirmed,
                original_message: Some("I'm in".to_string()),
                confidence: None,
                updated_at: chrono::Utc::now().to_rfc3339(),
            })
            .await
            .unwrap();
        f.decision
            .push_outcome(DecisionOutcome::Reply("you're confirmed!".to_string()))
            .await;

        f.pipeline
            .handle_inbound("972501234567", "am I in?")
            .await
            .unwrap();

        let requests = f.decision.requests().await;
        let annotation = requests[0]
            .turns
            .iter()
            .find(|t| t.content.starts_with("[CONTEXT]"))
            .unwrap();
        assert!(annotation.content.contains("confirmed"), "got: {}", annotation.content);
    }

    #[tokio::test]
    async fn annotation_names_missing_event_and_missing_response() {
        let f = fixture().await;
        register_dana(&f.store).await;
        f.decision
            .push_outcome(DecisionOutcome::Reply("nothing scheduled".to_string()))
            .await;
        f.pipeline
            .handle_inbound("972501234567", "any games?")
            .await
            .unwrap();

        let requests = f.decision.requests().await;
        assert!(requests[0].turns[0].content.contains("no upcoming event"));

        // With an event but no record yet, the summary changes.
        schedule_event(&f.store).await;
        f.decision
            .push_outcome(DecisionOutcome::Reply("Tuesday!".to_string()))
            .await;
        f.pipeline
            .handle_inbound("972501234567", "any games now?")
            .await
            .unwrap();

        let requests = f.decision.requests().await;
        let annotation = requests[1]
            .turns
            .iter()
            .find(|t| t.content.starts_with("[CONTEXT]"))
            .unwrap();
        assert!(annotation.content.contains("no response yet"));
    }

    #[tokio::test]
    async fn action_results_feed_back_into_the_decision_loop() {
        let f = fixture().await;
        register_dana(&f.store).await;
        schedule_event(&f.store).await;

        f.decision
            .push_outcome(DecisionOutcome::Action(DecisionAction::GetEventDetails))
            .await;
        f.decision
            .push_outcome(DecisionOutcome::Reply("It's Tuesday evening.".to_string()))
            .await;

        f.pipeline
            .handle_inbound("972501234567", "when's the game?")
            .await
            .unwrap();

        let requests = f.decision.requests().await;
        assert_eq!(requests.len(), 2);
        let followup = &requests[1];
        let last = followup.turns.last().unwrap();
        assert!(last.content.starts_with("[RESULT]"));
        assert!(last.content.contains("Beach Court 1"));

        let sent = f.channel.sent_messages().await;
        assert_eq!(sent[0].text, "It's Tuesday evening.");
    }

    #[tokio::test]
    async fn exhausted_action_rounds_reply_with_last_result() {
        let f = fixture().await;
        register_dana(&f.store).await;
        schedule_event(&f.store).await;

        for _ in 0..MAX_ACTION_ROUNDS {
            f.decision
                .push_outcome(DecisionOutcome::Action(DecisionAction::LogResponse {
                    status: AttendanceStatus::Confirmed,
                    confidence: None,
                }))
                .await;
        }

        f.pipeline
            .handle_inbound("972501234567", "in")
            .await
            .unwrap();

        assert_eq!(f.decision.call_count().await, MAX_ACTION_ROUNDS);
        let sent = f.channel.sent_messages().await;
        assert_eq!(sent.len(), 1);
        assert!(sent[0].text.contains("Dana is in"));
    }

    #[tokio::test]
    async fn decision_failure_degrades_to_generic_error_reply() {
        let f = fixture().await;
        register_dana(&f.store).await;
        f.decision.push_failure("provider down").await;

        f.pipeline
            .handle_inbound("972501234567", "hi")
            .await
            .unwrap();

        let sent = f.channel.sent_messages().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].text, prompts::GENERIC_ERROR);
    }

    #[tokio::test]
    async fn channel_failure_propagates_without_outbound_turn() {
        let f = fixture().await;
        register_dana(&f.store).await;
        f.decision
            .push_outcome(DecisionOutcome::Reply("hey".to_string()))
            .await;
        f.channel.fail_destination("972501234567").await;

        let result = f.pipeline.handle_inbound("972501234567", "hi").await;
        assert!(result.is_err());

        let turns = f.store.recent_turns("972501234567", 10).await.unwrap();
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].role, TurnRole::Inbound);
    }
}
