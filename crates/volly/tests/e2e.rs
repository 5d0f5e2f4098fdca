// SPDX-FileCopyrightText: 2026 Volly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end integration tests for the full attendance flow.
//!
//! Each test builds an isolated harness with temp SQLite and mock
//! decision/channel adapters, then drives broadcast and inbound
//! handling the way the running service would.

use std::sync::Arc;
use std::time::Duration;

use volly_agent::{
    BroadcastOrchestrator, BroadcastSettings, InboundPipeline, PipelineSettings, RecipientOutcome,
};
use volly_config::StorageConfig;
use volly_core::traits::StorageAdapter;
use volly_core::types::{
    AttendanceStatus, DecisionAction, DecisionOutcome, Event, EventStatus, Player,
};
use volly_storage::SqliteStore;
use volly_test_utils::{MockChannel, MockDecision};

struct Harness {
    _dir: tempfile::TempDir,
    store: Arc<SqliteStore>,
    decision: Arc<MockDecision>,
    channel: Arc<MockChannel>,
    pipeline: InboundPipeline,
}

impl Harness {
    async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(SqliteStore::new(StorageConfig {
            database_path: dir.path().join("e2e.db").to_str().unwrap().to_string(),
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
                system_prompt: "You coordinate volleyball attendance.".to_string(),
                history_window: 10,
                max_tokens: 1024,
                country: "Israel".to_string(),
            },
        );
        Self {
            _dir: dir,
            store,
            decision,
            channel,
            pipeline,
        }
    }

    fn broadcaster(&self) -> BroadcastOrchestrator {
        BroadcastOrchestrator::new(
            self.store.clone(),
            self.decision.clone(),
            self.channel.clone(),
            BroadcastSettings {
                parallelism: 2,
                deadline: Duration::from_secs(30),
                max_tokens: 512,
                default_language: "English".to_string(),
            },
        )
    }

    async fn add_player(&self, id: &str, name: &str, phone: &str) -> Player {
        let player = Player {
            id: id.to_string(),
            name: name.to_string(),
            phone: phone.to_string(),
            skill_level: "Intermediate".to_string(),
            active: true,
            language: "English".to_string(),
            country: "Israel".to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        self.store.create_player(&player).await.unwrap();
        player
    }

    async fn add_event(&self, id: &str, capacity: i64) -> Event {
        let event = Event {
            id: id.to_string(),
            start_time: (chrono::Utc::now() + chrono::Duration::days(2)).to_rfc3339(),
            location: "Beach Court 1".to_string(),
            status: EventStatus::Recruiting,
            capacity,
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        self.store.create_event(&event).await.unwrap();
        event
    }

    async fn confirm(&self, phone: &str, text: &str, status: AttendanceStatus) {
        self.decision
            .push_outcome(DecisionOutcome::Action(DecisionAction::LogResponse {
                status,
                confidence: Some(0.95),
            }))
            .await;
        self.decision
            .push_outcome(DecisionOutcome::Reply("Noted!".to_string()))
            .await;
        self.pipeline.handle_inbound(phone, text).await.unwrap();
    }
}

// ---- Full lifecycle: schedule, broadcast, collect responses ----

#[tokio::test]
async fn broadcast_then_responses_build_the_roster() {
    let h = Harness::new().await;
    let dana = h.add_player("p1", "Dana", "972501111111").await;
    let noa = h.add_player("p2", "Noa", "972502222222").await;
    let event = h.add_event("e1", 4).await;

    // One generated invite per active player.
    h.decision
        .push_outcome(DecisionOutcome::Reply("Game Tuesday, you in?".to_string()))
        .await;
    h.decision
        .push_outcome(DecisionOutcome::Reply("Game Tuesday, you in?".to_string()))
        .await;

    let report = h.broadcaster().run(&event).await.unwrap();
    assert_eq!(report.delivered(), 2);
    assert_eq!(report.failed(), 0);
    assert_eq!(h.channel.sent_count().await, 2);

    // Invites seed a pending record for everyone.
    for player in [&dana, &noa] {
        let record = h
            .store
            .get_attendance(&event.id, &player.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.status, AttendanceStatus::Pending);
    }

    h.confirm("972501111111", "I'm in!", AttendanceStatus::Confirmed)
        .await;
    h.confirm("972502222222", "can't make it", AttendanceStatus::Declined)
        .await;

    let roster = h.store.roster_for_event(&event.id).await.unwrap();
    assert_eq!(roster.len(), 2);
    let dana_entry = roster.iter().find(|r| r.player_name == "Dana").unwrap();
    assert_eq!(dana_entry.status, AttendanceStatus::Confirmed);
    let noa_entry = roster.iter().find(|r| r.player_name == "Noa").unwrap();
    assert_eq!(noa_entry.status, AttendanceStatus::Declined);

    let confirmed = h
        .store
        .count_attendance(&event.id, AttendanceStatus::Confirmed)
        .await
        .unwrap();
    assert_eq!(confirmed, 1);
}

// ---- Idempotency and status changes ----

#[tokio::test]
async fn repeated_confirmation_keeps_a_single_record() {
    let h = Harness::new().await;
    let dana = h.add_player("p1", "Dana", "972501111111").await;
    let event = h.add_event("e1", 4).await;

    h.confirm("972501111111", "count me in", AttendanceStatus::Confirmed)
        .await;
    h.confirm("972501111111", "yes I'm coming!", AttendanceStatus::Confirmed)
        .await;

    let roster = h.store.roster_for_event(&event.id).await.unwrap();
    assert_eq!(roster.len(), 1);
    let record = h
        .store
        .get_attendance(&event.id, &dana.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.status, AttendanceStatus::Confirmed);
    assert_eq!(record.original_message.as_deref(), Some("yes I'm coming!"));
}

#[tokio::test]
async fn player_can_change_their_mind() {
    let h = Harness::new().await;
    let dana = h.add_player("p1", "Dana", "972501111111").await;
    let event = h.add_event("e1", 4).await;

    h.confirm("972501111111", "I'm in", AttendanceStatus::Confirmed)
        .await;
    h.confirm(
        "972501111111",
        "actually something came up",
        AttendanceStatus::Declined,
    )
    .await;

    let record = h
        .store
        .get_attendance(&event.id, &dana.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.status, AttendanceStatus::Declined);

    let confirmed = h
        .store
        .count_attendance(&event.id, AttendanceStatus::Confirmed)
        .await
        .unwrap();
    assert_eq!(confirmed, 0);
}

// ---- Phone identity across encodings ----

#[tokio::test]
async fn local_trunk_sender_matches_canonical_registration() {
    let h = Harness::new().await;
    let dana = h.add_player("p1", "Dana", "972501111111").await;
    let event = h.add_event("e1", 4).await;

    // Inbound arrives in the local 0-prefixed form.
    h.confirm("0501111111", "in!", AttendanceStatus::Confirmed)
        .await;

    let record = h
        .store
        .get_attendance(&event.id, &dana.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.status, AttendanceStatus::Confirmed);

    // The reply goes back to the address the message came from.
    let sent = h.channel.sent_messages().await;
    assert_eq!(sent.last().unwrap().destination, "0501111111");
}

// ---- Onboarding ----

#[tokio::test]
async fn unknown_sender_is_greeted_not_decided() {
    let h = Harness::new().await;
    h.add_event("e1", 4).await;

    h.pipeline
        .handle_inbound("972509999999", "hey, heard there's a game?")
        .await
        .unwrap();

    assert_eq!(h.decision.call_count().await, 0);
    let sent = h.channel.sent_messages().await;
    assert_eq!(sent.len(), 1);
    assert!(sent[0].text.contains("What's your name?"));
}

// ---- Broadcast resilience ----

#[tokio::test]
async fn broadcast_falls_back_when_invite_generation_fails() {
    let h = Harness::new().await;
    h.add_player("p1", "Dana", "972501111111").await;
    let event = h.add_event("e1", 4).await;

    h.decision.push_failure("provider down").await;

    let report = h.broadcaster().run(&event).await.unwrap();
    assert_eq!(report.delivered(), 1);
    assert_eq!(report.outcomes[0].1, RecipientOutcome::Fallback);

    // The fallback template still carries the game date.
    let sent = h.channel.sent_messages().await;
    assert_eq!(sent.len(), 1);
    assert!(sent[0].text.contains("volleyball"));
}

#[tokio::test]
async fn one_failing_recipient_does_not_abort_the_broadcast() {
    let h = Harness::new().await;
    h.add_player("p1", "Dana", "972501111111").await;
    h.add_player("p2", "Noa", "972502222222").await;
    let event = h.add_event("e1", 4).await;

    h.channel.fail_destination("972502222222").await;
    h.decision
        .push_outcome(DecisionOutcome::Reply("invite".to_string()))
        .await;
    h.decision
        .push_outcome(DecisionOutcome::Reply("invite".to_string()))
        .await;

    let report = h.broadcaster().run(&event).await.unwrap();
    assert_eq!(report.delivered(), 1);
    assert_eq!(report.failed(), 1);
    assert_eq!(h.channel.sent_count().await, 1);
}

#[tokio::test]
async fn broadcast_does_not_clobber_an_existing_response() {
    let h = Harness::new().await;
    let dana = h.add_player("p1", "Dana", "972501111111").await;
    let event = h.add_event("e1", 4).await;

    // Dana already confirmed before the broadcast goes out.
    h.confirm("972501111111", "I'm in early", AttendanceStatus::Confirmed)
        .await;

    h.decision
        .push_outcome(DecisionOutcome::Reply("invite".to_string()))
        .await;
    let report = h.broadcaster().run(&event).await.unwrap();
    assert_eq!(report.delivered(), 1);

    let record = h
        .store
        .get_attendance(&event.id, &dana.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.status, AttendanceStatus::Confirmed);
}

// ---- Roster question round-trip ----

#[tokio::test]
async fn roster_question_reflects_recorded_responses() {
    let h = Harness::new().await;
    h.add_player("p1", "Dana", "972501111111").await;
    h.add_player("p2", "Noa", "972502222222").await;
    h.add_event("e1", 4).await;

    h.confirm("972501111111", "in", AttendanceStatus::Confirmed)
        .await;

    // Noa asks who's coming; the decision requests the roster and then
    // relays it.
    h.decision
        .push_outcome(DecisionOutcome::Action(DecisionAction::CheckRoster))
        .await;
    h.decision
        .push_outcome(DecisionOutcome::Reply("So far just Dana.".to_string()))
        .await;
    h.pipeline
        .handle_inbound("972502222222", "who's coming?")
        .await
        .unwrap();

    let requests = h.decision.requests().await;
    let followup = requests.last().unwrap();
    let result_turn = followup.turns.last().unwrap();
    assert!(result_turn.content.contains("Dana"));

    let sent = h.channel.sent_messages().await;
    assert_eq!(sent.last().unwrap().text, "So far just Dana.");
}

// ---- Harness isolation ----

#[tokio::test]
async fn harnesses_are_independent() {
    let h1 = Harness::new().await;
    let h2 = Harness::new().await;

    h1.add_player("p1", "Dana", "972501111111").await;

    assert_eq!(h1.store.list_active_players().await.unwrap().len(), 1);
    assert!(h2.store.list_active_players().await.unwrap().is_empty());
}
