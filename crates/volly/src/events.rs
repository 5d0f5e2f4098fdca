// SPDX-FileCopyrightText: 2026 Volly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `volly create-event`, `volly status`, and `volly broadcast`:
//! scheduling and invitation fan-out.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;
use volly_agent::{BroadcastOrchestrator, BroadcastSettings};
use volly_anthropic::AnthropicDecision;
use volly_config::VollyConfig;
use volly_core::VollyError;
use volly_core::traits::StorageAdapter;
use volly_core::types::{Event, EventStatus};
use volly_storage::SqliteStore;
use volly_whatsapp::WhatsAppChannel;

async fn open_store(config: &VollyConfig) -> Result<Arc<SqliteStore>, VollyError> {
    let store = Arc::new(SqliteStore::new(config.storage.clone()));
    store.initialize().await?;
    Ok(store)
}

pub async fn create_event(
    config: &VollyConfig,
    start_time: &str,
    location: &str,
    capacity: i64,
) -> Result<(), VollyError> {
    let parsed: DateTime<Utc> = start_time
        .parse::<DateTime<Utc>>()
        .map_err(|e| VollyError::Config(format!("invalid --start-time `{start_time}`: {e}")))?;
    if capacity < 1 {
        return Err(VollyError::Config(format!(
            "--capacity must be at least 1, got {capacity}"
        )));
    }

    let store = open_store(config).await?;
    let event = Event {
        id: Uuid::new_v4().to_string(),
        start_time: parsed.to_rfc3339(),
        location: location.to_string(),
        status: EventStatus::Recruiting,
        capacity,
        created_at: Utc::now().to_rfc3339(),
    };
    store.create_event(&event).await?;
    store.close().await?;

    println!(
        "scheduled game {} at {} on {}",
        event.id, event.location, event.start_time
    );
    Ok(())
}

pub async fn status(config: &VollyConfig) -> Result<(), VollyError> {
    let store = open_store(config).await?;
    let now = Utc::now().to_rfc3339();

    match store.next_upcoming_event(&now).await? {
        None => println!("no upcoming game"),
        Some(event) => {
            println!(
                "next game: {} at {} ({}, capacity {})",
                event.start_time, event.location, event.status, event.capacity
            );
            let roster = store.roster_for_event(&event.id).await?;
            if roster.is_empty() {
                println!("no responses yet");
            } else {
                for entry in &roster {
                    println!("  {}  {}", entry.player_name, entry.status);
                }
            }
        }
    }
    store.close().await?;
    Ok(())
}

pub async fn broadcast(config: &VollyConfig) -> Result<(), VollyError> {
    let store = open_store(config).await?;
    let now = Utc::now().to_rfc3339();
    let Some(event) = store.next_upcoming_event(&now).await? else {
        store.close().await?;
        return Err(VollyError::NoUpcomingEvent);
    };

    let decision = Arc::new(AnthropicDecision::new(&config.anthropic)?);
    let channel = Arc::new(WhatsAppChannel::new(&config.whatsapp)?);
    let orchestrator = BroadcastOrchestrator::new(
        store.clone(),
        decision,
        channel,
        BroadcastSettings {
            parallelism: config.broadcast.parallelism,
            deadline: Duration::from_secs(config.broadcast.deadline_secs),
            max_tokens: config.anthropic.max_tokens,
            default_language: config.agent.default_language.clone(),
        },
    );

    let report = orchestrator.run(&event).await?;
    println!(
        "broadcast for game {}: {} delivered, {} failed, {} skipped",
        report.event_id,
        report.delivered(),
        report.failed(),
        report.skipped()
    );
    store.close().await?;
    Ok(())
}
