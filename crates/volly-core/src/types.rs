// SPDX-FileCopyrightText: 2026 Volly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain and contract types shared across adapter trait boundaries.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unique identifier for a message delivered through a channel adapter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

/// A player's response status for a single event.
///
/// Values are persisted as their lowercase string form; anything outside
/// this enum is rejected before it reaches storage.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Pending,
    Confirmed,
    Declined,
    Maybe,
}

/// Lifecycle status of a scheduled event.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Recruiting,
    Closed,
    Cancelled,
}

/// Direction of a conversation turn.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    Inbound,
    Outbound,
}

// --- Storage entity types ---

/// A roster member, keyed by canonical phone number.
///
/// Players are never hard-deleted; `active` soft-disables them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    /// Canonical phone number (international format, no `+` prefix).
    pub phone: String,
    pub skill_level: String,
    pub active: bool,
    pub language: String,
    pub country: String,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
}

/// A scheduled game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    /// ISO 8601 scheduled start time.
    pub start_time: String,
    pub location: String,
    pub status: EventStatus,
    /// Maximum number of confirmed participants.
    pub capacity: i64,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
}

/// A player's current attendance intent for one event.
///
/// Exactly one record exists per (event, player) pair; updates overwrite
/// in place (last write wins).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: String,
    pub event_id: String,
    pub player_id: String,
    pub status: AttendanceStatus,
    /// The inbound message text that produced this status, if any.
    pub original_message: Option<String>,
    /// Confidence reported by the decision component, if any.
    pub confidence: Option<f64>,
    /// ISO 8601 last-updated timestamp.
    pub updated_at: String,
}

/// One entry in the append-only conversation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub id: String,
    /// Canonical phone number that owns this history.
    pub phone: String,
    pub role: TurnRole,
    pub content: String,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
}

/// A player name paired with their attendance status, as returned by
/// roster queries for a single event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub player_name: String,
    pub status: AttendanceStatus,
}

// --- Decision contract types ---

/// One (role, text) turn supplied to the decision component.
///
/// Roles follow the usual chat convention: `"user"` for inbound and
/// synthesized context turns, `"assistant"` for prior replies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTurn {
    pub role: String,
    pub content: String,
}

impl DecisionTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// A bounded conversational context handed to the decision component.
#[derive(Debug, Clone)]
pub struct DecisionRequest {
    /// System prompt governing the decision component's behavior.
    pub system_prompt: String,
    /// Ordered turns: bounded history oldest-first, then the context
    /// annotation, then the new inbound message.
    pub turns: Vec<DecisionTurn>,
    /// Maximum tokens the component may generate.
    pub max_tokens: u32,
}

/// The closed action vocabulary the decision component may emit.
///
/// Write actions never touch storage directly; they are routed through
/// the dispatch executor which validates and applies them idempotently.
#[derive(Debug, Clone, PartialEq)]
pub enum DecisionAction {
    /// Record the sender's attendance for the next upcoming event.
    LogResponse {
        status: AttendanceStatus,
        confidence: Option<f64>,
    },
    /// Read-only: time, location, and confirmed count for the next event.
    GetEventDetails,
    /// Read-only: who is confirmed, maybe, and declined for the next event.
    CheckRoster,
}

impl DecisionAction {
    /// Tool name used on the wire for this action.
    pub fn name(&self) -> &'static str {
        match self {
            DecisionAction::LogResponse { .. } => "log_response",
            DecisionAction::GetEventDetails => "get_event_details",
            DecisionAction::CheckRoster => "check_roster",
        }
    }
}

/// What the decision component returned: either a conversational reply
/// (no state mutation) or exactly one tagged action.
#[derive(Debug, Clone, PartialEq)]
pub enum DecisionOutcome {
    /// Free-text reply to send back to the player.
    Reply(String),
    /// One action from the closed vocabulary.
    Action(DecisionAction),
}
