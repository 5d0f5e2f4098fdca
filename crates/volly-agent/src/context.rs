// SPDX-FileCopyrightText: 2026 Volly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Context assembly for decision calls.
//!
//! Builds the bounded turn window handed to the decision component: the
//! most recent history oldest-first, then a context annotation carrying
//! the resolved identity and the player's attendance standing, then the
//! new inbound message.

use volly_core::VollyError;
use volly_core::traits::StorageAdapter;
use volly_core::types::{ConversationTurn, DecisionRequest, DecisionTurn, Player, TurnRole};

use crate::prompts;

/// Renders the player's standing for the next upcoming event as the
/// short status summary embedded in the context annotation.
pub async fn attendance_summary(
    store: &dyn StorageAdapter,
    player: &Player,
) -> Result<String, VollyError> {
    let now = chrono::Utc::now().to_rfc3339();
    let Some(event) = store.next_upcoming_event(&now).await? else {
        return Ok("no upcoming event".to_string());
    };
    Ok(match store.get_attendance(&event.id, &player.id).await? {
        Some(record) => record.status.to_string(),
        None => "no response yet".to_string(),
    })
}

/// Assembles a decision request for one inbound message.
///
/// `history` must already be windowed and ordered oldest-first, as
/// returned by `recent_turns`. The annotation sits between history and
/// the inbound message, which is always the final turn; the inbound
/// message is not expected to appear in `history`.
pub fn assemble(
    system_prompt: &str,
    player: &Player,
    history: &[ConversationTurn],
    status_summary: &str,
    inbound: &str,
    max_tokens: u32,
) -> DecisionRequest {
    let mut turns = Vec::with_capacity(history.len() + 2);
    for turn in history {
        turns.push(match turn.role {
            TurnRole::Inbound => DecisionTurn::user(turn.content.clone()),
            TurnRole::Outbound => DecisionTurn::assistant(turn.content.clone()),
        });
    }
    turns.push(DecisionTurn::user(prompts::context_annotation(
        &player.name,
        &player.phone,
        &player.language,
        status_summary,
    )));
    turns.push(DecisionTurn::user(inbound));

    DecisionRequest {
        system_prompt: system_prompt.to_string(),
        turns,
        max_tokens,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player {
            id: "p1".to_string(),
            name: "Dana".to_string(),
            phone: "972501234567".to_string(),
            skill_level: "Intermediate".to_string(),
            active: true,
            language: "Hebrew".to_string(),
            country: "Israel".to_string(),
            created_at: "2026-01-01T00:00:00+00:00".to_string(),
        }
    }

    fn turn(role: TurnRole, content: &str) -> ConversationTurn {
        ConversationTurn {
            id: "t".to_string(),
            phone: "972501234567".to_string(),
            role,
            content: content.to_string(),
            created_at: "2026-08-20T10:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn history_precedes_annotation_and_inbound_is_last() {
        let history = vec![
            turn(TurnRole::Outbound, "Hey bro, game Tuesday, you in?"),
            turn(TurnRole::Inbound, "what time?"),
            turn(TurnRole::Outbound, "Evening."),
        ];
        let request = assemble(
            "system",
            &player(),
            &history,
            "no response yet",
            "ok I'm in",
            1024,
        );

        assert_eq!(request.turns.len(), 5);
        assert_eq!(request.turns[0].role, "assistant");
        assert_eq!(request.turns[0].content, "Hey bro, game Tuesday, you in?");
        assert_eq!(request.turns[1].role, "user");
        assert_eq!(request.turns[2].role, "assistant");
        assert!(request.turns[3].content.starts_with("[CONTEXT]"));
        assert_eq!(request.turns[3].role, "user");
        assert_eq!(request.turns[4].content, "ok I'm in");
        assert_eq!(request.turns[4].role, "user");
    }

    #[test]
    fn annotation_carries_identity_and_status_summary() {
        let request = assemble("system", &player(), &[], "confirmed", "hi", 1024);
        let annotation = &request.turns[0].content;
        assert!(annotation.contains("Dana"));
        assert!(annotation.contains("972501234567"));
        assert!(annotation.contains("Hebrew"));
        assert!(annotation.contains("confirmed"));
    }

    #[test]
    fn empty_history_yields_annotation_plus_inbound() {
        let request = assemble("system", &player(), &[], "no upcoming event", "hi", 512);
        assert_eq!(request.turns.len(), 2);
        assert!(request.turns[0].content.starts_with("[CONTEXT]"));
        assert_eq!(request.turns[1].content, "hi");
        assert_eq!(request.max_tokens, 512);
        assert_eq!(request.system_prompt, "system");
    }
}
