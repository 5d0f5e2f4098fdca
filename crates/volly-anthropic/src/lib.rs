// SPDX-FileCopyrightText: 2026 Volly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Anthropic-backed implementation of the decision adapter.
//!
//! Translates a [`DecisionRequest`] into a Messages API call carrying the
//! closed tool vocabulary, and maps the response back to a
//! [`DecisionOutcome`]. The adapter never touches storage; actions are
//! returned to the caller for dispatch.

pub mod client;
pub mod types;

use std::str::FromStr;

use async_trait::async_trait;
use tracing::{debug, warn};
use volly_config::AnthropicConfig;
use volly_core::VollyError;
use volly_core::traits::DecisionAdapter;
use volly_core::types::{AttendanceStatus, DecisionAction, DecisionOutcome, DecisionRequest};

pub use client::AnthropicClient;
use types::{ApiMessage, MessageRequest, MessageResponse, ResponseContentBlock, ToolDefinition};

/// Reply used when the model produces no usable text or an unrecognized
/// tool call.
const FALLBACK_REPLY: &str =
    "Sorry, I didn't quite catch that. Are you in for the next game?";

/// Decision adapter backed by the Anthropic Messages API.
pub struct AnthropicDecision {
    client: AnthropicClient,
}

impl AnthropicDecision {
    pub fn new(config: &AnthropicConfig) -> Result<Self, VollyError> {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok())
            .ok_or_else(|| {
                VollyError::Config(
                    "anthropic.api_key or ANTHROPIC_API_KEY is required".to_string(),
                )
            })?;
        let client = AnthropicClient::new(
            api_key,
            config.api_version.clone(),
            config.default_model.clone(),
        )?;
        Ok(Self { client })
    }

    #[cfg(test)]
    fn with_client(client: AnthropicClient) -> Self {
        Self { client }
    }

    fn build_request(&self, request: &DecisionRequest) -> MessageRequest {
        // The Messages API rejects consecutive same-role messages, so
        // adjacent turns with the same role are merged.
        let mut messages: Vec<ApiMessage> = Vec::with_capacity(request.turns.len());
        for turn in &request.turns {
            match messages.last_mut() {
                Some(last) if last.role == turn.role => {
                    last.content.push_str("\n\n");
                    last.content.push_str(&turn.content);
                }
                _ => messages.push(ApiMessage {
                    role: turn.role.clone(),
                    content: turn.content.clone(),
                }),
            }
        }
        MessageRequest {
            model: self.client.default_model().to_string(),
            messages,
            system: Some(request.system_prompt.clone()),
            max_tokens: request.max_tokens,
            tools: Some(tool_definitions()),
        }
    }
}

#[async_trait]
impl DecisionAdapter for AnthropicDecision {
    async fn decide(&self, request: DecisionRequest) -> Result<DecisionOutcome, VollyError> {
        let api_request = self.build_request(&request);
        let response = self.client.complete_message(&api_request).await?;
        debug!(
            stop_reason = ?response.stop_reason,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "decision response received"
        );
        parse_outcome(&response)
    }
}

/// The closed action vocabulary, expressed as Messages API tools.
fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "log_response".to_string(),
            description: "Record the sender's attendance response for the next upcoming game. \
                          Use this whenever the sender states whether they will attend."
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "status": {
                        "type": "string",
                        "enum": ["confirmed", "declined", "maybe"],
                        "description": "The sender's attendance intent."
                    },
                    "confidence": {
                        "type": "number",
                        "minimum": 0.0,
                        "maximum": 1.0,
                        "description": "How confident you are in the interpretation."
                    }
                },
                "required": ["status"]
            }),
        },
        ToolDefinition {
            name: "get_event_details".to_string(),
            description: "Look up the time, location, and confirmed player count for the \
                          next upcoming game. Read-only."
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {}
            }),
        },
        ToolDefinition {
            name: "check_roster".to_string(),
            description: "Look up who has confirmed, declined, or said maybe for the next \
                          upcoming game. Read-only."
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {}
            }),
        },
    ]
}

/// Maps a Messages API response to a decision outcome.
///
/// The first `tool_use` block wins. An unknown tool name or a write call
/// with no status field degrades to a plain reply; a `log_response`
/// carrying a status outside the attendance enum is rejected with
/// [`VollyError::InvalidStatus`] so it never reaches dispatch.
fn parse_outcome(response: &MessageResponse) -> Result<DecisionOutcome, VollyError> {
    for block in &response.content {
        if let ResponseContentBlock::ToolUse { name, input, .. } = block {
            return match parse_action(name, input)? {
                Some(action) => Ok(DecisionOutcome::Action(action)),
                None => {
                    warn!(tool = %name, "malformed tool call, degrading to reply");
                    Ok(DecisionOutcome::Reply(collect_text(response)))
                }
            };
        }
    }
    Ok(DecisionOutcome::Reply(collect_text(response)))
}

fn parse_action(
    name: &str,
    input: &serde_json::Value,
) -> Result<Option<DecisionAction>, VollyError> {
    match name {
        "log_response" => {
            let Some(raw) = input.get("status").and_then(|v| v.as_str()) else {
                return Ok(None);
            };
            let status = AttendanceStatus::from_str(raw)
                .map_err(|_| VollyError::InvalidStatus(raw.to_string()))?;
            let confidence = input.get("confidence").and_then(|v| v.as_f64());
            Ok(Some(DecisionAction::LogResponse { status, confidence }))
        }
        "get_event_details" => Ok(Some(DecisionAction::GetEventDetails)),
        "check_roster" => Ok(Some(DecisionAction::CheckRoster)),
        _ => Ok(None),
    }
}

fn collect_text(response: &MessageResponse) -> String {
    let text: Vec<&str> = response
        .content
        .iter()
        .filter_map(|block| match block {
            ResponseContentBlock::Text { text } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    let joined = text.join("\n").trim().to_string();
    if joined.is_empty() {
        FALLBACK_REPLY.to_string()
    } else {
        joined
    }
}
