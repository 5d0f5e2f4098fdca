// SPDX-FileCopyrightText: 2026 Volly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Graph API request/response types for outbound messages.

use serde::{Deserialize, Serialize};

/// Outbound text message request body.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageRequest {
    /// Always "whatsapp".
    pub messaging_product: String,
    /// Destination phone number in international format.
    pub to: String,
    /// Message type; always "text" here.
    #[serde(rename = "type")]
    pub message_type: String,
    pub text: TextBody,
}

impl SendMessageRequest {
    pub fn text(to: &str, body: &str) -> Self {
        Self {
            messaging_product: "whatsapp".to_string(),
            to: to.to_string(),
            message_type: "text".to_string(),
            text: TextBody {
                body: body.to_string(),
            },
        }
    }
}

/// Text payload of an outbound message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBody {
    pub body: String,
}

/// Response to a successful send.
#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageResponse {
    pub messages: Vec<SentMessageId>,
}

/// One delivered message id in a send response.
#[derive(Debug, Clone, Deserialize)]
pub struct SentMessageId {
    pub id: String,
}

/// Graph API error envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphErrorResponse {
    pub error: GraphErrorDetail,
}

/// Error detail within a Graph API error response.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub code: i64,
}
