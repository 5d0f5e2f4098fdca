// SPDX-FileCopyrightText: 2026 Volly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook payload types for the Cloud API.
//!
//! Meta delivers both inbound messages and status callbacks through the
//! same endpoint; [`extract_text_messages`] pulls out only the text
//! messages and ignores everything else.

use serde::Deserialize;

/// Top-level webhook payload.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    /// Always "whatsapp_business_account" for Cloud API webhooks.
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub entry: Vec<WebhookEntry>,
}

/// One entry in a webhook delivery.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEntry {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub changes: Vec<WebhookChange>,
}

/// One change within an entry.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookChange {
    pub value: ChangeValue,
    #[serde(default)]
    pub field: String,
}

/// The value object carrying messages or status callbacks.
#[derive(Debug, Clone, Deserialize)]
pub struct ChangeValue {
    #[serde(default)]
    pub messaging_product: String,
    #[serde(default)]
    pub messages: Vec<InboundMessage>,
    /// Delivery/read status callbacks. Present on status deliveries;
    /// intentionally left unparsed.
    #[serde(default)]
    pub statuses: Vec<serde_json::Value>,
}

/// One inbound message within a change.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundMessage {
    /// Sender's WhatsApp id (international phone digits).
    pub from: String,
    pub id: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(rename = "type", default)]
    pub message_type: String,
    #[serde(default)]
    pub text: Option<InboundText>,
}

/// Text payload of an inbound message.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundText {
    pub body: String,
}

/// A normalized inbound text message ready for the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMessage {
    pub from: String,
    pub body: String,
}

/// Extracts the text messages from a webhook payload.
///
/// Status callbacks and non-text message types (media, reactions,
/// stickers) are dropped.
pub fn extract_text_messages(payload: &WebhookPayload) -> Vec<TextMessage> {
    payload
        .entry
        .iter()
        .flat_map(|entry| &entry.changes)
        .flat_map(|change| &change.value.messages)
        .filter(|msg| msg.message_type == "text")
        .filter_map(|msg| {
            msg.text.as_ref().map(|text| TextMessage {
                from: msg.from.clone(),
                body: text.body.clone(),
            })
        })
        .collect()
}
