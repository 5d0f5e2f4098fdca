// SPDX-FileCopyrightText: 2026 Volly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WhatsApp Cloud API channel adapter.
//!
//! Implements [`ChannelAdapter`] over the Meta Graph API: outbound text
//! messages go to `POST {api_base}/{phone_number_id}/messages` with a
//! bearer token. Webhook payload parsing lives in [`webhook`].

pub mod types;
pub mod webhook;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::debug;
use volly_config::WhatsappConfig;
use volly_core::VollyError;
use volly_core::traits::ChannelAdapter;
use volly_core::types::MessageId;

use types::{GraphErrorResponse, SendMessageRequest, SendMessageResponse};

/// WhatsApp Cloud API channel adapter.
pub struct WhatsAppChannel {
    client: reqwest::Client,
    api_base: String,
    phone_number_id: String,
}

impl WhatsAppChannel {
    /// Creates a new adapter. Requires `whatsapp.access_token` and
    /// `whatsapp.phone_number_id`.
    pub fn new(config: &WhatsappConfig) -> Result<Self, VollyError> {
        let access_token = config.access_token.as_deref().ok_or_else(|| {
            VollyError::Config("whatsapp.access_token is required for sending".into())
        })?;
        let phone_number_id = config.phone_number_id.clone().ok_or_else(|| {
            VollyError::Config("whatsapp.phone_number_id is required for sending".into())
        })?;

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {access_token}"))
            .map_err(|e| VollyError::Config(format!("invalid access token: {e}")))?;
        auth.set_sensitive(true);
        headers.insert("authorization", auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| VollyError::Channel {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            phone_number_id,
        })
    }

    fn messages_url(&self) -> String {
        format!("{}/{}/messages", self.api_base, self.phone_number_id)
    }
}

#[async_trait]
impl ChannelAdapter for WhatsAppChannel {
    async fn send(&self, destination: &str, text: &str) -> Result<MessageId, VollyError> {
        let request = SendMessageRequest::text(destination, text);
        let response = self
            .client
            .post(self.messages_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| VollyError::Channel {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if let Ok(err) = serde_json::from_str::<GraphErrorResponse>(&body) {
                format!(
                    "Graph API error ({}, code {}): {}",
                    err.error.type_, err.error.code, err.error.message
                )
            } else {
                format!("Graph API returned {status}: {body}")
            };
            return Err(VollyError::Channel {
                message,
                source: None,
            });
        }

        let body: SendMessageResponse =
            response.json().await.map_err(|e| VollyError::Channel {
                message: format!("failed to parse send response: {e}"),
                source: Some(Box::new(e)),
            })?;
        let id = body
            .messages
            .into_iter()
            .next()
            .map(|m| m.id)
            .ok_or_else(|| VollyError::Channel {
                message: "send response contained no message id".into(),
                source: None,
            })?;
        debug!(destination, message_id = %id, "message sent");
        Ok(MessageId(id))
    }
}
