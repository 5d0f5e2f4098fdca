// SPDX-FileCopyrightText: 2026 Volly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the webhook gateway.
//!
//! POST /webhook always answers 200: Meta retries non-200 deliveries
//! aggressively, and a retry storm of unprocessable payloads is worse
//! than dropping them. Anything we can't handle is logged and ignored.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use volly_whatsapp::webhook::{self, WebhookPayload};

use crate::server::GatewayState;

/// Query parameters of the verification handshake.
#[derive(Debug, Deserialize)]
pub struct VerifyParams {
    #[serde(rename = "hub.mode", default)]
    pub mode: String,
    #[serde(rename = "hub.verify_token", default)]
    pub verify_token: String,
    #[serde(rename = "hub.challenge", default)]
    pub challenge: String,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// GET /health
pub async fn get_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /webhook -- Meta's subscription verification handshake.
///
/// Echoes the challenge when the mode and token match; 403 otherwise.
pub async fn get_webhook(
    State(state): State<GatewayState>,
    Query(params): Query<VerifyParams>,
) -> Response {
    let expected = state.verify_token.as_deref().unwrap_or_default();
    if params.mode == "subscribe" && !expected.is_empty() && params.verify_token == expected {
        debug!("webhook verification succeeded");
        (StatusCode::OK, params.challenge).into_response()
    } else {
        warn!(mode = %params.mode, "webhook verification rejected");
        StatusCode::FORBIDDEN.into_response()
    }
}

/// POST /webhook -- message delivery.
///
/// Text messages are handed to the pipeline on detached tasks so the
/// response returns immediately. Status callbacks, non-text messages,
/// and unparseable bodies are acknowledged and dropped.
pub async fn post_webhook(State(state): State<GatewayState>, body: String) -> StatusCode {
    let payload: WebhookPayload = match serde_json::from_str(&body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "ignoring unparseable webhook body");
            return StatusCode::OK;
        }
    };

    let messages = webhook::extract_text_messages(&payload);
    if messages.is_empty() {
        debug!("webhook delivery contained no text messages");
        return StatusCode::OK;
    }

    for message in messages {
        let pipeline = state.pipeline.clone();
        tokio::spawn(async move {
            if let Err(e) = pipeline.handle_inbound(&message.from, &message.body).await {
                warn!(error = %e, from = %message.from, "inbound handling failed");
            }
        });
    }

    StatusCode::OK
}
