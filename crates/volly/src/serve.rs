// SPDX-FileCopyrightText: 2026 Volly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `volly serve`: wires storage, the decision adapter, the WhatsApp
//! channel, and the inbound pipeline into the webhook gateway.

use std::sync::Arc;

use tracing::info;
use volly_agent::{InboundPipeline, PipelineSettings};
use volly_anthropic::AnthropicDecision;
use volly_config::VollyConfig;
use volly_core::VollyError;
use volly_core::traits::StorageAdapter;
use volly_gateway::{GatewayState, ServerConfig, start_server};
use volly_storage::SqliteStore;
use volly_whatsapp::WhatsAppChannel;

pub async fn run(config: VollyConfig) -> Result<(), VollyError> {
    let store = Arc::new(SqliteStore::new(config.storage.clone()));
    store.initialize().await?;

    let decision = Arc::new(AnthropicDecision::new(&config.anthropic)?);
    let channel = Arc::new(WhatsAppChannel::new(&config.whatsapp)?);
    let settings = PipelineSettings::from_config(&config)?;
    let pipeline = Arc::new(InboundPipeline::new(
        store.clone(),
        decision,
        channel,
        settings,
    ));

    let state = GatewayState {
        pipeline,
        verify_token: config.whatsapp.verify_token.clone(),
    };
    let server_config = ServerConfig {
        host: config.gateway.host.clone(),
        port: config.gateway.port,
    };

    info!(agent = %config.agent.name, "starting attendance coordinator");
    let result = start_server(&server_config, state).await;
    store.close().await?;
    result
}
