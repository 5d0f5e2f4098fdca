// SPDX-FileCopyrightText: 2026 Volly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel adapter trait for outbound message delivery.

use async_trait::async_trait;

use crate::error::VollyError;
use crate::types::MessageId;

/// Adapter for the outbound side of a messaging gateway.
///
/// A send failure is an error to the immediate caller only; the pipeline
/// and the broadcast orchestrator convert it into a logged fallback or a
/// report entry rather than propagating it.
#[async_trait]
pub trait ChannelAdapter: Send + Sync {
    /// Sends `text` to the given destination identifier (canonical phone).
    async fn send(&self, destination: &str, text: &str) -> Result<MessageId, VollyError>;
}
