// SPDX-FileCopyrightText: 2026 Volly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock channel adapter for deterministic testing.
//!
//! `MockChannel` implements `ChannelAdapter`, capturing every outbound
//! message for assertion and optionally failing sends to chosen
//! destinations.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use volly_core::VollyError;
use volly_core::traits::ChannelAdapter;
use volly_core::types::MessageId;

/// A recorded outbound message.
#[derive(Debug, Clone, PartialEq)]
pub struct SentMessage {
    pub destination: String,
    pub text: String,
}

/// A mock messaging channel for testing.
///
/// Messages passed to `send()` are captured and retrievable via
/// `sent_messages()`. Destinations registered with `fail_destination()`
/// return a channel error instead.
pub struct MockChannel {
    sent: Arc<Mutex<Vec<SentMessage>>>,
    failing: Arc<Mutex<HashSet<String>>>,
}

impl MockChannel {
    /// Create a new mock channel with no recorded sends.
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            failing: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Make every send to `destination` fail with a channel error.
    pub async fn fail_destination(&self, destination: &str) {
        self.failing.lock().await.insert(destination.to_string());
    }

    /// Get all messages that were sent through `send()`.
    pub async fn sent_messages(&self) -> Vec<SentMessage> {
        self.sent.lock().await.clone()
    }

    /// Get the count of sent messages.
    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    /// Clear all sent messages.
    pub async fn clear_sent(&self) {
        self.sent.lock().await.clear();
    }
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChannelAdapter for MockChannel {
    async fn send(&self, destination: &str, text: &str) -> Result<MessageId, VollyError> {
        if self.failing.lock().await.contains(destination) {
            return Err(VollyError::Channel {
                message: format!("mock send failure for {destination}"),
                source: None,
            });
        }
        self.sent.lock().await.push(SentMessage {
            destination: destination.to_string(),
            text: text.to_string(),
        });
        Ok(MessageId(uuid::Uuid::new_v4().to_string()))
    }
}
