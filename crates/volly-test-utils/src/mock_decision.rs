// SPDX-FileCopyrightText: 2026 Volly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock decision adapter for deterministic testing.
//!
//! `MockDecision` implements `DecisionAdapter` with a scripted queue of
//! outcomes. Each `decide()` call pops the next scripted entry; the
//! requests it received are captured for assertion.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use volly_core::VollyError;
use volly_core::traits::DecisionAdapter;
use volly_core::types::{DecisionOutcome, DecisionRequest};

/// One scripted step: either a successful outcome or an injected failure.
enum Scripted {
    Outcome(DecisionOutcome),
    Failure(String),
}

/// A mock decision component driven by a scripted response queue.
///
/// When the script runs dry, `decide()` returns a default reply rather
/// than panicking, so over-long pipelines fail visibly in assertions.
pub struct MockDecision {
    script: Arc<Mutex<VecDeque<Scripted>>>,
    requests: Arc<Mutex<Vec<DecisionRequest>>>,
}

impl MockDecision {
    /// Create a new mock with an empty script.
    pub fn new() -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue an outcome to return from the next unanswered `decide()` call.
    pub async fn push_outcome(&self, outcome: DecisionOutcome) {
        self.script.lock().await.push_back(Scripted::Outcome(outcome));
    }

    /// Queue a failure to return from the next unanswered `decide()` call.
    pub async fn push_failure(&self, message: &str) {
        self.script
            .lock()
            .await
            .push_back(Scripted::Failure(message.to_string()));
    }

    /// All requests `decide()` has received, in call order.
    pub async fn requests(&self) -> Vec<DecisionRequest> {
        self.requests.lock().await.clone()
    }

    /// Number of `decide()` calls made so far.
    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

impl Default for MockDecision {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DecisionAdapter for MockDecision {
    async fn decide(&self, request: DecisionRequest) -> Result<DecisionOutcome, VollyError> {
        self.requests.lock().await.push(request);
        match self.script.lock().await.pop_front() {
            Some(Scripted::Outcome(outcome)) => Ok(outcome),
            Some(Scripted::Failure(message)) => Err(VollyError::Decision {
                message,
                source: None,
            }),
            None => Ok(DecisionOutcome::Reply("(unscripted reply)".to_string())),
        }
    }
}
