// SPDX-FileCopyrightText: 2026 Volly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Decision adapter trait: the contract the external reasoning component
//! must satisfy.
//!
//! Given a bounded conversational context, the component returns either a
//! free-text reply or exactly one action from a closed vocabulary. It is
//! never handed store-mutation capability; all effects are routed through
//! the dispatch executor so idempotence and validation are enforced in
//! one place regardless of how the component is implemented or retried.

use async_trait::async_trait;

use crate::error::VollyError;
use crate::types::{DecisionOutcome, DecisionRequest};

/// Adapter for the external reasoning component.
#[async_trait]
pub trait DecisionAdapter: Send + Sync {
    /// Maps a bounded context to a reply or a single tagged action.
    ///
    /// Implementations must degrade malformed or missing structured
    /// output to [`DecisionOutcome::Reply`], never to an error, so that
    /// a confused model produces a harmless no-op instead of a fault.
    async fn decide(&self, request: DecisionRequest) -> Result<DecisionOutcome, VollyError>;
}
