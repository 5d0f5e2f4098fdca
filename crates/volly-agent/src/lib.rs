// SPDX-FileCopyrightText: 2026 Volly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation orchestration for the Volly attendance coordinator.
//!
//! The inbound pipeline resolves the sender, assembles bounded context,
//! runs the decision loop, and dispatches actions to storage. The
//! broadcast orchestrator fans out invitations to the active roster.

pub mod broadcast;
pub mod context;
pub mod dispatch;
pub mod pipeline;
pub mod prompts;
pub mod resolver;

pub use broadcast::{BroadcastOrchestrator, BroadcastReport, BroadcastSettings, RecipientOutcome};
pub use dispatch::DispatchExecutor;
pub use pipeline::{InboundPipeline, PipelineSettings};
pub use resolver::IdentityResolver;
