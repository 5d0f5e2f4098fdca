// SPDX-FileCopyrightText: 2026 Volly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Volly attendance coordinator.
//!
//! "No game" and "bad status" conditions are modelled as explicit variants
//! rather than thrown faults so that pipeline callers are forced to handle
//! each case and convert it into a user-facing reply. An unknown sender is
//! not an error at all; lookups return `Option` and the pipeline greets.

use thiserror::Error;

/// The primary error type used across all Volly adapter traits and core operations.
#[derive(Debug, Error)]
pub enum VollyError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Messaging channel errors (send failure, message format, rate limiting).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Decision component errors (API failure, malformed output, model not found).
    #[error("decision error: {message}")]
    Decision {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// No event is scheduled after the current instant.
    #[error("no upcoming event")]
    NoUpcomingEvent,

    /// A write action carried a status value outside the attendance enum.
    #[error("invalid attendance status: {0}")]
    InvalidStatus(String),

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
