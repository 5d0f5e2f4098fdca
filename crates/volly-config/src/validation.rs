// SPDX-FileCopyrightText: 2026 Volly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as non-empty paths and sane bounds.

use miette::Diagnostic;
use thiserror::Error;

use crate::model::VollyConfig;

/// A configuration error rendered as a miette diagnostic at the CLI boundary.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// Figment failed to parse or merge configuration sources.
    #[error("{0}")]
    #[diagnostic(code(volly::config::parse))]
    Parse(String),

    /// A deserialized value violated a semantic constraint.
    #[error("{message}")]
    #[diagnostic(code(volly::config::validation))]
    Validation { message: String },
}

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)`
/// with all collected validation errors (does not fail fast).
pub fn validate_config(config: &VollyConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.gateway.host.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "gateway.host must not be empty".to_string(),
        });
    } else {
        let addr = config.gateway.host.trim();
        let is_valid_ip = addr.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = addr
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!(
                    "gateway.host `{addr}` is not a valid IP address or hostname"
                ),
            });
        }
    }

    if config.agent.history_window < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "agent.history_window must be at least 1, got {}",
                config.agent.history_window
            ),
        });
    }

    if config.broadcast.parallelism < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "broadcast.parallelism must be at least 1, got {}",
                config.broadcast.parallelism
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
