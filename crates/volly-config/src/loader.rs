// SPDX-FileCopyrightText: 2026 Volly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./volly.toml` > `~/.config/volly/volly.toml` > `/etc/volly/volly.toml`
//! with environment variable overrides via `VOLLY_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::VollyConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/volly/volly.toml` (system-wide)
/// 3. `~/.config/volly/volly.toml` (user XDG config)
/// 4. `./volly.toml` (local directory)
/// 5. `VOLLY_*` environment variables
pub fn load_config() -> Result<VollyConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VollyConfig::default()))
        .merge(Toml::file("/etc/volly/volly.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("volly/volly.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("volly.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<VollyConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VollyConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<VollyConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VollyConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. For example, `VOLLY_WHATSAPP_VERIFY_TOKEN`
/// must map to `whatsapp.verify_token`, not `whatsapp.verify.token`.
fn env_provider() -> Env {
    Env::prefixed("VOLLY_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: VOLLY_WHATSAPP_VERIFY_TOKEN -> "whatsapp_verify_token"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("anthropic_", "anthropic.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("whatsapp_", "whatsapp.", 1)
            .replacen("gateway_", "gateway.", 1)
            .replacen("broadcast_", "broadcast.", 1);
        mapped.into()
    })
}
