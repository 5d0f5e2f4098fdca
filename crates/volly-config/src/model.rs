// SPDX-FileCopyrightText: 2026 Volly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Volly attendance coordinator.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Volly configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values; credentials are validated separately when serving.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VollyConfig {
    /// Agent identity and conversational behavior settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Anthropic API settings for the decision component.
    #[serde(default)]
    pub anthropic: AnthropicConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// WhatsApp Cloud API integration settings.
    #[serde(default)]
    pub whatsapp: WhatsappConfig,

    /// Webhook gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Invitation broadcast settings.
    #[serde(default)]
    pub broadcast: BroadcastConfig,
}

/// Agent identity and conversational behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the agent.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Country applied to phone canonicalization rules.
    #[serde(default = "default_country")]
    pub country: String,

    /// Language used when a player has no declared language.
    #[serde(default = "default_language")]
    pub default_language: String,

    /// Number of recent conversation turns supplied to the decision
    /// component. Older history is intentionally discarded.
    #[serde(default = "default_history_window")]
    pub history_window: i64,

    /// Inline system prompt string. Overridden by `system_prompt_file` if both set.
    #[serde(default)]
    pub system_prompt: Option<String>,

    /// Path to a markdown file containing the system prompt.
    /// Takes precedence over `system_prompt` if both are set.
    #[serde(default)]
    pub system_prompt_file: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
            country: default_country(),
            default_language: default_language(),
            history_window: default_history_window(),
            system_prompt: None,
            system_prompt_file: None,
        }
    }
}

fn default_agent_name() -> String {
    "volly".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_country() -> String {
    "Israel".to_string()
}

fn default_language() -> String {
    "English".to_string()
}

fn default_history_window() -> i64 {
    10
}

/// Anthropic API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AnthropicConfig {
    /// Anthropic API key. `None` requires the `ANTHROPIC_API_KEY`
    /// environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Default model to use for decision requests.
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Maximum tokens to generate per response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Anthropic API version string.
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_model: default_model(),
            max_tokens: default_max_tokens(),
            api_version: default_api_version(),
        }
    }
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_api_version() -> String {
    "2023-06-01".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("volly").join("volly.db"))
        .and_then(|p| p.to_str().map(String::from))
        .unwrap_or_else(|| "volly.db".to_string())
}

fn default_wal_mode() -> bool {
    true
}

/// WhatsApp Cloud API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WhatsappConfig {
    /// Graph API access token. `None` disables outbound sending.
    #[serde(default)]
    pub access_token: Option<String>,

    /// The business phone number id messages are sent from.
    #[serde(default)]
    pub phone_number_id: Option<String>,

    /// Shared secret echoed back during the webhook verification handshake.
    #[serde(default)]
    pub verify_token: Option<String>,

    /// Graph API base URL. Overridable for testing.
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

impl Default for WhatsappConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            phone_number_id: None,
            verify_token: None,
            api_base: default_api_base(),
        }
    }
}

fn default_api_base() -> String {
    "https://graph.facebook.com/v19.0".to_string()
}

/// Webhook gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Invitation broadcast configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BroadcastConfig {
    /// Maximum recipients processed concurrently.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,

    /// Overall deadline for a broadcast run, in seconds. Recipients not
    /// attempted by the deadline are reported as skipped.
    #[serde(default = "default_deadline_secs")]
    pub deadline_secs: u64,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            parallelism: default_parallelism(),
            deadline_secs: default_deadline_secs(),
        }
    }
}

fn default_parallelism() -> usize {
    4
}

fn default_deadline_secs() -> u64 {
    300
}
