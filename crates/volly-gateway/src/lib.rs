// SPDX-FileCopyrightText: 2026 Volly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook HTTP gateway for the Volly attendance coordinator.
//!
//! Receives WhatsApp Cloud API webhook deliveries and feeds text
//! messages into the inbound pipeline.

pub mod handlers;
pub mod server;

pub use server::{GatewayState, ServerConfig, app, start_server};
