// SPDX-FileCopyrightText: 2026 Volly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock adapters for deterministic testing of the attendance pipeline.

pub mod mock_channel;
pub mod mock_decision;

pub use mock_channel::MockChannel;
pub use mock_decision::MockDecision;
