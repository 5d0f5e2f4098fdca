// SPDX-FileCopyrightText: 2026 Volly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identity resolution: maps a raw sender phone string to a registered
//! player.
//!
//! New rows always store the canonical form, but rows imported from
//! older data may carry other encodings, so lookup probes the known
//! variants before giving up.

use tracing::debug;
use volly_core::VollyError;
use volly_core::phone;
use volly_core::traits::StorageAdapter;
use volly_core::types::Player;

/// Resolves raw sender identifiers against the player roster.
pub struct IdentityResolver {
    country: String,
}

impl IdentityResolver {
    pub fn new(country: impl Into<String>) -> Self {
        Self {
            country: country.into(),
        }
    }

    /// The canonical form of `raw` under this resolver's country rules.
    pub fn canonicalize(&self, raw: &str) -> String {
        phone::canonicalize(raw, &self.country)
    }

    /// Looks up the player registered under `raw`, probing the canonical
    /// form, the raw string as sent, and the local-trunk variant.
    pub async fn resolve(
        &self,
        store: &dyn StorageAdapter,
        raw: &str,
    ) -> Result<Option<Player>, VollyError> {
        let canonical = self.canonicalize(raw);

        let mut candidates = vec![canonical.clone()];
        if raw != canonical {
            candidates.push(raw.to_string());
        }
        if let Some(trunk) = phone::local_trunk_form(&canonical, &self.country)
            && !candidates.contains(&trunk)
        {
            candidates.push(trunk);
        }

        for candidate in &candidates {
            if let Some(player) = store.get_player_by_phone(candidate).await? {
                debug!(raw, matched = %candidate, player = %player.name, "identity resolved");
                return Ok(Some(player));
            }
        }
        debug!(raw, canonical = %canonical, "no player matched");
        Ok(None)
    }
}
