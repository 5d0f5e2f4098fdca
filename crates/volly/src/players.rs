// SPDX-FileCopyrightText: 2026 Volly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `volly add-player` and `volly players`: roster management.

use std::sync::Arc;

use uuid::Uuid;
use volly_config::VollyConfig;
use volly_core::VollyError;
use volly_core::phone;
use volly_core::traits::StorageAdapter;
use volly_core::types::Player;
use volly_storage::SqliteStore;

async fn open_store(config: &VollyConfig) -> Result<Arc<SqliteStore>, VollyError> {
    let store = Arc::new(SqliteStore::new(config.storage.clone()));
    store.initialize().await?;
    Ok(store)
}

pub async fn add_player(
    config: &VollyConfig,
    name: &str,
    raw_phone: &str,
    skill: &str,
    language: &str,
) -> Result<(), VollyError> {
    let store = open_store(config).await?;
    let canonical = phone::canonicalize(raw_phone, &config.agent.country);

    if store.get_player_by_phone(&canonical).await?.is_some() {
        store.close().await?;
        return Err(VollyError::Config(format!(
            "a player with phone {} is already registered",
            phone::display_format(&canonical, &config.agent.country)
        )));
    }

    let player = Player {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        phone: canonical.clone(),
        skill_level: skill.to_string(),
        active: true,
        language: language.to_string(),
        country: config.agent.country.clone(),
        created_at: chrono::Utc::now().to_rfc3339(),
    };
    store.create_player(&player).await?;
    store.close().await?;

    println!(
        "registered {} ({})",
        player.name,
        phone::display_format(&canonical, &config.agent.country)
    );
    Ok(())
}

pub async fn list_players(config: &VollyConfig) -> Result<(), VollyError> {
    let store = open_store(config).await?;
    let players = store.list_active_players().await?;

    if players.is_empty() {
        println!("no active players");
    } else {
        for player in &players {
            println!(
                "{}  {}  {} ({})",
                player.name,
                phone::display_format(&player.phone, &player.country),
                player.skill_level,
                player.language
            );
        }
        println!("{} active player(s)", players.len());
    }
    store.close().await?;
    Ok(())
}
