// SPDX-FileCopyrightText: 2026 Volly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Volly - a WhatsApp volleyball attendance coordinator.
//!
//! Binary entry point: loads configuration, sets up tracing, and
//! dispatches to the subcommands.

mod events;
mod players;
mod serve;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use volly_config::VollyConfig;

/// Volly - a WhatsApp volleyball attendance coordinator.
#[derive(Parser, Debug)]
#[command(name = "volly", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the webhook gateway and handle inbound messages.
    Serve,
    /// Schedule a new game.
    CreateEvent {
        /// Scheduled start time, RFC 3339 (e.g. 2026-09-01T18:00:00+03:00).
        #[arg(long)]
        start_time: String,
        /// Where the game is played.
        #[arg(long, default_value = "Beach Court 1")]
        location: String,
        /// Maximum number of confirmed players.
        #[arg(long, default_value_t = 4)]
        capacity: i64,
    },
    /// Register a new player.
    AddPlayer {
        /// Player display name.
        #[arg(long)]
        name: String,
        /// Phone number in any common encoding.
        #[arg(long)]
        phone: String,
        /// Skill level label.
        #[arg(long, default_value = "Intermediate")]
        skill: String,
        /// Preferred invite language.
        #[arg(long, default_value = "English")]
        language: String,
    },
    /// List the active roster.
    Players,
    /// Show the next upcoming game and its responses.
    Status,
    /// Send invites for the next upcoming game to all active players.
    Broadcast,
}

fn init_tracing(config: &VollyConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.agent.log_level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match volly_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            for error in errors {
                eprintln!("{:?}", miette::Report::new(error));
            }
            std::process::exit(1);
        }
    };
    init_tracing(&config);

    let result = match cli.command {
        Commands::Serve => serve::run(config).await,
        Commands::CreateEvent {
            start_time,
            location,
            capacity,
        } => events::create_event(&config, &start_time, &location, capacity).await,
        Commands::AddPlayer {
            name,
            phone,
            skill,
            language,
        } => players::add_player(&config, &name, &phone, &skill, &language).await,
        Commands::Players => players::list_players(&config).await,
        Commands::Status => events::status(&config).await,
        Commands::Broadcast => events::broadcast(&config).await,
    };

    if let Err(e) = result {
        eprintln!("volly: {e}");
        std::process::exit(1);
    }
}
