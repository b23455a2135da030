use anyhow::{Context, Result};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

extern crate pretty_env_logger;
#[macro_use] extern crate log;

use automacorp::config::EnvConfig;
use automacorp::options::ClientOptions;
use automacorp::{api, Intent, RoomCollectionState, RoomSyncClient};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    pretty_env_logger::init();

    let cancel_token = CancellationToken::new();
    let main_cancel_token = cancel_token.clone();

    info!("🚀 Starting Automacorp rooms client.");

    let config = EnvConfig::load()
        .validate()
        .context("Error checking env variables.")?;

    let options = ClientOptions::load(&config.options)
        .context("Error load options.json.")?;

    let transport = api::init(config.api_url.clone(), config.credentials(), &options)
        .context("Error initializing rooms API client.")?;

    let client = RoomSyncClient::new(Arc::new(transport), options.command_defaults());

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for ctrl+c: {}", e);
            return;
        }
        info!("Received SIGINT");
        main_cancel_token.cancel();
    });

    let work = async {
        client.dispatch(Intent::Refresh).await.context("Refresh task panicked")?;
        log_rooms(&client.rooms());

        if let Some(id) = config.room_id {
            client.dispatch(Intent::Select(id)).await.context("Select task panicked")?;
            match client.selected() {
                Some(room) => info!(
                    "🏠 Room {} '{}': current {:?}°, target {:?}°, {} windows",
                    room.id,
                    room.name,
                    room.current_temperature,
                    room.target_temperature,
                    room.windows.as_ref().map_or(0, Vec::len)
                ),
                None => warn!("Room {} not available", id),
            }
        }
        Ok::<(), anyhow::Error>(())
    };

    tokio::select! {
        res = work => res?,
        _ = cancel_token.cancelled() => info!("Requests were canceled."),
    }

    info!("Done.");
    Ok(())
}

fn log_rooms(state: &RoomCollectionState) {
    if let Some(error) = &state.error {
        error!("Error loading rooms: {}", error);
        return;
    }

    if state.is_pending() {
        info!("No rooms found");
        return;
    }

    for room in &state.rooms {
        info!("• [{}] {}: {:?}° → {:?}°", room.id, room.name, room.current_temperature, room.target_temperature);
    }
}
