use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use twilight_gateway::{EventTypeFlags, Intents, Shard, ShardId, StreamExt as _};
use twilight_http::Client;
use twilight_model::gateway::event::Event;

use rustls::crypto::ring::default_provider;

use bjorn_commands::Commands;
use bjorn_core::{Config, Context};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    // Load the .env file
    dotenvy::dotenv().ok();

    let config = Arc::new(Config::from_env()?);
    let token = config.discord_token.clone();

    // Create a single shared HTTP Client
    let http = Arc::new(Client::new(token.clone()));
    let ctx = Context::new(Arc::clone(&http), Arc::clone(&config));

    // Paginator configuration errors abort start-up here
    let commands = Arc::new(Commands::new(ctx)?);

    let intents = Intents::GUILDS | Intents::GUILD_MESSAGES | Intents::MESSAGE_CONTENT;

    // A shard is one Gateway WebSocket connection to Discord
    let mut shard = Shard::new(ShardId::new(0, 1), token, intents);

    info!(ftc_api = %config.ftc_api_base_url, "Bjorn is connecting...");

    while let Some(item) = shard.next_event(EventTypeFlags::all()).await {
        let event = match item {
            Ok(event) => event,
            Err(source) => {
                error!(?source, "gateway event stream error");
                continue;
            }
        };

        match event {
            Event::Ready(_) => {
                info!("Bjorn has successfully awoken!");
            }
            Event::MessageCreate(msg) => {
                let commands = Arc::clone(&commands);
                tokio::spawn(async move {
                    if let Err(source) = commands.handle_message(msg).await {
                        error!(?source, "message command failed");
                    }
                });
            }
            Event::InteractionCreate(interaction) => {
                let commands = Arc::clone(&commands);
                tokio::spawn(async move {
                    if let Err(source) = commands.handle_interaction(interaction).await {
                        error!(?source, "interaction handling failed");
                    }
                });
            }
            _ => {} // Ignore unused events
        }
    }

    Ok(())
}
