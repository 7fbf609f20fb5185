use anyhow::{Context as _, Result};
use serenity::model::id::ApplicationId;
use serenity::prelude::{Client, GatewayIntents};
use tracing::info;

use rere::bot::Handler;
use rere::core::config::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    rere::setup_logging();

    let config = AppConfig::from_env()
        .map_err(anyhow::Error::msg)
        .context("failed to load configuration")?;
    info!(output_dir = %config.output_dir, "starting rere");

    let intents =
        GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES | GatewayIntents::MESSAGE_CONTENT;

    let mut builder =
        Client::builder(&config.discord_token, intents).event_handler(Handler::new(config.clone()));
    if let Some(app_id) = config.application_id {
        builder = builder.application_id(ApplicationId::new(app_id));
    }

    let mut client = builder
        .await
        .context("failed to build the Discord client")?;

    client
        .start()
        .await
        .context("error while running the bot")?;

    Ok(())
}
