//! rere - A Discord bot that exports emoji-reaction data for a channel.
//!
//! On command (`<prefix>rere <channel>` or `/rere channel:<channel>`), the bot
//! fetches the full message history of a text channel, resolves the users
//! behind every reaction on every message, and replies with a static HTML
//! report listing who reacted with what.
//!
//! # Architecture
//!
//! The system uses:
//! - serenity for the Discord gateway connection and HTTP API
//! - a `ChannelReader` capability trait so the fetch/extract pipeline never
//!   touches the gateway client directly
//! - Tokio for the async runtime
//! - tracing for structured logging

pub mod bot;
pub mod core;
pub mod discord;
pub mod errors;
pub mod extractor;
pub mod fetcher;
pub mod render;
pub mod resolver;

/// Configure structured logging for the bot process.
///
/// Sets up tracing-subscriber with an env-filter (`RUST_LOG`, defaulting to
/// `info`). Call once at the start of `main`.
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
