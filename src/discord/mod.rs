pub mod client;

pub use client::{ChannelReader, DiscordClient};
