use thiserror::Error;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("Channel {0} is not a valid text channel on this server, or it cannot be accessed")]
    ChannelNotFound(String),

    #[error("Could not fetch messages for channel {channel}: {detail}")]
    HistoryUnavailable { channel: String, detail: String },

    #[error("Failed to access Discord API: {0}")]
    ApiError(String),

    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serenity::Error> for BotError {
    fn from(error: serenity::Error) -> Self {
        BotError::ApiError(error.to_string())
    }
}
