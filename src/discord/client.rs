//! Discord API access behind a capability trait.
//!
//! The fetch/extract pipeline depends on [`ChannelReader`] rather than on the
//! gateway client, so tests can substitute a fake and no module reaches into
//! ambient client state.

use std::sync::Arc;

use async_trait::async_trait;
use serenity::builder::GetMessages;
use serenity::http::Http;
use serenity::model::channel::{Message, ReactionType};
use serenity::model::id::{ChannelId, MessageId, UserId};

use crate::core::models::{
    ChannelMessage, ReactingUser, ReactionMember, ReactionSummary, emoji_label,
};
use crate::errors::BotError;

/// Read-only channel access capability: one page of history, or one page of
/// a reaction's user list.
#[async_trait]
pub trait ChannelReader: Send + Sync {
    /// Fetch up to `limit` messages strictly older than `before` (or the most
    /// recent messages when `before` is `None`), newest first.
    async fn message_page(
        &self,
        channel_id: ChannelId,
        before: Option<MessageId>,
        limit: u8,
    ) -> Result<Vec<ChannelMessage>, BotError>;

    /// Fetch up to `limit` users who applied `emoji` to the given message,
    /// with ids strictly greater than `after`.
    async fn reaction_member_page(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        emoji: &ReactionType,
        after: Option<UserId>,
        limit: u8,
    ) -> Result<Vec<ReactionMember>, BotError>;
}

/// The live implementation over serenity's HTTP client.
pub struct DiscordClient {
    http: Arc<Http>,
}

impl DiscordClient {
    #[must_use]
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ChannelReader for DiscordClient {
    async fn message_page(
        &self,
        channel_id: ChannelId,
        before: Option<MessageId>,
        limit: u8,
    ) -> Result<Vec<ChannelMessage>, BotError> {
        let mut request = GetMessages::new().limit(limit);
        if let Some(before) = before {
            request = request.before(before);
        }

        let messages = channel_id.messages(&*self.http, request).await?;
        Ok(messages.into_iter().map(channel_message).collect())
    }

    async fn reaction_member_page(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        emoji: &ReactionType,
        after: Option<UserId>,
        limit: u8,
    ) -> Result<Vec<ReactionMember>, BotError> {
        let users = channel_id
            .reaction_users(&*self.http, message_id, emoji.clone(), Some(limit), after)
            .await?;

        // Discord resolves reaction users to full accounts; anything else
        // would surface here as Unresolved and be filtered by the extractor.
        Ok(users
            .into_iter()
            .map(|user| {
                ReactionMember::User(ReactingUser {
                    id: user.id,
                    tag: user.tag(),
                })
            })
            .collect())
    }
}

fn channel_message(message: Message) -> ChannelMessage {
    ChannelMessage {
        id: message.id,
        reactions: message
            .reactions
            .into_iter()
            .map(|reaction| ReactionSummary {
                label: emoji_label(&reaction.reaction_type),
                emoji: reaction.reaction_type,
            })
            .collect(),
    }
}
