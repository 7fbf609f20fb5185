//! Data records flowing through the fetch/extract/render pipeline.
//!
//! Everything here is a plain copied value allocated per invocation; nothing
//! holds a live reference into the Discord client's cache.

use serde::{Deserialize, Serialize};
use serenity::model::channel::ReactionType;
use serenity::model::id::{MessageId, UserId};

/// A user who applied a reaction, captured at extraction time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactingUser {
    pub id: UserId,
    pub tag: String,
}

/// One entry of a reaction's user list as reported by the platform.
///
/// Discord resolves every entry to a full user account, but the contract
/// keeps room for entries it cannot, so callers filter by pattern match
/// instead of inspecting runtime types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReactionMember {
    User(ReactingUser),
    Unresolved(UserId),
}

impl ReactionMember {
    /// The raw user id, regardless of resolution. Used as the paging cursor.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        match self {
            ReactionMember::User(user) => user.id,
            ReactionMember::Unresolved(id) => *id,
        }
    }
}

/// A reaction summary carried on a fetched message: the emoji itself plus
/// its opaque display label. The initial history fetch only carries these
/// summaries; the full user list is resolved separately per reaction.
#[derive(Debug, Clone)]
pub struct ReactionSummary {
    pub emoji: ReactionType,
    pub label: String,
}

/// The fetcher's message unit: an identifier and the reaction summaries,
/// in the order the platform reported them.
#[derive(Debug, Clone)]
pub struct ChannelMessage {
    pub id: MessageId,
    pub reactions: Vec<ReactionSummary>,
}

/// The extraction output unit: one record per (message, emoji) pair, with
/// the deduplicated list of users who applied that emoji to that message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedReaction {
    pub message_id: MessageId,
    pub emoji: String,
    pub reacting_users: Vec<ReactingUser>,
}

/// Opaque display label for an emoji: the literal character for unicode
/// emoji, the name for custom emoji.
#[must_use]
pub fn emoji_label(emoji: &ReactionType) -> String {
    match emoji {
        ReactionType::Unicode(s) => s.clone(),
        ReactionType::Custom {
            name: Some(name), ..
        } => name.clone(),
        ReactionType::Custom { id, .. } => id.to_string(),
        _ => emoji.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serenity::model::id::EmojiId;

    #[test]
    fn unicode_emoji_label_is_the_literal() {
        let emoji = ReactionType::Unicode("👍".to_string());
        assert_eq!(emoji_label(&emoji), "👍");
    }

    #[test]
    fn custom_emoji_label_is_the_name() {
        let emoji = ReactionType::Custom {
            animated: false,
            id: EmojiId::new(42),
            name: Some("partyparrot".to_string()),
        };
        assert_eq!(emoji_label(&emoji), "partyparrot");
    }

    #[test]
    fn nameless_custom_emoji_falls_back_to_the_id() {
        let emoji = ReactionType::Custom {
            animated: false,
            id: EmojiId::new(42),
            name: None,
        };
        assert_eq!(emoji_label(&emoji), "42");
    }

    #[test]
    fn reaction_member_exposes_the_raw_id() {
        let user = ReactionMember::User(ReactingUser {
            id: UserId::new(10),
            tag: "alice#0001".to_string(),
        });
        let unresolved = ReactionMember::Unresolved(UserId::new(11));
        assert_eq!(user.user_id(), UserId::new(10));
        assert_eq!(unresolved.user_id(), UserId::new(11));
    }

    #[test]
    fn extracted_reaction_round_trips_through_serde() {
        let reaction = ExtractedReaction {
            message_id: MessageId::new(1),
            emoji: "👍".to_string(),
            reacting_users: vec![ReactingUser {
                id: UserId::new(10),
                tag: "alice#0001".to_string(),
            }],
        };
        let json = serde_json::to_string(&reaction).unwrap();
        let parsed: ExtractedReaction = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, reaction);
    }
}
