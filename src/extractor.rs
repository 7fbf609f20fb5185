//! Reaction extractor.
//!
//! Walks the fetched messages in order and resolves, for each reaction on
//! each message, the full set of users who applied it. The initial history
//! fetch only carries reaction summaries, so this issues one user-list fetch
//! per reaction instance - sequentially, which makes it the wall-clock hot
//! path on heavily reacted channels.

use std::collections::HashSet;
use std::time::Instant;

use serenity::model::id::UserId;
use tracing::{info, warn};

use crate::core::models::{ChannelMessage, ExtractedReaction, ReactingUser, ReactionMember};
use crate::discord::ChannelReader;
use crate::errors::BotError;
use crate::resolver::ResolvedChannel;

/// A single user-list request returns at most this many entries; larger sets
/// are paged with an `after` user-id cursor.
pub const USER_PAGE_SIZE: u8 = 100;

/// Extract one [`ExtractedReaction`] per (message, reaction) pair, in
/// message-then-emoji-encounter order.
///
/// A failure to resolve one reaction's user list is logged and that reaction
/// is skipped; extraction continues with the rest. Entries the platform
/// cannot resolve to an end-user account are filtered out, and duplicate
/// user ids within one pair are dropped defensively.
pub async fn extract_reactions<R: ChannelReader + ?Sized>(
    reader: &R,
    channel: &ResolvedChannel,
    messages: &[ChannelMessage],
) -> Vec<ExtractedReaction> {
    let started = Instant::now();
    let mut extracted = Vec::new();

    for message in messages {
        for reaction in &message.reactions {
            let members =
                match fetch_all_reaction_members(reader, channel, message, &reaction.emoji).await {
                    Ok(members) => members,
                    Err(e) => {
                        warn!(
                            channel = %channel.name,
                            message_id = %message.id,
                            emoji = %reaction.label,
                            error = %e,
                            "skipping reaction: could not resolve its user list"
                        );
                        continue;
                    }
                };

            let mut seen: HashSet<UserId> = HashSet::new();
            let reacting_users: Vec<ReactingUser> = members
                .into_iter()
                .filter_map(|member| match member {
                    ReactionMember::User(user) => Some(user),
                    ReactionMember::Unresolved(_) => None,
                })
                .filter(|user| seen.insert(user.id))
                .collect();

            extracted.push(ExtractedReaction {
                message_id: message.id,
                emoji: reaction.label.clone(),
                reacting_users,
            });
        }
    }

    info!(
        channel = %channel.name,
        messages = messages.len(),
        reactions = extracted.len(),
        elapsed_s = started.elapsed().as_secs_f64(),
        "retrieved all reactions"
    );

    extracted
}

/// Page through the full user list for one (message, emoji) pair.
async fn fetch_all_reaction_members<R: ChannelReader + ?Sized>(
    reader: &R,
    channel: &ResolvedChannel,
    message: &ChannelMessage,
    emoji: &serenity::model::channel::ReactionType,
) -> Result<Vec<ReactionMember>, BotError> {
    let mut members: Vec<ReactionMember> = Vec::new();
    let mut after: Option<UserId> = None;

    loop {
        let page = reader
            .reaction_member_page(channel.id, message.id, emoji, after, USER_PAGE_SIZE)
            .await?;

        let page_len = page.len();
        members.extend(page);

        if page_len < USER_PAGE_SIZE as usize {
            break;
        }
        after = members.last().map(ReactionMember::user_id);
    }

    Ok(members)
}
