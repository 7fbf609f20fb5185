//! Bulk history fetcher.
//!
//! Retrieves the complete message history of a channel, newest first, in
//! pages of 100 using the oldest-seen message id as the `before` cursor.

use std::time::Instant;

use serenity::model::id::MessageId;
use tracing::info;

use crate::core::models::ChannelMessage;
use crate::discord::ChannelReader;
use crate::errors::BotError;
use crate::resolver::ResolvedChannel;

/// Fixed page size for history requests. A full page signals that more
/// history may exist; anything smaller signals end-of-history.
pub const PAGE_SIZE: u8 = 100;

/// Fetch every message in the channel, newest first.
///
/// Termination: a page whose size is not exactly [`PAGE_SIZE`] ends the loop,
/// and an empty page ends it immediately. When the channel holds an exact
/// multiple of 100 messages this costs one extra empty-page request - that is
/// the documented contract, not a bug.
///
/// # Errors
///
/// Any transport or permission error aborts the whole fetch; no partial
/// result is returned.
pub async fn fetch_all_messages<R: ChannelReader + ?Sized>(
    reader: &R,
    channel: &ResolvedChannel,
) -> Result<Vec<ChannelMessage>, BotError> {
    let started = Instant::now();
    let mut all_messages: Vec<ChannelMessage> = Vec::new();
    let mut cursor: Option<MessageId> = None;

    loop {
        let page = reader
            .message_page(channel.id, cursor, PAGE_SIZE)
            .await
            .map_err(|e| BotError::HistoryUnavailable {
                channel: channel.name.clone(),
                detail: e.to_string(),
            })?;

        let page_len = page.len();
        all_messages.extend(page);
        info!(
            guild = %channel.guild_name,
            channel = %channel.name,
            fetched = all_messages.len(),
            "fetched message page"
        );

        if page_len != PAGE_SIZE as usize {
            break;
        }
        // The page was full, so the accumulator is non-empty and its last
        // entry is the oldest message seen so far.
        cursor = all_messages.last().map(|m| m.id);
    }

    info!(
        channel = %channel.name,
        total = all_messages.len(),
        elapsed_s = started.elapsed().as_secs_f64(),
        "message history fetched"
    );

    Ok(all_messages)
}
