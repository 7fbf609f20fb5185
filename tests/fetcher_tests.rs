use std::sync::Mutex;

use async_trait::async_trait;
use serenity::model::channel::ReactionType;
use serenity::model::id::{ChannelId, MessageId, UserId};

use rere::core::models::{ChannelMessage, ReactionMember};
use rere::discord::ChannelReader;
use rere::errors::BotError;
use rere::fetcher::fetch_all_messages;
use rere::resolver::ResolvedChannel;

/// Tests for the cursor-paginated bulk history fetch.
/// A fake reader serves a fixed newest-first history in pages, honoring the
/// `before` cursor the way the platform does.

struct FakeReader {
    // Newest first, like the platform returns them.
    messages: Vec<ChannelMessage>,
    page_calls: Mutex<usize>,
    fail: bool,
}

impl FakeReader {
    fn with_history(count: u64) -> Self {
        // Descending ids: newer messages have larger snowflakes.
        let messages = (1..=count)
            .rev()
            .map(|id| ChannelMessage {
                id: MessageId::new(id),
                reactions: vec![],
            })
            .collect();
        Self {
            messages,
            page_calls: Mutex::new(0),
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            messages: vec![],
            page_calls: Mutex::new(0),
            fail: true,
        }
    }

    fn calls(&self) -> usize {
        *self.page_calls.lock().unwrap()
    }
}

#[async_trait]
impl ChannelReader for FakeReader {
    async fn message_page(
        &self,
        _channel_id: ChannelId,
        before: Option<MessageId>,
        limit: u8,
    ) -> Result<Vec<ChannelMessage>, BotError> {
        *self.page_calls.lock().unwrap() += 1;
        if self.fail {
            return Err(BotError::ApiError("Missing Access".to_string()));
        }

        let start = match before {
            Some(cursor) => self
                .messages
                .iter()
                .position(|m| m.id == cursor)
                .map_or(self.messages.len(), |i| i + 1),
            None => 0,
        };
        Ok(self
            .messages
            .iter()
            .skip(start)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn reaction_member_page(
        &self,
        _channel_id: ChannelId,
        _message_id: MessageId,
        _emoji: &ReactionType,
        _after: Option<UserId>,
        _limit: u8,
    ) -> Result<Vec<ReactionMember>, BotError> {
        Ok(vec![])
    }
}

fn channel() -> ResolvedChannel {
    ResolvedChannel {
        id: ChannelId::new(555),
        name: "general".to_string(),
        guild_name: "My Server".to_string(),
    }
}

#[tokio::test]
async fn empty_channel_returns_no_messages_after_one_call() {
    let reader = FakeReader::with_history(0);

    let messages = fetch_all_messages(&reader, &channel()).await.unwrap();

    assert!(messages.is_empty());
    assert_eq!(reader.calls(), 1);
}

#[tokio::test]
async fn a_250_message_channel_pages_as_100_100_50() {
    let reader = FakeReader::with_history(250);

    let messages = fetch_all_messages(&reader, &channel()).await.unwrap();

    assert_eq!(messages.len(), 250);
    // Pages of 100, 100, 50; the 50-sized page terminates the loop.
    assert_eq!(reader.calls(), 3);
}

#[tokio::test]
async fn messages_come_back_newest_first_with_no_duplicates_or_gaps() {
    let reader = FakeReader::with_history(250);

    let messages = fetch_all_messages(&reader, &channel()).await.unwrap();

    let ids: Vec<u64> = messages.iter().map(|m| m.id.get()).collect();
    let expected: Vec<u64> = (1..=250).rev().collect();
    assert_eq!(ids, expected);
}

#[tokio::test]
async fn exact_page_boundary_terminates_with_one_extra_empty_call() {
    let reader = FakeReader::with_history(100);

    let messages = fetch_all_messages(&reader, &channel()).await.unwrap();

    assert_eq!(messages.len(), 100);
    // The first page is full, so the fetcher cannot know the channel is
    // exhausted until the follow-up request comes back empty.
    assert_eq!(reader.calls(), 2);
}

#[tokio::test]
async fn partial_first_page_terminates_immediately() {
    let reader = FakeReader::with_history(42);

    let messages = fetch_all_messages(&reader, &channel()).await.unwrap();

    assert_eq!(messages.len(), 42);
    assert_eq!(reader.calls(), 1);
}

#[tokio::test]
async fn transport_error_aborts_with_history_unavailable() {
    let reader = FakeReader::failing();

    let err = fetch_all_messages(&reader, &channel()).await.unwrap_err();

    match err {
        BotError::HistoryUnavailable { channel, detail } => {
            assert_eq!(channel, "general");
            assert!(detail.contains("Missing Access"));
        }
        other => panic!("expected HistoryUnavailable, got: {other:?}"),
    }
}
