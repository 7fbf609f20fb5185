//! Channel reference resolution.
//!
//! A user-supplied channel reference is either a numeric ID, a `<#id>`
//! mention token, or a plain channel name. IDs resolve by exact match across
//! every cached channel; names resolve by exact match scoped to the guild the
//! command came from. No fuzzy matching.

use once_cell::sync::Lazy;
use regex::Regex;
use serenity::model::id::{ChannelId, GuildId};

use crate::errors::BotError;

/// A parsed channel reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelRef {
    Id(ChannelId),
    Name(String),
}

/// A text channel known to the client's cache, flattened into the fields
/// resolution and file naming need.
#[derive(Debug, Clone)]
pub struct ChannelCandidate {
    pub id: ChannelId,
    pub name: String,
    pub guild_id: GuildId,
    pub guild_name: String,
}

/// A successfully resolved channel handle.
#[derive(Debug, Clone)]
pub struct ResolvedChannel {
    pub id: ChannelId,
    pub name: String,
    pub guild_name: String,
}

/// Parse a raw reference into an ID or a name lookup.
///
/// `<#555>` and bare numerics become [`ChannelRef::Id`]; everything else is
/// treated as a name.
#[must_use]
pub fn parse_channel_ref(reference: &str) -> ChannelRef {
    static MENTION_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^<#(\d+)>$").expect("static regex compile"));

    if let Some(cap) = MENTION_RE.captures(reference) {
        if let Ok(id) = cap[1].parse::<u64>() {
            if id != 0 {
                return ChannelRef::Id(ChannelId::new(id));
            }
        }
    } else if let Ok(id) = reference.parse::<u64>() {
        if id != 0 {
            return ChannelRef::Id(ChannelId::new(id));
        }
    }

    ChannelRef::Name(reference.to_string())
}

/// Resolve a reference against the cached candidates.
///
/// ID references ignore the guild scope entirely; name references require an
/// exact name match within `guild_scope`. Returns `None` when nothing
/// matches - never panics on unknown references.
#[must_use]
pub fn resolve(
    reference: &str,
    guild_scope: Option<GuildId>,
    candidates: &[ChannelCandidate],
) -> Option<ResolvedChannel> {
    let found = match parse_channel_ref(reference) {
        ChannelRef::Id(id) => candidates.iter().find(|c| c.id == id),
        ChannelRef::Name(name) => candidates
            .iter()
            .find(|c| c.name == name && Some(c.guild_id) == guild_scope),
    };

    found.map(|c| ResolvedChannel {
        id: c.id,
        name: c.name.clone(),
        guild_name: c.guild_name.clone(),
    })
}

/// [`resolve`], but surfacing failure as a typed error for the caller's log.
///
/// # Errors
///
/// Returns [`BotError::ChannelNotFound`] when the reference matches nothing.
pub fn resolve_channel(
    reference: &str,
    guild_scope: Option<GuildId>,
    candidates: &[ChannelCandidate],
) -> Result<ResolvedChannel, BotError> {
    resolve(reference, guild_scope, candidates)
        .ok_or_else(|| BotError::ChannelNotFound(reference.to_string()))
}
