use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Chat channel id (snowflake).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChannelId(pub u64);

/// Chat guild (server) id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GuildId(pub u64);

/// Chat user id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UserId(pub u64);

/// A destination channel, with enough context for the store and notifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ChannelRef {
    pub id: ChannelId,
    pub guild_id: Option<GuildId>,
}

impl ChannelRef {
    pub fn new(id: ChannelId) -> Self {
        Self {
            id,
            guild_id: None,
        }
    }

    pub fn in_guild(id: ChannelId, guild_id: GuildId) -> Self {
        Self {
            id,
            guild_id: Some(guild_id),
        }
    }
}

/// The user who issued a command.
#[derive(Clone, Debug)]
pub struct Author {
    pub id: UserId,
    /// Display tag, only used for operational logs.
    pub tag: String,
}

/// A feed account resolved from a screen name.
///
/// `external_id` is the provider-assigned stable id used as the subscription
/// key; `handle` is the mutable screen name. The renames match the provider
/// wire format so lookup responses deserialize directly into this type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(rename = "id_str")]
    pub external_id: String,
    #[serde(rename = "screen_name")]
    pub handle: String,
}

/// One feed item, reduced to the fields this layer filters and routes on.
/// Everything else (entities, urls, metrics) stays in the adapter.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tweet {
    pub id: String,
    pub author: Identity,
    pub text: String,
    /// The item is a repost of someone else's item.
    #[serde(default)]
    pub is_retweet: bool,
    /// The item carries attached media.
    #[serde(default)]
    pub has_media: bool,
    /// Present when this item quotes another item with a resolvable author.
    #[serde(default)]
    pub quoted: Option<Box<Tweet>>,
    #[serde(default)]
    pub posted_at: Option<DateTime<Utc>>,
}

/// Store-reported change counts after an add/remove.
///
/// `users` counts distinct subscribed accounts that appeared/disappeared as a
/// side effect, not subscription rows; the stream only needs a restart when
/// `users` moved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubscriptionDelta {
    pub channel_id: ChannelId,
    pub users: u64,
    pub subs: u64,
}
