use async_trait::async_trait;

use crate::{
    domain::{ChannelId, ChannelRef, GuildId, Identity, SubscriptionDelta, Tweet},
    outcome::Translated,
    Result,
};

/// Where a timeline read is anchored: a screen name or a stable account id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FeedSource {
    Handle(String),
    ExternalId(String),
}

impl FeedSource {
    /// The identifier as given by the user, for error context.
    pub fn label(&self) -> &str {
        match self {
            FeedSource::Handle(h) => h,
            FeedSource::ExternalId(id) => id,
        }
    }
}

/// One page request against the provider timeline endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimelineQuery {
    pub source: FeedSource,
    pub page_size: usize,
    /// Cursor: id of the last raw item from the previous page. `None` on the
    /// first request.
    pub max_id: Option<String>,
}

/// Read side of the feed provider.
///
/// Every call either succeeds or surfaces `Error::Provider { code, message }`
/// (a coded rejection) / `Error::Transport` (no extractable code). Adapters
/// own the wire protocol; this layer never sees HTTP.
#[async_trait]
pub trait FeedProvider: Send + Sync {
    /// Look up at most 100 screen names in one request. The adapter joins
    /// them comma-separated on the wire; result order within a chunk is
    /// whatever the provider returns.
    async fn lookup(&self, handles: &[String]) -> Result<Vec<Identity>>;

    /// One page of a user timeline. An empty page signals exhaustion.
    async fn timeline(&self, query: &TimelineQuery) -> Result<Vec<Tweet>>;

    /// Fetch a single item by id.
    async fn show(&self, id: &str) -> Result<Tweet>;
}

/// Persistent subscription store. The store owns its own consistency for
/// concurrent add/remove on the same channel; this layer never serializes
/// calls to it.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    async fn add(
        &self,
        channel: &ChannelRef,
        external_id: &str,
        handle: &str,
        flags: &[String],
    ) -> Result<SubscriptionDelta>;

    async fn remove(&self, channel_id: ChannelId, external_id: &str)
        -> Result<SubscriptionDelta>;

    /// External ids of every subscribed account, across all channels.
    async fn subscribed_ids(&self) -> Result<Vec<String>>;

    /// Deduplicated set of channels holding at least one subscription.
    async fn unique_channels(&self) -> Result<Vec<ChannelRef>>;

    /// Drop every subscription held by a deleted channel.
    async fn remove_channel(&self, channel_id: ChannelId) -> Result<SubscriptionDelta>;

    /// Drop every subscription held by a deleted guild.
    async fn remove_guild(&self, guild_id: GuildId) -> Result<SubscriptionDelta>;
}

/// Long-lived feed stream lifecycle. `restart` is fire-and-forget; no result
/// is consumed.
#[async_trait]
pub trait StreamControl: Send + Sync {
    async fn restart(&self);
}

/// What gets posted back to a channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    /// A bare translation key (e.g. `usage-start`).
    Key(String),
    /// A translated outcome with structured context.
    Outcome(Translated),
}

/// Outbound notifications. Rendering and localization happen behind this
/// port; the core only hands over keys and structured context.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, channel: &ChannelRef, notice: Notice) -> Result<()>;

    /// Broadcast an operator announcement to many channels.
    async fn announce(&self, message: &str, channels: &[ChannelRef]) -> Result<()>;
}

/// Opaque rendered message, produced and consumed outside this layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormattedTweet(pub String);

/// Renders one feed item into a postable message.
#[async_trait]
pub trait TweetFormatter: Send + Sync {
    /// `quoted` marks the inner item of a quote pair; formatters typically
    /// indent or attribute it differently.
    async fn format(&self, tweet: &Tweet, quoted: bool) -> Result<FormattedTweet>;
}
