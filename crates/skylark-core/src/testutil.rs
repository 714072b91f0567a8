//! Scripted port fakes shared across service tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{ChannelId, ChannelRef, GuildId, Identity, SubscriptionDelta, Tweet};
use crate::errors::Error;
use crate::ports::{
    FeedProvider, FormattedTweet, Notice, Notifier, StreamControl, SubscriptionStore,
    TimelineQuery, TweetFormatter,
};
use crate::Result;

pub fn handles(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("user{i}")).collect()
}

pub fn identity(handle: &str) -> Identity {
    Identity {
        external_id: format!("{handle}-id"),
        handle: handle.to_string(),
    }
}

pub fn tweet(id: &str) -> Tweet {
    Tweet {
        id: id.to_string(),
        author: identity("poster"),
        text: format!("tweet {id}"),
        is_retweet: false,
        has_media: false,
        quoted: None,
        posted_at: None,
    }
}

pub fn retweet(id: &str) -> Tweet {
    Tweet {
        is_retweet: true,
        ..tweet(id)
    }
}

pub fn media_tweet(id: &str) -> Tweet {
    Tweet {
        has_media: true,
        ..tweet(id)
    }
}

#[derive(Clone, Debug)]
enum FailMode {
    Provider(u32, String),
    Transport(String),
}

impl FailMode {
    fn to_error(&self) -> Error {
        match self {
            FailMode::Provider(code, message) => Error::Provider {
                code: *code,
                message: message.clone(),
            },
            FailMode::Transport(message) => Error::Transport(message.clone()),
        }
    }
}

/// `FeedProvider` fake: echoes lookups, serves `feed` page by page, records
/// every call.
#[derive(Default)]
pub struct FakeProvider {
    pub feed: Vec<Tweet>,
    pub single: Option<Tweet>,
    fail: Option<FailMode>,
    pub lookup_calls: Mutex<Vec<Vec<String>>>,
    pub timeline_calls: Mutex<Vec<TimelineQuery>>,
}

impl FakeProvider {
    pub fn with_feed(mut self, feed: Vec<Tweet>) -> Self {
        self.feed = feed;
        self
    }

    pub fn with_single(mut self, tweet: Tweet) -> Self {
        self.single = Some(tweet);
        self
    }

    pub fn with_provider_failure(mut self, code: u32, message: &str) -> Self {
        self.fail = Some(FailMode::Provider(code, message.to_string()));
        self
    }

    pub fn with_transport_failure(mut self, message: &str) -> Self {
        self.fail = Some(FailMode::Transport(message.to_string()));
        self
    }
}

#[async_trait]
impl FeedProvider for FakeProvider {
    async fn lookup(&self, handles: &[String]) -> Result<Vec<Identity>> {
        self.lookup_calls.lock().unwrap().push(handles.to_vec());
        if let Some(fail) = &self.fail {
            return Err(fail.to_error());
        }
        Ok(handles.iter().map(|h| identity(h)).collect())
    }

    async fn timeline(&self, query: &TimelineQuery) -> Result<Vec<Tweet>> {
        self.timeline_calls.lock().unwrap().push(query.clone());
        if let Some(fail) = &self.fail {
            return Err(fail.to_error());
        }

        let start = match &query.max_id {
            Some(id) => self
                .feed
                .iter()
                .position(|t| &t.id == id)
                .map(|p| p + 1)
                .unwrap_or(self.feed.len()),
            None => 0,
        };
        let end = (start + query.page_size).min(self.feed.len());
        Ok(self.feed[start..end].to_vec())
    }

    async fn show(&self, id: &str) -> Result<Tweet> {
        if let Some(fail) = &self.fail {
            return Err(fail.to_error());
        }
        self.single.clone().ok_or(Error::Provider {
            code: 144,
            message: format!("no status with id {id}"),
        })
    }
}

/// `SubscriptionStore` fake. `add` reports one changed user for ids not yet
/// subscribed and zero for ids already present, which is how the real store
/// behaves; `remove` pops scripted deltas (default one user, one sub).
#[derive(Default)]
pub struct FakeStore {
    pub subscribed: Mutex<Vec<String>>,
    pub channels: Vec<ChannelRef>,
    purge_delta: Option<(u64, u64)>,
    fail: Option<String>,
    pub add_calls: Mutex<Vec<(ChannelId, String, String, Vec<String>)>>,
    pub remove_calls: Mutex<Vec<(ChannelId, String)>>,
    pub remove_script: Mutex<Vec<(u64, u64)>>,
}

impl FakeStore {
    pub fn with_subscribed(self, ids: &[&str]) -> Self {
        *self.subscribed.lock().unwrap() = ids.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_channels(mut self, channels: Vec<ChannelRef>) -> Self {
        self.channels = channels;
        self
    }

    pub fn with_remove_script(self, script: Vec<(u64, u64)>) -> Self {
        *self.remove_script.lock().unwrap() = script;
        self
    }

    pub fn with_purge_delta(mut self, users: u64, subs: u64) -> Self {
        self.purge_delta = Some((users, subs));
        self
    }

    pub fn with_failure(mut self, message: &str) -> Self {
        self.fail = Some(message.to_string());
        self
    }

    fn check_fail(&self) -> Result<()> {
        match &self.fail {
            Some(message) => Err(Error::Store(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SubscriptionStore for FakeStore {
    async fn add(
        &self,
        channel: &ChannelRef,
        external_id: &str,
        handle: &str,
        flags: &[String],
    ) -> Result<SubscriptionDelta> {
        self.check_fail()?;
        self.add_calls.lock().unwrap().push((
            channel.id,
            external_id.to_string(),
            handle.to_string(),
            flags.to_vec(),
        ));

        let mut subscribed = self.subscribed.lock().unwrap();
        let users = if subscribed.iter().any(|s| s == external_id) {
            0
        } else {
            subscribed.push(external_id.to_string());
            1
        };
        Ok(SubscriptionDelta {
            channel_id: channel.id,
            users,
            subs: 1,
        })
    }

    async fn remove(
        &self,
        channel_id: ChannelId,
        external_id: &str,
    ) -> Result<SubscriptionDelta> {
        self.check_fail()?;
        self.remove_calls
            .lock()
            .unwrap()
            .push((channel_id, external_id.to_string()));

        let (users, subs) = {
            let mut script = self.remove_script.lock().unwrap();
            if script.is_empty() {
                (1, 1)
            } else {
                script.remove(0)
            }
        };
        Ok(SubscriptionDelta {
            channel_id,
            users,
            subs,
        })
    }

    async fn subscribed_ids(&self) -> Result<Vec<String>> {
        self.check_fail()?;
        Ok(self.subscribed.lock().unwrap().clone())
    }

    async fn unique_channels(&self) -> Result<Vec<ChannelRef>> {
        self.check_fail()?;
        Ok(self.channels.clone())
    }

    async fn remove_channel(&self, channel_id: ChannelId) -> Result<SubscriptionDelta> {
        self.check_fail()?;
        let (users, subs) = self.purge_delta.unwrap_or((0, 0));
        Ok(SubscriptionDelta {
            channel_id,
            users,
            subs,
        })
    }

    async fn remove_guild(&self, _guild_id: GuildId) -> Result<SubscriptionDelta> {
        self.check_fail()?;
        let (users, subs) = self.purge_delta.unwrap_or((0, 0));
        Ok(SubscriptionDelta {
            channel_id: ChannelId(0),
            users,
            subs,
        })
    }
}

#[derive(Default)]
pub struct RecordingStream {
    pub restarts: AtomicUsize,
}

impl RecordingStream {
    pub fn restart_count(&self) -> usize {
        self.restarts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StreamControl for RecordingStream {
    async fn restart(&self) {
        self.restarts.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub notices: Mutex<Vec<(ChannelId, Notice)>>,
    pub announcements: Mutex<Vec<(String, Vec<ChannelId>)>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, channel: &ChannelRef, notice: Notice) -> Result<()> {
        self.notices.lock().unwrap().push((channel.id, notice));
        Ok(())
    }

    async fn announce(&self, message: &str, channels: &[ChannelRef]) -> Result<()> {
        self.announcements
            .lock()
            .unwrap()
            .push((message.to_string(), channels.iter().map(|c| c.id).collect()));
        Ok(())
    }
}

/// Formatter fake: renders `text`, prefixing the quoted half of a pair.
#[derive(Default)]
pub struct FakeFormatter;

#[async_trait]
impl TweetFormatter for FakeFormatter {
    async fn format(&self, tweet: &Tweet, quoted: bool) -> Result<FormattedTweet> {
        let prefix = if quoted { "quoted: " } else { "" };
        Ok(FormattedTweet(format!("{prefix}{}", tweet.text)))
    }
}
