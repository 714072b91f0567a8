use std::collections::HashSet;
use std::sync::Arc;

use futures::future;
use tracing::info;

use crate::{
    domain::{ChannelId, ChannelRef, GuildId, Identity, SubscriptionDelta},
    lookup,
    outcome::{translate, Outcome, TrCode, Translated},
    ports::{FeedProvider, Notice, Notifier, StreamControl, SubscriptionStore},
    Result,
};

/// What a successful `start` did: the identities that were resolved and the
/// per-identity store results, in the same order.
#[derive(Clone, Debug)]
pub struct StartReceipt {
    pub identities: Vec<Identity>,
    pub deltas: Vec<SubscriptionDelta>,
}

/// Aggregate result of a `stop`.
#[derive(Clone, Debug)]
pub struct StopReceipt {
    pub identities: Vec<Identity>,
    pub users_removed: u64,
    pub subs_removed: u64,
}

/// Orchestrates subscription changes across the feed provider, the store,
/// and the stream lifecycle. Holds no state of its own; every request is
/// resolved against the collaborators from scratch.
pub struct SubscriptionService {
    provider: Arc<dyn FeedProvider>,
    store: Arc<dyn SubscriptionStore>,
    stream: Arc<dyn StreamControl>,
    notifier: Arc<dyn Notifier>,
    user_limit: usize,
}

impl SubscriptionService {
    pub fn new(
        provider: Arc<dyn FeedProvider>,
        store: Arc<dyn SubscriptionStore>,
        stream: Arc<dyn StreamControl>,
        notifier: Arc<dyn Notifier>,
        user_limit: usize,
    ) -> Self {
        Self {
            provider,
            store,
            stream,
            notifier,
            user_limit,
        }
    }

    /// Subscribe `handles` in `channel`.
    ///
    /// Capacity is enforced after resolution, so the decision is made over
    /// real identities rather than raw handles: when the ceiling would be
    /// hit, only identities already present in the store survive, a
    /// `userLimit` notice fires if anything was dropped, and an empty
    /// survivor set ends the operation as a no-op (`Ok(None)`).
    pub async fn start(
        &self,
        channel: &ChannelRef,
        flags: &[String],
        handles: &[String],
    ) -> Outcome<Option<StartReceipt>> {
        let general = Translated {
            count: Some(handles.len()),
            ..Translated::new(TrCode::StartGeneralError)
        };

        let mut identities = match lookup::resolve(self.provider.as_ref(), handles).await {
            Ok(identities) => identities,
            Err(err) => return Err(translate(&err, handles, general)),
        };

        let subscribed = match self.store.subscribed_ids().await {
            Ok(ids) => ids,
            Err(err) => return Err(translate(&err, handles, general)),
        };

        if subscribed.len() + identities.len() >= self.user_limit {
            let known: HashSet<&str> = subscribed.iter().map(String::as_str).collect();
            let kept: Vec<Identity> = identities
                .iter()
                .filter(|identity| known.contains(identity.external_id.as_str()))
                .cloned()
                .collect();

            if kept.len() != identities.len() {
                let _ = self
                    .notifier
                    .notify(channel, Notice::Outcome(Translated::new(TrCode::UserLimit)))
                    .await;
            }
            // Every requested identity would have been a brand-new
            // subscriber: nothing to do.
            if kept.is_empty() {
                return Ok(None);
            }
            identities = kept;
        }

        let adds = identities
            .iter()
            .map(|identity| {
                self.store
                    .add(channel, &identity.external_id, &identity.handle, flags)
            });
        let results = future::join_all(adds).await;

        let mut deltas = Vec::with_capacity(identities.len());
        for result in results {
            match result {
                Ok(delta) => deltas.push(delta),
                Err(err) => return Err(translate(&err, handles, general.clone())),
            }
        }

        if deltas.iter().any(|delta| delta.users != 0) {
            self.stream.restart().await;
        }

        Ok(Some(StartReceipt { identities, deltas }))
    }

    /// Unsubscribe `handles` from `channel`, returning the aggregate counts
    /// the store reported.
    pub async fn stop(&self, channel: &ChannelRef, handles: &[String]) -> Outcome<StopReceipt> {
        let general = Translated {
            count: Some(handles.len()),
            ..Translated::new(TrCode::GetInfoGeneralError)
        };

        let identities = match lookup::resolve(self.provider.as_ref(), handles).await {
            Ok(identities) => identities,
            Err(err) => return Err(translate(&err, handles, general)),
        };

        let removals = identities
            .iter()
            .map(|identity| self.store.remove(channel.id, &identity.external_id));
        let results = future::join_all(removals).await;

        let mut users_removed = 0;
        let mut subs_removed = 0;
        for result in results {
            match result {
                Ok(delta) => {
                    users_removed += delta.users;
                    subs_removed += delta.subs;
                }
                Err(err) => return Err(translate(&err, handles, general.clone())),
            }
        }

        if users_removed > 0 {
            self.stream.restart().await;
        }

        Ok(StopReceipt {
            identities,
            users_removed,
            subs_removed,
        })
    }

    /// Broadcast `message` to every channel holding at least one
    /// subscription. Returns how many channels were addressed.
    pub async fn announce(&self, message: &str) -> Outcome<usize> {
        let general = Translated::new(TrCode::GetInfoGeneralError);

        let channels = match self.store.unique_channels().await {
            Ok(channels) => channels,
            Err(err) => return Err(translate(&err, &[], general)),
        };

        if let Err(err) = self.notifier.announce(message, &channels).await {
            return Err(translate(&err, &[], general));
        }
        Ok(channels.len())
    }

    /// Purge a deleted channel's subscriptions; the stream only restarts if
    /// a subscribed user disappeared with the channel.
    pub async fn channel_deleted(&self, channel_id: ChannelId) -> Result<SubscriptionDelta> {
        let delta = self.store.remove_channel(channel_id).await?;
        info!(channel = channel_id.0, users = delta.users, "channel deleted");
        if delta.users > 0 {
            self.stream.restart().await;
        }
        Ok(delta)
    }

    /// Purge a departed guild's subscriptions, same restart rule as
    /// [`Self::channel_deleted`].
    pub async fn guild_deleted(&self, guild_id: GuildId) -> Result<SubscriptionDelta> {
        let delta = self.store.remove_guild(guild_id).await?;
        info!(guild = guild_id.0, users = delta.users, "left guild");
        if delta.users > 0 {
            self.stream.restart().await;
        }
        Ok(delta)
    }
}
