use std::sync::Arc;

use futures::future;

use crate::{
    domain::Tweet,
    outcome::{translate, Outcome, TrCode, Translated},
    ports::{FeedProvider, FeedSource, FormattedTweet, TimelineQuery, TweetFormatter},
};

/// Provider page size for timeline reads.
pub const PAGE_SIZE: usize = 200;

/// Client-side content filters applied to each page before accumulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TweetFilters {
    /// Drop reposts (`noretweet`).
    pub no_retweets: bool,
    /// Keep only items with attached media (`notext`).
    pub media_only: bool,
}

impl TweetFilters {
    pub fn from_flags(flags: &[String]) -> Self {
        Self {
            no_retweets: flags.iter().any(|f| f == "noretweet"),
            media_only: flags.iter().any(|f| f == "notext"),
        }
    }

    fn keeps(&self, tweet: &Tweet) -> bool {
        (!self.media_only || tweet.has_media) && (!self.no_retweets || !tweet.is_retweet)
    }
}

/// A fetched item, rendered, plus its quoted item when there is one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TweetView {
    pub formatted: FormattedTweet,
    pub quoted: Option<FormattedTweet>,
}

/// Read-side operations against the feed provider.
pub struct TimelineService {
    provider: Arc<dyn FeedProvider>,
    formatter: Arc<dyn TweetFormatter>,
}

impl TimelineService {
    pub fn new(provider: Arc<dyn FeedProvider>, formatter: Arc<dyn TweetFormatter>) -> Self {
        Self {
            provider,
            formatter,
        }
    }

    /// Fetch up to `count` filtered items from a user timeline.
    ///
    /// Pages of [`PAGE_SIZE`] raw items are requested until the filtered
    /// accumulation reaches `count` or a page comes back empty; the cursor
    /// for each page is the last raw item id of the previous one, so a page
    /// whose items are all filtered away still advances the read.
    pub async fn fetch_tweets(
        &self,
        count: usize,
        filters: TweetFilters,
        source: &FeedSource,
    ) -> Outcome<Vec<Tweet>> {
        let general = Translated {
            screen_name: Some(source.label().to_string()),
            ..Translated::new(TrCode::TweetIdGeneralError)
        };
        let requested = vec![source.label().to_string()];

        let mut tweets: Vec<Tweet> = Vec::new();
        let mut max_id: Option<String> = None;

        while tweets.len() < count {
            let query = TimelineQuery {
                source: source.clone(),
                page_size: PAGE_SIZE,
                max_id: max_id.take(),
            };
            let page = match self.provider.timeline(&query).await {
                Ok(page) => page,
                Err(err) => return Err(translate(&err, &requested, general)),
            };
            if page.is_empty() {
                break;
            }

            max_id = page.last().map(|tweet| tweet.id.clone());
            tweets.extend(page.into_iter().filter(|tweet| filters.keeps(tweet)));
        }

        tweets.truncate(count);
        Ok(tweets)
    }

    /// Fetch a single item by id. When it quotes another item with a
    /// resolvable author, both halves are rendered concurrently and returned
    /// as a composite.
    pub async fn tweet_id(&self, id: &str) -> Outcome<TweetView> {
        let general = Translated {
            id: Some(id.to_string()),
            ..Translated::new(TrCode::TweetIdGeneralError)
        };
        let requested = vec![id.to_string()];

        let tweet = match self.provider.show(id).await {
            Ok(tweet) => tweet,
            Err(err) => return Err(translate(&err, &requested, general)),
        };

        if let Some(quoted) = tweet.quoted.as_deref() {
            let (outer, inner) = future::join(
                self.formatter.format(&tweet, false),
                self.formatter.format(quoted, true),
            )
            .await;
            return match (outer, inner) {
                (Ok(formatted), Ok(quoted)) => Ok(TweetView {
                    formatted,
                    quoted: Some(quoted),
                }),
                (Err(err), _) | (_, Err(err)) => Err(translate(&err, &requested, general)),
            };
        }

        match self.formatter.format(&tweet, false).await {
            Ok(formatted) => Ok(TweetView {
                formatted,
                quoted: None,
            }),
            Err(err) => Err(translate(&err, &requested, general)),
        }
    }
}
