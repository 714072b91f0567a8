use futures::future;

use crate::{domain::Identity, ports::FeedProvider, Result};

/// Provider-imposed maximum batch size for one lookup request.
pub const LOOKUP_CHUNK: usize = 100;

/// Resolve screen names to identities, batching into chunks of at most
/// [`LOOKUP_CHUNK`].
///
/// All chunk requests go out concurrently and are jointly awaited; results
/// concatenate in chunk order (order within a chunk is provider-defined).
/// The first failed chunk, in chunk order, fails the whole resolution —
/// later in-flight chunks still run, their results just go unused.
pub async fn resolve(provider: &dyn FeedProvider, handles: &[String]) -> Result<Vec<Identity>> {
    let requests = handles
        .chunks(LOOKUP_CHUNK)
        .map(|chunk| provider.lookup(chunk));
    let pages = future::join_all(requests).await;

    let mut identities = Vec::with_capacity(handles.len());
    for page in pages {
        identities.extend(page?);
    }
    Ok(identities)
}
