//! Content-source capability and its Reddit implementation.

mod listing;
mod reddit;

use std::future::Future;

use crate::error::ClientError;
use crate::types::RawPost;

pub use reddit::RedditClient;

/// Anything that can return the top posts of a named collection.
///
/// Implementations are long-lived handles created once at startup; the
/// pipeline only ever calls them through a shared reference.
pub trait PostSource {
    /// Fetch up to `limit` top posts of `collection`, in the source's ranking order.
    fn top_posts(
        &self,
        collection: &str,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<RawPost>, ClientError>> + Send;
}
