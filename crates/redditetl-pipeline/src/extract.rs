//! Extract stage: top posts of a collection, tagged with a batch id.

use crate::batch_id::BatchId;
use crate::error::ClientError;
use crate::source::PostSource;
use crate::types::Batch;

/// Post count used when a trigger does not specify one.
pub const DEFAULT_LIMIT: u32 = 100;

/// Fetch the top `limit` posts of `collection`, stamping the batch with the
/// current time.
///
/// # Errors
///
/// Returns [`ClientError::InvalidRequest`] for an empty or malformed
/// collection name or a zero limit, and propagates any source failure as-is.
pub async fn extract<S>(source: &S, collection: &str, limit: u32) -> Result<Batch, ClientError>
where
    S: PostSource + Sync,
{
    extract_with_id(source, collection, limit, BatchId::now()).await
}

/// [`extract`] with a caller-supplied batch id.
///
/// # Errors
///
/// Same as [`extract`].
pub async fn extract_with_id<S>(
    source: &S,
    collection: &str,
    limit: u32,
    id: BatchId,
) -> Result<Batch, ClientError>
where
    S: PostSource + Sync,
{
    validate_collection(collection)?;
    if limit == 0 {
        return Err(ClientError::InvalidRequest(
            "limit must be greater than zero".to_string(),
        ));
    }

    let posts = source.top_posts(collection, limit).await?;
    tracing::info!(
        batch_id = %id,
        subreddit = collection,
        posts = posts.len(),
        "extracted top posts"
    );

    Ok(Batch { id, posts })
}

/// Subreddit names are `[A-Za-z0-9_]`; `+` joins several into a multireddit.
fn validate_collection(collection: &str) -> Result<(), ClientError> {
    if collection.trim().is_empty() {
        return Err(ClientError::InvalidRequest("collection name must not be empty".to_string()));
    }
    let valid = collection.split('+').all(|part| {
        !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    });
    if !valid {
        return Err(ClientError::InvalidRequest(format!("invalid collection name '{collection}'")));
    }
    Ok(())
}
