//! Load stage: write the payload into object storage.

use std::sync::Arc;

use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path;
use object_store::{ObjectStore, PutPayload};

use crate::error::StorageError;

/// Put `body` at `object_key`, replacing any existing object.
///
/// # Errors
///
/// Returns [`StorageError::InvalidKey`] for keys that are not valid object
/// paths, or [`StorageError::Put`] if the store rejects the write.
pub async fn load(
    store: &dyn ObjectStore,
    body: &[u8],
    object_key: &str,
) -> Result<(), StorageError> {
    let location = Path::parse(object_key).map_err(|source| StorageError::InvalidKey {
        key: object_key.to_string(),
        source,
    })?;

    store
        .put(&location, PutPayload::from(body.to_vec()))
        .await
        .map_err(|source| StorageError::Put {
            key: object_key.to_string(),
            source,
        })?;

    tracing::info!(key = object_key, bytes = body.len(), store = %store, "payload written");
    Ok(())
}

/// Build a store from a location URL.
///
/// - `s3://<bucket>`: Amazon S3, credentials and region from the ambient
///   `AWS_*` environment.
/// - `file:///<dir>`: local directory, created if missing.
/// - `memory://`: process-local store, for dry runs.
///
/// # Errors
///
/// Returns [`StorageError::Config`] for unsupported schemes, a bucket URL
/// with a path, or a store that fails to initialise.
pub fn open_store(url: &str) -> Result<Arc<dyn ObjectStore>, StorageError> {
    if let Some(rest) = url.strip_prefix("s3://") {
        let bucket = rest.trim_end_matches('/');
        if bucket.is_empty() || bucket.contains('/') {
            return Err(StorageError::Config(format!(
                "expected s3://<bucket>, got '{url}' (use REDDIT_ETL_KEY_PREFIX for key prefixes)"
            )));
        }
        let store = AmazonS3Builder::from_env()
            .with_bucket_name(bucket)
            .build()
            .map_err(|e| StorageError::Config(format!("S3 bucket '{bucket}': {e}")))?;
        return Ok(Arc::new(store));
    }

    if let Some(dir) = url.strip_prefix("file://") {
        if dir.is_empty() {
            return Err(StorageError::Config("file:// URL needs a directory".to_string()));
        }
        std::fs::create_dir_all(dir)
            .map_err(|e| StorageError::Config(format!("cannot create '{dir}': {e}")))?;
        let store = LocalFileSystem::new_with_prefix(dir)
            .map_err(|e| StorageError::Config(format!("local store '{dir}': {e}")))?;
        return Ok(Arc::new(store));
    }

    if url == "memory://" {
        return Ok(Arc::new(InMemory::new()));
    }

    Err(StorageError::Config(format!(
        "unsupported storage URL '{url}': expected s3://, file:// or memory://"
    )))
}
