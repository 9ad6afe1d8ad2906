//! One pipeline run: extract → transform → (local copy) → load.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use object_store::ObjectStore;
use redditetl_core::AppConfig;
use tracing::Instrument;

use crate::batch_id::BatchId;
use crate::error::PipelineError;
use crate::extract::extract_with_id;
use crate::load::load;
use crate::source::PostSource;
use crate::transform::transform;
use crate::types::{Payload, SentimentTally};

/// Per-deployment knobs that shape a run but not its inputs.
#[derive(Debug, Clone, Default)]
pub struct RunSettings {
    pub key_prefix: String,
    pub persist_local_copy: bool,
    pub local_copy_dir: PathBuf,
    pub unique_batch_ids: bool,
}

impl RunSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            key_prefix: config.key_prefix.clone(),
            persist_local_copy: config.persist_local_copy,
            local_copy_dir: config.local_copy_dir.clone(),
            unique_batch_ids: config.unique_batch_ids,
        }
    }
}

/// Capabilities a run needs, built once at startup.
pub struct PipelineContext<S> {
    pub source: S,
    pub store: Arc<dyn ObjectStore>,
    pub settings: RunSettings,
}

/// Trigger parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub collection: String,
    pub limit: u32,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub batch_id: BatchId,
    /// Full key written to the store, prefix included.
    pub object_key: String,
    pub tally: SentimentTally,
    pub local_copy: Option<PathBuf>,
}

/// Execute one run end to end. Stages run strictly in sequence and the first
/// failure aborts the run; nothing is rolled back.
///
/// # Errors
///
/// Returns the failing stage's error wrapped in [`PipelineError`].
pub async fn run_pipeline<S>(
    ctx: &PipelineContext<S>,
    request: &RunRequest,
) -> Result<RunSummary, PipelineError>
where
    S: PostSource + Sync,
{
    let mut batch_id = BatchId::now();
    if ctx.settings.unique_batch_ids {
        batch_id = batch_id.with_unique_suffix();
    }

    let span = tracing::info_span!(
        "pipeline_run",
        batch_id = %batch_id,
        subreddit = %request.collection,
        limit = request.limit
    );
    run_stages(ctx, request, batch_id).instrument(span).await
}

async fn run_stages<S>(
    ctx: &PipelineContext<S>,
    request: &RunRequest,
    batch_id: BatchId,
) -> Result<RunSummary, PipelineError>
where
    S: PostSource + Sync,
{
    let batch = extract_with_id(&ctx.source, &request.collection, request.limit, batch_id.clone())
        .await?;
    let payload = transform(batch)?;

    let local_copy = if ctx.settings.persist_local_copy {
        Some(write_local_copy(&payload, &ctx.settings.local_copy_dir).await?)
    } else {
        None
    };

    let object_key = format!("{}{}", ctx.settings.key_prefix, payload.object_key);
    load(ctx.store.as_ref(), &payload.body, &object_key).await?;

    tracing::info!(
        key = %object_key,
        rows = payload.row_count(),
        "pipeline run complete"
    );

    Ok(RunSummary {
        batch_id,
        object_key,
        tally: payload.tally,
        local_copy,
    })
}

/// Write the payload to `{dir}/{object_key}`.
///
/// # Errors
///
/// Returns [`PipelineError::LocalCopy`] if the directory cannot be created or
/// the file cannot be written.
pub async fn write_local_copy(payload: &Payload, dir: &Path) -> Result<PathBuf, PipelineError> {
    let path = dir.join(&payload.object_key);
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|source| PipelineError::LocalCopy {
            path: dir.to_path_buf(),
            source,
        })?;
    tokio::fs::write(&path, &payload.body)
        .await
        .map_err(|source| PipelineError::LocalCopy {
            path: path.clone(),
            source,
        })?;
    tracing::debug!(path = %path.display(), "wrote local copy");
    Ok(path)
}
