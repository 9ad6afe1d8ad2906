//! One-shot pipeline runs.
//!
//! Capabilities are built once from config and handed to the pipeline; the
//! whole run is retried under the configured policy.

use std::fmt::Write as _;

use redditetl_core::AppConfig;
use redditetl_pipeline::{
    open_store, run_pipeline, run_with_retries, PipelineContext, PipelineError, PostSource,
    RedditClient, RetryPolicy, RunRequest, RunSettings, RunSummary,
};

use crate::TargetArgs;

/// Fill in the target from CLI flags, falling back to config defaults.
///
/// # Errors
///
/// Returns an error when neither `--subreddit` nor `REDDIT_ETL_SUBREDDIT`
/// names a subreddit.
pub(crate) fn resolve_request(
    config: &AppConfig,
    target: &TargetArgs,
) -> anyhow::Result<RunRequest> {
    let collection = target
        .subreddit
        .clone()
        .or_else(|| config.default_subreddit.clone())
        .ok_or_else(|| {
            anyhow::anyhow!("no subreddit given: pass --subreddit or set REDDIT_ETL_SUBREDDIT")
        })?;

    Ok(RunRequest {
        collection,
        limit: target.limit.unwrap_or(config.post_limit),
    })
}

/// Build the Reddit client and object store once for the process.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built or the storage URL is
/// unusable.
pub(crate) fn build_context(config: &AppConfig) -> anyhow::Result<PipelineContext<RedditClient>> {
    let source = RedditClient::new(config.reddit.clone(), config.request_timeout_secs)
        .map_err(|e| anyhow::anyhow!("failed to build Reddit client: {e}"))?;
    let store = open_store(&config.storage_url)
        .map_err(|e| anyhow::anyhow!("failed to open object store: {e}"))?;

    tracing::debug!(
        env = %config.env,
        storage = %config.storage_url,
        "pipeline context ready"
    );

    Ok(PipelineContext {
        source,
        store,
        settings: RunSettings::from_config(config),
    })
}

pub(crate) fn retry_policy(config: &AppConfig) -> RetryPolicy {
    RetryPolicy::new(config.run_max_retries, config.run_retry_delay_secs)
}

/// One run under `policy`, retried whole on transient failure.
pub(crate) async fn execute<S>(
    ctx: &PipelineContext<S>,
    request: &RunRequest,
    policy: RetryPolicy,
) -> Result<RunSummary, PipelineError>
where
    S: PostSource + Sync,
{
    run_with_retries(policy, || run_pipeline(ctx, request)).await
}

/// Run the pipeline once and print a summary.
///
/// # Errors
///
/// Returns an error if the target cannot be resolved, the context cannot be
/// built, or the run still fails after retries.
pub(crate) async fn run_once(
    config: &AppConfig,
    target: &TargetArgs,
    no_retry: bool,
) -> anyhow::Result<()> {
    let request = resolve_request(config, target)?;
    let ctx = build_context(config)?;
    let policy = if no_retry {
        RetryPolicy::none()
    } else {
        retry_policy(config)
    };

    let summary = execute(&ctx, &request, policy).await?;
    println!("{}", render_summary(&request, &summary));
    Ok(())
}

pub(crate) fn render_summary(request: &RunRequest, summary: &RunSummary) -> String {
    let mut out = format!(
        "r/{}: wrote {} rows to {} (positive {}, neutral {}, negative {})",
        request.collection,
        summary.tally.total(),
        summary.object_key,
        summary.tally.positive,
        summary.tally.neutral,
        summary.tally.negative,
    );
    if let Some(path) = &summary.local_copy {
        let _ = write!(out, "\nlocal copy: {}", path.display());
    }
    out
}
